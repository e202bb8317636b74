use std::io;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::events::{AdjustmentEvent, AdjustmentSet, EventError, ResetEvent, ResetSchedule};
use crate::domain::scenario::{Scenario, SimulationMode};
use crate::domain::time_series::Granularity;

#[derive(Error, Debug)]
pub enum ScenarioYamlError {
    #[error("failed to read scenario yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse scenario yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("horizon must be greater than zero")]
    InvalidHorizon,
    #[error("quantile must be within [0, 1], got {0}")]
    InvalidQuantile(f64),
    #[error("invalid event configuration: {0}")]
    InvalidEventConfiguration(#[from] EventError),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioRecord {
    service: Option<String>,
    mode: Option<SimulationMode>,
    granularity: Option<Granularity>,
    horizon: Option<usize>,
    initial_waiting_list: Option<f64>,
    demand_offset: Option<f64>,
    capacity_offset: Option<f64>,
    quantile: Option<f64>,
    adjustments: Option<Vec<AdjustmentRecord>>,
    resets: Option<Vec<ResetRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AdjustmentRecord {
    name: String,
    start: String,
    end: Option<String>,
    delta_capacity: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResetRecord {
    date: String,
    value: f64,
}

pub fn load_scenario_from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Scenario, ScenarioYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_scenario_from_yaml_str(&contents)
}

/// Parses a scenario; absent keys keep their defaults and an empty document
/// is the default scenario.
pub fn deserialize_scenario_from_yaml_str(input: &str) -> Result<Scenario, ScenarioYamlError> {
    let record: ScenarioRecord = if input.trim().is_empty() {
        ScenarioRecord::default()
    } else {
        serde_yaml::from_str(input)?
    };

    let defaults = Scenario::default();
    let horizon = record.horizon.unwrap_or(defaults.horizon);
    if horizon == 0 {
        return Err(ScenarioYamlError::InvalidHorizon);
    }
    let quantile = record.quantile.unwrap_or(defaults.quantile);
    if !(0.0..=1.0).contains(&quantile) {
        return Err(ScenarioYamlError::InvalidQuantile(quantile));
    }

    let adjustments = record
        .adjustments
        .unwrap_or_default()
        .into_iter()
        .map(adjustment_from_record)
        .collect::<Result<Vec<_>, _>>()?;
    let resets = record
        .resets
        .unwrap_or_default()
        .into_iter()
        .map(|reset| -> Result<ResetEvent, ScenarioYamlError> {
            Ok(ResetEvent::new(parse_date(&reset.date)?, reset.value)?)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Scenario {
        service: record.service.filter(|name| !name.trim().is_empty()),
        mode: record.mode.unwrap_or(defaults.mode),
        granularity: record.granularity,
        horizon,
        initial_waiting_list: record.initial_waiting_list,
        demand_offset: record.demand_offset.unwrap_or(defaults.demand_offset),
        capacity_offset: record.capacity_offset.unwrap_or(defaults.capacity_offset),
        quantile,
        adjustments: AdjustmentSet::new(adjustments)?,
        resets: ResetSchedule::new(resets)?,
    })
}

fn adjustment_from_record(record: AdjustmentRecord) -> Result<AdjustmentEvent, ScenarioYamlError> {
    let start = parse_date(&record.start)?;
    let end = record.end.as_deref().map(parse_date).transpose()?;
    Ok(AdjustmentEvent::new(
        &record.name,
        start,
        end,
        record.delta_capacity,
    )?)
}

fn parse_date(value: &str) -> Result<NaiveDate, ScenarioYamlError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ScenarioYamlError::InvalidDate(value.to_string()))
}
