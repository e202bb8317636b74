use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::events::{AdjustmentSet, ResetSchedule};
use crate::domain::scenario::{Scenario, SimulationMode};
use crate::domain::time_series::{Granularity, SeriesError, ServiceSeries, TimeSeriesRow};
use crate::domain::trajectory::{Trajectory, TrajectoryPoint};
use crate::services::extrapolation::{ExtrapolationError, QuantileExtrapolator};
use crate::services::flow_source::{FlowSource, ForecastFlows, ObservedFlows, OffsetFlows};
use crate::services::projection_types::{ProjectionReport, ReportAdjustment, ReportPoint, ReportReset};
use crate::services::simulation::{SimulationError, simulate};

#[derive(Error, Debug)]
pub enum ProjectionError {
    #[error("no actual waiting list for {service} before {as_of}")]
    InsufficientHistory { service: String, as_of: NaiveDate },
    #[error("horizon of {horizon} periods from {start} runs past the supported calendar")]
    HorizonOutOfRange { start: NaiveDate, horizon: usize },
    #[error("scenario granularity {scenario:?} does not match the {data:?} spacing of {service}")]
    GranularityMismatch {
        service: String,
        scenario: Granularity,
        data: Granularity,
    },
    #[error(transparent)]
    Series(#[from] SeriesError),
    #[error(transparent)]
    Extrapolation(#[from] ExtrapolationError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Recorded and simulated trajectories of one service for one run.
#[derive(Debug, Clone)]
pub struct Projection {
    pub service: String,
    pub as_of: NaiveDate,
    pub mode: SimulationMode,
    pub initial_value: f64,
    pub actual: Trajectory,
    pub forecast: Trajectory,
    pub baseline: Trajectory,
    pub adjustments: AdjustmentSet,
    pub resets: ResetSchedule,
}

/// Runs the scenario against one service.
///
/// `as_of` splits recorded history from the future and is the only notion of
/// "today" used by the run.
pub fn run_projection(
    series: &ServiceSeries,
    scenario: &Scenario,
    as_of: NaiveDate,
) -> Result<Projection, ProjectionError> {
    let insufficient = || ProjectionError::InsufficientHistory {
        service: series.service().to_string(),
        as_of,
    };

    let granularity = resolve_granularity(series, scenario.granularity)?;

    let (initial_value, forecast, baseline) = match scenario.mode {
        SimulationMode::Forecast => {
            let anchor = series
                .last_actual_before(as_of)
                .or_else(|| {
                    scenario
                        .initial_waiting_list
                        .and_then(|_| series.past(as_of).last())
                })
                .ok_or_else(insufficient)?;
            let initial_value = scenario
                .initial_waiting_list
                .or(anchor.actual_waiting_list)
                .ok_or_else(insufficient)?;
            let periods = forecast_periods(granularity, anchor.period_start, scenario.horizon)?;

            let extrapolator = QuantileExtrapolator::new(series, scenario.quantile)?;
            let mut flows = ForecastFlows::new(series, extrapolator);
            if let Some(first) = periods.first() {
                flows = flows.with_seam(*first, anchor.capacity);
            }
            let flows = OffsetFlows::new(flows, scenario.demand_offset, scenario.capacity_offset);
            let (forecast, baseline) = simulate_pair(initial_value, &periods, &flows, scenario)?;
            (initial_value, forecast, baseline)
        }
        SimulationMode::Replay => {
            let initial_value = scenario
                .initial_waiting_list
                .or_else(|| series.first_actual().and_then(|row| row.actual_waiting_list))
                .ok_or_else(insufficient)?;
            let periods = series.periods();
            let flows = OffsetFlows::new(
                ObservedFlows::new(series),
                scenario.demand_offset,
                scenario.capacity_offset,
            );
            let (forecast, baseline) = simulate_pair(initial_value, &periods, &flows, scenario)?;
            (initial_value, forecast, baseline)
        }
    };

    for reset in scenario.resets.resets() {
        if forecast.value_at(reset.date).is_none() {
            log::warn!(
                "{}: reset on {} matches no simulated period and was not applied",
                series.service(),
                reset.date
            );
        }
    }

    Ok(Projection {
        service: series.service().to_string(),
        as_of,
        mode: scenario.mode,
        initial_value,
        actual: match scenario.mode {
            SimulationMode::Forecast => actual_trajectory(series.past(as_of)),
            SimulationMode::Replay => actual_trajectory(series.rows()),
        },
        forecast,
        baseline,
        adjustments: scenario.adjustments.clone(),
        resets: scenario.resets.clone(),
    })
}

/// The scenario run and its "do nothing" counterpart, which drops the
/// adjustments but keeps the resets.
fn simulate_pair<S: FlowSource>(
    initial_value: f64,
    periods: &[NaiveDate],
    flows: &S,
    scenario: &Scenario,
) -> Result<(Trajectory, Trajectory), SimulationError> {
    log::info!(
        "simulating {} periods from {:?} with initial waiting list {initial_value}",
        periods.len(),
        periods.first()
    );
    let forecast = simulate(
        initial_value,
        periods,
        flows,
        &scenario.adjustments,
        &scenario.resets,
    )?;
    let baseline = simulate(
        initial_value,
        periods,
        flows,
        &AdjustmentSet::empty(),
        &scenario.resets,
    )?;
    Ok((forecast, baseline))
}

/// The scenario's granularity when given, otherwise the data's; the two must
/// agree and the data must be evenly spaced.
fn resolve_granularity(
    series: &ServiceSeries,
    requested: Option<Granularity>,
) -> Result<Granularity, ProjectionError> {
    let native = series.native_granularity()?;
    match (requested, native) {
        (Some(scenario), Some(data)) if scenario != data => Err(ProjectionError::GranularityMismatch {
            service: series.service().to_string(),
            scenario,
            data,
        }),
        (requested, native) => Ok(requested.or(native).unwrap_or_default()),
    }
}

fn forecast_periods(
    granularity: Granularity,
    start: NaiveDate,
    horizon: usize,
) -> Result<Vec<NaiveDate>, ProjectionError> {
    let out_of_range = || ProjectionError::HorizonOutOfRange { start, horizon };
    let steps = i64::try_from(horizon).map_err(|_| out_of_range())?;
    granularity.advance(start, steps).ok_or_else(out_of_range)?;
    (1..=steps)
        .map(|step| granularity.advance(start, step).ok_or_else(out_of_range))
        .collect()
}

fn actual_trajectory(rows: &[TimeSeriesRow]) -> Trajectory {
    let points = rows
        .iter()
        .filter_map(|row| {
            row.actual_waiting_list.map(|value| TrajectoryPoint {
                period: row.period_start,
                value,
            })
        })
        .collect();
    Trajectory::from_points(points)
}

impl Projection {
    pub fn report(&self) -> ProjectionReport {
        let final_forecast = self.forecast.last().map(report_point);
        let final_baseline = self.baseline.last().map(report_point);
        let difference_from_baseline = match (&final_forecast, &final_baseline) {
            (Some(forecast), Some(baseline)) => Some(baseline.value - forecast.value),
            _ => None,
        };

        ProjectionReport {
            service: self.service.clone(),
            as_of: format_date(self.as_of),
            mode: match self.mode {
                SimulationMode::Forecast => "forecast".to_string(),
                SimulationMode::Replay => "replay".to_string(),
            },
            initial_waiting_list: self.initial_value,
            simulated_periods: self.forecast.len(),
            last_actual: self.actual.last().map(report_point),
            final_forecast,
            final_baseline,
            difference_from_baseline,
            forecast_peak: self.forecast.peak().map(report_point),
            forecast_clears: self
                .forecast
                .first_at_or_below(0.0)
                .map(|point| format_date(point.period)),
            adjustments: self
                .adjustments
                .events()
                .iter()
                .map(|event| ReportAdjustment {
                    name: event.name.clone(),
                    start: format_date(event.start),
                    end: event.end.map(format_date),
                    delta_capacity: event.delta_capacity,
                })
                .collect(),
            resets: self
                .resets
                .resets()
                .iter()
                .map(|reset| ReportReset {
                    date: format_date(reset.date),
                    value: reset.value,
                    applied: self.forecast.value_at(reset.date).is_some(),
                })
                .collect(),
        }
    }
}

fn report_point(point: &TrajectoryPoint) -> ReportPoint {
    ReportPoint {
        period: format_date(point.period),
        value: point.value,
    }
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
