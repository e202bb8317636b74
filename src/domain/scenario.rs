use serde::{Deserialize, Serialize};

use crate::domain::events::{AdjustmentSet, ResetSchedule};
use crate::domain::time_series::Granularity;

pub const DEFAULT_HORIZON: usize = 52;

/// Quantile used to estimate demand and capacity beyond the data.
pub const DEFAULT_QUANTILE: f64 = 0.65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationMode {
    /// Start from the last actual value and project `horizon` periods ahead.
    #[default]
    Forecast,
    /// Re-run the recurrence over every recorded period.
    Replay,
}

/// User choices for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub service: Option<String>,
    pub mode: SimulationMode,
    /// `None` follows the spacing of the data.
    pub granularity: Option<Granularity>,
    pub horizon: usize,
    pub initial_waiting_list: Option<f64>,
    pub demand_offset: f64,
    pub capacity_offset: f64,
    pub quantile: f64,
    pub adjustments: AdjustmentSet,
    pub resets: ResetSchedule,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            service: None,
            mode: SimulationMode::default(),
            granularity: None,
            horizon: DEFAULT_HORIZON,
            initial_waiting_list: None,
            demand_offset: 0.0,
            capacity_offset: 0.0,
            quantile: DEFAULT_QUANTILE,
            adjustments: AdjustmentSet::empty(),
            resets: ResetSchedule::empty(),
        }
    }
}
