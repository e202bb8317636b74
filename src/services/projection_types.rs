use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportPoint {
    pub period: String,
    pub value: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportAdjustment {
    pub name: String,
    pub start: String,
    pub end: Option<String>,
    pub delta_capacity: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReportReset {
    pub date: String,
    pub value: f64,
    pub applied: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProjectionReport {
    pub service: String,
    pub as_of: String,
    pub mode: String,
    pub initial_waiting_list: f64,
    pub simulated_periods: usize,
    pub last_actual: Option<ReportPoint>,
    pub final_forecast: Option<ReportPoint>,
    pub final_baseline: Option<ReportPoint>,
    /// Baseline minus forecast at the last simulated period.
    pub difference_from_baseline: Option<f64>,
    pub forecast_peak: Option<ReportPoint>,
    pub forecast_clears: Option<String>,
    pub adjustments: Vec<ReportAdjustment>,
    pub resets: Vec<ReportReset>,
}
