pub mod export_csv;
pub mod extrapolation;
pub mod flow_source;
pub mod percentiles;
pub mod projection;
pub mod projection_types;
pub mod scenario_run;
pub mod scenario_yaml;
pub mod series_csv;
pub mod simulation;
pub mod trajectory_plot;
