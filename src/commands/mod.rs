pub mod base_commands;
pub mod completions_cmd;
pub mod plot_cmd;
pub mod report_format;
pub mod services_cmd;
pub mod simulate_cmd;
