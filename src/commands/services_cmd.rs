use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::services::series_csv::load_series_from_csv_file;

pub fn services_command(cmd: Commands) -> ExitCode {
    if let Commands::Services { input } = cmd {
        let table = match load_series_from_csv_file(&input) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Failed to load time series: {e:?}");
                return ExitCode::FAILURE;
            }
        };
        for service in table.services() {
            println!("{service}");
        }
    }
    ExitCode::SUCCESS
}
