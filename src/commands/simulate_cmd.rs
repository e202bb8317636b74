use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::commands::report_format::format_projection_report;
use crate::services::export_csv::write_export_csv_file;
use crate::services::scenario_run::project_from_files;

pub fn simulate_command(cmd: Commands) -> ExitCode {
    if let Commands::Simulate {
        input,
        scenario,
        output,
        service,
        as_of,
        report,
    } = cmd
    {
        let projection =
            match project_from_files(&input, scenario.as_deref(), service.as_deref(), &as_of) {
                Ok(projection) => projection,
                Err(e) => {
                    eprintln!("Failed to simulate waiting list: {e:?}");
                    return ExitCode::FAILURE;
                }
            };

        if let Err(e) = write_export_csv_file(&output, &projection) {
            eprintln!("Failed to write trajectory export: {e:?}");
            return ExitCode::FAILURE;
        }

        let summary = projection.report();
        if let Some(report_path) = report {
            let yaml = match serde_yaml::to_string(&summary) {
                Ok(contents) => contents,
                Err(e) => {
                    eprintln!("Failed to serialize projection report: {e:?}");
                    return ExitCode::FAILURE;
                }
            };
            if let Err(e) = std::fs::write(&report_path, yaml) {
                eprintln!("Failed to write projection report: {e:?}");
                return ExitCode::FAILURE;
            }
            println!("Projection report written to {report_path}");
        }

        println!("{}", format_projection_report(&summary));
        println!("Trajectory export written to {output}");
    }
    ExitCode::SUCCESS
}
