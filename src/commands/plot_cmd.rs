use std::process::ExitCode;

use crate::commands::base_commands::Commands;
use crate::services::scenario_run::project_from_files;
use crate::services::trajectory_plot::write_projection_png;

pub fn plot_command(cmd: Commands) -> ExitCode {
    if let Commands::Plot {
        input,
        scenario,
        output,
        service,
        as_of,
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

        match write_projection_png(&output, &projection) {
            Ok(()) => println!("Trajectory plot written to {output}"),
            Err(e) => {
                eprintln!("Failed to plot trajectories: {e:?}");
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
