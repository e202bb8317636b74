mod commands;
mod domain;
mod services;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use crate::commands::base_commands::{CliArgs, Commands};
use crate::commands::completions_cmd::completions_command;
use crate::commands::plot_cmd::plot_command;
use crate::commands::services_cmd::services_command;
use crate::commands::simulate_cmd::simulate_command;
use clap::Parser;

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();
    match args.command {
        cmd @ Commands::Services { .. } => services_command(cmd),
        cmd @ Commands::Simulate { .. } => simulate_command(cmd),
        cmd @ Commands::Plot { .. } => plot_command(cmd),
        cmd @ Commands::Completions { .. } => completions_command(cmd),
    }
}
