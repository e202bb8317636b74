use chrono::Local;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(author, version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the services found in a time series CSV
    Services {
        /// Time series CSV file
        #[arg(short, long)]
        input: String,
    },
    /// Simulate the waiting list of one service and export the trajectories as CSV
    Simulate {
        /// Time series CSV file
        #[arg(short, long)]
        input: String,
        /// Scenario YAML file
        #[arg(short, long)]
        scenario: Option<String>,
        /// Output CSV file
        #[arg(short, long)]
        output: String,
        /// Service to simulate, overrides the scenario
        #[arg(long)]
        service: Option<String>,
        /// Date separating recorded history from the forecast (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
        /// Optional path for a YAML summary of the run
        #[arg(short, long)]
        report: Option<String>,
    },
    /// Plot actual, baseline and scenario trajectories into a PNG chart
    Plot {
        /// Time series CSV file
        #[arg(short, long)]
        input: String,
        /// Scenario YAML file
        #[arg(short, long)]
        scenario: Option<String>,
        /// Output PNG file
        #[arg(short, long)]
        output: String,
        /// Service to simulate, overrides the scenario
        #[arg(long)]
        service: Option<String>,
        /// Date separating recorded history from the forecast (YYYY-MM-DD)
        #[arg(short, long, default_value_t = default_as_of())]
        as_of: String,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn default_as_of() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_defaults_as_of_to_today() {
        let args = CliArgs::parse_from([
            "wlsim",
            "simulate",
            "-i",
            "series.csv",
            "-o",
            "output.csv",
        ]);

        if let Commands::Simulate {
            as_of,
            scenario,
            service,
            ..
        } = args.command
        {
            assert_eq!(as_of, default_as_of());
            assert_eq!(scenario, None);
            assert_eq!(service, None);
        } else {
            panic!("expected simulate command");
        }
    }

    #[test]
    fn plot_accepts_service_override() {
        let args = CliArgs::parse_from([
            "wlsim",
            "plot",
            "-i",
            "series.csv",
            "-s",
            "scenario.yaml",
            "-o",
            "plot.png",
            "--service",
            "Paeds",
            "-a",
            "2025-09-29",
        ]);

        if let Commands::Plot {
            scenario,
            service,
            as_of,
            ..
        } = args.command
        {
            assert_eq!(scenario.as_deref(), Some("scenario.yaml"));
            assert_eq!(service.as_deref(), Some("Paeds"));
            assert_eq!(as_of, "2025-09-29");
        } else {
            panic!("expected plot command");
        }
    }
}
