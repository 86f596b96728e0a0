//! Command-line interface for the visitplan weekly route planner.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod fs;
mod optimize;

pub use error::CliError;

use optimize::{OptimizeArgs, run_optimize};

const ARG_REQUEST: &str = "request";
const ARG_OSRM_BASE_URL: &str = "osrm-base-url";
const ARG_OSRM_PROFILE: &str = "osrm-profile";
const ARG_TIME_LIMIT_SECS: &str = "time-limit-secs";
const ARG_MAX_ITERATIONS: &str = "max-iterations";
const ARG_OUTPUT: &str = "output";
const ENV_REQUEST: &str = "VISITPLAN_CMDS_OPTIMIZE_REQUEST_PATH";

/// Run the visitplan CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] describing the first failure: argument parsing,
/// configuration layering, request loading, solving or writing the response.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => run_optimize(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "visitplan",
    about = "Weekly route planning for a fleet of service vehicles",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Plan a week of visits from a JSON request.
    Optimize(OptimizeArgs),
}

#[cfg(test)]
mod tests;
