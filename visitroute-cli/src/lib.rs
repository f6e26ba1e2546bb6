//! Command-line interface for ordering stops into closed visiting tours.
//!
//! `visitroute optimize <stops.json>` orders a JSON array of stop records
//! into a closed tour from the first stop. `visitroute matrix <stops.json>`
//! prints the travel-cost matrix the optimiser would use and the strategy
//! that produced it. Options can come from CLI flags, environment variables
//! prefixed with `VISITROUTE_`, or configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod cost;
mod error;
mod fs;
mod matrix;
mod optimize;
mod output;
mod stops;

pub use error::CliError;

use matrix::{MatrixArgs, run_matrix};
use optimize::{OptimizeArgs, run_optimize};

pub(crate) const ARG_STOPS: &str = "stops";
pub(crate) const ARG_MINUTES_PER_KM: &str = "minutes-per-km";
pub(crate) const ARG_TIME_LIMIT_MS: &str = "time-limit-ms";
pub(crate) const ARG_REQUEST_TIMEOUT_SECS: &str = "request-timeout-secs";
pub(crate) const ENV_OPTIMIZE_STOPS: &str = "VISITROUTE_CMDS_OPTIMIZE_STOPS_PATH";
pub(crate) const ENV_MATRIX_STOPS: &str = "VISITROUTE_CMDS_MATRIX_STOPS_PATH";

/// Run the `visitroute` CLI with the current process arguments and
/// environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Optimize(args) => run_optimize(args),
        Command::Matrix(args) => run_matrix(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "visitroute",
    about = "Order client visits into a closed tour by travel time",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Order stops into a closed tour starting at the first stop.
    Optimize(OptimizeArgs),
    /// Print the travel-cost matrix for a set of stops.
    Matrix(MatrixArgs),
}

#[cfg(test)]
mod tests;
