//! `matrix` command implementation.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use visitroute_core::{CostMatrix, FallbackReason, MatrixStrategy};

use crate::cost::{CostOverrides, CostSettings};
use crate::output::write_json;
use crate::stops::{cap_stops, load_stops, require_existing, stop_coordinates};
use crate::{ARG_STOPS, CliError, ENV_MATRIX_STOPS};

/// CLI arguments for the `matrix` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "matrix",
    long_about = "Print the travel-cost matrix, in whole minutes, that the \
                 optimiser would use for a JSON array of stop records, \
                 together with the strategy that produced it. Fewer than \
                 two stops need no travel costs: no source is consulted and \
                 the strategy is reported as `none`.",
    about = "Print the travel-cost matrix for a set of stops"
)]
#[ortho_config(prefix = "VISITROUTE")]
pub(crate) struct MatrixArgs {
    /// Path to a JSON file containing an array of stop objects.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) stops_path: Option<Utf8PathBuf>,
    /// Distance-matrix API key. Placeholder values are ignored.
    #[arg(long, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Distance-matrix endpoint URL.
    #[arg(long, value_name = "url")]
    #[serde(default)]
    pub(crate) matrix_url: Option<String>,
    /// Timeout for the distance-matrix request, in seconds.
    #[arg(long, value_name = "secs")]
    #[serde(default)]
    pub(crate) request_timeout_secs: Option<u64>,
    /// Minutes per kilometre for great-circle estimates.
    #[arg(long, value_name = "minutes")]
    #[serde(default)]
    pub(crate) minutes_per_km: Option<f64>,
    /// Payload field holding each stop's latitude.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) latitude_key: Option<String>,
    /// Payload field holding each stop's longitude.
    #[arg(long, value_name = "field")]
    #[serde(default)]
    pub(crate) longitude_key: Option<String>,
    /// Consider only the first N stops of the file.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) max_stops: Option<usize>,
}

impl MatrixArgs {
    pub(crate) fn into_config(self) -> Result<MatrixConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MatrixConfig::try_from(merged)
    }
}

/// Resolved `matrix` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MatrixConfig {
    pub(crate) stops_path: Utf8PathBuf,
    pub(crate) cost: CostSettings,
    pub(crate) max_stops: Option<usize>,
}

impl TryFrom<MatrixArgs> for MatrixConfig {
    type Error = CliError;

    fn try_from(args: MatrixArgs) -> Result<Self, Self::Error> {
        let stops_path = args.stops_path.ok_or(CliError::MissingArgument {
            field: ARG_STOPS,
            env: ENV_MATRIX_STOPS,
        })?;
        let cost = CostSettings::from(CostOverrides {
            api_key: args.api_key,
            matrix_url: args.matrix_url,
            request_timeout_secs: args.request_timeout_secs,
            minutes_per_km: args.minutes_per_km,
            latitude_key: args.latitude_key,
            longitude_key: args.longitude_key,
        });
        cost.validate()?;
        Ok(Self {
            stops_path,
            cost,
            max_stops: args.max_stops,
        })
    }
}

pub(crate) fn run_matrix(args: MatrixArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    matrix_with_config(&config, &mut stdout)
}

pub(crate) fn matrix_with_config(
    config: &MatrixConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    require_existing(&config.stops_path, ARG_STOPS)?;
    let stops = cap_stops(load_stops(&config.stops_path)?, config.max_stops);
    if stops.len() < 2 {
        let payload = json!({
            "strategy": {
                "kind": "none",
                "detail": format!("{} stop(s) need no travel costs", stops.len()),
            },
            "matrix": CostMatrix::from_fn(stops.len(), |_, _| 0).rows(),
        });
        return write_json(writer, &payload);
    }
    let points = stop_coordinates(&config.stops_path, &stops, &config.cost.keys)?;
    let (matrix, strategy) = config.cost.matrix_builder()?.build_traced(&points);

    let payload = json!({
        "strategy": describe_strategy(&strategy),
        "matrix": matrix.rows(),
    });
    write_json(writer, &payload)
}

fn describe_strategy(strategy: &MatrixStrategy) -> Value {
    match strategy {
        MatrixStrategy::Primary { source } => json!({"kind": "primary", "source": source}),
        MatrixStrategy::Fallback { reason } => json!({
            "kind": "fallback",
            "reason": match reason {
                FallbackReason::NoPrimary => "no-primary",
                FallbackReason::PrimaryFailed(_) => "primary-failed",
            },
            "detail": reason.to_string(),
        }),
    }
}
