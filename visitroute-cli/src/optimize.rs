//! `optimize` command implementation.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use visitroute_core::{DEFAULT_TIME_LIMIT, OptimizationResult, RouteOptimizer, RouteSolver};

use crate::cost::{CostOverrides, CostSettings};
use crate::output::write_json;
use crate::stops::{cap_stops, load_stops, require_existing};
use crate::{ARG_STOPS, ARG_TIME_LIMIT_MS, CliError, ENV_OPTIMIZE_STOPS};

/// Route solver backends selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SolverChoice {
    /// `vrp-core` metaheuristic.
    #[default]
    Vrp,
    /// Native guided local search.
    Gls,
}

/// CLI arguments for the `optimize` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "optimize",
    long_about = "Order a JSON array of stop records into a closed tour \
                 starting and ending at the first stop. Travel times come \
                 from the distance-matrix service when an API key is \
                 configured and from great-circle estimates otherwise.",
    about = "Order stops into a closed tour"
)]
#[ortho_config(prefix = "VISITROUTE")]
pub(crate) struct OptimizeArgs {
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
    /// Optimise only the first N stops of the file.
    #[arg(long, value_name = "count")]
    #[serde(default)]
    pub(crate) max_stops: Option<usize>,
    /// Solver backend.
    #[arg(long, value_enum)]
    #[serde(default)]
    pub(crate) solver: Option<SolverChoice>,
    /// Wall-clock budget for the solver, in milliseconds.
    #[arg(long = ARG_TIME_LIMIT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
    /// Print the visit list without the closing return to the first stop.
    #[arg(long)]
    #[serde(default)]
    pub(crate) visit_list: bool,
}

impl OptimizeArgs {
    pub(crate) fn into_config(self) -> Result<OptimizeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        OptimizeConfig::try_from(merged)
    }
}

/// Resolved `optimize` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OptimizeConfig {
    pub(crate) stops_path: Utf8PathBuf,
    pub(crate) cost: CostSettings,
    pub(crate) max_stops: Option<usize>,
    pub(crate) solver: SolverChoice,
    pub(crate) time_limit: Duration,
    pub(crate) visit_list: bool,
}

impl TryFrom<OptimizeArgs> for OptimizeConfig {
    type Error = CliError;

    fn try_from(args: OptimizeArgs) -> Result<Self, Self::Error> {
        let stops_path = args.stops_path.ok_or(CliError::MissingArgument {
            field: ARG_STOPS,
            env: ENV_OPTIMIZE_STOPS,
        })?;
        let time_limit = match args.time_limit_ms {
            Some(0) => {
                return Err(CliError::InvalidArgument {
                    field: ARG_TIME_LIMIT_MS,
                    reason: "the solver needs a non-zero time budget".to_owned(),
                });
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_TIME_LIMIT,
        };
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
            solver: args.solver.unwrap_or_default(),
            time_limit,
            visit_list: args.visit_list,
        })
    }
}

/// Builds a route solver for the current optimize invocation.
pub(crate) trait RouteSolverBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Box<dyn RouteSolver>, CliError>;
}

pub(crate) struct DefaultRouteSolverBuilder;

impl RouteSolverBuilder for DefaultRouteSolverBuilder {
    fn build(&self, config: &OptimizeConfig) -> Result<Box<dyn RouteSolver>, CliError> {
        match config.solver {
            SolverChoice::Vrp => build_vrp_solver(config.time_limit),
            SolverChoice::Gls => build_gls_solver(config.time_limit),
        }
    }
}

#[cfg(feature = "solver-vrp")]
fn build_vrp_solver(time_limit: Duration) -> Result<Box<dyn RouteSolver>, CliError> {
    use visitroute_solver_vrp::{VrpRouteSolver, VrpSolverConfig};

    Ok(Box::new(VrpRouteSolver::with_config(VrpSolverConfig {
        time_limit,
        ..VrpSolverConfig::default()
    })))
}

#[cfg(not(feature = "solver-vrp"))]
fn build_vrp_solver(_time_limit: Duration) -> Result<Box<dyn RouteSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "the vrp solver",
    })
}

#[cfg(feature = "solver-gls")]
fn build_gls_solver(time_limit: Duration) -> Result<Box<dyn RouteSolver>, CliError> {
    use visitroute_solver_gls::{GlsConfig, GuidedLocalSearchSolver};

    Ok(Box::new(GuidedLocalSearchSolver::with_config(GlsConfig {
        time_limit,
        ..GlsConfig::default()
    })))
}

#[cfg(not(feature = "solver-gls"))]
fn build_gls_solver(_time_limit: Duration) -> Result<Box<dyn RouteSolver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-gls",
        action: "the gls solver",
    })
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_optimize_with(args, &DefaultRouteSolverBuilder, &mut stdout)
}

pub(crate) fn run_optimize_with(
    args: OptimizeArgs,
    builder: &dyn RouteSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    optimize_with_config(&config, builder, writer)
}

pub(crate) fn optimize_with_config(
    config: &OptimizeConfig,
    builder: &dyn RouteSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    require_existing(&config.stops_path, ARG_STOPS)?;
    let stops = cap_stops(load_stops(&config.stops_path)?, config.max_stops);
    info!(
        "optimising {} stops from {} with the {:?} solver",
        stops.len(),
        config.stops_path,
        config.solver
    );

    let solver = builder.build(config)?;
    let optimizer = RouteOptimizer::new(config.cost.matrix_builder()?, solver)
        .with_coordinate_keys(config.cost.keys.clone());
    let result = optimizer.optimize(&stops);

    let payload = if config.visit_list {
        match result.into_visit_list() {
            Ok(visits) => serde_json::to_value(visits),
            Err(failure) => serde_json::to_value(OptimizationResult::Failed(failure)),
        }
    } else {
        serde_json::to_value(&result)
    }
    .map_err(CliError::SerializeOutput)?;
    write_json(writer, &payload)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<OptimizeConfig, CliError> {
    let merged = OptimizeArgs::merge_from_layers(layers).map_err(CliError::from)?;
    OptimizeConfig::try_from(merged)
}
