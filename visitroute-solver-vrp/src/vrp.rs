//! `vrp-core` modelling helpers for `VrpRouteSolver`.
//!
//! This module converts a cost matrix into a `vrp-core` problem with one
//! vehicle based at stop `0` and one mandatory job per remaining stop, runs
//! the solver, and reads the visiting order back as matrix indices.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use visitroute_core::{CostMatrix, SolveError};
use vrp_core::prelude::*;

use crate::solver::VrpSolverConfig;

const DEPOT_LOCATION: usize = 0;

fn backend_error(err: &impl Display) -> SolveError {
    SolveError::Backend {
        message: err.to_string(),
    }
}

/// Flatten the matrix row by row, as `SimpleTransportCost` expects.
#[expect(
    clippy::cast_precision_loss,
    reason = "vrp-core routing data is floating point; minute costs are far below 2^52"
)]
fn routing_data(matrix: &CostMatrix) -> Vec<f64> {
    matrix
        .rows()
        .iter()
        .flatten()
        .map(|&cost| cost as f64)
        .collect()
}

fn define_transport(matrix: &CostMatrix) -> GenericResult<Arc<dyn TransportCost + Send + Sync>> {
    let durations = routing_data(matrix);
    let distances = durations.clone();
    Ok(Arc::new(SimpleTransportCost::new(durations, distances)?))
}

fn define_goal(transport: Arc<dyn TransportCost + Send + Sync>) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-travel-time")
        .set_transport_cost(transport)
        .set_time_constrained(false)
        .build_minimize_distance()?;

    GoalContextBuilder::with_features(&[minimize_unassigned, transport_feature])?.build()
}

fn define_problem(
    stops: usize,
    goal: GoalContext,
    transport: Arc<dyn TransportCost + Send + Sync>,
) -> GenericResult<Problem> {
    let jobs = (1..stops)
        .map(|location| {
            SingleBuilder::default()
                .id(format!("stop{location}").as_str())
                .location(location)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicle = VehicleBuilder::default()
        .id("seller")
        .add_detail(
            VehicleDetailBuilder::default()
                .set_start_location(DEPOT_LOCATION)
                .set_end_location(DEPOT_LOCATION)
                .build()?,
        )
        .build()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(std::iter::once(vehicle))
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Whole seconds for `vrp-core`, rounding sub-second remainders up.
fn time_limit_secs(limit: Duration) -> usize {
    let secs = limit
        .as_secs()
        .saturating_add(u64::from(limit.subsec_nanos() > 0))
        .max(1);
    usize::try_from(secs).unwrap_or(usize::MAX)
}

/// Solve for a closed tour and return the visited matrix indices, depot
/// included at both ends.
pub(super) fn solve_closed_tour(
    matrix: &CostMatrix,
    config: &VrpSolverConfig,
) -> Result<Vec<usize>, SolveError> {
    let transport = define_transport(matrix).map_err(|err| backend_error(&err))?;
    let goal = define_goal(transport.clone()).map_err(|err| backend_error(&err))?;
    let problem = Arc::new(
        define_problem(matrix.len(), goal, transport).map_err(|err| backend_error(&err))?,
    );

    let vrp_config = VrpConfigBuilder::new(problem.clone())
        .prebuild()
        .map_err(|err| backend_error(&err))?
        .with_max_time(Some(time_limit_secs(config.time_limit)))
        .with_max_generations(Some(config.max_generations))
        .build()
        .map_err(|err| backend_error(&err))?;

    let solution = vrp_core::solver::Solver::new(problem, vrp_config)
        .solve()
        .map_err(|err| backend_error(&err))?;

    if !solution.unassigned.is_empty() {
        debug!(
            "vrp-core left {} of {} stops unassigned",
            solution.unassigned.len(),
            matrix.len().saturating_sub(1)
        );
        return Err(SolveError::NoFeasibleTour);
    }

    let mut locations: Vec<usize> = solution.get_locations().flatten().collect();
    if locations.is_empty() {
        return Err(SolveError::NoFeasibleTour);
    }
    if locations.last() != Some(&DEPOT_LOCATION) {
        locations.push(DEPOT_LOCATION);
    }
    Ok(locations)
}
