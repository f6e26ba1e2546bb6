//! `VrpRouteSolver` implementation backed by `vrp-core`.

use std::time::{Duration, Instant};

use log::debug;
use visitroute_core::{CostMatrix, DEFAULT_TIME_LIMIT, RouteSolver, SolveError, Tour};

use crate::vrp::solve_closed_tour;

/// Default upper bound on `vrp-core` generations.
pub const DEFAULT_MAX_GENERATIONS: usize = 200;

/// Configuration for [`VrpRouteSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpSolverConfig {
    /// Wall-clock budget for the search. `vrp-core` works in whole seconds,
    /// so sub-second limits are rounded up.
    pub time_limit: Duration,
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
}

impl Default for VrpSolverConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            max_generations: DEFAULT_MAX_GENERATIONS,
        }
    }
}

/// Route solver using `vrp-core` to search for low-cost closed tours.
///
/// Every stop other than the depot is a mandatory job. A solution that
/// leaves any stop unassigned is reported as
/// [`SolveError::NoFeasibleTour`] rather than returned as a partial tour.
///
/// # Examples
/// ```
/// use visitroute_core::{CostMatrix, RouteSolver};
/// use visitroute_solver_vrp::VrpRouteSolver;
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 2, 9],
///     vec![9, 0, 2],
///     vec![2, 9, 0],
/// ])?;
/// let tour = VrpRouteSolver::new().solve(&matrix)?;
/// assert_eq!(tour.indices(), &[0, 1, 2, 0]);
/// assert_eq!(tour.total_cost(), 6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpRouteSolver {
    config: VrpSolverConfig,
}

impl VrpRouteSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpSolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpSolverConfig {
        &self.config
    }
}

impl RouteSolver for VrpRouteSolver {
    fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError> {
        let stops = matrix.len();
        if stops < 2 {
            return Err(SolveError::NothingToOptimise { stops });
        }

        let started_at = Instant::now();
        let indices = solve_closed_tour(matrix, &self.config)?;
        let tour = Tour::new(matrix, indices)?;
        debug!(
            "vrp-core tour over {stops} stops costs {} (solved in {:?})",
            tour.total_cost(),
            started_at.elapsed()
        );
        Ok(tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use visitroute_core::UNREACHABLE_COST;

    /// Ring where only the clockwise arc between neighbours is cheap.
    fn one_way_ring(n: usize) -> CostMatrix {
        CostMatrix::from_fn(n, |from, to| {
            let clockwise = to == from + 1 || (to == 0 && from + 1 == n);
            if clockwise { 1 } else { 100 }
        })
    }

    #[fixture]
    fn solver() -> VrpRouteSolver {
        VrpRouteSolver::with_config(VrpSolverConfig {
            time_limit: Duration::from_secs(1),
            max_generations: 100,
        })
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn fewer_than_two_stops_need_no_optimisation(solver: VrpRouteSolver, #[case] n: usize) {
        let matrix = CostMatrix::from_fn(n, |_, _| 1);
        assert_eq!(
            solver.solve(&matrix),
            Err(SolveError::NothingToOptimise { stops: n })
        );
    }

    #[rstest]
    fn two_stops_form_an_out_and_back_tour(solver: VrpRouteSolver) {
        let matrix = CostMatrix::from_rows(vec![vec![0, 4], vec![6, 0]])
            .expect("valid matrix");

        let tour = solver.solve(&matrix).expect("tour");

        assert_eq!(tour.indices(), &[0, 1, 0]);
        assert_eq!(tour.total_cost(), 10);
    }

    #[rstest]
    fn respects_arc_direction(solver: VrpRouteSolver) {
        let matrix = one_way_ring(5);

        let tour = solver.solve(&matrix).expect("tour");

        assert_eq!(tour.indices(), &[0, 1, 2, 3, 4, 0]);
        assert_eq!(tour.total_cost(), 5);
    }

    #[rstest]
    fn visits_unreachable_stops_rather_than_dropping_them(solver: VrpRouteSolver) {
        let matrix = CostMatrix::from_fn(4, |from, to| {
            if from == 3 || to == 3 {
                UNREACHABLE_COST
            } else {
                5
            }
        });

        let tour = solver.solve(&matrix).expect("tour");

        assert_eq!(tour.stop_count(), 4);
        assert!(tour.indices().contains(&3));
    }

    #[rstest]
    fn default_config_matches_documented_values() {
        let config = VrpSolverConfig::default();
        assert_eq!(config.time_limit, Duration::from_secs(1));
        assert_eq!(config.max_generations, DEFAULT_MAX_GENERATIONS);
    }
}
