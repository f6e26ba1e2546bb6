//! `GuidedLocalSearchSolver` implementation.

use std::time::{Duration, Instant};

use log::debug;
use visitroute_core::{CostMatrix, DEFAULT_TIME_LIMIT, RouteSolver, SolveError, Tour};

use crate::construction::path_cheapest_arc;
use crate::search::improve;

/// Default scaling of the penalty weight, in percent of the average arc cost
/// of the first local optimum.
pub const DEFAULT_PENALTY_FACTOR_PERCENT: u64 = 10;

/// Default cap on penalty rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;

/// Configuration for [`GuidedLocalSearchSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlsConfig {
    /// Wall-clock budget for the improvement phase.
    pub time_limit: Duration,
    /// Penalty weight as a percentage of the average arc cost of the first
    /// local optimum.
    pub penalty_factor_percent: u64,
    /// Cap on penalty rounds after the first local optimum.
    pub max_iterations: usize,
}

impl Default for GlsConfig {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            penalty_factor_percent: DEFAULT_PENALTY_FACTOR_PERCENT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Route solver using path-cheapest-arc construction and guided local
/// search.
///
/// The construction always yields a complete tour, so this solver only
/// fails on matrices with fewer than two stops.
///
/// # Examples
/// ```
/// use visitroute_core::{CostMatrix, RouteSolver};
/// use visitroute_solver_gls::GuidedLocalSearchSolver;
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 2, 9],
///     vec![9, 0, 2],
///     vec![2, 9, 0],
/// ])?;
/// let tour = GuidedLocalSearchSolver::new().solve(&matrix)?;
/// assert_eq!(tour.indices(), &[0, 1, 2, 0]);
/// assert_eq!(tour.total_cost(), 6);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuidedLocalSearchSolver {
    config: GlsConfig,
}

impl GuidedLocalSearchSolver {
    /// Construct a solver using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: GlsConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GlsConfig {
        &self.config
    }
}

impl RouteSolver for GuidedLocalSearchSolver {
    fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError> {
        let stops = matrix.len();
        if stops < 2 {
            return Err(SolveError::NothingToOptimise { stops });
        }

        let started_at = Instant::now();
        let initial = path_cheapest_arc(matrix);
        let route = if stops > 2 {
            improve(matrix, &self.config, initial)
        } else {
            initial
        };
        let tour = Tour::new(matrix, route)?;
        debug!(
            "guided local search tour over {stops} stops costs {} (solved in {:?})",
            tour.total_cost(),
            started_at.elapsed()
        );
        Ok(tour)
    }
}
