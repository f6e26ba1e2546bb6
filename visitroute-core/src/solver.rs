use std::time::Duration;

use thiserror::Error;

use crate::cost::CostMatrix;
use crate::tour::{Tour, TourError};

/// Default wall-clock budget for a single solve.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(1);

/// Errors returned by [`RouteSolver::solve`].
///
/// Any `Err` means the solver produced no tour. Callers must not substitute
/// an arbitrary ordering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The matrix covers fewer than two stops.
    #[error("nothing to optimise for {stops} stop(s)")]
    NothingToOptimise {
        /// Number of stops in the matrix.
        stops: usize,
    },
    /// The search finished without a tour visiting every stop.
    #[error("no feasible tour found within the time limit")]
    NoFeasibleTour,
    /// The backend produced a sequence that is not a valid closed tour.
    #[error("solver produced an invalid tour: {0}")]
    InvalidTour(#[from] TourError),
    /// The backend failed internally.
    #[error("solver backend failed: {message}")]
    Backend {
        /// Backend error description.
        message: String,
    },
}

/// Find a low-cost closed tour through every stop of a matrix.
///
/// Tours start and end at stop `0`. Costs are read directionally:
/// travelling from `a` to `b` costs `matrix.get(a, b)`.
///
/// Implementations are bounded-time heuristics. They need not be optimal and
/// may break ties between equal-cost tours differently from run to run.
/// Solvers must be `Send + Sync` to operate safely across threads.
///
/// # Examples
/// ```
/// use visitroute_core::{CostMatrix, RouteSolver, SolveError, Tour};
///
/// struct InputOrder;
///
/// impl RouteSolver for InputOrder {
///     fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError> {
///         if matrix.len() < 2 {
///             return Err(SolveError::NothingToOptimise { stops: matrix.len() });
///         }
///         Ok(Tour::from_order(matrix, (0..matrix.len()).collect())?)
///     }
/// }
///
/// let matrix = CostMatrix::from_rows(vec![vec![0, 3], vec![4, 0]])?;
/// assert_eq!(InputOrder.solve(&matrix)?.total_cost(), 7);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait RouteSolver: Send + Sync {
    /// Solve for a closed tour.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NothingToOptimise`] for fewer than two stops and
    /// another [`SolveError`] when no tour is found.
    fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError>;
}

impl<T: RouteSolver + ?Sized> RouteSolver for Box<T> {
    fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError> {
        (**self).solve(matrix)
    }
}
