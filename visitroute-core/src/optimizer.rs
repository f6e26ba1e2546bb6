//! Drive a request from raw stops to an ordered visit list.
//!
//! [`RouteOptimizer`] handles the trivial cases itself, validates every
//! coordinate before any cost lookup, then runs the matrix builder and the
//! solver and reorders the caller's original records by the returned tour.

use geo::Coord;
use log::{debug, info, warn};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;

use crate::cost::TravelCostMatrixBuilder;
use crate::solver::RouteSolver;
use crate::stop::{CoordinateError, CoordinateKeys, Stop};

/// Why an optimisation request produced no tour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizationFailure {
    /// A stop lacks usable coordinates.
    #[error("invalid coordinate data")]
    InvalidCoordinates {
        /// Position of the first offending stop in the input.
        index: usize,
        /// What was wrong with it.
        reason: CoordinateError,
    },
    /// The solver found no tour.
    #[error("no feasible solution")]
    NoFeasibleSolution,
}

/// Outcome of [`RouteOptimizer::optimize`].
///
/// Serialises to a JSON array of stops, or to `{"error": "<reason>"}` for
/// [`OptimizationResult::Failed`].
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationResult {
    /// No stops were supplied.
    Empty,
    /// A single stop, returned unchanged.
    Single(Stop),
    /// A closed tour: `n + 1` stops with the depot repeated at the end.
    Tour {
        /// Reordered stops.
        stops: Vec<Stop>,
        /// Total travel cost in minutes.
        total_cost: u64,
    },
    /// No tour could be produced.
    Failed(OptimizationFailure),
}

impl OptimizationResult {
    /// Stops in visiting order as returned to callers.
    ///
    /// Returns `None` for [`OptimizationResult::Failed`].
    pub fn stops(&self) -> Option<&[Stop]> {
        match self {
            Self::Empty => Some(&[]),
            Self::Single(stop) => Some(std::slice::from_ref(stop)),
            Self::Tour { stops, .. } => Some(stops),
            Self::Failed(_) => None,
        }
    }

    /// Whether the request failed.
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Collapse the result into the list of stops a seller should visit.
    ///
    /// Each stop appears once: the closing return to the depot is dropped
    /// from tours.
    ///
    /// # Errors
    ///
    /// Returns the [`OptimizationFailure`] of a failed result.
    ///
    /// # Examples
    /// ```
    /// use visitroute_core::OptimizationResult;
    ///
    /// let visits = OptimizationResult::Empty.into_visit_list()?;
    /// assert!(visits.is_empty());
    /// # Ok::<(), visitroute_core::OptimizationFailure>(())
    /// ```
    pub fn into_visit_list(self) -> Result<Vec<Stop>, OptimizationFailure> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Single(stop) => Ok(vec![stop]),
            Self::Tour { mut stops, .. } => {
                stops.pop();
                Ok(stops)
            }
            Self::Failed(failure) => Err(failure),
        }
    }
}

impl Serialize for OptimizationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Failed(failure) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &failure.to_string())?;
                map.end()
            }
            Self::Empty => serializer.collect_seq(std::iter::empty::<&Stop>()),
            Self::Single(stop) => serializer.collect_seq(std::iter::once(stop)),
            Self::Tour { stops, .. } => serializer.collect_seq(stops),
        }
    }
}

/// Plans a closed visiting tour over caller-supplied stops.
///
/// The first stop is the depot: every tour starts and ends there. Each call
/// to [`optimize`](Self::optimize) is independent.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use visitroute_core::{
///     OptimizationResult, RouteOptimizer, Stop, TravelCostMatrixBuilder,
///     test_support::FixedTourSolver,
/// };
///
/// let optimizer = RouteOptimizer::new(TravelCostMatrixBuilder::new(), FixedTourSolver::identity());
/// let stop: Stop = serde_json::from_value(json!({"id": 1, "latitud": 4.6, "longitud": -74.1}))?;
/// let result = optimizer.optimize(std::slice::from_ref(&stop));
/// assert_eq!(result, OptimizationResult::Single(stop));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug)]
pub struct RouteOptimizer<S> {
    builder: TravelCostMatrixBuilder,
    solver: S,
    keys: CoordinateKeys,
}

impl<S: RouteSolver> RouteOptimizer<S> {
    /// Combine a matrix builder and a solver using the default coordinate
    /// keys.
    pub fn new(builder: TravelCostMatrixBuilder, solver: S) -> Self {
        Self {
            builder,
            solver,
            keys: CoordinateKeys::default(),
        }
    }

    /// Read coordinates from different payload fields.
    #[must_use]
    pub fn with_coordinate_keys(mut self, keys: CoordinateKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Coordinate fields in use.
    pub const fn coordinate_keys(&self) -> &CoordinateKeys {
        &self.keys
    }

    /// Order `stops` into a closed tour from the first stop.
    ///
    /// No cost lookup happens unless every stop has valid coordinates.
    pub fn optimize(&self, stops: &[Stop]) -> OptimizationResult {
        match stops {
            [] => return OptimizationResult::Empty,
            [only] => return OptimizationResult::Single(only.clone()),
            _ => {}
        }

        let points = match self.extract_points(stops) {
            Ok(points) => points,
            Err(failure) => {
                warn!("rejecting {} stops: {failure:?}", stops.len());
                return OptimizationResult::Failed(failure);
            }
        };

        let matrix = self.builder.build(&points);
        debug!("built {0}x{0} cost matrix", matrix.len());

        let tour = match self.solver.solve(&matrix) {
            Ok(tour) => tour,
            Err(err) => {
                warn!("no tour for {} stops: {err}", stops.len());
                return OptimizationResult::Failed(OptimizationFailure::NoFeasibleSolution);
            }
        };

        let ordered: Option<Vec<Stop>> = tour
            .indices()
            .iter()
            .map(|&index| stops.get(index).cloned())
            .collect();
        match ordered {
            Some(ordered) if ordered.len() == stops.len() + 1 => {
                info!(
                    "planned tour over {} stops costing {} minutes",
                    stops.len(),
                    tour.total_cost()
                );
                OptimizationResult::Tour {
                    stops: ordered,
                    total_cost: tour.total_cost(),
                }
            }
            _ => {
                warn!("solver tour does not cover the {} input stops", stops.len());
                OptimizationResult::Failed(OptimizationFailure::NoFeasibleSolution)
            }
        }
    }

    fn extract_points(&self, stops: &[Stop]) -> Result<Vec<Coord<f64>>, OptimizationFailure> {
        stops
            .iter()
            .enumerate()
            .map(|(index, stop)| {
                stop.coordinates(&self.keys)
                    .map_err(|reason| OptimizationFailure::InvalidCoordinates { index, reason })
            })
            .collect()
    }
}
