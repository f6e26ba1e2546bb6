//! Core domain types for the visitroute engine.
//!
//! A request flows from caller-supplied [`Stop`]s through a
//! [`TravelCostMatrixBuilder`] to a [`RouteSolver`], and [`RouteOptimizer`]
//! reassembles the caller's records in tour order. Constructors return
//! `Result` to surface invalid input early.

pub mod cost;
pub mod optimizer;
pub mod solver;
pub mod stop;
#[doc(hidden)]
pub mod test_support;
pub mod tour;

pub use cost::{
    CostMatrix, CostMatrixError, CostSource, CostSourceError, FallbackReason,
    GreatCircleEstimator, MatrixStrategy, TravelCostMatrixBuilder, UNREACHABLE_COST,
};
pub use optimizer::{OptimizationFailure, OptimizationResult, RouteOptimizer};
pub use solver::{DEFAULT_TIME_LIMIT, RouteSolver, SolveError};
pub use stop::{
    CoordinateError, CoordinateKeys, DEFAULT_LATITUDE_KEY, DEFAULT_LONGITUDE_KEY, Stop,
};
pub use tour::{DEPOT, Tour, TourError};
