//! Facade crate for the visitroute engine.
//!
//! This crate re-exports the core domain types and the distance-matrix cost
//! source, and exposes the route solver backends behind feature flags.

#![forbid(unsafe_code)]

pub use visitroute_core::{
    CoordinateError, CoordinateKeys, CostMatrix, CostMatrixError, CostSource, CostSourceError,
    DEFAULT_TIME_LIMIT, DEPOT, FallbackReason, GreatCircleEstimator, MatrixStrategy,
    OptimizationFailure, OptimizationResult, RouteOptimizer, RouteSolver, SolveError, Stop, Tour,
    TourError, TravelCostMatrixBuilder, UNREACHABLE_COST,
};

pub use visitroute_data::routing::{
    DistanceMatrixConfig, HttpDistanceMatrixProvider, ProviderBuildError,
};

#[cfg(feature = "solver-vrp")]
pub use visitroute_solver_vrp::{VrpRouteSolver, VrpSolverConfig};

#[cfg(feature = "solver-gls")]
pub use visitroute_solver_gls::{GlsConfig, GuidedLocalSearchSolver};
