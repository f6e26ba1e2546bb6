//! Travel-cost matrices and the strategies that produce them.

mod builder;
mod error;
mod great_circle;
mod matrix;
mod source;

pub use builder::{FallbackReason, MatrixStrategy, TravelCostMatrixBuilder};
pub use error::CostSourceError;
pub use great_circle::{DEFAULT_MINUTES_PER_KM, EARTH_RADIUS_KM, GreatCircleEstimator, haversine_km};
pub use matrix::{CostMatrix, CostMatrixError, UNREACHABLE_COST};
pub use source::CostSource;
