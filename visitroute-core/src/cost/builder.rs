//! Select a cost strategy and produce a complete matrix.
//!
//! The builder consults an optional primary [`CostSource`] (typically a live
//! distance-matrix service) and falls back to the [`GreatCircleEstimator`]
//! whenever the primary is absent or fails. Exactly one strategy supplies
//! the whole matrix; results are never mixed cell by cell.

use std::fmt;

use geo::Coord;
use log::{info, warn};

use super::error::CostSourceError;
use super::great_circle::GreatCircleEstimator;
use super::matrix::CostMatrix;
use super::source::CostSource;

/// Which strategy supplied a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixStrategy {
    /// The configured primary source answered in full.
    Primary {
        /// Name reported by the source.
        source: &'static str,
    },
    /// The geometric estimate was used.
    Fallback {
        /// Why the primary strategy was not used.
        reason: FallbackReason,
    },
}

/// Why a matrix came from the fallback estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No primary source is configured.
    NoPrimary,
    /// The primary source failed.
    PrimaryFailed(CostSourceError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPrimary => f.write_str("no primary cost source configured"),
            Self::PrimaryFailed(err) => write!(f, "primary cost source failed: {err}"),
        }
    }
}

/// Builds travel-cost matrices, preferring a primary source when configured.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use visitroute_core::{MatrixStrategy, TravelCostMatrixBuilder};
///
/// let builder = TravelCostMatrixBuilder::new();
/// let points = [Coord { x: -74.08, y: 4.61 }, Coord { x: -74.05, y: 4.65 }];
/// let (matrix, strategy) = builder.build_traced(&points);
/// assert_eq!(matrix.len(), 2);
/// assert!(matches!(strategy, MatrixStrategy::Fallback { .. }));
/// ```
pub struct TravelCostMatrixBuilder {
    primary: Option<Box<dyn CostSource + Send + Sync>>,
    fallback: GreatCircleEstimator,
}

impl fmt::Debug for TravelCostMatrixBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TravelCostMatrixBuilder")
            .field("primary", &self.primary.as_ref().map(|source| source.name()))
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl Default for TravelCostMatrixBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelCostMatrixBuilder {
    /// A builder that only uses the default geometric estimate.
    pub fn new() -> Self {
        Self {
            primary: None,
            fallback: GreatCircleEstimator::default(),
        }
    }

    /// Register the primary cost source.
    #[must_use]
    pub fn with_primary(mut self, source: impl CostSource + Send + Sync + 'static) -> Self {
        self.primary = Some(Box::new(source));
        self
    }

    /// Replace the fallback estimator.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: GreatCircleEstimator) -> Self {
        self.fallback = fallback;
        self
    }

    /// Whether a primary source is registered.
    pub const fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Build the matrix for `points`.
    ///
    /// Always returns a complete `n×n` matrix; an empty input gives the 0×0
    /// matrix.
    pub fn build(&self, points: &[Coord<f64>]) -> CostMatrix {
        self.build_traced(points).0
    }

    /// Build the matrix and report which strategy produced it.
    pub fn build_traced(&self, points: &[Coord<f64>]) -> (CostMatrix, MatrixStrategy) {
        let reason = match self.primary.as_deref() {
            None => FallbackReason::NoPrimary,
            Some(_) if points.is_empty() => FallbackReason::NoPrimary,
            Some(source) => match Self::query_primary(source, points) {
                Ok(matrix) => {
                    info!(
                        "cost matrix for {} points obtained from {}",
                        points.len(),
                        source.name()
                    );
                    return (
                        matrix,
                        MatrixStrategy::Primary {
                            source: source.name(),
                        },
                    );
                }
                Err(err) => {
                    warn!(
                        "{} failed ({err}); using {} estimate",
                        source.name(),
                        self.fallback.name()
                    );
                    FallbackReason::PrimaryFailed(err)
                }
            },
        };

        if matches!(reason, FallbackReason::NoPrimary) && !points.is_empty() {
            info!(
                "no primary cost source configured; using {} estimate",
                self.fallback.name()
            );
        }
        (
            self.fallback.matrix(points),
            MatrixStrategy::Fallback { reason },
        )
    }

    fn query_primary(
        source: &(dyn CostSource + Send + Sync),
        points: &[Coord<f64>],
    ) -> Result<CostMatrix, CostSourceError> {
        let matrix = source.cost_matrix(points)?;
        if matrix.len() != points.len() {
            return Err(CostSourceError::DimensionMismatch {
                expected: points.len(),
                message: format!("source returned {} rows", matrix.len()),
            });
        }
        Ok(matrix)
    }
}
