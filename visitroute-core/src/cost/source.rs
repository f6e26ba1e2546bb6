//! The cost-source capability shared by live services and estimators.

use geo::Coord;

use super::error::CostSourceError;
use super::matrix::CostMatrix;

/// Produce pairwise travel costs for a set of points.
///
/// Implementers must return a square `n×n` matrix where `n == points.len()`,
/// with `matrix.get(i, j)` the cost of travelling from `points[i]` to
/// `points[j]`. Coordinates follow the `geo` convention of `x = longitude`,
/// `y = latitude`.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use visitroute_core::{CostMatrix, CostSource, CostSourceError};
///
/// struct UnitSource;
///
/// impl CostSource for UnitSource {
///     fn name(&self) -> &'static str {
///         "unit"
///     }
///
///     fn cost_matrix(&self, points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError> {
///         Ok(CostMatrix::from_fn(points.len(), |_, _| 1))
///     }
/// }
///
/// let points = [Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 }];
/// let matrix = UnitSource.cost_matrix(&points)?;
/// assert_eq!(matrix.get(0, 1), Some(1));
/// # Ok::<(), CostSourceError>(())
/// ```
pub trait CostSource {
    /// Short identifier used in logs and strategy reports.
    fn name(&self) -> &'static str;

    /// Return the cost matrix for `points`.
    ///
    /// # Errors
    ///
    /// Returns [`CostSourceError`] when the matrix cannot be produced in full.
    fn cost_matrix(&self, points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError>;
}

impl<T: CostSource + ?Sized> CostSource for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn cost_matrix(&self, points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError> {
        (**self).cost_matrix(points)
    }
}
