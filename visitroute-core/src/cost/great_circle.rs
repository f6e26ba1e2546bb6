//! Geometric fallback estimator.
//!
//! Converts great-circle distance into minutes with a fixed multiplier. It is
//! pure arithmetic over the input coordinates, so it is always available and
//! always returns the same symmetric matrix for the same points.

use geo::Coord;

use super::error::CostSourceError;
use super::matrix::CostMatrix;
use super::source::CostSource;

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default minutes of travel assumed per great-circle kilometre.
pub const DEFAULT_MINUTES_PER_KM: f64 = 2.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use visitroute_core::cost::haversine_km;
///
/// let bogota = Coord { x: -74.08175, y: 4.60971 };
/// assert_eq!(haversine_km(bogota, bogota), 0.0);
/// ```
pub fn haversine_km(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let d_lat = (to.y - from.y).to_radians();
    let d_lon = (to.x - from.x).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.y.to_radians().cos() * to.y.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Estimate travel minutes from great-circle distance.
///
/// `minutes = floor(distance_km × minutes_per_km)`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use visitroute_core::{CostSource, GreatCircleEstimator};
///
/// let points = [
///     Coord { x: -74.08175, y: 4.60971 },
///     Coord { x: -74.05, y: 4.65 },
/// ];
/// let matrix = GreatCircleEstimator::default().cost_matrix(&points)?;
/// assert_eq!(matrix.get(0, 0), Some(0));
/// assert_eq!(matrix.get(0, 1), matrix.get(1, 0));
/// # Ok::<(), visitroute_core::CostSourceError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreatCircleEstimator {
    minutes_per_km: f64,
}

impl GreatCircleEstimator {
    /// Create an estimator with a custom multiplier.
    ///
    /// Negative or non-finite multipliers are clamped to zero.
    pub fn new(minutes_per_km: f64) -> Self {
        let minutes_per_km = if minutes_per_km.is_finite() && minutes_per_km > 0.0 {
            minutes_per_km
        } else {
            0.0
        };
        Self { minutes_per_km }
    }

    /// Minutes assumed per kilometre.
    pub const fn minutes_per_km(&self) -> f64 {
        self.minutes_per_km
    }

    /// Whole minutes between two points.
    pub fn estimate_minutes(&self, from: Coord<f64>, to: Coord<f64>) -> u64 {
        (haversine_km(from, to) * self.minutes_per_km).floor() as u64
    }

    /// Build the full matrix for `points`. Never fails.
    pub fn matrix(&self, points: &[Coord<f64>]) -> CostMatrix {
        CostMatrix::from_fn(points.len(), |i, j| {
            match (points.get(i), points.get(j)) {
                (Some(from), Some(to)) => self.estimate_minutes(*from, *to),
                _ => 0,
            }
        })
    }
}

impl Default for GreatCircleEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MINUTES_PER_KM)
    }
}

impl CostSource for GreatCircleEstimator {
    fn name(&self) -> &'static str {
        "great-circle"
    }

    fn cost_matrix(&self, points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError> {
        Ok(self.matrix(points))
    }
}
