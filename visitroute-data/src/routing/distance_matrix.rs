//! Response types for a Google-style Distance Matrix service.
//!
//! Only the fields needed to build a duration matrix are decoded; addresses
//! and distances are ignored.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>

use serde::Deserialize;

/// Status value reported for a successful request or element.
pub const STATUS_OK: &str = "OK";

/// Top-level Distance Matrix response.
#[derive(Debug, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Request-level status.
    ///
    /// Common values:
    /// - `"OK"` - the request was valid
    /// - `"INVALID_REQUEST"` - malformed parameters
    /// - `"MAX_ELEMENTS_EXCEEDED"` - too many origin/destination pairs
    /// - `"REQUEST_DENIED"` - the key was rejected
    /// - `"OVER_QUERY_LIMIT"` - quota exhausted
    pub status: String,

    /// Optional human-readable detail when `status` is not `"OK"`.
    #[serde(default)]
    pub error_message: Option<String>,

    /// One row per origin, in request order.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

impl DistanceMatrixResponse {
    /// Whether the request as a whole succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Results for a single origin.
#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    /// One element per destination, in request order.
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// Result for a single origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// Per-pair status, e.g. `"OK"`, `"NOT_FOUND"` or `"ZERO_RESULTS"`.
    pub status: String,

    /// Travel duration when the pair was resolved.
    #[serde(default)]
    pub duration: Option<Measure>,
}

impl MatrixElement {
    /// Resolved duration in seconds, if the pair succeeded with a usable
    /// value.
    pub fn duration_secs(&self) -> Option<f64> {
        if self.status != STATUS_OK {
            return None;
        }
        self.duration
            .as_ref()
            .map(|measure| measure.value)
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
    }
}

/// A value/text pair as reported by the service.
#[derive(Debug, Deserialize)]
pub struct Measure {
    /// Machine-readable value (seconds for durations).
    pub value: f64,

    /// Localised rendering, e.g. `"4 mins"`.
    #[serde(default)]
    pub text: Option<String>,
}
