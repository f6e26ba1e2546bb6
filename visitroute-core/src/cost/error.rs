use std::time::Duration;

use thiserror::Error;

use super::matrix::CostMatrixError;

/// Errors from [`crate::cost::CostSource::cost_matrix`].
///
/// Every variant is a whole-source failure: a source never hands back a
/// partially resolved matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostSourceError {
    /// No usable credential is configured for the source.
    #[error("no credential configured for the distance matrix service")]
    MissingCredential,
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Requested endpoint, without credentials.
        url: String,
        /// Configured timeout.
        timeout: Duration,
    },
    /// The request failed before an HTTP status was received.
    #[error("network error contacting {url}: {message}")]
    NetworkError {
        /// Requested endpoint, without credentials.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    HttpError {
        /// Requested endpoint, without credentials.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The service answered, but reported a request-level failure.
    #[error("service returned {code}: {message}")]
    ServiceError {
        /// Service status code, e.g. `REQUEST_DENIED`.
        code: String,
        /// Accompanying message, possibly empty.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("malformed response: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// The response decoded, but did not describe an `n×n` matrix.
    #[error("expected a {expected}x{expected} matrix: {message}")]
    DimensionMismatch {
        /// Number of points requested.
        expected: usize,
        /// What was wrong with the shape.
        message: String,
    },
}

impl From<CostMatrixError> for CostSourceError {
    fn from(err: CostMatrixError) -> Self {
        match err {
            CostMatrixError::NotSquare { expected, .. } => Self::DimensionMismatch {
                expected,
                message: err.to_string(),
            },
            CostMatrixError::NonZeroDiagonal { .. } => Self::ParseError {
                message: err.to_string(),
            },
        }
    }
}
