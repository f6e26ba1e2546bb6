//! Cost-source settings shared by the `optimize` and `matrix` commands.

use std::time::Duration;

use log::info;
use visitroute_core::cost::DEFAULT_MINUTES_PER_KM;
use visitroute_core::{
    CoordinateKeys, DEFAULT_LATITUDE_KEY, DEFAULT_LONGITUDE_KEY, GreatCircleEstimator,
    TravelCostMatrixBuilder,
};
use visitroute_data::routing::{
    ApiKey, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DistanceMatrixConfig, HttpDistanceMatrixProvider,
};

use crate::{ARG_MINUTES_PER_KM, ARG_REQUEST_TIMEOUT_SECS, CliError};

/// Cost-related options as merged from CLI flags, environment and files.
#[derive(Debug, Clone, Default)]
pub(crate) struct CostOverrides {
    pub(crate) api_key: Option<String>,
    pub(crate) matrix_url: Option<String>,
    pub(crate) request_timeout_secs: Option<u64>,
    pub(crate) minutes_per_km: Option<f64>,
    pub(crate) latitude_key: Option<String>,
    pub(crate) longitude_key: Option<String>,
}

/// Resolved settings for building travel-cost matrices.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CostSettings {
    /// Raw distance-matrix credential, if one was configured.
    pub(crate) api_key: Option<String>,
    /// Distance-matrix endpoint.
    pub(crate) matrix_url: String,
    /// Timeout for the distance-matrix request.
    pub(crate) request_timeout: Duration,
    /// Multiplier for the great-circle fallback.
    pub(crate) minutes_per_km: f64,
    /// Payload fields holding coordinates.
    pub(crate) keys: CoordinateKeys,
}

impl From<CostOverrides> for CostSettings {
    fn from(overrides: CostOverrides) -> Self {
        Self {
            api_key: overrides.api_key,
            matrix_url: overrides
                .matrix_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            request_timeout: overrides
                .request_timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            minutes_per_km: overrides.minutes_per_km.unwrap_or(DEFAULT_MINUTES_PER_KM),
            keys: CoordinateKeys::new(
                overrides
                    .latitude_key
                    .unwrap_or_else(|| DEFAULT_LATITUDE_KEY.to_owned()),
                overrides
                    .longitude_key
                    .unwrap_or_else(|| DEFAULT_LONGITUDE_KEY.to_owned()),
            ),
        }
    }
}

impl CostSettings {
    /// Whether a usable credential is configured.
    pub(crate) fn has_credential(&self) -> bool {
        ApiKey::parse(self.api_key.clone()).is_some()
    }

    /// Reject multipliers the estimator would clamp to zero and timeouts
    /// that would fail every request.
    pub(crate) fn validate(&self) -> Result<(), CliError> {
        if !(self.minutes_per_km.is_finite() && self.minutes_per_km > 0.0) {
            return Err(CliError::InvalidArgument {
                field: ARG_MINUTES_PER_KM,
                reason: format!("expected a positive number, got {}", self.minutes_per_km),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(CliError::InvalidArgument {
                field: ARG_REQUEST_TIMEOUT_SECS,
                reason: "expected at least one second".to_owned(),
            });
        }
        Ok(())
    }

    /// Build the matrix builder, registering the distance-matrix service
    /// only when a usable credential is present.
    pub(crate) fn matrix_builder(&self) -> Result<TravelCostMatrixBuilder, CliError> {
        let builder = TravelCostMatrixBuilder::new()
            .with_fallback(GreatCircleEstimator::new(self.minutes_per_km));
        if !self.has_credential() {
            info!("no usable distance-matrix API key; travel costs will be estimated");
            return Ok(builder);
        }

        let config = DistanceMatrixConfig::new(self.matrix_url.clone())
            .with_api_key(self.api_key.clone())
            .with_timeout(self.request_timeout);
        let provider = HttpDistanceMatrixProvider::with_config(config).map_err(|source| {
            CliError::BuildCostSource {
                base_url: self.matrix_url.clone(),
                source,
            }
        })?;
        Ok(builder.with_primary(provider))
    }
}
