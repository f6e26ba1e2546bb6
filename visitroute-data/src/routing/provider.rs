//! HTTP-based `CostSource` using a Distance Matrix service.
//!
//! The [`CostSource`] trait is synchronous so the optimiser can run in plain
//! request threads. This provider bridges the async HTTP call to that
//! interface by blocking on a Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use visitroute_core::CostSource;
//! use visitroute_data::routing::{DistanceMatrixConfig, HttpDistanceMatrixProvider};
//!
//! let config = DistanceMatrixConfig::default().with_api_key(Some("secret".to_owned()));
//! let provider = HttpDistanceMatrixProvider::with_config(config)?;
//! let points = [
//!     Coord { x: -74.08175, y: 4.60971 },
//!     Coord { x: -74.05, y: 4.65 },
//! ];
//! let matrix = provider.cost_matrix(&points)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::time::Duration;

use geo::Coord;
use log::debug;
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use visitroute_core::{CostMatrix, CostSource, CostSourceError, UNREACHABLE_COST};

use super::distance_matrix::DistanceMatrixResponse;

/// Default Distance Matrix endpoint.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Default user agent for matrix requests.
pub const DEFAULT_USER_AGENT: &str = "visitroute-routing/0.1";

/// Default travel mode.
pub const DEFAULT_MODE: &str = "driving";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Placeholder values shipped in sample configuration instead of a real key.
pub const PLACEHOLDER_API_KEYS: [&str; 2] = ["YOUR_API_KEY", "TU_CLAVE_DE_API_AQUI"];

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Error type for [`HttpDistanceMatrixProvider`] construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// A usable service credential.
///
/// The key is redacted from `Debug` output.
///
/// # Examples
/// ```
/// use visitroute_data::routing::ApiKey;
///
/// assert!(ApiKey::parse(Some("abc123".to_owned())).is_some());
/// assert!(ApiKey::parse(Some("  ".to_owned())).is_none());
/// assert!(ApiKey::parse(Some("YOUR_API_KEY".to_owned())).is_none());
/// assert!(ApiKey::parse(None).is_none());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Accept a raw credential unless it is absent, blank or a placeholder.
    pub fn parse(raw: Option<String>) -> Option<Self> {
        let raw = raw?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || PLACEHOLDER_API_KEYS.contains(&trimmed) {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// The key as sent on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Configuration for [`HttpDistanceMatrixProvider`].
#[derive(Debug, Clone)]
pub struct DistanceMatrixConfig {
    /// Endpoint URL, e.g. [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Service credential. Without one the provider never contacts the
    /// service.
    pub api_key: Option<ApiKey>,
    /// Request timeout, applied to connection and the whole request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Travel mode sent to the service.
    pub mode: String,
}

impl Default for DistanceMatrixConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            mode: DEFAULT_MODE.to_owned(),
        }
    }
}

impl DistanceMatrixConfig {
    /// Create a new configuration with the given endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the credential from a raw value; see [`ApiKey::parse`].
    #[must_use]
    pub fn with_api_key(mut self, raw: Option<String>) -> Self {
        self.api_key = ApiKey::parse(raw);
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the travel mode.
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }
}

/// Travel-time matrix source backed by a Distance Matrix HTTP service.
///
/// Each call issues one request carrying every point as both origin and
/// destination. The provider owns a Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the stored runtime is used. Inside a
/// multi-threaded runtime (detected via [`Handle::try_current()`]) the
/// caller's handle is used with [`tokio::task::block_in_place`]. Inside a
/// `current_thread` runtime the request runs on the stored runtime from a
/// scoped helper thread; the caller's runtime is blocked until it returns.
///
/// The stored runtime is shut down in the background on drop, so the
/// provider may be dropped from async code.
///
/// # Failure model
///
/// Timeouts, transport failures, non-2xx statuses, undecodable bodies, a
/// request-level status other than `"OK"` and row or element counts that do
/// not match the input are all reported as errors. Individual pairs the
/// service could not resolve are set to [`UNREACHABLE_COST`].
pub struct HttpDistanceMatrixProvider {
    client: Client,
    config: DistanceMatrixConfig,
    runtime: Option<Runtime>,
}

impl fmt::Debug for HttpDistanceMatrixProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpDistanceMatrixProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpDistanceMatrixProvider {
    /// Create a provider for the default endpoint with the given credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(api_key: Option<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(DistanceMatrixConfig::default().with_api_key(api_key))
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: DistanceMatrixConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime: Some(runtime),
        })
    }

    /// Whether a usable credential is configured.
    pub const fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Render points as `lat,lon|lat,lon|...`.
    fn encode_points(points: &[Coord<f64>]) -> String {
        points
            .iter()
            .map(|point| format!("{},{}", point.y, point.x))
            .collect::<Vec<_>>()
            .join("|")
    }

    async fn fetch_matrix_async(
        &self,
        key: &ApiKey,
        points: &[Coord<f64>],
    ) -> Result<CostMatrix, CostSourceError> {
        let url = self.config.base_url.as_str();
        let encoded = Self::encode_points(points);
        debug!("requesting {0}x{0} matrix from {url}", points.len());

        let response = self
            .client
            .get(url)
            .query(&[
                ("origins", encoded.as_str()),
                ("destinations", encoded.as_str()),
                ("key", key.expose()),
                ("mode", self.config.mode.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?;

        let body: DistanceMatrixResponse =
            response
                .json()
                .await
                .map_err(|err| CostSourceError::ParseError {
                    message: err.without_url().to_string(),
                })?;

        Self::convert_response(body, points.len())
    }

    fn request_aborted(&self, message: &str) -> CostSourceError {
        CostSourceError::NetworkError {
            url: self.config.base_url.clone(),
            message: message.to_owned(),
        }
    }

    /// Convert a reqwest error to a `CostSourceError`.
    ///
    /// The URL is stripped from the message because its query string
    /// carries the credential.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> CostSourceError {
        let url = self.config.base_url.clone();
        if error.is_timeout() {
            return CostSourceError::Timeout {
                url,
                timeout: self.config.timeout,
            };
        }

        let status = error.status();
        let message = error.without_url().to_string();
        if let Some(status) = status {
            return CostSourceError::HttpError {
                url,
                status: status.as_u16(),
                message,
            };
        }

        CostSourceError::NetworkError { url, message }
    }

    /// Convert a decoded response into an `n×n` matrix of whole minutes.
    fn convert_response(
        response: DistanceMatrixResponse,
        n: usize,
    ) -> Result<CostMatrix, CostSourceError> {
        if !response.is_ok() {
            return Err(CostSourceError::ServiceError {
                code: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
        if response.rows.len() != n {
            return Err(CostSourceError::DimensionMismatch {
                expected: n,
                message: format!("response has {} rows", response.rows.len()),
            });
        }

        let mut rows = Vec::with_capacity(n);
        for (i, row) in response.rows.into_iter().enumerate() {
            if row.elements.len() != n {
                return Err(CostSourceError::DimensionMismatch {
                    expected: n,
                    message: format!("row {i} has {} elements", row.elements.len()),
                });
            }
            let cells = row
                .elements
                .iter()
                .enumerate()
                .map(|(j, element)| {
                    if i == j {
                        0
                    } else {
                        element
                            .duration_secs()
                            .map_or(UNREACHABLE_COST, seconds_to_minutes)
                    }
                })
                .collect();
            rows.push(cells);
        }

        Ok(CostMatrix::from_rows(rows)?)
    }
}

fn seconds_to_minutes(secs: f64) -> u64 {
    (secs / SECONDS_PER_MINUTE).trunc() as u64
}

impl CostSource for HttpDistanceMatrixProvider {
    fn name(&self) -> &'static str {
        "distance-matrix"
    }

    /// Fetch the travel-time matrix for `points`.
    ///
    /// Safe to call from synchronous code and from inside either Tokio
    /// runtime flavour; see the type-level documentation.
    fn cost_matrix(&self, points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError> {
        if points.is_empty() {
            return Ok(CostMatrix::empty());
        }
        let Some(key) = self.config.api_key.as_ref() else {
            return Err(CostSourceError::MissingCredential);
        };
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(self.request_aborted("runtime has been shut down"));
        };

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| {
                    handle.block_on(self.fetch_matrix_async(key, points))
                })
            }
            Ok(_) => std::thread::scope(|scope| {
                scope
                    .spawn(|| runtime.block_on(self.fetch_matrix_async(key, points)))
                    .join()
                    .unwrap_or_else(|_| Err(self.request_aborted("request thread panicked")))
            }),
            Err(_) => runtime.block_on(self.fetch_matrix_async(key, points)),
        }
    }
}

impl Drop for HttpDistanceMatrixProvider {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn parse(json: &str) -> DistanceMatrixResponse {
        serde_json::from_str(json).expect("valid response JSON")
    }

    #[fixture]
    fn sample_points() -> Vec<Coord<f64>> {
        vec![
            Coord {
                x: -74.08175,
                y: 4.60971,
            },
            Coord { x: -74.05, y: 4.65 },
        ]
    }

    #[rstest]
    fn encodes_points_as_lat_lon(sample_points: Vec<Coord<f64>>) {
        assert_eq!(
            HttpDistanceMatrixProvider::encode_points(&sample_points),
            "4.60971,-74.08175|4.65,-74.05"
        );
    }

    #[rstest]
    fn convert_response_truncates_to_minutes() {
        let response = parse(
            r#"{"status": "OK", "rows": [
                {"elements": [{"status": "OK", "duration": {"value": 0}},
                              {"status": "OK", "duration": {"value": 119}}]},
                {"elements": [{"status": "OK", "duration": {"value": 600}},
                              {"status": "OK", "duration": {"value": 0}}]}
            ]}"#,
        );

        let matrix = HttpDistanceMatrixProvider::convert_response(response, 2).expect("matrix");

        assert_eq!(matrix.rows(), &[vec![0, 1], vec![10, 0]]);
    }

    #[rstest]
    fn convert_response_marks_failed_pairs_unreachable() {
        let response = parse(
            r#"{"status": "OK", "rows": [
                {"elements": [{"status": "OK", "duration": {"value": 0}},
                              {"status": "ZERO_RESULTS"}]},
                {"elements": [{"status": "OK", "duration": {"value": 300}},
                              {"status": "NOT_FOUND"}]}
            ]}"#,
        );

        let matrix = HttpDistanceMatrixProvider::convert_response(response, 2).expect("matrix");

        assert_eq!(matrix.get(0, 1), Some(UNREACHABLE_COST));
        assert_eq!(matrix.get(1, 0), Some(5));
        assert_eq!(matrix.get(1, 1), Some(0), "diagonal is forced to zero");
    }

    #[rstest]
    fn convert_response_reports_service_error() {
        let response = parse(
            r#"{"status": "OVER_QUERY_LIMIT", "error_message": "quota", "rows": []}"#,
        );

        let err = HttpDistanceMatrixProvider::convert_response(response, 2).expect_err("error");

        assert_eq!(
            err,
            CostSourceError::ServiceError {
                code: "OVER_QUERY_LIMIT".to_owned(),
                message: "quota".to_owned(),
            }
        );
    }

    #[rstest]
    #[case(r#"{"status": "OK", "rows": [{"elements": []}]}"#)]
    #[case(r#"{"status": "OK", "rows": [
        {"elements": [{"status": "OK", "duration": {"value": 0}}]},
        {"elements": [{"status": "OK", "duration": {"value": 0}}]}
    ]}"#)]
    fn convert_response_rejects_wrong_shape(#[case] json: &str) {
        let err =
            HttpDistanceMatrixProvider::convert_response(parse(json), 2).expect_err("error");
        assert!(matches!(err, CostSourceError::DimensionMismatch { expected: 2, .. }));
    }

    #[rstest]
    fn missing_credential_skips_the_request(sample_points: Vec<Coord<f64>>) {
        let provider = HttpDistanceMatrixProvider::with_config(DistanceMatrixConfig::new(
            "http://127.0.0.1:1",
        ))
        .expect("provider should build");

        assert!(!provider.has_credential());
        assert_eq!(
            provider.cost_matrix(&sample_points),
            Err(CostSourceError::MissingCredential)
        );
    }

    #[rstest]
    fn empty_input_returns_empty_matrix() {
        let provider =
            HttpDistanceMatrixProvider::new(Some("key".to_owned())).expect("provider should build");
        assert_eq!(provider.cost_matrix(&[]), Ok(CostMatrix::empty()));
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some(""), false)]
    #[case(Some("   "), false)]
    #[case(Some("YOUR_API_KEY"), false)]
    #[case(Some("TU_CLAVE_DE_API_AQUI"), false)]
    #[case(Some(" real-key "), true)]
    fn api_key_rejects_placeholders(#[case] raw: Option<&str>, #[case] usable: bool) {
        let key = ApiKey::parse(raw.map(str::to_owned));
        assert_eq!(key.is_some(), usable);
        if let Some(key) = key {
            assert_eq!(key.expose(), "real-key");
            assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        }
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = DistanceMatrixConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("test-agent/1.0")
            .with_mode("walking")
            .with_api_key(Some("k".to_owned()));

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.mode, "walking");
        assert!(config.api_key.is_some());
    }
}
