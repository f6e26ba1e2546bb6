//! HTTP-based travel-time sources for routing services.
//!
//! This module provides [`HttpDistanceMatrixProvider`], an implementation of
//! [`visitroute_core::CostSource`] that fetches duration matrices from a
//! Google-style Distance Matrix service.
//!
//! # Architecture
//!
//! One GET request carries every point as both origin and destination. The
//! synchronous [`CostSource`](visitroute_core::CostSource) trait is
//! implemented by blocking on the async HTTP call internally, keeping the
//! core library embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use visitroute_core::TravelCostMatrixBuilder;
//! use visitroute_data::routing::{DistanceMatrixConfig, HttpDistanceMatrixProvider};
//!
//! let config = DistanceMatrixConfig::default()
//!     .with_api_key(std::env::var("VISITROUTE_API_KEY").ok())
//!     .with_timeout(Duration::from_secs(5));
//! let builder = TravelCostMatrixBuilder::new()
//!     .with_primary(HttpDistanceMatrixProvider::with_config(config)?);
//! # Ok::<(), visitroute_data::routing::ProviderBuildError>(())
//! ```

mod distance_matrix;
mod provider;

pub use distance_matrix::{
    DistanceMatrixResponse, MatrixElement, MatrixRow, Measure, STATUS_OK,
};
pub use provider::{
    ApiKey, DEFAULT_BASE_URL, DEFAULT_MODE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
    DistanceMatrixConfig, HttpDistanceMatrixProvider, PLACEHOLDER_API_KEYS, ProviderBuildError,
};
