//! Error types emitted by the `visitroute` CLI.
//!
//! Optimisation failures such as invalid coordinates are part of the printed
//! result, not errors; `CliError` covers everything that prevents a result
//! from being produced.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use visitroute_core::CoordinateError;
use visitroute_data::routing::ProviderBuildError;

/// Errors emitted by the `visitroute` CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it on the command line or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// An option holds a value the engine cannot use.
    #[error("invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the stops file failed.
    #[error("failed to open stops file at {path:?}: {source}")]
    OpenStops {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The stops file is not a JSON array of objects.
    #[error("failed to parse stops JSON at {path:?}: {source}")]
    ParseStops {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A stop has no usable coordinates.
    #[error("stop {index} in {path:?} has invalid coordinates: {source}")]
    InvalidStop {
        path: Utf8PathBuf,
        index: usize,
        #[source]
        source: CoordinateError,
    },
    /// Constructing the distance-matrix provider failed.
    #[error("failed to build distance-matrix provider for {base_url:?}: {source}")]
    BuildCostSource {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
