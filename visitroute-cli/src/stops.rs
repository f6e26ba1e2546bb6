//! Loading stop records from JSON files.

use std::io::BufReader;

use camino::Utf8Path;
use geo::Coord;
use visitroute_core::{CoordinateKeys, Stop};

use crate::CliError;
use crate::fs::{file_is_file, open_utf8_file};

/// Fail unless `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load a JSON array of stop objects.
pub(crate) fn load_stops(path: &Utf8Path) -> Result<Vec<Stop>, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenStops {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseStops {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep at most `limit` stops, preserving order.
pub(crate) fn cap_stops(mut stops: Vec<Stop>, limit: Option<usize>) -> Vec<Stop> {
    if let Some(limit) = limit {
        stops.truncate(limit);
    }
    stops
}

/// Extract coordinates from every stop, failing on the first invalid one.
pub(crate) fn stop_coordinates(
    path: &Utf8Path,
    stops: &[Stop],
    keys: &CoordinateKeys,
) -> Result<Vec<Coord<f64>>, CliError> {
    stops
        .iter()
        .enumerate()
        .map(|(index, stop)| {
            stop.coordinates(keys)
                .map_err(|source| CliError::InvalidStop {
                    path: path.to_path_buf(),
                    index,
                    source,
                })
        })
        .collect()
}
