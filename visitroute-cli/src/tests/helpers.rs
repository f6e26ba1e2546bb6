//! Test helpers for writing stop files and stubbing solvers.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;
use visitroute_core::RouteSolver;
use visitroute_core::test_support::{FailingSolver, FixedTourSolver};

use crate::CliError;
use crate::optimize::{OptimizeConfig, RouteSolverBuilder};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// Temporary directory holding stop files for one test.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write_stops(&self, name: &str, stops: &Value) -> Utf8PathBuf {
        let path = self.path(name);
        let payload = serde_json::to_string_pretty(stops).expect("serialize stops");
        write_utf8(&path, payload.as_bytes());
        path
    }
}

/// Three client stops in Bogotá, one with string coordinates.
pub(super) fn bogota_stops() -> Value {
    json!([
        {"id": "c-1", "nombre": "Tienda Centro", "latitud": 4.60971, "longitud": -74.08175},
        {"id": "c-2", "nombre": "Chapinero", "latitud": "4.6486", "longitud": "-74.0628"},
        {"id": "c-3", "nombre": "Usaquén", "latitud": 4.6947, "longitud": -74.0309}
    ])
}

/// Solver builder returning test doubles instead of real backends.
#[derive(Debug, Clone, Copy)]
pub(super) enum StubSolverBuilder {
    Identity,
    Failing,
}

impl RouteSolverBuilder for StubSolverBuilder {
    fn build(&self, _config: &OptimizeConfig) -> Result<Box<dyn RouteSolver>, CliError> {
        Ok(match self {
            Self::Identity => Box::new(FixedTourSolver::identity()),
            Self::Failing => Box::new(FailingSolver),
        })
    }
}

/// Ids of the stops in a printed JSON array.
pub(super) fn printed_ids(output: &[u8]) -> Vec<Value> {
    let value: Value = serde_json::from_slice(output).expect("output should be JSON");
    value
        .as_array()
        .expect("output should be an array")
        .iter()
        .map(|stop| stop.get("id").cloned().unwrap_or(Value::Null))
        .collect()
}
