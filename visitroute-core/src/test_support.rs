//! Test-only cost sources, solvers and stop builders used by unit and
//! behaviour tests across the workspace.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use geo::Coord;
use serde_json::{Map, Value, json};

use crate::{
    CostMatrix, CostSource, CostSourceError, DEFAULT_LATITUDE_KEY, DEFAULT_LONGITUDE_KEY,
    RouteSolver, SolveError, Stop, Tour,
};

/// Build a stop with an `id` and the default coordinate fields.
pub fn stop(id: u64, latitude: f64, longitude: f64) -> Stop {
    let mut fields = Map::new();
    fields.insert("id".to_owned(), json!(id));
    fields.insert(DEFAULT_LATITUDE_KEY.to_owned(), json!(latitude));
    fields.insert(DEFAULT_LONGITUDE_KEY.to_owned(), json!(longitude));
    Stop::new(fields)
}

/// Build a stop whose latitude field holds an arbitrary JSON value.
pub fn stop_with_latitude(id: u64, latitude: Value, longitude: f64) -> Stop {
    let mut fields = Map::new();
    fields.insert("id".to_owned(), json!(id));
    fields.insert(DEFAULT_LATITUDE_KEY.to_owned(), latitude);
    fields.insert(DEFAULT_LONGITUDE_KEY.to_owned(), json!(longitude));
    Stop::new(fields)
}

/// `CostSource` answering with a canned matrix or error.
///
/// Clones share a call counter so tests can assert whether the source was
/// consulted after handing a clone to a builder.
#[derive(Debug, Clone)]
pub struct StubCostSource {
    response: Result<CostMatrix, CostSourceError>,
    calls: Arc<AtomicUsize>,
}

impl StubCostSource {
    /// Always return `matrix`.
    pub fn with_matrix(matrix: CostMatrix) -> Self {
        Self {
            response: Ok(matrix),
            calls: Arc::default(),
        }
    }

    /// Always fail with `error`.
    pub fn with_error(error: CostSourceError) -> Self {
        Self {
            response: Err(error),
            calls: Arc::default(),
        }
    }

    /// Number of `cost_matrix` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CostSource for StubCostSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn cost_matrix(&self, _points: &[Coord<f64>]) -> Result<CostMatrix, CostSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}

/// `RouteSolver` returning a preset index sequence.
#[derive(Debug, Clone, Default)]
pub struct FixedTourSolver {
    indices: Option<Vec<usize>>,
}

impl FixedTourSolver {
    /// Return exactly `indices` (validated against the matrix).
    pub const fn new(indices: Vec<usize>) -> Self {
        Self {
            indices: Some(indices),
        }
    }

    /// Visit stops in input order.
    pub const fn identity() -> Self {
        Self { indices: None }
    }
}

impl RouteSolver for FixedTourSolver {
    fn solve(&self, matrix: &CostMatrix) -> Result<Tour, SolveError> {
        if matrix.len() < 2 {
            return Err(SolveError::NothingToOptimise {
                stops: matrix.len(),
            });
        }
        let tour = match &self.indices {
            Some(indices) => Tour::new(matrix, indices.clone())?,
            None => Tour::from_order(matrix, (0..matrix.len()).collect())?,
        };
        Ok(tour)
    }
}

/// `RouteSolver` that never finds a tour.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSolver;

impl RouteSolver for FailingSolver {
    fn solve(&self, _matrix: &CostMatrix) -> Result<Tour, SolveError> {
        Err(SolveError::NoFeasibleTour)
    }
}
