//! Square travel-cost matrix measured in whole minutes.

use serde::Serialize;
use thiserror::Error;

/// Cost assigned to a pair the cost source could not resolve.
pub const UNREACHABLE_COST: u64 = 99_999;

/// Errors from [`CostMatrix::from_rows`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CostMatrixError {
    /// A row's length differs from the number of rows.
    #[error("row {row} has {len} columns but the matrix has {expected} rows")]
    NotSquare {
        /// Index of the offending row.
        row: usize,
        /// Number of cells found in that row.
        len: usize,
        /// Number of rows (and therefore expected columns).
        expected: usize,
    },
    /// A stop's cost to itself is not zero.
    #[error("diagonal cell {index} is {value}, expected 0")]
    NonZeroDiagonal {
        /// Index of the diagonal cell.
        index: usize,
        /// Value found there.
        value: u64,
    },
}

/// Pairwise travel costs between stops.
///
/// `get(i, j)` is the cost of travelling from stop `i` to stop `j`. The matrix
/// is always square with a zero diagonal; it need not be symmetric.
///
/// # Examples
/// ```
/// use visitroute_core::CostMatrix;
///
/// let matrix = CostMatrix::from_rows(vec![vec![0, 4], vec![6, 0]])?;
/// assert_eq!(matrix.get(0, 1), Some(4));
/// assert!(!matrix.is_symmetric());
/// assert_eq!(matrix.path_cost(&[0, 1, 0]), Some(10));
/// # Ok::<(), visitroute_core::CostMatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CostMatrix {
    rows: Vec<Vec<u64>>,
}

impl CostMatrix {
    /// The 0×0 matrix.
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Validate and wrap a row-major grid.
    ///
    /// # Errors
    ///
    /// Returns [`CostMatrixError`] when the grid is not square or a diagonal
    /// cell is non-zero.
    pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<Self, CostMatrixError> {
        let expected = rows.len();
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(CostMatrixError::NotSquare {
                    row: index,
                    len: row.len(),
                    expected,
                });
            }
            match row.get(index).copied() {
                Some(0) | None => {}
                Some(value) => return Err(CostMatrixError::NonZeroDiagonal { index, value }),
            }
        }
        Ok(Self { rows })
    }

    /// Build an `n×n` matrix from a cell function.
    ///
    /// The diagonal is fixed at zero; `cell` is only called for `i != j`.
    pub fn from_fn(n: usize, mut cell: impl FnMut(usize, usize) -> u64) -> Self {
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0 } else { cell(i, j) }).collect())
            .collect();
        Self { rows }
    }

    /// Number of stops covered by the matrix.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix covers no stops.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cost from `from` to `to`, or `None` when out of range.
    pub fn get(&self, from: usize, to: usize) -> Option<u64> {
        self.rows.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    /// Whether `get(i, j) == get(j, i)` for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.rows.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, &cost)| self.get(j, i) == Some(cost))
        })
    }

    /// Sum of the costs along consecutive stops of `path`.
    ///
    /// Returns `None` if any index is out of range or the sum overflows.
    pub fn path_cost(&self, path: &[usize]) -> Option<u64> {
        path.windows(2).try_fold(0_u64, |total, leg| match leg {
            [from, to] => total.checked_add(self.get(*from, *to)?),
            _ => Some(total),
        })
    }
}
