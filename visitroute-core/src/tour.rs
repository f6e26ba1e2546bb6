//! Validated closed tours through a depot.

use thiserror::Error;

use crate::cost::CostMatrix;

/// Index of the depot stop that anchors every tour.
pub const DEPOT: usize = 0;

/// A closed tour beginning and ending at [`DEPOT`].
///
/// For `n` stops the tour holds `n + 1` indices: positions `0..n` form a
/// permutation of `0..n` starting with the depot and the final position
/// repeats it.
///
/// # Examples
/// ```
/// use visitroute_core::{CostMatrix, Tour};
///
/// let matrix = CostMatrix::from_rows(vec![
///     vec![0, 5, 9],
///     vec![5, 0, 2],
///     vec![9, 2, 0],
/// ])?;
/// let tour = Tour::from_order(&matrix, vec![0, 1, 2])?;
/// assert_eq!(tour.indices(), &[0, 1, 2, 0]);
/// assert_eq!(tour.total_cost(), 16);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    indices: Vec<usize>,
    total_cost: u64,
}

/// Errors returned when validating a [`Tour`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TourError {
    /// The tour length does not match the matrix.
    #[error("tour has {actual} indices, expected {expected}")]
    WrongLength {
        /// `n + 1` for an `n`-stop matrix.
        expected: usize,
        /// Number of indices supplied.
        actual: usize,
    },
    /// The tour does not start and end at the depot.
    #[error("tour must start and end at the depot")]
    NotAnchored,
    /// An index is outside the matrix.
    #[error("index {index} is out of range for {len} stops")]
    OutOfRange {
        /// Offending index.
        index: usize,
        /// Number of stops.
        len: usize,
    },
    /// A stop appears more than once in the open part of the tour.
    #[error("stop {index} is visited more than once")]
    Repeated {
        /// Offending index.
        index: usize,
    },
    /// The summed cost does not fit in `u64`.
    #[error("tour cost overflows")]
    CostOverflow,
}

impl Tour {
    /// Validate a closed index sequence against `matrix` and price it.
    ///
    /// # Errors
    ///
    /// Returns [`TourError`] if the sequence is not a closed permutation
    /// anchored at the depot.
    pub fn new(matrix: &CostMatrix, indices: Vec<usize>) -> Result<Self, TourError> {
        let len = matrix.len();
        let expected = len + 1;
        if indices.len() != expected {
            return Err(TourError::WrongLength {
                expected,
                actual: indices.len(),
            });
        }
        if indices.first() != Some(&DEPOT) || indices.last() != Some(&DEPOT) {
            return Err(TourError::NotAnchored);
        }
        let mut seen = vec![false; len];
        for &index in indices.iter().take(len) {
            let slot = seen
                .get_mut(index)
                .ok_or(TourError::OutOfRange { index, len })?;
            if *slot {
                return Err(TourError::Repeated { index });
            }
            *slot = true;
        }
        let total_cost = matrix
            .path_cost(&indices)
            .ok_or(TourError::CostOverflow)?;
        Ok(Self {
            indices,
            total_cost,
        })
    }

    /// Close an open visiting order by returning to its first stop.
    ///
    /// # Errors
    ///
    /// As for [`Tour::new`].
    pub fn from_order(matrix: &CostMatrix, mut order: Vec<usize>) -> Result<Self, TourError> {
        if let Some(&first) = order.first() {
            order.push(first);
        }
        Self::new(matrix, order)
    }

    /// Stop indices including the closing return to the depot.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of distinct stops visited.
    pub fn stop_count(&self) -> usize {
        self.indices.len().saturating_sub(1)
    }

    /// Sum of matrix entries along the tour.
    pub const fn total_cost(&self) -> u64 {
        self.total_cost
    }

    /// Consume the tour, returning its indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}
