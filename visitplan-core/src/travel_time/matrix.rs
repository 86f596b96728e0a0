//! Square travel-time matrix with an optional companion distance matrix.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::MatrixError;

/// Where a [`TravelTimeMatrix`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixSource {
    /// Remote routing service lookup.
    #[default]
    Remote,
    /// Local great-circle estimate.
    GreatCircle,
    /// Matrix supplied directly by the caller.
    Fixed,
}

impl fmt::Display for MatrixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::GreatCircle => "great_circle",
            Self::Fixed => "fixed",
        })
    }
}

/// Pairwise travel times in whole minutes.
///
/// `duration(i, j)` is the time from location `i` to location `j`, using the
/// same index order as the coordinates passed to the provider. The diagonal is
/// always zero. Distances, when present, are metres in the same order.
///
/// # Examples
///
/// ```
/// use visitplan_core::{MatrixSource, TravelTimeMatrix};
///
/// let matrix = TravelTimeMatrix::from_minutes(
///     vec![vec![0, 10], vec![12, 0]],
///     MatrixSource::Fixed,
/// )?;
/// assert_eq!(matrix.duration(0, 1), Some(10));
/// assert_eq!(matrix.distance_meters(0, 1), None);
/// # Ok::<(), visitplan_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TravelTimeMatrix {
    durations: Vec<Vec<u32>>,
    distances: Option<Vec<Vec<f64>>>,
    source: MatrixSource,
}

impl TravelTimeMatrix {
    /// Build a matrix from rows of minutes.
    ///
    /// Diagonal entries are set to zero.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::EmptyInput`] for zero rows and
    /// [`MatrixError::DimensionMismatch`] when any row length differs from the
    /// row count.
    pub fn from_minutes(
        mut durations: Vec<Vec<u32>>,
        source: MatrixSource,
    ) -> Result<Self, MatrixError> {
        let size = durations.len();
        if size == 0 {
            return Err(MatrixError::EmptyInput);
        }
        check_square(&durations, size)?;
        for (i, row) in durations.iter_mut().enumerate() {
            if let Some(cell) = row.get_mut(i) {
                *cell = 0;
            }
        }
        Ok(Self {
            durations,
            distances: None,
            source,
        })
    }

    /// Attach a distance matrix in metres.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::DimensionMismatch`] when the distances do not
    /// have the same shape as the durations.
    pub fn with_distances(mut self, distances: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let size = self.len();
        if distances.len() != size {
            return Err(MatrixError::DimensionMismatch {
                expected: size,
                actual: distances.len(),
            });
        }
        check_square(&distances, size)?;
        self.distances = Some(distances);
        Ok(self)
    }

    /// Number of locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    /// Always `false` for a constructed matrix; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Travel minutes from `from` to `to`, or `None` when out of bounds.
    #[must_use]
    pub fn duration(&self, from: usize, to: usize) -> Option<u32> {
        self.durations.get(from)?.get(to).copied()
    }

    /// Distance in metres from `from` to `to`, when distances are known.
    #[must_use]
    pub fn distance_meters(&self, from: usize, to: usize) -> Option<f64> {
        self.distances.as_ref()?.get(from)?.get(to).copied()
    }

    /// Whether a companion distance matrix is present.
    #[must_use]
    pub const fn has_distances(&self) -> bool {
        self.distances.is_some()
    }

    /// Origin of the matrix.
    #[must_use]
    pub const fn source(&self) -> MatrixSource {
        self.source
    }

    /// Rows of minutes.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.durations
    }

    /// Whether `duration(i, j) == duration(j, i)` for every pair.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.durations.iter().enumerate().all(|(i, row)| {
            row.iter()
                .enumerate()
                .all(|(j, cell)| self.duration(j, i) == Some(*cell))
        })
    }
}

fn check_square<T>(rows: &[Vec<T>], size: usize) -> Result<(), MatrixError> {
    match rows.iter().find(|row| row.len() != size) {
        Some(row) => Err(MatrixError::DimensionMismatch {
            expected: size,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}
