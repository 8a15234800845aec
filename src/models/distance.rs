//! Inter-venue travel distances.
//!
//! A square, symmetric matrix of non-negative costs between team venues,
//! addressed by 1-based team number. Loaded once and shared read-only by
//! every evaluation.

use serde::{Deserialize, Serialize};

use super::schedule::TeamId;
use crate::error::{TtpError, TtpResult};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Symmetric `teams × teams` travel-cost matrix.
///
/// Serialized as nested rows; deserialization goes through
/// [`DistanceMatrix::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<u64>,
}

impl DistanceMatrix {
    /// Creates a matrix from rows.
    ///
    /// # Errors
    /// `InvalidInstance` if the rows are not square or the matrix is not
    /// symmetric. All offending entries are reported together.
    pub fn new(rows: Vec<Vec<u64>>) -> TtpResult<Self> {
        let size = rows.len();
        let mut errors = Vec::new();

        if size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                "Distance matrix is empty",
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DimensionMismatch,
                    format!(
                        "Distance matrix row {} has {} entries, expected {size}",
                        i + 1,
                        row.len()
                    ),
                ));
            }
        }
        if !errors.is_empty() {
            return Err(TtpError::InvalidInstance(errors));
        }

        for i in 0..size {
            for j in (i + 1)..size {
                if rows[i][j] != rows[j][i] {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::AsymmetricDistance,
                        format!(
                            "Distance {}→{} is {} but {}→{} is {}",
                            i + 1,
                            j + 1,
                            rows[i][j],
                            j + 1,
                            i + 1,
                            rows[j][i]
                        ),
                    ));
                }
            }
        }
        if !errors.is_empty() {
            return Err(TtpError::InvalidInstance(errors));
        }

        Ok(Self {
            size,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Every pair of distinct venues is `distance` apart; the diagonal is 0.
    pub fn uniform(size: usize, distance: u64) -> Self {
        let values = (0..size * size)
            .map(|k| if k / size == k % size { 0 } else { distance })
            .collect();
        Self { size, values }
    }

    /// Number of venues.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Travel cost between two venues (1-based team numbers).
    #[inline]
    pub fn get(&self, from: TeamId, to: TeamId) -> u64 {
        self.values[(from - 1) * self.size + (to - 1)]
    }

    /// Copies the matrix into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.values.chunks_exact(self.size.max(1)).map(<[u64]>::to_vec).collect()
    }
}

impl TryFrom<Vec<Vec<u64>>> for DistanceMatrix {
    type Error = TtpError;

    fn try_from(rows: Vec<Vec<u64>>) -> TtpResult<Self> {
        Self::new(rows)
    }
}

impl From<DistanceMatrix> for Vec<Vec<u64>> {
    fn from(matrix: DistanceMatrix) -> Self {
        matrix.to_rows()
    }
}
