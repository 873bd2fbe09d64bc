//! Correlation matrices with validation and Cholesky factorisation.
//!
//! Given `k` independent standard normals `Z`, correlated normals are
//! produced as `W = L * Z`, where `L` is the lower-triangular Cholesky
//! factor of the correlation matrix `C = L * L^T`.
//!
//! Construction validates symmetry, unit diagonal, range and positive
//! semi-definiteness (via a Jacobi eigenvalue sweep), so an invalid matrix
//! fails fast with the offending eigenvalue instead of surfacing later as
//! NaNs in sampled paths.

use crate::error::ValidationError;
use crate::math::symmetric_eigenvalues;

/// Eigenvalues above this (negative) tolerance are treated as zero, so
/// numerically-PSD matrices round-tripped through serialisation still
/// validate.
pub const PSD_TOLERANCE: f64 = 1e-8;

/// Tolerance for unit-diagonal and symmetry checks.
const ELEMENT_TOL: f64 = 1e-10;

/// A validated correlation matrix over an ordered set of named variables.
///
/// The variable-name order defines row/column order and must match the
/// scenario's variable list exactly.
///
/// # Examples
/// ```
/// use simrisk_core::CorrelationMatrix;
///
/// let corr = CorrelationMatrix::new(
///     vec!["a".into(), "b".into()],
///     vec![1.0, 0.5, 0.5, 1.0],
/// ).unwrap();
/// assert_eq!(corr.dim(), 2);
/// assert_eq!(corr.get(0, 1), 0.5);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CorrelationMatrix {
    names: Vec<String>,
    /// Row-major elements, `dim * dim` of them.
    data: Vec<f64>,
}

impl CorrelationMatrix {
    /// Creates a validated correlation matrix.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidDimensions`] if `data` is not
    ///   `names.len()²` elements.
    /// - [`ValidationError::InvalidDiagonal`] if any diagonal element
    ///   differs from 1.
    /// - [`ValidationError::NotSymmetric`] if `M[i][j] != M[j][i]`.
    /// - [`ValidationError::CorrelationOutOfRange`] for entries outside
    ///   [-1, 1].
    /// - [`ValidationError::NotPositiveSemiDefinite`] if the smallest
    ///   eigenvalue is below `-1e-8`; the error names that eigenvalue.
    pub fn new(names: Vec<String>, data: Vec<f64>) -> Result<Self, ValidationError> {
        let dim = names.len();
        let expected = dim * dim;
        if data.len() != expected {
            return Err(ValidationError::InvalidDimensions {
                expected,
                got: data.len(),
                dim,
            });
        }

        for i in 0..dim {
            let diag = data[i * dim + i];
            if (diag - 1.0).abs() > ELEMENT_TOL {
                return Err(ValidationError::InvalidDiagonal {
                    index: i,
                    value: diag,
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];
                if (val_ij - val_ji).abs() > ELEMENT_TOL {
                    return Err(ValidationError::NotSymmetric {
                        i,
                        j,
                        value_ij: val_ij,
                        value_ji: val_ji,
                    });
                }
                if !(-1.0..=1.0).contains(&val_ij) || !val_ij.is_finite() {
                    return Err(ValidationError::CorrelationOutOfRange {
                        i,
                        j,
                        value: val_ij,
                    });
                }
            }
        }

        // Eigenvalue check last: it is the most expensive and the error
        // message is only meaningful once shape checks have passed.
        let eigenvalues = symmetric_eigenvalues(&data, dim);
        if let Some((index, &eigenvalue)) = eigenvalues
            .iter()
            .enumerate()
            .find(|(_, &e)| e < -PSD_TOLERANCE)
        {
            return Err(ValidationError::NotPositiveSemiDefinite { eigenvalue, index });
        }

        Ok(Self { names, data })
    }

    /// Creates an identity correlation matrix (independent variables).
    pub fn identity(names: Vec<String>) -> Self {
        let dim = names.len();
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { names, data }
    }

    /// Matrix dimension (variable count).
    #[inline]
    pub fn dim(&self) -> usize {
        self.names.len()
    }

    /// Variable names in row/column order.
    #[inline]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Element at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.names.len() + j]
    }

    /// Computes the lower-triangular Cholesky factor `L` with
    /// `C = L * L^T`.
    ///
    /// Validation already guarantees positive semi-definiteness; for
    /// PSD-but-singular matrices (for example perfect correlation) the
    /// zero pivot is handled by zeroing the remainder of the column, which
    /// yields a valid factor of the singular matrix.
    pub fn cholesky(&self) -> CholeskyFactor {
        let n = self.dim();
        let mut lower = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..=i {
                let mut sum = 0.0;
                if j == i {
                    for k in 0..j {
                        let l_jk = lower[j * n + k];
                        sum += l_jk * l_jk;
                    }
                    let diag = self.get(j, j) - sum;
                    // Singular PSD pivot: clamp tiny negatives from rounding.
                    lower[j * n + j] = diag.max(0.0).sqrt();
                } else {
                    for k in 0..j {
                        sum += lower[i * n + k] * lower[j * n + k];
                    }
                    let l_jj = lower[j * n + j];
                    lower[i * n + j] = if l_jj > PSD_TOLERANCE {
                        (self.get(i, j) - sum) / l_jj
                    } else {
                        0.0
                    };
                }
            }
        }

        CholeskyFactor { data: lower, dim: n }
    }
}

/// Lower-triangular Cholesky factor of a correlation matrix.
///
/// Transforms independent standard normals into correlated normals.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    /// Lower-triangular elements, row-major.
    data: Vec<f64>,
    dim: usize,
}

impl CholeskyFactor {
    /// Matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Element at (i, j); zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Transforms independent standard normals in place: `z ← L * z`.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform_inplace(&self, z: &mut [f64]) {
        assert!(
            z.len() >= self.dim,
            "input length {} is less than matrix dimension {}",
            z.len(),
            self.dim
        );

        let n = self.dim;
        // Rows are processed bottom-up so each output only reads inputs at
        // or below its own index, allowing in-place updates.
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for j in 0..=i {
                sum += self.get(i, j) * z[j];
            }
            z[i] = sum;
        }
    }

    /// Transforms independent standard normals into a new vector.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        let mut w = z[..self.dim].to_vec();
        self.transform_inplace(&mut w);
        w
    }
}
