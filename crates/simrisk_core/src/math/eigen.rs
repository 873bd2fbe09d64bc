//! Symmetric eigenvalue computation via cyclic Jacobi rotations.
//!
//! Correlation matrices are small (one row per scenario variable), so a
//! dense Jacobi sweep is both simple and fast enough. The eigenvalues are
//! used to test positive semi-definiteness before any sampling happens.

/// Convergence threshold on the off-diagonal Frobenius norm.
const OFF_DIAG_TOL: f64 = 1e-12;

/// Upper bound on full Jacobi sweeps. Convergence is quadratic, so this
/// is far more than matrices up to a few hundred rows ever need.
const MAX_SWEEPS: usize = 64;

/// Computes the eigenvalues of a symmetric matrix, ascending.
///
/// `data` holds the matrix in row-major order with `dim * dim` elements.
/// Symmetry is assumed, not checked; callers validate it first.
///
/// # Panics
///
/// Panics if `data.len() != dim * dim`.
///
/// # Examples
/// ```
/// use simrisk_core::math::symmetric_eigenvalues;
///
/// // [[2, 1], [1, 2]] has eigenvalues 1 and 3
/// let eigs = symmetric_eigenvalues(&[2.0, 1.0, 1.0, 2.0], 2);
/// assert!((eigs[0] - 1.0).abs() < 1e-10);
/// assert!((eigs[1] - 3.0).abs() < 1e-10);
/// ```
pub fn symmetric_eigenvalues(data: &[f64], dim: usize) -> Vec<f64> {
    assert_eq!(
        data.len(),
        dim * dim,
        "matrix has {} elements, expected {}",
        data.len(),
        dim * dim
    );

    if dim == 0 {
        return Vec::new();
    }
    if dim == 1 {
        return vec![data[0]];
    }

    let mut a = data.to_vec();

    for _ in 0..MAX_SWEEPS {
        if off_diagonal_norm(&a, dim) < OFF_DIAG_TOL {
            break;
        }
        for p in 0..dim - 1 {
            for q in p + 1..dim {
                rotate(&mut a, dim, p, q);
            }
        }
    }

    let mut eigs: Vec<f64> = (0..dim).map(|i| a[i * dim + i]).collect();
    eigs.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    eigs
}

/// Frobenius norm of the strict upper triangle.
fn off_diagonal_norm(a: &[f64], dim: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..dim {
        for j in i + 1..dim {
            let v = a[i * dim + j];
            sum += v * v;
        }
    }
    sum.sqrt()
}

/// Applies one Jacobi rotation annihilating element (p, q).
fn rotate(a: &mut [f64], dim: usize, p: usize, q: usize) {
    let apq = a[p * dim + q];
    if apq.abs() < f64::MIN_POSITIVE {
        return;
    }

    let app = a[p * dim + p];
    let aqq = a[q * dim + q];

    // Stable computation of the rotation angle (Golub & Van Loan 8.4)
    let theta = (aqq - app) / (2.0 * apq);
    let t = if theta >= 0.0 {
        1.0 / (theta + (1.0 + theta * theta).sqrt())
    } else {
        1.0 / (theta - (1.0 + theta * theta).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    for k in 0..dim {
        let akp = a[k * dim + p];
        let akq = a[k * dim + q];
        a[k * dim + p] = c * akp - s * akq;
        a[k * dim + q] = s * akp + c * akq;
    }
    for k in 0..dim {
        let apk = a[p * dim + k];
        let aqk = a[q * dim + k];
        a[p * dim + k] = c * apk - s * aqk;
        a[q * dim + k] = s * apk + c * aqk;
    }
}
