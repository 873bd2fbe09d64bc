//! Numerical helpers shared by scenario validation and sampling.

mod distributions;
mod eigen;

pub use distributions::norm_cdf;
pub use eigen::symmetric_eigenvalues;
