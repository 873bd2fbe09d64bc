//! Correlated sampling of scenario variables.
//!
//! One draw produces all variables jointly: k independent standard
//! normals are transformed through the scenario's Cholesky factor, then
//! each component is mapped through its marginal distribution.
//!
//! ## Known approximation
//!
//! For non-normal marginals (log-normal, uniform) the correlated normals
//! are transformed marginally after correlation. This preserves rank
//! correlation but not exact Pearson correlation post-transform. The
//! behaviour is intentional and documented rather than corrected, since
//! correcting it would change reported risk numbers.

use simrisk_core::math::norm_cdf;
use simrisk_core::{CholeskyFactor, Distribution, Scenario};

use crate::rng::TrialRng;

/// Joint sampler over a scenario's variables.
///
/// Owns a copy of the Cholesky factor and the marginal specs so the hot
/// loop touches no shared state.
#[derive(Clone, Debug)]
pub struct CorrelatedSampler {
    cholesky: CholeskyFactor,
    marginals: Vec<Distribution>,
}

impl CorrelatedSampler {
    /// Builds a sampler from a validated scenario.
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            cholesky: scenario.cholesky().clone(),
            marginals: scenario
                .variables()
                .iter()
                .map(|v| v.distribution())
                .collect(),
        }
    }

    /// Number of variables per draw.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.marginals.len()
    }

    /// Fills `buffer` with one draw of correlated standard normals.
    ///
    /// # Panics
    ///
    /// Panics if `buffer.len() != self.num_variables()`.
    pub fn draw_correlated(&self, rng: &mut TrialRng, buffer: &mut [f64]) {
        assert_eq!(buffer.len(), self.num_variables());
        rng.fill_normal(buffer);
        self.cholesky.transform_inplace(buffer);
    }

    /// Maps correlated standard normals through the marginal
    /// distributions, in place.
    pub fn to_values(&self, w: &mut [f64]) {
        for (value, marginal) in w.iter_mut().zip(&self.marginals) {
            *value = match *marginal {
                Distribution::Normal { mean, std_dev } => mean + std_dev * *value,
                Distribution::LogNormal { location, scale } => (location + scale * *value).exp(),
                Distribution::Uniform { low, high } => low + (high - low) * norm_cdf(*value),
            };
        }
    }

    /// Fills `buffer` with one draw of marginal-transformed values.
    pub fn draw_values(&self, rng: &mut TrialRng, buffer: &mut [f64]) {
        self.draw_correlated(rng, buffer);
        self.to_values(buffer);
    }

    /// Samples an `n × k` matrix of marginal-transformed values, one row
    /// per trial, columns in correlation-matrix variable order.
    ///
    /// Each row uses its own substream of `master_seed`, so the matrix is
    /// reproducible and rows are independent.
    pub fn sample_matrix(&self, n: usize, master_seed: u64) -> Vec<Vec<f64>> {
        let k = self.num_variables();
        (0..n)
            .map(|row| {
                let mut rng = TrialRng::substream(master_seed, row as u64);
                let mut buffer = vec![0.0; k];
                self.draw_values(&mut rng, &mut buffer);
                buffer
            })
            .collect()
    }
}
