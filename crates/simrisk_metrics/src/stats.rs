//! Order statistics over sorted samples.
//!
//! All functions here take a slice already sorted ascending; sorting once
//! per column in the calculator keeps the per-metric cost linear.

/// Sample mean. Returns 0 for an empty slice.
pub(crate) fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Sample standard deviation with Bessel's correction. Returns 0 for
/// fewer than two samples.
pub(crate) fn std_dev(samples: &[f64], mean: f64) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (samples.len() - 1) as f64).sqrt()
}

/// Empirical percentile by linear interpolation between order statistics.
///
/// `q` is in [0, 100]. For a sorted slice of n samples the rank is
/// `q/100 * (n-1)`, interpolated between the two bracketing samples.
///
/// # Panics
///
/// Panics if `sorted` is empty; callers validate non-emptiness first.
pub(crate) fn percentile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=100.0).contains(&q));
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Mean of the lowest `fraction` of samples, always including at least
/// one sample. This is the expected value conditional on landing in the
/// left tail.
pub(crate) fn lower_tail_mean(sorted: &[f64], fraction: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let count = ((sorted.len() as f64 * fraction).floor() as usize).max(1);
    mean(&sorted[..count])
}
