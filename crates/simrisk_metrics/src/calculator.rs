//! Risk metric computation over a trial ensemble.

use std::collections::BTreeMap;

use tracing::debug;

use simrisk_engine::TrialEnsemble;

use crate::error::DataQualityError;
use crate::metrics::{ConditionFrequency, RiskMetrics, VariableMetrics, WorstCase};
use crate::stats;

/// Default fraction of baseline below which a decline counts as critical.
pub const DEFAULT_CRITICAL_FRACTION: f64 = 0.5;

/// Default number of worst-outcome trials reported.
pub const DEFAULT_WORST_CASE_COUNT: usize = 10;

/// Computes risk metrics from a completed simulation ensemble.
///
/// The calculator is stateless across calls; configuration covers only
/// the critical-decline threshold and how many worst cases to rank.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use simrisk_engine::{SimulationTrial, TrialEnsemble};
/// use simrisk_metrics::RiskMetricsCalculator;
///
/// let ensemble = TrialEnsemble::new(
///     vec!["x".into()],
///     Vec::new(),
///     None,
///     0,
///     vec![
///         SimulationTrial::new(vec![90.0], Vec::new()),
///         SimulationTrial::new(vec![110.0], Vec::new()),
///     ],
/// );
/// let mut baselines = BTreeMap::new();
/// baselines.insert("x".to_string(), 100.0);
///
/// let metrics = RiskMetricsCalculator::new().compute(&ensemble, &baselines).unwrap();
/// assert_eq!(metrics.variables[0].mean, 100.0);
/// assert_eq!(metrics.variables[0].prob_decline, 0.5);
/// ```
#[derive(Clone, Debug)]
pub struct RiskMetricsCalculator {
    critical_fraction: f64,
    worst_case_count: usize,
}

impl Default for RiskMetricsCalculator {
    fn default() -> Self {
        Self {
            critical_fraction: DEFAULT_CRITICAL_FRACTION,
            worst_case_count: DEFAULT_WORST_CASE_COUNT,
        }
    }
}

impl RiskMetricsCalculator {
    /// Creates a calculator with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the critical-decline fraction, in (0, 1].
    ///
    /// # Errors
    ///
    /// Returns [`DataQualityError::InvalidCriticalFraction`] for values
    /// outside the range or non-finite.
    pub fn with_critical_fraction(mut self, fraction: f64) -> Result<Self, DataQualityError> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(DataQualityError::InvalidCriticalFraction { value: fraction });
        }
        self.critical_fraction = fraction;
        Ok(self)
    }

    /// Sets how many worst-outcome trials to rank.
    pub fn with_worst_case_count(mut self, count: usize) -> Self {
        self.worst_case_count = count;
        self
    }

    /// The configured critical-decline fraction.
    #[inline]
    pub fn critical_fraction(&self) -> f64 {
        self.critical_fraction
    }

    /// Computes the full risk report.
    ///
    /// `baselines` maps every ensemble variable to its reference value;
    /// decline probabilities count trials ending below that reference.
    ///
    /// # Errors
    ///
    /// - [`DataQualityError::EmptyEnsemble`] for an ensemble with no
    ///   trials.
    /// - [`DataQualityError::MissingBaseline`] or
    ///   [`DataQualityError::InvalidBaseline`] for an absent or bad
    ///   reference value.
    /// - [`DataQualityError::NonFiniteValue`] if any trial carries a NaN
    ///   or infinite terminal value.
    pub fn compute(
        &self,
        ensemble: &TrialEnsemble,
        baselines: &BTreeMap<String, f64>,
    ) -> Result<RiskMetrics, DataQualityError> {
        if ensemble.num_trials() == 0 {
            return Err(DataQualityError::EmptyEnsemble);
        }

        let mut resolved_baselines = Vec::with_capacity(ensemble.num_variables());
        for name in ensemble.variable_names() {
            let value = *baselines
                .get(name)
                .ok_or_else(|| DataQualityError::MissingBaseline {
                    variable: name.clone(),
                })?;
            if !value.is_finite() || value < 0.0 {
                return Err(DataQualityError::InvalidBaseline {
                    variable: name.clone(),
                    value,
                });
            }
            resolved_baselines.push(value);
        }

        for (trial_index, trial) in ensemble.trials().iter().enumerate() {
            for (variable, &value) in ensemble.variable_names().iter().zip(trial.values()) {
                if !value.is_finite() {
                    return Err(DataQualityError::NonFiniteValue {
                        trial_index,
                        variable: variable.clone(),
                    });
                }
            }
        }

        debug!(
            num_trials = ensemble.num_trials(),
            num_variables = ensemble.num_variables(),
            critical_fraction = self.critical_fraction,
            "computing risk metrics"
        );

        let variables = ensemble
            .variable_names()
            .iter()
            .enumerate()
            .map(|(index, name)| {
                self.variable_metrics(name, ensemble.column(index), resolved_baselines[index])
            })
            .collect();

        let aggregate_baseline: f64 = resolved_baselines.iter().sum();
        let aggregates = ensemble.aggregates();
        let aggregate = self.variable_metrics("aggregate", aggregates.clone(), aggregate_baseline);

        Ok(RiskMetrics {
            num_trials: ensemble.num_trials(),
            variables,
            aggregate,
            worst_cases: self.worst_cases(ensemble, &aggregates),
            condition_frequencies: condition_frequencies(ensemble),
        })
    }

    /// Full statistics for one column of terminal values.
    fn variable_metrics(&self, name: &str, mut column: Vec<f64>, baseline: f64) -> VariableMetrics {
        let n = column.len() as f64;
        let decline = column.iter().filter(|&&v| v < baseline).count() as f64 / n;
        let critical_level = self.critical_fraction * baseline;
        let critical = column.iter().filter(|&&v| v < critical_level).count() as f64 / n;

        column.sort_by(|a, b| a.total_cmp(b));
        let mean = stats::mean(&column);

        VariableMetrics {
            name: name.to_string(),
            baseline,
            mean,
            std_dev: stats::std_dev(&column, mean),
            min: column[0],
            max: column[column.len() - 1],
            p5: stats::percentile(&column, 5.0),
            p95: stats::percentile(&column, 95.0),
            var_95: stats::percentile(&column, 5.0),
            var_99: stats::percentile(&column, 1.0),
            cvar_95: stats::lower_tail_mean(&column, 0.05),
            cvar_99: stats::lower_tail_mean(&column, 0.01),
            prob_decline: decline,
            prob_critical_decline: critical,
        }
    }

    /// Ranks the lowest-aggregate trials, rank 1 being the worst.
    fn worst_cases(&self, ensemble: &TrialEnsemble, aggregates: &[f64]) -> Vec<WorstCase> {
        let mut order: Vec<usize> = (0..aggregates.len()).collect();
        order.sort_by(|&a, &b| aggregates[a].total_cmp(&aggregates[b]));
        order.truncate(self.worst_case_count);

        order
            .into_iter()
            .enumerate()
            .map(|(rank, trial_index)| {
                let trial = &ensemble.trials()[trial_index];
                WorstCase {
                    rank: rank + 1,
                    trial_index,
                    aggregate: aggregates[trial_index],
                    values: trial.values().to_vec(),
                    fired_conditions: trial
                        .fired()
                        .iter()
                        .map(|&c| ensemble.condition_names()[c].clone())
                        .collect(),
                }
            })
            .collect()
    }
}

/// Counts, per condition, the trials in which it fired at least once.
fn condition_frequencies(ensemble: &TrialEnsemble) -> Vec<ConditionFrequency> {
    let mut counts = vec![0usize; ensemble.condition_names().len()];
    for trial in ensemble.trials() {
        for &condition in trial.fired() {
            counts[condition] += 1;
        }
    }
    let n = ensemble.num_trials() as f64;
    ensemble
        .condition_names()
        .iter()
        .zip(counts)
        .map(|(name, trials_fired)| ConditionFrequency {
            name: name.clone(),
            trials_fired,
            frequency: trials_fired as f64 / n,
        })
        .collect()
}
