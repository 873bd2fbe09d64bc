//! Metric result types.
//!
//! Plain data produced by
//! [`RiskMetricsCalculator`](crate::RiskMetricsCalculator); immutable and
//! serialisable (with the `serde` feature) for reporting layers.

/// Distribution and tail-risk statistics for a single variable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableMetrics {
    /// Variable name, matching the scenario definition.
    pub name: String,
    /// Baseline (pre-simulation reference) value used for decline
    /// probabilities.
    pub baseline: f64,
    /// Sample mean of terminal values.
    pub mean: f64,
    /// Sample standard deviation (Bessel-corrected).
    pub std_dev: f64,
    /// Smallest terminal value observed.
    pub min: f64,
    /// Largest terminal value observed.
    pub max: f64,
    /// 5th percentile of terminal values.
    pub p5: f64,
    /// 95th percentile of terminal values.
    pub p95: f64,
    /// Value at risk at 95% confidence: the 5th-percentile outcome.
    pub var_95: f64,
    /// Value at risk at 99% confidence: the 1st-percentile outcome.
    pub var_99: f64,
    /// Expected value conditional on the worst 5% of outcomes.
    pub cvar_95: f64,
    /// Expected value conditional on the worst 1% of outcomes.
    pub cvar_99: f64,
    /// Fraction of trials ending below the baseline.
    pub prob_decline: f64,
    /// Fraction of trials ending below the critical fraction of baseline.
    pub prob_critical_decline: f64,
}

/// One of the worst-outcome trials, ranked by aggregate terminal value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorstCase {
    /// Rank among worst cases, 1 = worst.
    pub rank: usize,
    /// Index of the trial in the ensemble.
    pub trial_index: usize,
    /// Sum of terminal values across variables.
    pub aggregate: f64,
    /// Terminal value per variable, in ensemble column order.
    pub values: Vec<f64>,
    /// Names of adverse conditions that fired during the trial.
    pub fired_conditions: Vec<String>,
}

/// Occurrence statistics for one adverse condition across the ensemble.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionFrequency {
    /// Condition name from the scenario catalog.
    pub name: String,
    /// Number of trials in which the condition fired at least once.
    pub trials_fired: usize,
    /// `trials_fired` as a fraction of all trials.
    pub frequency: f64,
}

/// Complete risk report for one simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskMetrics {
    /// Number of trials the metrics were computed over.
    pub num_trials: usize,
    /// Per-variable statistics, in ensemble column order.
    pub variables: Vec<VariableMetrics>,
    /// Statistics over the per-trial aggregate (sum across variables),
    /// with the aggregate baseline as reference.
    pub aggregate: VariableMetrics,
    /// The worst trials by aggregate terminal value, rank ascending.
    pub worst_cases: Vec<WorstCase>,
    /// How often each adverse condition fired.
    pub condition_frequencies: Vec<ConditionFrequency>,
}

impl RiskMetrics {
    /// Looks up a variable's metrics by name.
    pub fn variable(&self, name: &str) -> Option<&VariableMetrics> {
        self.variables.iter().find(|v| v.name == name)
    }
}
