//! Trial ensemble produced by a completed simulation run.
//!
//! The ensemble is the only state persisted by a run: N terminal value
//! vectors plus, per trial, the set of adverse conditions that fired.
//! It is immutable after creation; the metrics layer borrows it read-only.

/// One Monte Carlo trial: realised terminal values and fired conditions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationTrial {
    values: Vec<f64>,
    fired: Vec<usize>,
}

impl SimulationTrial {
    /// Creates a trial record from terminal values and fired-condition
    /// indices. Exposed so downstream crates can build fixtures.
    pub fn new(values: Vec<f64>, fired: Vec<usize>) -> Self {
        Self { values, fired }
    }

    /// Terminal value per variable, in scenario order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Indices (into the condition catalog) of conditions that fired at
    /// least once during this trial, ascending.
    #[inline]
    pub fn fired(&self) -> &[usize] {
        &self.fired
    }

    /// Sum of terminal values across variables.
    #[inline]
    pub fn aggregate(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// The complete ensemble of N independent trials.
///
/// Trial ordering carries no meaning: every downstream metric is an
/// order-independent reduction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrialEnsemble {
    variable_names: Vec<String>,
    condition_names: Vec<String>,
    horizon: Option<usize>,
    seed: u64,
    trials: Vec<SimulationTrial>,
}

impl TrialEnsemble {
    /// Assembles an ensemble from run metadata and completed trials.
    pub fn new(
        variable_names: Vec<String>,
        condition_names: Vec<String>,
        horizon: Option<usize>,
        seed: u64,
        trials: Vec<SimulationTrial>,
    ) -> Self {
        Self {
            variable_names,
            condition_names,
            horizon,
            seed,
            trials,
        }
    }

    /// Number of trials.
    #[inline]
    pub fn num_trials(&self) -> usize {
        self.trials.len()
    }

    /// Number of variables per trial.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variable_names.len()
    }

    /// Variable names in column order.
    #[inline]
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    /// Adverse-condition names, indexed by [`SimulationTrial::fired`].
    #[inline]
    pub fn condition_names(&self) -> &[String] {
        &self.condition_names
    }

    /// Horizon length for path runs, `None` for single-period runs.
    #[inline]
    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    /// Master seed the run was executed with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// All trials.
    #[inline]
    pub fn trials(&self) -> &[SimulationTrial] {
        &self.trials
    }

    /// Terminal values of one variable across all trials.
    pub fn column(&self, variable: usize) -> Vec<f64> {
        self.trials.iter().map(|t| t.values()[variable]).collect()
    }

    /// Per-trial aggregate (sum across variables).
    pub fn aggregates(&self) -> Vec<f64> {
        self.trials.iter().map(SimulationTrial::aggregate).collect()
    }

    /// Empirical Pearson correlation between two variable columns.
    ///
    /// Used by tests and scenario calibration to verify the sampler
    /// against the configured correlation matrix. Returns zero when
    /// either column is constant.
    pub fn empirical_correlation(&self, i: usize, j: usize) -> f64 {
        let n = self.trials.len();
        if n < 2 {
            return 0.0;
        }
        let nf = n as f64;

        let (mut mean_i, mut mean_j) = (0.0, 0.0);
        for t in &self.trials {
            mean_i += t.values()[i];
            mean_j += t.values()[j];
        }
        mean_i /= nf;
        mean_j /= nf;

        let (mut cov, mut var_i, mut var_j) = (0.0, 0.0, 0.0);
        for t in &self.trials {
            let di = t.values()[i] - mean_i;
            let dj = t.values()[j] - mean_j;
            cov += di * dj;
            var_i += di * di;
            var_j += dj * dj;
        }
        if var_i <= 0.0 || var_j <= 0.0 {
            return 0.0;
        }
        cov / (var_i.sqrt() * var_j.sqrt())
    }
}
