//! Simulation run configuration.
//!
//! [`SimulationConfig`] is immutable and built through
//! [`SimulationConfigBuilder`], with range validation at build time.
//! Cross-validation against the scenario (initial-value length, finiteness)
//! happens when the engine is constructed.

use simrisk_core::ValidationError;

/// Maximum number of trials allowed.
pub const MAX_TRIALS: usize = 10_000_000;

/// Maximum horizon length (steps per path) allowed.
pub const MAX_HORIZON: usize = 10_000;

/// Trial count below which the engine runs sequentially rather than on
/// the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Immutable configuration for one simulation run.
///
/// # Examples
///
/// ```rust
/// use simrisk_engine::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .num_trials(10_000)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(config.num_trials(), 10_000);
/// assert_eq!(config.horizon(), None);
/// ```
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    num_trials: usize,
    horizon: Option<usize>,
    seed: Option<u64>,
    initial_values: Option<Vec<f64>>,
    parallel_threshold: usize,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Number of independent trials.
    #[inline]
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Steps per path, or `None` for a single-period run.
    #[inline]
    pub fn horizon(&self) -> Option<usize> {
        self.horizon
    }

    /// Optional master seed; `None` defaults to 0 at run time.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Starting value per variable for path runs.
    #[inline]
    pub fn initial_values(&self) -> Option<&[f64]> {
        self.initial_values.as_deref()
    }

    /// Trial count at which the engine switches to parallel execution.
    #[inline]
    pub fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Validates ranges.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidTrialCount`] if `num_trials` is 0 or
    ///   above [`MAX_TRIALS`].
    /// - [`ValidationError::InvalidHorizon`] if a horizon is set and is 0
    ///   or above [`MAX_HORIZON`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_trials == 0 || self.num_trials > MAX_TRIALS {
            return Err(ValidationError::InvalidTrialCount {
                count: self.num_trials,
                max: MAX_TRIALS,
            });
        }
        if let Some(horizon) = self.horizon {
            if horizon == 0 || horizon > MAX_HORIZON {
                return Err(ValidationError::InvalidHorizon {
                    horizon,
                    max: MAX_HORIZON,
                });
            }
        }
        Ok(())
    }
}

/// Builder for [`SimulationConfig`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    num_trials: Option<usize>,
    horizon: Option<usize>,
    seed: Option<u64>,
    initial_values: Option<Vec<f64>>,
    parallel_threshold: Option<usize>,
}

impl SimulationConfigBuilder {
    /// Sets the number of trials, in [1, [`MAX_TRIALS`]].
    #[inline]
    pub fn num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = Some(num_trials);
        self
    }

    /// Sets the path horizon, in [1, [`MAX_HORIZON`]]. Leaving it unset
    /// selects single-period mode.
    #[inline]
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Sets the master seed for reproducibility.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the starting values for path simulations, one per variable in
    /// scenario order.
    #[inline]
    pub fn initial_values(mut self, values: Vec<f64>) -> Self {
        self.initial_values = Some(values);
        self
    }

    /// Overrides the sequential/parallel cut-over trial count.
    #[inline]
    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = Some(threshold);
        self
    }

    /// Builds and range-validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if `num_trials` is unset or any range
    /// check fails.
    pub fn build(self) -> Result<SimulationConfig, ValidationError> {
        let num_trials = self.num_trials.unwrap_or(0);
        let config = SimulationConfig {
            num_trials,
            horizon: self.horizon,
            seed: self.seed,
            initial_values: self.initial_values,
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        };
        config.validate()?;
        Ok(config)
    }
}
