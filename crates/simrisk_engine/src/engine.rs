//! Simulation engine orchestration.
//!
//! [`SimulationEngine`] runs N independent trials, each combining one or
//! more correlated draws with sampled adverse-condition shocks, and
//! collects the outcomes into a [`TrialEnsemble`].
//!
//! # Execution model
//!
//! Trials are independent and stateless with respect to each other, so
//! the engine distributes them across the rayon pool once the trial count
//! reaches the configured threshold. Each trial owns an RNG substream
//! derived from the master seed and trial index; the resulting ensemble
//! is bit-identical for any worker count.
//!
//! # Domain rules
//!
//! - Path trials clamp every intermediate and final value at zero: a
//!   variable driven negative by shocks represents an exhausted resource,
//!   not an error.
//! - Single-period trials keep the exact marginal shape of each draw and
//!   apply fired shocks multiplicatively.

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use simrisk_core::{Scenario, ValidationError};

use crate::cancel::CancelToken;
use crate::config::SimulationConfig;
use crate::ensemble::{SimulationTrial, TrialEnsemble};
use crate::error::SimulationError;
use crate::rng::TrialRng;
use crate::sampler::CorrelatedSampler;
use crate::shocks::ShockInjector;

/// Lifecycle of a simulation engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Scenario and configuration validated; ready to run.
    Configured,
    /// Trials are executing.
    Running,
    /// A full ensemble was produced. The scenario and configuration stay
    /// immutable; the engine may be run again from this state.
    Completed,
    /// Validation failed or the run was cancelled; no partial ensemble
    /// is exposed.
    Failed,
}

/// Monte Carlo simulation engine.
///
/// # Examples
///
/// ```rust
/// use simrisk_core::{CorrelationMatrix, RandomVariable, Scenario};
/// use simrisk_engine::{SimulationConfig, SimulationEngine};
///
/// let scenario = Scenario::new(
///     vec![
///         RandomVariable::normal("a", 100.0, 10.0).unwrap(),
///         RandomVariable::normal("b", 50.0, 5.0).unwrap(),
///     ],
///     CorrelationMatrix::new(
///         vec!["a".into(), "b".into()],
///         vec![1.0, 0.5, 0.5, 1.0],
///     ).unwrap(),
///     Vec::new(),
/// ).unwrap();
///
/// let config = SimulationConfig::builder()
///     .num_trials(1_000)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let mut engine = SimulationEngine::new(scenario, config).unwrap();
/// let ensemble = engine.run().unwrap();
/// assert_eq!(ensemble.num_trials(), 1_000);
/// ```
#[derive(Debug)]
pub struct SimulationEngine {
    scenario: Scenario,
    config: SimulationConfig,
    sampler: CorrelatedSampler,
    injector: ShockInjector,
    state: EngineState,
}

impl SimulationEngine {
    /// Creates an engine in the `Configured` state.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the configuration fails range
    /// checks, or if a path run is requested without a full vector of
    /// finite, non-negative initial values (one per scenario variable).
    pub fn new(scenario: Scenario, config: SimulationConfig) -> Result<Self, ValidationError> {
        config.validate()?;

        if config.horizon().is_some() {
            let values = config.initial_values().ok_or(
                ValidationError::MissingInitialValues {
                    variables: scenario.num_variables(),
                },
            )?;
            if values.len() != scenario.num_variables() {
                return Err(ValidationError::InitialValuesMismatch {
                    expected: scenario.num_variables(),
                    got: values.len(),
                });
            }
            for (index, &value) in values.iter().enumerate() {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidInitialValue { index, value });
                }
            }
        }

        let sampler = CorrelatedSampler::from_scenario(&scenario);
        let injector = ShockInjector::from_scenario(&scenario);

        Ok(Self {
            scenario,
            config,
            sampler,
            injector,
            state: EngineState::Configured,
        })
    }

    /// The engine's current lifecycle state.
    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The validated scenario this engine runs.
    #[inline]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// The run configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Runs all trials to completion.
    ///
    /// Calling this on a `Completed` or `Failed` engine starts a fresh,
    /// independent run. Scenario and configuration are immutable, so a
    /// rerun with the same seed reproduces the previous ensemble exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Cancelled`] only when called through
    /// [`run_cancellable`](Self::run_cancellable) with a cancelled token;
    /// this entry point cannot be cancelled.
    pub fn run(&mut self) -> Result<TrialEnsemble, SimulationError> {
        self.run_cancellable(&CancelToken::new())
    }

    /// Runs all trials, checking `cancel` at every trial boundary.
    ///
    /// Either the full ensemble is returned or the run fails; a cancelled
    /// run never exposes the trials accumulated so far.
    pub fn run_cancellable(
        &mut self,
        cancel: &CancelToken,
    ) -> Result<TrialEnsemble, SimulationError> {
        self.state = EngineState::Running;

        let started = Instant::now();
        let num_trials = self.config.num_trials();
        let seed = self.config.seed().unwrap_or(0);
        debug!(
            num_trials,
            horizon = ?self.config.horizon(),
            seed,
            "starting simulation run"
        );

        let this: &Self = self;
        let result: Result<Vec<SimulationTrial>, SimulationError> =
            if num_trials >= this.config.parallel_threshold() {
                (0..num_trials)
                    .into_par_iter()
                    .map(|index| this.run_trial(index as u64, seed, cancel))
                    .collect()
            } else {
                (0..num_trials)
                    .map(|index| this.run_trial(index as u64, seed, cancel))
                    .collect()
            };

        match result {
            Ok(trials) => {
                self.state = EngineState::Completed;
                info!(
                    num_trials,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "simulation completed"
                );
                Ok(TrialEnsemble::new(
                    self.scenario.variable_names(),
                    self.scenario
                        .conditions()
                        .iter()
                        .map(|c| c.name().to_string())
                        .collect(),
                    self.config.horizon(),
                    seed,
                    trials,
                ))
            }
            Err(error) => {
                self.state = EngineState::Failed;
                if matches!(error, SimulationError::Cancelled) {
                    warn!(num_trials, "simulation cancelled before completion");
                }
                Err(error)
            }
        }
    }

    /// Cancellation check plus one trial.
    fn run_trial(
        &self,
        trial_index: u64,
        master_seed: u64,
        cancel: &CancelToken,
    ) -> Result<SimulationTrial, SimulationError> {
        if cancel.is_cancelled() {
            return Err(SimulationError::Cancelled);
        }
        Ok(self.simulate_trial(trial_index, master_seed))
    }

    /// Simulates one trial on its own RNG substream.
    fn simulate_trial(&self, trial_index: u64, master_seed: u64) -> SimulationTrial {
        let mut rng = TrialRng::substream(master_seed, trial_index);
        match self.config.horizon() {
            None => self.single_period_trial(&mut rng),
            Some(horizon) => self.path_trial(&mut rng, horizon),
        }
    }

    /// One correlated draw, one shock step, multiplicative application.
    fn single_period_trial(&self, rng: &mut TrialRng) -> SimulationTrial {
        let k = self.sampler.num_variables();
        let mut values = vec![0.0; k];
        self.sampler.draw_values(rng, &mut values);

        let mut shocks = self.injector.begin_trial();
        let mut fired = Vec::new();
        self.injector.step(&mut shocks, rng, &mut fired);
        for (value, impact) in values.iter_mut().zip(shocks.impacts()) {
            *value *= 1.0 + impact;
        }

        SimulationTrial::new(values, fired)
    }

    /// T sequential steps: correlated period returns plus decaying shock
    /// impacts, clamped at zero.
    fn path_trial(&self, rng: &mut TrialRng, horizon: usize) -> SimulationTrial {
        let k = self.sampler.num_variables();
        // Initial values are validated present in path mode.
        let mut values = self
            .config
            .initial_values()
            .expect("path mode validated at construction")
            .to_vec();

        let mut returns = vec![0.0; k];
        let mut shocks = self.injector.begin_trial();
        let mut fired_step = Vec::new();
        let mut ever_fired = vec![false; self.injector.num_conditions()];

        for _ in 0..horizon {
            self.sampler.draw_values(rng, &mut returns);
            self.injector.step(&mut shocks, rng, &mut fired_step);
            for &index in &fired_step {
                ever_fired[index] = true;
            }
            for ((value, ret), impact) in
                values.iter_mut().zip(&returns).zip(shocks.impacts())
            {
                *value = (*value * (1.0 + ret + impact)).max(0.0);
            }
        }

        let fired = ever_fired
            .iter()
            .enumerate()
            .filter_map(|(index, &hit)| hit.then_some(index))
            .collect();
        SimulationTrial::new(values, fired)
    }
}
