//! Monte Carlo simulation engine for parameterized risk scenarios.
//!
//! This crate executes the trials: it takes a validated
//! [`Scenario`](simrisk_core::Scenario) from `simrisk_core`, runs N
//! independent trials with correlated draws and adverse-condition shocks,
//! and produces a [`TrialEnsemble`] for the metrics layer.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │   SimulationConfig   │  trials, horizon, seed
//!                 └──────────┬───────────┘
//!                            │
//!   Scenario ──────▶ SimulationEngine ──────▶ TrialEnsemble
//!                    │              │
//!          CorrelatedSampler   ShockInjector
//!          (Cholesky + NORTA)  (Bernoulli + decay)
//!                    │              │
//!                    └── TrialRng ──┘
//!                   (per-trial substream)
//! ```
//!
//! ## Determinism
//!
//! Every trial derives its own RNG substream from the master seed and the
//! trial index, so a run is bit-for-bit reproducible regardless of how
//! rayon schedules the trials. Two runs with the same scenario, config
//! and seed produce equal ensembles.
//!
//! ## Example
//!
//! ```rust
//! use simrisk_core::{AdverseCondition, CorrelationMatrix, RandomVariable, Scenario};
//! use simrisk_engine::{SimulationConfig, SimulationEngine};
//!
//! let scenario = Scenario::new(
//!     vec![
//!         RandomVariable::normal("revenue", 100.0, 10.0)?,
//!         RandomVariable::normal("costs", 50.0, 5.0)?,
//!     ],
//!     CorrelationMatrix::new(
//!         vec!["revenue".into(), "costs".into()],
//!         vec![1.0, 0.5, 0.5, 1.0],
//!     )?,
//!     vec![AdverseCondition::new("supply shock", 0.05, -0.2)?],
//! )?;
//!
//! let config = SimulationConfig::builder()
//!     .num_trials(10_000)
//!     .seed(42)
//!     .build()?;
//!
//! let mut engine = SimulationEngine::new(scenario, config)?;
//! let ensemble = engine.run()?;
//! assert_eq!(ensemble.num_trials(), 10_000);
//! # Ok::<(), simrisk_engine::SimulationError>(())
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cancel;
pub mod config;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod rng;
pub mod sampler;
pub mod shocks;

pub use cancel::CancelToken;
pub use config::{SimulationConfig, SimulationConfigBuilder, MAX_HORIZON, MAX_TRIALS};
pub use engine::{EngineState, SimulationEngine};
pub use ensemble::{SimulationTrial, TrialEnsemble};
pub use error::SimulationError;
pub use rng::TrialRng;
pub use sampler::CorrelatedSampler;
pub use shocks::{ShockInjector, ShockState, SHOCK_DECAY, SHOCK_NOISE_STD};
