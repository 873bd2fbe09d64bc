//! Risk metrics over Monte Carlo trial ensembles.
//!
//! This crate turns a [`TrialEnsemble`](simrisk_engine::TrialEnsemble)
//! into a risk report: per-variable distribution statistics, tail risk
//! (VaR and CVaR at 95% and 99%), decline probabilities against caller
//! baselines, worst-case trial ranking and adverse-condition firing
//! frequencies.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use simrisk_core::{CorrelationMatrix, RandomVariable, Scenario};
//! use simrisk_engine::{SimulationConfig, SimulationEngine};
//! use simrisk_metrics::RiskMetricsCalculator;
//!
//! let scenario = Scenario::new(
//!     vec![RandomVariable::normal("revenue", 100.0, 10.0).unwrap()],
//!     CorrelationMatrix::identity(vec!["revenue".into()]),
//!     Vec::new(),
//! ).unwrap();
//! let config = SimulationConfig::builder()
//!     .num_trials(10_000)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! let ensemble = SimulationEngine::new(scenario, config).unwrap().run().unwrap();
//!
//! let mut baselines = BTreeMap::new();
//! baselines.insert("revenue".to_string(), 100.0);
//! let metrics = RiskMetricsCalculator::new()
//!     .compute(&ensemble, &baselines)
//!     .unwrap();
//!
//! let revenue = metrics.variable("revenue").unwrap();
//! assert!(revenue.var_99 <= revenue.var_95);
//! assert!(revenue.cvar_95 <= revenue.var_95);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod calculator;
pub mod error;
pub mod metrics;
mod stats;

pub use calculator::{
    RiskMetricsCalculator, DEFAULT_CRITICAL_FRACTION, DEFAULT_WORST_CASE_COUNT,
};
pub use error::DataQualityError;
pub use metrics::{ConditionFrequency, RiskMetrics, VariableMetrics, WorstCase};
