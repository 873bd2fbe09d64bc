//! # Simrisk Core (Layer 1: Scenario Definitions)
//!
//! Leaf types and validation for the simrisk Monte Carlo risk engine:
//!
//! - [`RandomVariable`] / [`Distribution`] — named variables with marginal
//!   distributions
//! - [`CorrelationMatrix`] — validated, PSD-checked, with Cholesky
//!   factorisation
//! - [`AdverseCondition`] — discrete shock scenarios with Bernoulli
//!   triggers
//! - [`Scenario`] — the cross-validated bundle handed to the engine
//! - [`ValidationError`] — structured rejection of malformed configuration
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           simrisk_core (L1)             │
//! ├─────────────────────────────────────────┤
//! │  variable    - RandomVariable           │
//! │  correlation - CorrelationMatrix        │
//! │  condition   - AdverseCondition         │
//! │  scenario    - Scenario (validated)     │
//! │  math        - eigenvalues, norm_cdf    │
//! └─────────────────────────────────────────┘
//!          ↑ consumed by simrisk_engine (L2)
//! ```
//!
//! All validation happens at construction time: a [`Scenario`] that exists
//! is a scenario the engine can run. Invalid input is rejected with a
//! [`ValidationError`] naming exactly which input was wrong and why.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod condition;
pub mod correlation;
pub mod error;
pub mod math;
pub mod scenario;
pub mod variable;

pub use condition::AdverseCondition;
pub use correlation::{CholeskyFactor, CorrelationMatrix, PSD_TOLERANCE};
pub use error::ValidationError;
pub use scenario::Scenario;
pub use variable::{Distribution, RandomVariable};
