//! Simulation run error types.

use simrisk_core::ValidationError;
use thiserror::Error;

/// Errors returned by a simulation run.
///
/// Either the whole run fails validation up front, or the ensemble is
/// fully valid; partial results are never returned. Cancellation is a
/// distinct outcome callers may treat as "no result, not an error".
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// Scenario or configuration rejected before any trial executed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The run was cancelled cooperatively at a trial boundary.
    #[error("Simulation cancelled before completion")]
    Cancelled,
}
