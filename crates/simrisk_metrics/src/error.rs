//! Data quality errors raised during metrics computation.

use thiserror::Error;

/// Errors raised when an ensemble or baseline set cannot support the
/// requested metrics.
///
/// Metrics are never computed over partially valid data; the first
/// quality failure aborts the whole computation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataQualityError {
    /// The ensemble holds no trials.
    #[error("Cannot compute metrics over an empty ensemble")]
    EmptyEnsemble,

    /// A trial holds a NaN or infinite terminal value.
    #[error("Non-finite value in trial {trial_index}, variable '{variable}'")]
    NonFiniteValue {
        /// Index of the offending trial.
        trial_index: usize,
        /// Name of the offending variable.
        variable: String,
    },

    /// No baseline value was supplied for a variable in the ensemble.
    #[error("Missing baseline for variable '{variable}'")]
    MissingBaseline {
        /// The variable without a baseline.
        variable: String,
    },

    /// A baseline value is NaN, infinite or negative.
    #[error("Baseline for variable '{variable}' is {value}: must be finite and >= 0")]
    InvalidBaseline {
        /// The variable with the bad baseline.
        variable: String,
        /// The offending value.
        value: f64,
    },

    /// The critical-decline fraction is outside (0, 1].
    #[error("Critical fraction {value} out of range: must be in (0, 1]")]
    InvalidCriticalFraction {
        /// The offending fraction.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_inputs() {
        let err = DataQualityError::NonFiniteValue {
            trial_index: 7,
            variable: "revenue".to_string(),
        };
        assert!(err.to_string().contains("trial 7"));
        assert!(err.to_string().contains("revenue"));

        let err = DataQualityError::InvalidCriticalFraction { value: 1.5 };
        assert!(err.to_string().contains("1.5"));
    }
}
