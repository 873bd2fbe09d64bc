//! Validation error types for scenario configuration.
//!
//! Every invalid input is rejected before any simulation work begins, with
//! enough context (variable name, matrix index, offending value) for the
//! scenario author to fix the configuration without re-deriving the failure.

use thiserror::Error;

/// Errors raised while validating scenario configuration.
///
/// # Variants
///
/// Each variant names the exact input that was invalid and why; validation
/// failures are never silently corrected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A dispersion parameter (standard deviation or scale) is negative
    /// or non-finite.
    #[error("Variable '{variable}' has invalid dispersion {value}: must be finite and >= 0")]
    InvalidDispersion {
        /// The variable whose distribution is invalid.
        variable: String,
        /// The offending parameter value.
        value: f64,
    },

    /// A distribution parameter is non-finite (NaN or infinite).
    #[error("Variable '{variable}' has non-finite parameter '{parameter}'")]
    NonFiniteParameter {
        /// The variable whose distribution is invalid.
        variable: String,
        /// The name of the offending parameter.
        parameter: &'static str,
    },

    /// A uniform distribution has `low > high`.
    #[error("Variable '{variable}' has invalid uniform bounds [{low}, {high}]: low must be <= high")]
    InvalidBounds {
        /// The variable whose distribution is invalid.
        variable: String,
        /// Lower bound.
        low: f64,
        /// Upper bound.
        high: f64,
    },

    /// An adverse-condition probability is outside [0, 1].
    #[error("Condition '{condition}' has probability {probability}: must be in [0, 1]")]
    InvalidProbability {
        /// The adverse condition with the bad probability.
        condition: String,
        /// The offending probability.
        probability: f64,
    },

    /// An adverse-condition impact is non-finite.
    #[error("Condition '{condition}' has non-finite impact")]
    NonFiniteImpact {
        /// The adverse condition with the bad impact.
        condition: String,
    },

    /// Matrix element count does not match the declared dimension.
    #[error("Correlation matrix has {got} elements, expected {expected} for {dim} variables")]
    InvalidDimensions {
        /// Expected element count (dim * dim).
        expected: usize,
        /// Actual element count provided.
        got: usize,
        /// Declared dimension.
        dim: usize,
    },

    /// A diagonal element of the correlation matrix is not 1.
    #[error("Correlation matrix diagonal at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Row/column index of the bad diagonal element.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// The correlation matrix is not symmetric.
    #[error("Correlation matrix is not symmetric at ({i}, {j}): {value_ij} != {value_ji}")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Element at (i, j).
        value_ij: f64,
        /// Element at (j, i).
        value_ji: f64,
    },

    /// A correlation entry is outside [-1, 1].
    #[error("Correlation at ({i}, {j}) is {value}: must be in [-1, 1]")]
    CorrelationOutOfRange {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// The offending value.
        value: f64,
    },

    /// The correlation matrix is not positive semi-definite.
    ///
    /// Multivariate sampling from such a matrix would silently produce
    /// NaNs, so construction fails fast naming the offending eigenvalue.
    #[error(
        "Correlation matrix not positive semi-definite: eigenvalue {eigenvalue} at index {index}"
    )]
    NotPositiveSemiDefinite {
        /// The most negative eigenvalue found.
        eigenvalue: f64,
        /// Index of that eigenvalue in ascending order.
        index: usize,
    },

    /// The correlation matrix names a different variable set than the
    /// scenario's variable list.
    #[error("Correlation matrix variable order does not match scenario variables at position {position}: '{expected}' vs '{got}'")]
    MismatchedVariables {
        /// Position of the first mismatch.
        position: usize,
        /// Variable name the scenario declares at that position.
        expected: String,
        /// Variable name the correlation matrix declares.
        got: String,
    },

    /// Two scenario variables share a name.
    #[error("Duplicate variable name '{name}' in scenario")]
    DuplicateVariable {
        /// The duplicated name.
        name: String,
    },

    /// A condition's impact map references a variable the scenario does
    /// not define.
    #[error("Condition '{condition}' references unknown variable '{variable}'")]
    UnknownVariable {
        /// The adverse condition holding the reference.
        condition: String,
        /// The unknown variable name.
        variable: String,
    },

    /// Trial count outside the valid range.
    #[error("Invalid trial count {count}: must be in range [1, {max}]")]
    InvalidTrialCount {
        /// The offending count.
        count: usize,
        /// Upper bound on trials.
        max: usize,
    },

    /// Horizon length outside the valid range.
    #[error("Invalid horizon {horizon}: must be in range [1, {max}]")]
    InvalidHorizon {
        /// The offending horizon.
        horizon: usize,
        /// Upper bound on steps.
        max: usize,
    },

    /// Path-mode initial values are missing or have the wrong length.
    #[error("Initial values length {got} does not match variable count {expected}")]
    InitialValuesMismatch {
        /// Number of values expected (variable count).
        expected: usize,
        /// Number of values provided.
        got: usize,
    },

    /// A path simulation was requested without initial values.
    #[error("Path simulation (horizon set) requires initial values for all {variables} variables")]
    MissingInitialValues {
        /// Variable count of the scenario.
        variables: usize,
    },

    /// A path-mode initial value is negative or non-finite.
    #[error("Initial value at index {index} is {value}: must be finite and >= 0")]
    InvalidInitialValue {
        /// Position of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_names_inputs() {
        let err = ValidationError::InvalidDispersion {
            variable: "revenue".to_string(),
            value: -0.5,
        };
        assert!(err.to_string().contains("revenue"));
        assert!(err.to_string().contains("-0.5"));

        let err = ValidationError::NotPositiveSemiDefinite {
            eigenvalue: -0.03,
            index: 2,
        };
        assert!(err.to_string().contains("-0.03"));
        assert!(err.to_string().contains("index 2"));
    }

    #[test]
    fn test_mismatched_variables_display() {
        let err = ValidationError::MismatchedVariables {
            position: 1,
            expected: "a".to_string(),
            got: "b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'a'"));
        assert!(msg.contains("'b'"));
    }
}
