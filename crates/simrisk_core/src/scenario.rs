//! Validated scenario assembly.
//!
//! A [`Scenario`] is the handle produced by cross-validating a variable
//! list, a correlation matrix over the same variables, and an
//! adverse-condition catalog. The Cholesky factor and per-condition weight
//! vectors are resolved here, once, so the simulation hot loop does no
//! name lookups.

use crate::condition::AdverseCondition;
use crate::correlation::{CholeskyFactor, CorrelationMatrix};
use crate::error::ValidationError;
use crate::variable::RandomVariable;

/// A fully validated simulation scenario.
///
/// Immutable once constructed; the engine borrows it for the duration of
/// a run.
///
/// # Examples
/// ```
/// use simrisk_core::{AdverseCondition, CorrelationMatrix, RandomVariable, Scenario};
///
/// let variables = vec![
///     RandomVariable::normal("a", 100.0, 10.0).unwrap(),
///     RandomVariable::normal("b", 50.0, 5.0).unwrap(),
/// ];
/// let correlation = CorrelationMatrix::new(
///     vec!["a".into(), "b".into()],
///     vec![1.0, 0.5, 0.5, 1.0],
/// ).unwrap();
/// let conditions = vec![AdverseCondition::new("shock", 0.05, -0.2).unwrap()];
///
/// let scenario = Scenario::new(variables, correlation, conditions).unwrap();
/// assert_eq!(scenario.num_variables(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct Scenario {
    variables: Vec<RandomVariable>,
    correlation: CorrelationMatrix,
    conditions: Vec<AdverseCondition>,
    cholesky: CholeskyFactor,
    /// Per-condition impact weight, resolved to variable index order.
    condition_weights: Vec<Vec<f64>>,
}

impl Scenario {
    /// Assembles and cross-validates a scenario.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::DuplicateVariable`] if two variables share a
    ///   name.
    /// - [`ValidationError::MismatchedVariables`] if the correlation
    ///   matrix's variable order differs from the variable list.
    /// - [`ValidationError::UnknownVariable`] if a condition's impact map
    ///   names a variable the scenario does not define.
    pub fn new(
        variables: Vec<RandomVariable>,
        correlation: CorrelationMatrix,
        conditions: Vec<AdverseCondition>,
    ) -> Result<Self, ValidationError> {
        for (i, v) in variables.iter().enumerate() {
            if variables[..i].iter().any(|other| other.name() == v.name()) {
                return Err(ValidationError::DuplicateVariable {
                    name: v.name().to_string(),
                });
            }
        }

        if correlation.dim() != variables.len() {
            return Err(ValidationError::InvalidDimensions {
                expected: variables.len() * variables.len(),
                got: correlation.dim() * correlation.dim(),
                dim: variables.len(),
            });
        }
        for (position, (variable, name)) in
            variables.iter().zip(correlation.names()).enumerate()
        {
            if variable.name() != name {
                return Err(ValidationError::MismatchedVariables {
                    position,
                    expected: variable.name().to_string(),
                    got: name.clone(),
                });
            }
        }

        let mut condition_weights = Vec::with_capacity(conditions.len());
        for condition in &conditions {
            let weights = match condition.variable_impacts() {
                // No map: full impact on every variable.
                None => vec![1.0; variables.len()],
                Some(map) => {
                    for name in map.keys() {
                        if !variables.iter().any(|v| v.name() == name.as_str()) {
                            return Err(ValidationError::UnknownVariable {
                                condition: condition.name().to_string(),
                                variable: name.clone(),
                            });
                        }
                    }
                    variables
                        .iter()
                        .map(|v| map.get(v.name()).copied().unwrap_or(0.0))
                        .collect()
                }
            };
            condition_weights.push(weights);
        }

        let cholesky = correlation.cholesky();

        Ok(Self {
            variables,
            correlation,
            conditions,
            cholesky,
            condition_weights,
        })
    }

    /// Number of scenario variables.
    #[inline]
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// The scenario variables in sampling order.
    #[inline]
    pub fn variables(&self) -> &[RandomVariable] {
        &self.variables
    }

    /// Variable names in sampling order.
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name().to_string()).collect()
    }

    /// The validated correlation matrix.
    #[inline]
    pub fn correlation(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// The precomputed Cholesky factor of the correlation matrix.
    #[inline]
    pub fn cholesky(&self) -> &CholeskyFactor {
        &self.cholesky
    }

    /// The adverse-condition catalog.
    #[inline]
    pub fn conditions(&self) -> &[AdverseCondition] {
        &self.conditions
    }

    /// Per-condition impact weights in variable index order.
    #[inline]
    pub fn condition_weights(&self) -> &[Vec<f64>] {
        &self.condition_weights
    }
}
