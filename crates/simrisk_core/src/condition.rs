//! Adverse condition definitions.
//!
//! An [`AdverseCondition`] is a discrete shock scenario: an independent
//! per-trial (and, for path simulations, per-step) Bernoulli trigger with a
//! signed fractional impact. An optional impact map restricts the shock to
//! a subset of variables with per-variable weights.

use std::collections::BTreeMap;

use crate::error::ValidationError;

/// A discrete shock scenario sampled fresh every trial.
///
/// # Examples
/// ```
/// use simrisk_core::AdverseCondition;
///
/// // 5% chance per trial of a 20% drawdown across all variables
/// let crash = AdverseCondition::new("market_crash", 0.05, -0.20).unwrap();
/// assert_eq!(crash.probability(), 0.05);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdverseCondition {
    name: String,
    probability: f64,
    impact: f64,
    /// Per-variable weight on the impact; `None` means every variable
    /// receives the full impact.
    variable_impacts: Option<BTreeMap<String, f64>>,
}

impl AdverseCondition {
    /// Creates a condition affecting every variable with weight 1.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProbability`] unless
    /// `0 <= probability <= 1`, and [`ValidationError::NonFiniteImpact`]
    /// for NaN/infinite impacts.
    pub fn new(
        name: impl Into<String>,
        probability: f64,
        impact: f64,
    ) -> Result<Self, ValidationError> {
        Self::with_impacts(name, probability, impact, None)
    }

    /// Creates a condition with an explicit per-variable weight map.
    ///
    /// Weight map entries are validated for finiteness here; whether the
    /// referenced variables exist is checked when the scenario is
    /// assembled.
    pub fn with_impacts(
        name: impl Into<String>,
        probability: f64,
        impact: f64,
        variable_impacts: Option<BTreeMap<String, f64>>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();

        if !(0.0..=1.0).contains(&probability) || !probability.is_finite() {
            return Err(ValidationError::InvalidProbability {
                condition: name,
                probability,
            });
        }
        if !impact.is_finite() {
            return Err(ValidationError::NonFiniteImpact { condition: name });
        }
        if let Some(map) = &variable_impacts {
            if map.values().any(|w| !w.is_finite()) {
                return Err(ValidationError::NonFiniteImpact { condition: name });
            }
        }

        Ok(Self {
            name,
            probability,
            impact,
            variable_impacts,
        })
    }

    /// The condition's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-trial (or per-step) trigger probability.
    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Signed fractional impact applied to affected variables.
    #[inline]
    pub fn impact(&self) -> f64 {
        self.impact
    }

    /// Per-variable weight map, if any.
    #[inline]
    pub fn variable_impacts(&self) -> Option<&BTreeMap<String, f64>> {
        self.variable_impacts.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_valid() {
        let c = AdverseCondition::new("supply_shock", 0.1, -0.15).unwrap();
        assert_eq!(c.name(), "supply_shock");
        assert_eq!(c.impact(), -0.15);
        assert!(c.variable_impacts().is_none());
    }

    #[test]
    fn test_probability_bounds() {
        assert!(AdverseCondition::new("c", 0.0, 0.1).is_ok());
        assert!(AdverseCondition::new("c", 1.0, 0.1).is_ok());

        let err = AdverseCondition::new("c", 1.5, 0.1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidProbability { .. }));

        let err = AdverseCondition::new("c", -0.1, 0.1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidProbability { .. }));
    }

    #[test]
    fn test_nan_probability_rejected() {
        let err = AdverseCondition::new("c", f64::NAN, 0.1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidProbability { .. }));
    }

    #[test]
    fn test_non_finite_impact_rejected() {
        let err = AdverseCondition::new("c", 0.5, f64::INFINITY).unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteImpact { .. }));
    }

    #[test]
    fn test_weight_map_kept() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1.0);
        map.insert("b".to_string(), 0.5);
        let c = AdverseCondition::with_impacts("c", 0.2, -0.1, Some(map)).unwrap();
        assert_eq!(c.variable_impacts().unwrap().len(), 2);
    }

    #[test]
    fn test_weight_map_nan_rejected() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), f64::NAN);
        let err = AdverseCondition::with_impacts("c", 0.2, -0.1, Some(map)).unwrap_err();
        assert!(matches!(err, ValidationError::NonFiniteImpact { .. }));
    }
}
