//! Random variable definitions.
//!
//! A [`RandomVariable`] pairs a name with a marginal [`Distribution`].
//! Variables are validated at construction and immutable for the life of a
//! simulation run.

use crate::error::ValidationError;

/// Marginal probability distribution of a scenario variable.
///
/// Non-normal marginals are realised by transforming a correlated standard
/// normal draw (probability integral transform for `Uniform`,
/// exponentiation for `LogNormal`). This preserves rank correlation but
/// not exact Pearson correlation after the transform — a documented
/// modelling approximation, kept deliberately.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    /// Normal distribution with the given mean and standard deviation.
    Normal {
        /// Mean of the distribution.
        mean: f64,
        /// Standard deviation (must be >= 0).
        std_dev: f64,
    },
    /// Log-normal distribution parameterised by the underlying normal.
    LogNormal {
        /// Mean of the underlying normal (log-space).
        location: f64,
        /// Standard deviation of the underlying normal (must be >= 0).
        scale: f64,
    },
    /// Uniform distribution on [low, high].
    Uniform {
        /// Lower bound.
        low: f64,
        /// Upper bound (must be >= low).
        high: f64,
    },
}

impl Distribution {
    /// Validates the distribution parameters for the named variable.
    fn validate(&self, name: &str) -> Result<(), ValidationError> {
        match *self {
            Distribution::Normal { mean, std_dev } => {
                if !mean.is_finite() {
                    return Err(ValidationError::NonFiniteParameter {
                        variable: name.to_string(),
                        parameter: "mean",
                    });
                }
                if !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(ValidationError::InvalidDispersion {
                        variable: name.to_string(),
                        value: std_dev,
                    });
                }
            }
            Distribution::LogNormal { location, scale } => {
                if !location.is_finite() {
                    return Err(ValidationError::NonFiniteParameter {
                        variable: name.to_string(),
                        parameter: "location",
                    });
                }
                if !scale.is_finite() || scale < 0.0 {
                    return Err(ValidationError::InvalidDispersion {
                        variable: name.to_string(),
                        value: scale,
                    });
                }
            }
            Distribution::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    return Err(ValidationError::NonFiniteParameter {
                        variable: name.to_string(),
                        parameter: "bounds",
                    });
                }
                if low > high {
                    return Err(ValidationError::InvalidBounds {
                        variable: name.to_string(),
                        low,
                        high,
                    });
                }
            }
        }
        Ok(())
    }

    /// Mean of the distribution in value space.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Normal { mean, .. } => mean,
            Distribution::LogNormal { location, scale } => (location + 0.5 * scale * scale).exp(),
            Distribution::Uniform { low, high } => 0.5 * (low + high),
        }
    }
}

/// A named scenario variable with a marginal distribution.
///
/// # Examples
/// ```
/// use simrisk_core::{Distribution, RandomVariable};
///
/// let revenue = RandomVariable::new(
///     "revenue",
///     Distribution::Normal { mean: 100.0, std_dev: 10.0 },
/// ).unwrap();
/// assert_eq!(revenue.name(), "revenue");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomVariable {
    name: String,
    distribution: Distribution,
}

impl RandomVariable {
    /// Creates a validated variable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if any distribution parameter is
    /// non-finite, a dispersion parameter is negative, or uniform bounds
    /// are inverted.
    pub fn new(
        name: impl Into<String>,
        distribution: Distribution,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        distribution.validate(&name)?;
        Ok(Self { name, distribution })
    }

    /// Convenience constructor for a normal variable.
    pub fn normal(name: impl Into<String>, mean: f64, std_dev: f64) -> Result<Self, ValidationError> {
        Self::new(name, Distribution::Normal { mean, std_dev })
    }

    /// The variable's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The variable's marginal distribution.
    #[inline]
    pub fn distribution(&self) -> Distribution {
        self.distribution
    }
}
