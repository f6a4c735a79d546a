use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::norm::Norm;

/// Precondition violations for the closed-form payoff and stability models.
///
/// The formulas are only meaningful inside the probability simplex and for a
/// net-beneficial donation game, so every entry point rejects inputs outside
/// that domain instead of clamping them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("benefit and cost must be positive and finite, got b={benefit}, c={cost}")]
    NonPositivePayoff { benefit: f64, cost: f64 },
    #[error("cooperation is not net beneficial: b={benefit} must exceed c={cost}")]
    CooperationNotBeneficial { benefit: f64, cost: f64 },
    #[error("discounted utility of {norm} is singular (denominator {denominator})")]
    SingularUtility { norm: Norm, denominator: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// Reject anything outside `[0, 1]`, NaN included.
pub fn check_probability(name: &'static str, value: f64) -> Result<f64, DomainError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(DomainError::ProbabilityOutOfRange { name, value })
    }
}

/// The three independent noise rates of the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorParameters {
    /// Assessment error `mu`: a norm misjudges an observed action.
    pub assessment: f64,
    /// Implementation error `mu_e`: an intended action fails to execute.
    pub implementation: f64,
    /// Perception error `e_DC`: an observer misperceives an executed action.
    pub perception: f64,
}

impl ErrorParameters {
    /// The error-free setting.
    pub const ZERO: Self = Self {
        assessment: 0.0,
        implementation: 0.0,
        perception: 0.0,
    };

    /// Construct validated error rates.
    ///
    /// # Returns
    /// The rates, or [`DomainError::ProbabilityOutOfRange`] naming the first
    /// offending rate.
    pub fn new(assessment: f64, implementation: f64, perception: f64) -> Result<Self, DomainError> {
        let params = Self {
            assessment,
            implementation,
            perception,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        check_probability("assessment error", self.assessment)?;
        check_probability("implementation error", self.implementation)?;
        check_probability("perception error", self.perception)?;
        Ok(())
    }

    pub fn with_implementation(self, implementation: f64) -> Self {
        Self {
            implementation,
            ..self
        }
    }

    pub fn with_perception(self, perception: f64) -> Self {
        Self { perception, ..self }
    }
}

/// Benefit and cost of a single donation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameParameters {
    pub benefit: f64,
    pub cost: f64,
}

impl GameParameters {
    /// Construct a validated donation game with `benefit > cost > 0`.
    pub fn new(benefit: f64, cost: f64) -> Result<Self, DomainError> {
        let params = Self { benefit, cost };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let finite = self.benefit.is_finite() && self.cost.is_finite();
        if !finite || self.benefit <= 0.0 || self.cost <= 0.0 {
            return Err(DomainError::NonPositivePayoff {
                benefit: self.benefit,
                cost: self.cost,
            });
        }
        if self.benefit <= self.cost {
            return Err(DomainError::CooperationNotBeneficial {
                benefit: self.benefit,
                cost: self.cost,
            });
        }
        Ok(())
    }

    /// `b / c`, always greater than one for a validated game.
    pub fn benefit_cost_ratio(&self) -> f64 {
        self.benefit / self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_parameters_accept_unit_interval_bounds() {
        assert!(ErrorParameters::new(0.0, 1.0, 0.5).is_ok());
        assert_eq!(
            ErrorParameters::new(0.0, 0.0, 0.0).unwrap(),
            ErrorParameters::ZERO
        );
    }

    #[test]
    fn error_parameters_reject_out_of_range_rates() {
        let err = ErrorParameters::new(0.1, 1.2, 0.0).unwrap_err();
        assert_eq!(
            err,
            DomainError::ProbabilityOutOfRange {
                name: "implementation error",
                value: 1.2
            }
        );
        assert!(ErrorParameters::new(-0.01, 0.0, 0.0).is_err());
        assert!(ErrorParameters::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn game_parameters_require_net_benefit() {
        assert!(GameParameters::new(1.0, 0.8).is_ok());
        assert!(matches!(
            GameParameters::new(0.8, 0.8),
            Err(DomainError::CooperationNotBeneficial { .. })
        ));
        assert!(matches!(
            GameParameters::new(1.0, 0.0),
            Err(DomainError::NonPositivePayoff { .. })
        ));
        assert!(matches!(
            GameParameters::new(f64::INFINITY, 1.0),
            Err(DomainError::NonPositivePayoff { .. })
        ));
    }

    #[test]
    fn benefit_cost_ratio() {
        let game = GameParameters::new(3.0, 1.5).unwrap();
        assert_eq!(game.benefit_cost_ratio(), 2.0);
    }

    #[test]
    fn builder_helpers_keep_other_rates() {
        let base = ErrorParameters::new(0.02, 0.0, 0.0).unwrap();
        let moved = base.with_implementation(0.05).with_perception(0.07);
        assert_eq!(moved.assessment, 0.02);
        assert_eq!(moved.implementation, 0.05);
        assert_eq!(moved.perception, 0.07);
    }
}
