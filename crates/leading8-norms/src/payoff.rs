//! Closed-form discounted utilities of the leading eight under noise.
//!
//! Each norm's long-run payoff multiplier is a ratio `numerator / denominator`
//! in the benefit `b`, cost `c`, population composition `h` and the three
//! error rates. Errors attenuate or amplify the multiplier through the
//! denominator; L3 and L6 are insensitive to every error source.
//!
//! The per-norm formulas stay inside the crate. Callers evaluate them through
//! [`utility_ratio`] or [`discounted_utility`], which validate every input
//! first:
//!
//! ```compile_fail
//! use leading8_norms::Norm;
//!
//! let _ = Norm::L1.utility_formula();
//! ```

use serde::{Deserialize, Serialize};

use crate::norm::Norm;
use crate::params::{check_probability, DomainError, ErrorParameters, GameParameters};

/// Arguments shared by every utility formula.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UtilityInputs {
    pub benefit: f64,
    pub cost: f64,
    pub h: f64,
    pub assessment: f64,
    pub implementation: f64,
    pub perception: f64,
}

impl UtilityInputs {
    /// `(1 - h)(1 - 2 mu)`, the weight every error-dependent denominator shares.
    fn persistence(&self) -> f64 {
        (1.0 - self.h) * (1.0 - 2.0 * self.assessment)
    }

    /// `b h + c (1 - h)`, the numerator of L1 and L2.
    fn mixed_payoff(&self) -> f64 {
        self.benefit * self.h + self.cost * (1.0 - self.h)
    }
}

/// Unevaluated `numerator / denominator` pair of a discounted utility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityRatio {
    pub numerator: f64,
    pub denominator: f64,
}

impl UtilityRatio {
    fn new(numerator: f64, denominator: f64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// Formula for a single norm.
pub(crate) type UtilityFormula = fn(&UtilityInputs) -> UtilityRatio;

fn l1(p: &UtilityInputs) -> UtilityRatio {
    let den = 1.0 - p.persistence() * p.implementation * (1.0 - p.perception);
    UtilityRatio::new(p.mixed_payoff(), den)
}

fn l2(p: &UtilityInputs) -> UtilityRatio {
    let e = p.perception;
    let me = p.implementation;
    let den = 1.0 - p.persistence() * (me - e - me * e);
    UtilityRatio::new(p.mixed_payoff(), den)
}

fn error_invariant(p: &UtilityInputs) -> UtilityRatio {
    UtilityRatio::new(p.benefit, 1.0)
}

fn l4(p: &UtilityInputs) -> UtilityRatio {
    UtilityRatio::new(p.benefit, 1.0 - p.persistence() * p.perception)
}

fn l5(p: &UtilityInputs) -> UtilityRatio {
    UtilityRatio::new(p.benefit, 1.0 + p.persistence() * p.perception)
}

fn l7(p: &UtilityInputs) -> UtilityRatio {
    UtilityRatio::new(p.benefit, 1.0 - p.persistence())
}

fn l8(p: &UtilityInputs) -> UtilityRatio {
    UtilityRatio::new(p.benefit, 1.0 - p.persistence() * (1.0 - p.perception))
}

impl Norm {
    /// The norm's discounted-utility formula.
    pub(crate) fn utility_formula(self) -> UtilityFormula {
        match self {
            Norm::L1 => l1,
            Norm::L2 => l2,
            Norm::L3 | Norm::L6 => error_invariant,
            Norm::L4 => l4,
            Norm::L5 => l5,
            Norm::L7 => l7,
            Norm::L8 => l8,
        }
    }
}

/// Validate the full argument set and evaluate the raw ratio.
pub fn utility_ratio(
    norm: Norm,
    game: &GameParameters,
    h: f64,
    errors: &ErrorParameters,
) -> Result<UtilityRatio, DomainError> {
    game.validate()?;
    errors.validate()?;
    check_probability("population composition h", h)?;

    let inputs = UtilityInputs {
        benefit: game.benefit,
        cost: game.cost,
        h,
        assessment: errors.assessment,
        implementation: errors.implementation,
        perception: errors.perception,
    };
    Ok(norm.utility_formula()(&inputs))
}

/// Discounted utility (expected long-run payoff multiplier) of `norm`.
///
/// # Errors
/// [`DomainError`] for arguments outside their domain, and
/// [`DomainError::SingularUtility`] when the denominator vanishes.
pub fn discounted_utility(
    norm: Norm,
    game: &GameParameters,
    h: f64,
    errors: &ErrorParameters,
) -> Result<f64, DomainError> {
    let ratio = utility_ratio(norm, game, h, errors)?;
    if ratio.denominator.abs() < f64::EPSILON {
        return Err(DomainError::SingularUtility {
            norm,
            denominator: ratio.denominator,
        });
    }
    Ok(ratio.numerator / ratio.denominator)
}
