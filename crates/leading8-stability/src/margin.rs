use leading8_norms::{discounted_utility, DomainError, ErrorParameters, GameParameters, Norm};
use serde::{Deserialize, Serialize};

use crate::propagator::perceived_cooperation;

/// Intent of a resident that always means to cooperate with good partners.
pub const RESIDENT_INTENT: f64 = 1.0;
/// Intent of the pure-defector mutant.
pub const DEFECTOR_INTENT: f64 = 0.0;

/// Net fitness advantage of the resident over an invading mutant:
/// `(RC - RD) * DU - c`.
///
/// Positive means cooperation resists invasion at this point; zero marks the
/// stability boundary.
///
/// # Errors
/// [`DomainError::NonFinite`] for a non-finite utility and
/// [`DomainError::NonPositive`] unless `cost` is positive and finite, on top
/// of the checks of [`perceived_cooperation`].
pub fn stability_margin(
    own_intent: f64,
    observed_intent: f64,
    errors: &ErrorParameters,
    discounted_utility: f64,
    cost: f64,
) -> Result<f64, DomainError> {
    if !discounted_utility.is_finite() {
        return Err(DomainError::NonFinite {
            name: "discounted utility",
            value: discounted_utility,
        });
    }
    if !(cost.is_finite() && cost > 0.0) {
        return Err(DomainError::NonPositive {
            name: "cost",
            value: cost,
        });
    }
    let perceived = perceived_cooperation(own_intent, observed_intent, errors)?;
    Ok(perceived.gap() * discounted_utility - cost)
}

/// Margin of `norm` against a pure defector at composition `h`.
pub fn norm_margin(
    norm: Norm,
    game: &GameParameters,
    h: f64,
    errors: &ErrorParameters,
) -> Result<f64, DomainError> {
    let du = discounted_utility(norm, game, h, errors)?;
    stability_margin(RESIDENT_INTENT, DEFECTOR_INTENT, errors, du, game.cost)
}

/// Sign class of a margin relative to a tolerance band around zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    Stable,
    Boundary,
    Unstable,
}

impl Stability {
    pub fn classify(margin: f64, tolerance: f64) -> Self {
        if margin.abs() < tolerance {
            Stability::Boundary
        } else if margin > 0.0 {
            Stability::Stable
        } else {
            Stability::Unstable
        }
    }
}

/// Number of margins in each [`Stability`] class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityCounts {
    pub stable: usize,
    pub boundary: usize,
    pub unstable: usize,
}

impl StabilityCounts {
    pub fn tally(margins: impl IntoIterator<Item = f64>, tolerance: f64) -> Self {
        let mut counts = Self::default();
        for margin in margins {
            match Stability::classify(margin, tolerance) {
                Stability::Stable => counts.stable += 1,
                Stability::Boundary => counts.boundary += 1,
                Stability::Unstable => counts.unstable += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.stable + self.boundary + self.unstable
    }
}
