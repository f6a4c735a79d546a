//! Error propagation from intended cooperation to assigned reputation.
//!
//! Three noise channels act in a fixed order:
//! 1. assessment error scrambles each party's intent into a raw judgement;
//! 2. perception error lets the mutant's action be read as the resident's;
//! 3. implementation error blends the resident's standing back toward the
//!    mutant's.
//!
//! Swapping steps 2 and 3 changes the sign pattern of the stability margin
//! near the boundary, so the order is part of the contract.

use leading8_norms::{check_probability, DomainError, ErrorParameters};
use serde::{Deserialize, Serialize};

/// Perceived cooperativeness after all three noise channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceivedCooperation {
    /// `RC`: how cooperative the resident appears.
    pub resident: f64,
    /// `RD`: how cooperative the mutant appears.
    pub mutant: f64,
}

impl PerceivedCooperation {
    /// `RC - RD`, the reputational edge of the resident.
    pub fn gap(&self) -> f64 {
        self.resident - self.mutant
    }
}

/// Propagate the resident's intent `own_intent` (X) and the mutant's intent
/// `observed_intent` (Y) through assessment, perception and implementation
/// error.
///
/// # Errors
/// [`DomainError::ProbabilityOutOfRange`] if an intent or rate leaves `[0, 1]`.
pub fn perceived_cooperation(
    own_intent: f64,
    observed_intent: f64,
    errors: &ErrorParameters,
) -> Result<PerceivedCooperation, DomainError> {
    check_probability("resident intent", own_intent)?;
    check_probability("mutant intent", observed_intent)?;
    errors.validate()?;

    let mu = errors.assessment;
    let mut rc = (1.0 - mu) * own_intent + mu * (1.0 - own_intent);
    let mut rd = (1.0 - mu) * observed_intent + mu * (1.0 - observed_intent);

    let e = errors.perception;
    rd = (1.0 - e) * rd + e * rc;

    let me = errors.implementation;
    rc = (1.0 - me) * rc + me * rd;

    Ok(PerceivedCooperation {
        resident: rc,
        mutant: rd,
    })
}
