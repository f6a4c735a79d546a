use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::rules::{ActionRule, AssessmentRule, NormRules};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormLookupError {
    #[error("norm order must be in 1..=8, got {0}")]
    UnknownOrder(u8),
    #[error("norm id {0} is not one of the leading eight")]
    UnknownId(u32),
    #[error("unknown norm label '{0}'; expected L1..L8")]
    UnknownLabel(String),
}

/// One of the eight second-order norms that sustain cooperation under
/// indirect reciprocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Norm {
    L1,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7,
    L8,
}

/// Action rule shared by L1 and L2: also help bad recipients while bad.
const L1_L2_ACTION: ActionRule = ActionRule::new([1.0, 1.0, 0.0, 1.0]);

impl Norm {
    pub const ALL: [Norm; 8] = [
        Norm::L1,
        Norm::L2,
        Norm::L3,
        Norm::L4,
        Norm::L5,
        Norm::L6,
        Norm::L7,
        Norm::L8,
    ];

    /// Position in the canonical L1..L8 ordering, starting at 1.
    pub fn order(self) -> u8 {
        self as u8 + 1
    }

    pub fn from_order(order: u8) -> Result<Self, NormLookupError> {
        order
            .checked_sub(1)
            .and_then(|i| Self::ALL.get(usize::from(i)).copied())
            .ok_or(NormLookupError::UnknownOrder(order))
    }

    pub fn rules(self) -> NormRules {
        let assessment = match self {
            Norm::L1 => [0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0],
            Norm::L2 => [0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
            Norm::L3 => [1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0],
            Norm::L4 => [1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0],
            Norm::L5 => [1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
            Norm::L6 => [1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
            Norm::L7 => [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 1.0],
            Norm::L8 => [0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0],
        };
        let action = match self {
            Norm::L1 | Norm::L2 => L1_L2_ACTION,
            _ => ActionRule::DISC,
        };
        NormRules::new(AssessmentRule::new(assessment), action)
    }

    /// Bit-packed norm identifier as used in the swept grids (L3 is 3002).
    pub fn id(self) -> u32 {
        // The leading-eight tables are deterministic, so an id always exists.
        self.rules().id().unwrap_or_default()
    }

    pub fn from_id(id: u32) -> Result<Self, NormLookupError> {
        Self::ALL
            .into_iter()
            .find(|norm| norm.id() == id)
            .ok_or(NormLookupError::UnknownId(id))
    }

    /// L3 and L6 keep a discounted utility of exactly `b` under any noise.
    pub fn is_error_invariant(self) -> bool {
        matches!(self, Norm::L3 | Norm::L6)
    }

    pub fn label(self) -> &'static str {
        match self {
            Norm::L1 => "L1",
            Norm::L2 => "L2",
            Norm::L3 => "L3",
            Norm::L4 => "L4",
            Norm::L5 => "L5",
            Norm::L6 => "L6",
            Norm::L7 => "L7",
            Norm::L8 => "L8",
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Norm {
    type Err = NormLookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|norm| norm.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| NormLookupError::UnknownLabel(trimmed.to_string()))
    }
}
