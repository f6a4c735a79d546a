//! Reputation-assignment and action rule tables.
//!
//! A norm is a pair of an assessment rule (who is judged good after acting
//! toward whom) and an action rule (whom to help). Deterministic rules are
//! identified by bit-packed integers: bit `i` is set when table entry `i`
//! equals one.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::ErrorParameters;

/// Binary reputation held by an individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reputation {
    Bad = 0,
    Good = 1,
}

/// Action taken by a donor toward a recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Defect = 0,
    Cooperate = 1,
}

impl fmt::Display for Reputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Reputation::Bad => "B",
            Reputation::Good => "G",
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Defect => "D",
            Action::Cooperate => "C",
        })
    }
}

const REPUTATIONS: [Reputation; 2] = [Reputation::Bad, Reputation::Good];

fn is_binary(p: f64) -> bool {
    p == 0.0 || p == 1.0
}

fn pack_bits(entries: &[f64]) -> Option<u32> {
    if !entries.iter().all(|&p| is_binary(p)) {
        return None;
    }
    Some(
        entries
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == 1.0)
            .fold(0u32, |id, (i, _)| id | (1 << i)),
    )
}

fn unpack_bits<const N: usize>(id: u32) -> [f64; N] {
    let mut entries = [0.0; N];
    for (i, entry) in entries.iter_mut().enumerate() {
        if (id >> i) & 1 == 1 {
            *entry = 1.0;
        }
    }
    entries
}

/// Cooperation probability for every (donor, recipient) reputation pair.
///
/// Entries are ordered `BB, BG, GB, GG` (donor first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionRule {
    coop: [f64; 4],
}

impl ActionRule {
    pub const ALLD: Self = Self::new([0.0, 0.0, 0.0, 0.0]);
    pub const ALLC: Self = Self::new([1.0, 1.0, 1.0, 1.0]);
    /// Discriminator: help good recipients only.
    pub const DISC: Self = Self::new([0.0, 1.0, 0.0, 1.0]);

    pub const fn new(coop: [f64; 4]) -> Self {
        Self { coop }
    }

    fn index(donor: Reputation, recipient: Reputation) -> usize {
        donor as usize * 2 + recipient as usize
    }

    pub fn cooperation(&self, donor: Reputation, recipient: Reputation) -> f64 {
        self.coop[Self::index(donor, recipient)]
    }

    pub fn entries(&self) -> [f64; 4] {
        self.coop
    }

    pub fn is_deterministic(&self) -> bool {
        self.coop.iter().all(|&p| is_binary(p))
    }

    /// Bit-packed identifier in `0..16`, or `None` for a stochastic rule.
    pub fn id(&self) -> Option<u8> {
        pack_bits(&self.coop).map(|id| id as u8)
    }

    /// The deterministic rule with the given identifier, if it is below 16.
    pub fn deterministic(id: u8) -> Option<Self> {
        (id < 16).then(|| Self::new(unpack_bits(u32::from(id))))
    }

    /// Intended cooperation only succeeds with probability `1 - mu_e`.
    pub fn with_implementation_error(&self, implementation_error: f64) -> Self {
        Self::new(self.coop.map(|p| p * (1.0 - implementation_error)))
    }
}

/// Probability of assigning a good reputation for every
/// (donor, recipient, action) triple.
///
/// Entries are ordered `BBD, BBC, BGD, BGC, GBD, GBC, GGD, GGC`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRule {
    good: [f64; 8],
}

impl AssessmentRule {
    pub const ALL_GOOD: Self = Self::new([1.0; 8]);
    pub const ALL_BAD: Self = Self::new([0.0; 8]);
    pub const IMAGE_SCORING: Self = Self::new([0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);

    pub const fn new(good: [f64; 8]) -> Self {
        Self { good }
    }

    fn index(donor: Reputation, recipient: Reputation, action: Action) -> usize {
        donor as usize * 4 + recipient as usize * 2 + action as usize
    }

    pub fn good_probability(
        &self,
        donor: Reputation,
        recipient: Reputation,
        action: Action,
    ) -> f64 {
        self.good[Self::index(donor, recipient, action)]
    }

    pub fn entries(&self) -> [f64; 8] {
        self.good
    }

    pub fn is_deterministic(&self) -> bool {
        self.good.iter().all(|&p| is_binary(p))
    }

    /// Bit-packed identifier in `0..256`, or `None` for a stochastic rule.
    pub fn id(&self) -> Option<u8> {
        pack_bits(&self.good).map(|id| id as u8)
    }

    pub fn deterministic(id: u8) -> Self {
        Self::new(unpack_bits(u32::from(id)))
    }

    /// Apply assessment error, then let defections be perceived as the
    /// matching cooperation with probability `perception_error`.
    pub fn with_errors(&self, assessment_error: f64, perception_error: f64) -> Self {
        let mut good = self
            .good
            .map(|g| (1.0 - assessment_error) * g + assessment_error * (1.0 - g));
        for pair in good.chunks_exact_mut(2) {
            pair[0] = (1.0 - perception_error) * pair[0] + perception_error * pair[1];
        }
        Self::new(good)
    }
}

/// Assessment rule and action rule of a single norm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRules {
    pub assessment: AssessmentRule,
    pub action: ActionRule,
}

impl NormRules {
    /// Number of distinct deterministic norms (`2^8` assessments times `2^4` actions).
    pub const DETERMINISTIC_COUNT: u32 = 1 << 12;

    pub const fn new(assessment: AssessmentRule, action: ActionRule) -> Self {
        Self { assessment, action }
    }

    /// `assessment_id << 4 | action_id`, or `None` if either rule is stochastic.
    pub fn id(&self) -> Option<u32> {
        let assessment = self.assessment.id()?;
        let action = self.action.id()?;
        Some((u32::from(assessment) << 4) | u32::from(action))
    }

    pub fn from_id(id: u32) -> Option<Self> {
        if id >= Self::DETERMINISTIC_COUNT {
            return None;
        }
        let assessment = AssessmentRule::deterministic(((id >> 4) & 0xFF) as u8);
        let action = ActionRule::deterministic((id & 0xF) as u8)?;
        Some(Self::new(assessment, action))
    }

    /// Rules as experienced under the given noise: assessment and perception
    /// errors act on the assessment table, implementation error on actions.
    pub fn with_errors(&self, errors: &ErrorParameters) -> Self {
        Self::new(
            self.assessment
                .with_errors(errors.assessment, errors.perception),
            self.action.with_implementation_error(errors.implementation),
        )
    }
}

impl fmt::Display for NormRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id() {
            Some(id) => writeln!(f, "Norm {id}:")?,
            None => writeln!(f, "Norm (stochastic):")?,
        }
        for donor in REPUTATIONS {
            for recipient in REPUTATIONS {
                writeln!(
                    f,
                    "  ({donor} -> {recipient}) P(C)={} R(C)={} R(D)={}",
                    self.action.cooperation(donor, recipient),
                    self.assessment
                        .good_probability(donor, recipient, Action::Cooperate),
                    self.assessment
                        .good_probability(donor, recipient, Action::Defect),
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    use super::Action::{Cooperate as C, Defect as D};
    use super::Reputation::{Bad as B, Good as G};

    #[test]
    fn discriminator_lookup_and_id() {
        let disc = ActionRule::new([0.0, 1.0, 0.0, 1.0]);
        assert_eq!(disc.cooperation(G, G), 1.0);
        assert_eq!(disc.cooperation(G, B), 0.0);
        assert!(disc.is_deterministic());
        assert_eq!(disc.id(), Some(10));
        assert_eq!(disc, ActionRule::DISC);
    }

    #[test]
    fn deterministic_action_rules() {
        assert_eq!(ActionRule::deterministic(0), Some(ActionRule::ALLD));
        assert_eq!(ActionRule::deterministic(15), Some(ActionRule::ALLC));
        assert_eq!(ActionRule::deterministic(16), None);
        assert_ne!(ActionRule::ALLD, ActionRule::ALLC);
        for id in 0..16 {
            assert_eq!(ActionRule::deterministic(id).unwrap().id(), Some(id));
        }
    }

    #[test]
    fn stochastic_rules_have_no_id() {
        let noisy = ActionRule::DISC.with_implementation_error(0.05);
        assert!(!noisy.is_deterministic());
        assert_eq!(noisy.id(), None);
        assert_relative_eq!(noisy.cooperation(G, G), 0.95);
    }

    #[test]
    fn image_scoring_table() {
        let rule = AssessmentRule::IMAGE_SCORING;
        assert_eq!(rule.good_probability(G, G, C), 1.0);
        assert_eq!(rule.good_probability(G, B, D), 0.0);
        assert_eq!(rule.id(), Some(170));
        assert_eq!(AssessmentRule::deterministic(255), AssessmentRule::ALL_GOOD);
        assert_eq!(AssessmentRule::deterministic(0), AssessmentRule::ALL_BAD);
    }

    #[test]
    fn assessment_error_flips_judgements() {
        let rule = AssessmentRule::IMAGE_SCORING.with_errors(0.1, 0.0);
        assert_relative_eq!(rule.good_probability(G, G, C), 0.9);
        assert_relative_eq!(rule.good_probability(G, B, D), 0.1);
    }

    #[test]
    fn perception_error_only_touches_defections() {
        let rule = AssessmentRule::IMAGE_SCORING.with_errors(0.0, 0.1);
        assert_eq!(rule.good_probability(G, G, C), 1.0);
        assert_relative_eq!(rule.good_probability(G, B, D), 0.1);
    }

    #[test]
    fn assessment_then_perception() {
        let rule = AssessmentRule::IMAGE_SCORING.with_errors(0.1, 0.1);
        assert_relative_eq!(rule.good_probability(G, G, C), 0.9);
        assert_relative_eq!(
            rule.good_probability(G, B, D),
            2.0 * 0.1 * 0.9,
            epsilon = 1e-15
        );
    }

    #[test]
    fn norm_id_round_trip() {
        let rules = NormRules::new(AssessmentRule::IMAGE_SCORING, ActionRule::DISC);
        assert_eq!(rules.id(), Some(0b1010_1010_1010));
        let rebuilt = NormRules::from_id(0b1010_1010_1010).unwrap();
        assert_eq!(rebuilt, rules);
        assert_eq!(NormRules::from_id(NormRules::DETERMINISTIC_COUNT), None);
    }

    #[test]
    fn norm_with_errors_rescales_both_tables() {
        let rules = NormRules::new(AssessmentRule::IMAGE_SCORING, ActionRule::DISC);
        let errors = ErrorParameters::new(0.1, 0.05, 0.0).unwrap();
        let noisy = rules.with_errors(&errors);
        assert_relative_eq!(noisy.action.cooperation(G, G), 0.95);
        assert_relative_eq!(noisy.assessment.good_probability(G, G, C), 0.9);
        assert_eq!(noisy.id(), None);
    }

    #[test]
    fn display_lists_all_contexts() {
        let rules = NormRules::new(AssessmentRule::IMAGE_SCORING, ActionRule::DISC);
        let text = rules.to_string();
        assert!(text.starts_with("Norm 2730:"));
        assert!(text.contains("(G -> B) P(C)=0"));
        assert_eq!(text.lines().count(), 5);
    }
}
