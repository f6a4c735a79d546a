#![doc = include_str!("../README.md")]

//! Leading-eight norms and their closed-form payoff model.
//!
//! This crate defines the eight reputation norms, their assessment and action
//! rule tables, the validated error and game parameter types, and the
//! discounted-utility formula of every norm under assessment, implementation
//! and perception error.

pub mod norm;
pub mod params;
pub mod payoff;
#[cfg(any(test, feature = "proptest"))]
pub mod proptest_generators;
pub mod rules;

pub use norm::{Norm, NormLookupError};
pub use params::{check_probability, DomainError, ErrorParameters, GameParameters};
pub use payoff::{discounted_utility, utility_ratio, UtilityRatio};
