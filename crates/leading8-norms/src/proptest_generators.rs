//! Proptest strategies for the model's validated parameter types.

use proptest::prelude::*;

use crate::norm::Norm;
use crate::params::{ErrorParameters, GameParameters};

/// A probability in `[0, 1]`, with the interval ends drawn explicitly now
/// and then since most formulas degenerate there.
pub fn arb_probability() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        1 => Just(1.0),
        8 => 0.0f64..=1.0,
    ]
}

/// Population composition `h`.
pub fn arb_composition() -> impl Strategy<Value = f64> {
    arb_probability()
}

/// Error rates anywhere in the unit cube.
pub fn arb_error_parameters() -> impl Strategy<Value = ErrorParameters> {
    (arb_probability(), arb_probability(), arb_probability()).prop_map(
        |(assessment, implementation, perception)| ErrorParameters {
            assessment,
            implementation,
            perception,
        },
    )
}

/// Error rates restricted to the low-noise regime studied in practice
/// (every rate below `max`).
pub fn arb_small_error_parameters(max: f64) -> impl Strategy<Value = ErrorParameters> {
    (0.0..=max, 0.0..=max, 0.0..=max).prop_map(|(assessment, implementation, perception)| {
        ErrorParameters {
            assessment,
            implementation,
            perception,
        }
    })
}

/// A donation game with `cost` in `[0.05, 1]` and `b / c` in `(1, 10]`.
pub fn arb_game_parameters() -> impl Strategy<Value = GameParameters> {
    (0.05f64..=1.0, 1.001f64..=10.0).prop_map(|(cost, ratio)| GameParameters {
        benefit: cost * ratio,
        cost,
    })
}

pub fn arb_norm() -> impl Strategy<Value = Norm> {
    proptest::sample::select(Norm::ALL.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_parameters_are_valid(
            game in arb_game_parameters(),
            errors in arb_error_parameters(),
            small in arb_small_error_parameters(0.1),
            _norm in arb_norm(),
        ) {
            prop_assert!(game.validate().is_ok(), "{game:?}");
            prop_assert!(errors.validate().is_ok(), "{errors:?}");
            prop_assert!(small.validate().is_ok());
            for rate in [small.assessment, small.implementation, small.perception] {
                prop_assert!(rate <= 0.1, "{small:?}");
            }
        }
    }
}
