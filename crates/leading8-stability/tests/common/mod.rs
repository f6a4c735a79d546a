#![allow(dead_code)]

use leading8_norms::{ErrorParameters, GameParameters, Norm};
use leading8_stability::{norm_margin, StabilityRecord};

/// Sweep values `0, step, 2 step, ..., (n - 1) step`.
pub fn sweep_axis(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|i| i as f64 * step).collect()
}

/// The 51-point sweep over `[0, 0.1]` used for the published grids.
pub fn standard_axis() -> Vec<f64> {
    sweep_axis(51, 0.002)
}

/// Full perception x implementation sweep for every norm at each assessment
/// error, with `isNash` set from the recomputed margin.
pub fn synthetic_sweep(
    game: &GameParameters,
    assessment_errors: &[f64],
    h: f64,
) -> Vec<StabilityRecord> {
    let axis = standard_axis();
    let mut records = Vec::new();
    for norm in Norm::ALL {
        for &mu in assessment_errors {
            for &e in &axis {
                for &me in &axis {
                    let errors = ErrorParameters::new(mu, me, e).unwrap();
                    let margin = norm_margin(norm, game, h, &errors).unwrap();
                    records.push(StabilityRecord {
                        norm_id: norm.id(),
                        assessment_error: mu,
                        perception_error: e,
                        implementation_error: me,
                        h,
                        is_nash: margin > 0.0,
                    });
                }
            }
        }
    }
    records
}
