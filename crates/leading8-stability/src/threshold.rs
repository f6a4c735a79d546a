//! Theoretical error threshold of the ALLC-versus-discriminator condition.
//!
//! The simplified two-state stability condition
//!
//! ```text
//! 1 / [(1 - 2 mu)(1 - mu_e)(1 - e_DC)] = b / c
//! ```
//!
//! is linear in `1 - mu_e`, so its root in the implementation error is
//!
//! ```text
//! mu_e* = 1 - (c / b) / [(1 - 2 mu)(1 - e_DC)]
//! ```
//!
//! The closed form is used directly; nothing is solved symbolically at run time.

use leading8_norms::{check_probability, DomainError, GameParameters};
use tracing::debug;

use crate::boundary::{BoundaryCurve, BoundaryPoint};

/// Solver for the critical implementation error of a fixed donation game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSolver {
    benefit_cost_ratio: f64,
}

impl ThresholdSolver {
    pub fn new(game: &GameParameters) -> Result<Self, DomainError> {
        game.validate()?;
        Ok(Self {
            benefit_cost_ratio: game.benefit_cost_ratio(),
        })
    }

    pub fn benefit_cost_ratio(&self) -> f64 {
        self.benefit_cost_ratio
    }

    /// Real root `mu_e*` for the given assessment and perception error, or
    /// `None` when `(1 - 2 mu)(1 - e_DC)` vanishes and no root exists.
    ///
    /// The root is returned as is; it may lie outside `[0, 1]`.
    pub fn solve(&self, assessment: f64, perception: f64) -> Option<f64> {
        let attenuation = (1.0 - 2.0 * assessment) * (1.0 - perception);
        if attenuation.abs() < f64::EPSILON {
            return None;
        }
        let root = 1.0 - 1.0 / (self.benefit_cost_ratio * attenuation);
        root.is_finite().then_some(root)
    }

    /// `1 / [(1 - 2 mu)(1 - mu_e)(1 - e_DC)] - b / c`; zero on the threshold.
    pub fn residual(&self, assessment: f64, implementation: f64, perception: f64) -> f64 {
        1.0 / ((1.0 - 2.0 * assessment) * (1.0 - implementation) * (1.0 - perception))
            - self.benefit_cost_ratio
    }

    /// Threshold curve over a perception-error sweep.
    ///
    /// Points whose root falls outside `[0, 1]` are discarded rather than
    /// clamped, because no threshold exists at that error level. An empty
    /// curve means the slice has no theoretical boundary.
    ///
    /// # Errors
    /// [`DomainError::ProbabilityOutOfRange`] if `assessment` or any sweep
    /// value leaves `[0, 1]`.
    pub fn boundary(
        &self,
        assessment: f64,
        perception_sweep: &[f64],
    ) -> Result<BoundaryCurve, DomainError> {
        check_probability("assessment error", assessment)?;
        let mut points = Vec::with_capacity(perception_sweep.len());
        for &perception in perception_sweep {
            check_probability("perception error", perception)?;
            let Some(root) = self.solve(assessment, perception) else {
                continue;
            };
            if (0.0..=1.0).contains(&root) {
                points.push(BoundaryPoint {
                    implementation_error: root,
                    perception_error: perception,
                });
            }
        }
        if points.is_empty() {
            debug!(
                assessment,
                sweep_len = perception_sweep.len(), "no theoretical boundary in range"
            );
        }
        Ok(BoundaryCurve { points })
    }
}
