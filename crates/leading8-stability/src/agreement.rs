use serde::{Deserialize, Serialize};

use crate::grid::StabilityGridPoint;
use crate::margin::Stability;

/// Default half-width of the band around zero in which a disagreement with
/// the search's verdict is treated as rounding noise.
pub const AGREEMENT_BAND: f64 = 1e-2;

/// How well recomputed margins match the stored equilibrium verdicts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementSummary {
    pub total: usize,
    pub agreeing: usize,
    /// Disagreements with `|margin| < band`.
    pub near_boundary: usize,
    /// Disagreements outside the band.
    pub off_band: usize,
}

impl AgreementSummary {
    /// Compare `margin > 0` against `is_nash` for every point.
    pub fn tally(points: &[StabilityGridPoint], band: f64) -> Self {
        let mut summary = Self::default();
        for point in points {
            summary.total += 1;
            if (point.margin > 0.0) == point.is_nash {
                summary.agreeing += 1;
            } else if Stability::classify(point.margin, band) == Stability::Boundary {
                summary.near_boundary += 1;
            } else {
                summary.off_band += 1;
            }
        }
        summary
    }

    pub fn disagreements(&self) -> usize {
        self.near_boundary + self.off_band
    }
}
