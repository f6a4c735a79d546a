//! Stability boundaries as point sets and straight-line fits.
//!
//! The theoretical boundary comes from [`crate::threshold`]; the empirical
//! one is read off a computed [`MarginGrid`] by collecting the cells whose
//! margin is within a tolerance of zero and fitting a least-squares line
//! through them.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default `|margin|` below which a grid cell counts as on the boundary.
pub const BOUNDARY_TOLERANCE: f64 = 8e-4;

/// A point in (implementation error, perception error) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub implementation_error: f64,
    pub perception_error: f64,
}

impl BoundaryPoint {
    pub fn to_grid(&self, scale: &GridScale) -> GridPoint {
        GridPoint {
            x: scale.to_grid(self.implementation_error),
            y: scale.to_grid(self.perception_error),
        }
    }
}

/// Ordered sequence of boundary points; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryCurve {
    pub points: Vec<BoundaryPoint>,
}

impl BoundaryCurve {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn to_grid(&self, scale: &GridScale) -> Vec<GridPoint> {
        self.points.iter().map(|p| p.to_grid(scale)).collect()
    }

    /// Drop points whose implementation error lies outside `[0, span]`.
    /// The perception coordinate is a sweep value and is kept as is.
    pub fn clipped_to(&self, span: f64) -> BoundaryCurve {
        BoundaryCurve {
            points: self
                .points
                .iter()
                .copied()
                .filter(|p| (0.0..=span).contains(&p.implementation_error))
                .collect(),
        }
    }
}

/// Mapping from error values to the rendered grid's cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridScale {
    /// Error value at the far edge of the grid.
    pub span: f64,
    /// Number of cells along each axis.
    pub cells: u32,
}

impl Default for GridScale {
    fn default() -> Self {
        Self {
            span: 0.1,
            cells: 50,
        }
    }
}

impl GridScale {
    pub fn factor(&self) -> f64 {
        f64::from(self.cells) / self.span
    }

    pub fn to_grid(&self, value: f64) -> f64 {
        value * self.factor()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

/// `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least-squares line through `(x, y)` pairs.
    ///
    /// Returns `None` for fewer than two points or when every `x` is the
    /// same, since no function `y(x)` passes through a vertical set.
    pub fn least_squares(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for &(x, y) in points {
            let dx = x - mean_x;
            sxx += dx * dx;
            sxy += dx * (y - mean_y);
        }
        if sxx <= f64::EPSILON * f64::EPSILON * n {
            return None;
        }
        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The same line with both axes multiplied by the grid factor. The slope
    /// is unchanged and the intercept scales.
    pub fn to_grid(&self, scale: &GridScale) -> LinearFit {
        LinearFit {
            slope: self.slope,
            intercept: self.intercept * scale.factor(),
        }
    }
}

/// Upper bound on `rows * cols` of a [`MarginGrid`] built by the analysis.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Margins of one slice over a perception x implementation lattice.
///
/// `margins[row][col]` belongs to `perception_errors[row]` and
/// `implementation_errors[col]`. Cells without a record hold NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginGrid {
    pub perception_errors: Vec<f64>,
    pub implementation_errors: Vec<f64>,
    pub margins: Vec<Vec<f64>>,
}

impl MarginGrid {
    /// A grid of the given axes with every cell missing.
    ///
    /// The lattice is dense: this allocates `rows * cols` cells however few
    /// records the axes came from. Callers holding untrusted axes should
    /// check them against [`MAX_GRID_CELLS`] first.
    pub fn empty(perception_errors: Vec<f64>, implementation_errors: Vec<f64>) -> Self {
        let row = vec![f64::NAN; implementation_errors.len()];
        let margins = vec![row; perception_errors.len()];
        Self {
            perception_errors,
            implementation_errors,
            margins,
        }
    }

    pub fn rows(&self) -> usize {
        self.perception_errors.len()
    }

    pub fn cols(&self) -> usize {
        self.implementation_errors.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.margins.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Number of cells that carry a margin.
    pub fn filled(&self) -> usize {
        self.margins
            .iter()
            .flatten()
            .filter(|m| !m.is_nan())
            .count()
    }
}

/// Near-zero cells of a margin grid and the line through them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmpiricalBoundary {
    pub points: Vec<BoundaryPoint>,
    pub fit: Option<LinearFit>,
}

/// Collect cells with `|margin| < tolerance` in row-major order and fit a
/// line `perception = slope * implementation + intercept` through them.
///
/// Missing cells (NaN) never qualify. No extrapolation is attempted: with
/// fewer than two qualifying cells, or all of them in one column, the fit is
/// absent.
pub fn extract_boundary(grid: &MarginGrid, tolerance: f64) -> EmpiricalBoundary {
    let mut points = Vec::new();
    for (row, &perception) in grid.perception_errors.iter().enumerate() {
        let Some(margins) = grid.margins.get(row) else {
            continue;
        };
        for (&implementation, &margin) in grid.implementation_errors.iter().zip(margins) {
            if margin.abs() < tolerance {
                points.push(BoundaryPoint {
                    implementation_error: implementation,
                    perception_error: perception,
                });
            }
        }
    }

    let pairs: Vec<(f64, f64)> = points
        .iter()
        .map(|p| (p.implementation_error, p.perception_error))
        .collect();
    let fit = LinearFit::least_squares(&pairs);
    if fit.is_none() {
        debug!(
            selected = points.len(),
            tolerance, "empirical boundary has no line fit"
        );
    }
    EmpiricalBoundary { points, fit }
}
