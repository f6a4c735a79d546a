#![doc = include_str!("../README.md")]

//! Stability of the leading eight under assessment, implementation and
//! perception error.
//!
//! The crate turns an error sweep of equilibrium records into per-slice
//! stability margins, a theoretical error-threshold curve, an empirical
//! boundary line and a margin/verdict agreement summary.

pub mod agreement;
pub mod analysis;
pub mod boundary;
pub mod config;
pub mod grid;
pub mod margin;
pub mod propagator;
pub mod threshold;

pub use agreement::AgreementSummary;
pub use analysis::{analyze, analyze_json, AnalysisError, AnalysisReport, SliceReport};
pub use boundary::{
    extract_boundary, BoundaryCurve, BoundaryPoint, EmpiricalBoundary, GridPoint, GridScale,
    LinearFit, MarginGrid, BOUNDARY_TOLERANCE, MAX_GRID_CELLS,
};
pub use config::{validate_config, AnalysisConfig, ConfigValidationError};
pub use grid::{evaluate_slice, partition_records, NormSlice, StabilityGridPoint, StabilityRecord};
pub use margin::{norm_margin, stability_margin, Stability, StabilityCounts};
pub use propagator::{perceived_cooperation, PerceivedCooperation};
pub use threshold::ThresholdSolver;
