//! End-to-end stability analysis of a leading-eight error sweep.
//!
//! For each (norm, assessment error) slice the pipeline recomputes the
//! stability margin of every record, reads the empirical boundary off the
//! margin grid, derives the theoretical threshold curve over the same
//! perception axis, and checks the recomputed margins against the stored
//! equilibrium verdicts.

use leading8_norms::{DomainError, Norm, NormLookupError};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::agreement::AgreementSummary;
use crate::boundary::{extract_boundary, GridPoint, LinearFit, MarginGrid, MAX_GRID_CELLS};
use crate::config::{validate_config, AnalysisConfig, ConfigValidationError};
use crate::grid::{evaluate_slice, partition_records, StabilityRecord};
use crate::margin::StabilityCounts;
use crate::threshold::ThresholdSolver;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    NormLookup(#[from] NormLookupError),
    #[error("invalid analysis config: {}", join_messages(.0))]
    InvalidConfig(Vec<ConfigValidationError>),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{norm} slice at mu = {assessment_error} needs {rows} x {cols} cells, limit {limit}")]
    GridTooLarge {
        norm: Norm,
        assessment_error: f64,
        rows: usize,
        cols: usize,
        limit: usize,
    },
}

fn join_messages(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Analysis results for one (norm, assessment error) slice.
///
/// Curves and fits are in grid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliceReport {
    pub norm: Norm,
    pub assessment_error: f64,
    pub margins: MarginGrid,
    /// Theoretical threshold; empty when no root lies in range.
    pub theoretical: Vec<GridPoint>,
    pub empirical: Vec<GridPoint>,
    /// Least-squares line through `empirical`, if one is defined.
    pub fit: Option<LinearFit>,
    /// Records per margin class at the boundary tolerance.
    pub stability: StabilityCounts,
    pub agreement: AgreementSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub benefit: f64,
    pub cost: f64,
    pub slices: Vec<SliceReport>,
}

impl AnalysisReport {
    pub fn slice(&self, norm: Norm, assessment_error: f64) -> Option<&SliceReport> {
        self.slices
            .iter()
            .find(|s| s.norm == norm && (s.assessment_error - assessment_error).abs() < 1e-12)
    }

    pub fn to_json_pretty(&self) -> Result<String, AnalysisError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Analyse every selected slice of `records`.
///
/// # Errors
/// - [`AnalysisError::InvalidConfig`] if `config` fails validation.
/// - [`AnalysisError::NormLookup`] for a record naming an unknown norm.
/// - [`AnalysisError::Domain`] for any out-of-range record value or a
///   singular utility; the whole analysis stops at the first one.
/// - [`AnalysisError::GridTooLarge`] for a slice whose axes would span more
///   than [`MAX_GRID_CELLS`] lattice cells.
pub fn analyze(
    records: &[StabilityRecord],
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let problems = validate_config(config);
    if !problems.is_empty() {
        return Err(AnalysisError::InvalidConfig(problems));
    }
    let game = config.game()?;
    let solver = ThresholdSolver::new(&game)?;
    let scale = config.grid;

    let slices = partition_records(records)?;
    info!(
        records = records.len(),
        slices = slices.len(), "partitioned stability records"
    );

    let mut reports = Vec::new();
    for slice in &slices {
        if !config.includes(slice.assessment_error) {
            continue;
        }
        let rows = slice.perception_errors.len();
        let cols = slice.implementation_errors.len();
        if rows.saturating_mul(cols) > MAX_GRID_CELLS {
            return Err(AnalysisError::GridTooLarge {
                norm: slice.norm,
                assessment_error: slice.assessment_error,
                rows,
                cols,
                limit: MAX_GRID_CELLS,
            });
        }

        let evaluation = evaluate_slice(slice, &game)?;
        let empirical = extract_boundary(&evaluation.grid, config.boundary_tolerance);
        let stability = StabilityCounts::tally(
            evaluation.points.iter().map(|p| p.margin),
            config.boundary_tolerance,
        );

        let mut theoretical = solver.boundary(slice.assessment_error, &slice.perception_errors)?;
        if config.clip_theoretical_to_span {
            theoretical = theoretical.clipped_to(scale.span);
        }

        let agreement = AgreementSummary::tally(&evaluation.points, config.agreement_band);
        if agreement.off_band > 0 {
            warn!(
                norm = %slice.norm,
                assessment_error = slice.assessment_error,
                off_band = agreement.off_band,
                total = agreement.total,
                "recomputed margins disagree with stored verdicts"
            );
        }

        info!(
            norm = %slice.norm,
            assessment_error = slice.assessment_error,
            cells = evaluation.grid.filled(),
            boundary_cells = empirical.points.len(),
            unstable = stability.unstable,
            theoretical_points = theoretical.len(),
            fitted = empirical.fit.is_some(),
            "analysed slice"
        );

        reports.push(SliceReport {
            norm: slice.norm,
            assessment_error: slice.assessment_error,
            margins: evaluation.grid,
            theoretical: theoretical.to_grid(&scale),
            empirical: empirical.points.iter().map(|p| p.to_grid(&scale)).collect(),
            fit: empirical.fit.map(|f| f.to_grid(&scale)),
            stability,
            agreement,
        });
    }

    Ok(AnalysisReport {
        benefit: game.benefit,
        cost: game.cost,
        slices: reports,
    })
}

/// Parse records and config from JSON text and run [`analyze`].
pub fn analyze_json(
    records_json: &str,
    config_json: &str,
) -> Result<AnalysisReport, AnalysisError> {
    let records: Vec<StabilityRecord> = serde_json::from_str(records_json)?;
    let config = AnalysisConfig::from_json_str(config_json)?;
    analyze(&records, &config)
}
