use leading8_norms::{DomainError, GameParameters};
use serde::{Deserialize, Serialize};

use crate::agreement::AGREEMENT_BAND;
use crate::boundary::{GridScale, BOUNDARY_TOLERANCE};

/// Settings for [`crate::analyze`].
///
/// Every field has a default, so `{}` is a complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Donation benefit `b`.
    #[serde(default = "default_benefit")]
    pub benefit: f64,
    /// Donation cost `c`.
    #[serde(default = "default_cost")]
    pub cost: f64,
    /// `|margin|` below which a cell is on the empirical boundary.
    #[serde(default = "default_boundary_tolerance")]
    pub boundary_tolerance: f64,
    /// Band in which margin/verdict disagreements are not reported.
    #[serde(default = "default_agreement_band")]
    pub agreement_band: f64,
    #[serde(default)]
    pub grid: GridScale,
    /// Assessment errors to analyse. Empty means every slice present.
    #[serde(default)]
    pub assessment_errors: Vec<f64>,
    /// Drop theoretical points that fall outside the rendered grid.
    #[serde(default = "default_clip")]
    pub clip_theoretical_to_span: bool,
}

fn default_benefit() -> f64 {
    1.0
}

fn default_cost() -> f64 {
    0.8
}

fn default_boundary_tolerance() -> f64 {
    BOUNDARY_TOLERANCE
}

fn default_agreement_band() -> f64 {
    AGREEMENT_BAND
}

fn default_clip() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            benefit: default_benefit(),
            cost: default_cost(),
            boundary_tolerance: default_boundary_tolerance(),
            agreement_band: default_agreement_band(),
            grid: GridScale::default(),
            assessment_errors: Vec::new(),
            clip_theoretical_to_span: default_clip(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn game(&self) -> Result<GameParameters, DomainError> {
        GameParameters::new(self.benefit, self.cost)
    }

    /// Whether the slice at `assessment_error` is selected.
    pub fn includes(&self, assessment_error: f64) -> bool {
        self.assessment_errors.is_empty()
            || self
                .assessment_errors
                .iter()
                .any(|&mu| (mu - assessment_error).abs() < 1e-12)
    }
}

/// Validation error for an analysis configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Validate a configuration and return every problem found.
///
/// - `benefit` and `cost` must form a valid donation game (`b > c > 0`).
/// - `boundary_tolerance` and `agreement_band` must be positive and finite.
/// - `grid.span` must be positive and finite, `grid.cells` non-zero.
/// - Each entry of `assessment_errors` must be a probability.
pub fn validate_config(config: &AnalysisConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    let mut push = |message: String| errors.push(ConfigValidationError { message });

    if let Err(err) = config.game() {
        push(format!("benefit/cost: {err}"));
    }

    for (name, value) in [
        ("boundary_tolerance", config.boundary_tolerance),
        ("agreement_band", config.agreement_band),
        ("grid.span", config.grid.span),
    ] {
        if !(value.is_finite() && value > 0.0) {
            push(format!("{name} must be positive and finite, got {value}"));
        }
    }

    if config.grid.cells == 0 {
        push("grid.cells must be non-zero".into());
    }

    for (i, &mu) in config.assessment_errors.iter().enumerate() {
        if !(0.0..=1.0).contains(&mu) {
            push(format!("assessment_errors[{i}] must be in [0, 1], got {mu}"));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.boundary_tolerance, 8e-4);
        assert_eq!(config.grid.cells, 50);
        assert!(validate_config(&config).is_empty());
    }

    #[test]
    fn fields_override_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{"benefit": 2.0, "cost": 1.0, "grid": {"span": 0.25, "cells": 125},
                "assessment_errors": [0.0, 0.02], "clip_theoretical_to_span": false}"#,
        )
        .unwrap();
        assert_eq!(config.game().unwrap().benefit_cost_ratio(), 2.0);
        assert_eq!(config.grid.factor(), 500.0);
        assert!(config.includes(0.02));
        assert!(!config.includes(0.04));
        assert!(!config.clip_theoretical_to_span);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"benfit": 1.0}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn validation_reports_every_problem() {
        let config = AnalysisConfig {
            benefit: 0.5,
            cost: 0.8,
            boundary_tolerance: 0.0,
            agreement_band: f64::NAN,
            grid: GridScale {
                span: 0.1,
                cells: 0,
            },
            assessment_errors: vec![0.01, 1.5],
            clip_theoretical_to_span: true,
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].message.starts_with("benefit/cost"));
        let mentions = |needle: &str| errors.iter().any(|e| e.message.contains(needle));
        assert!(mentions("assessment_errors[1]"));
    }

    #[test]
    fn empty_selection_includes_everything() {
        assert!(AnalysisConfig::default().includes(0.37));
    }
}
