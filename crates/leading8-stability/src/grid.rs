//! Grouping of sweep records into per-norm slices and their margin grids.

use indexmap::IndexMap;
use leading8_norms::{DomainError, ErrorParameters, GameParameters, Norm, NormLookupError};
use serde::{Deserialize, Serialize};

use crate::boundary::MarginGrid;
use crate::margin::norm_margin;

/// One row of an error sweep as produced by the equilibrium search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityRecord {
    /// 12-bit rule identifier of the resident norm.
    #[serde(rename = "normID")]
    pub norm_id: u32,
    #[serde(rename = "assessmentError")]
    pub assessment_error: f64,
    #[serde(rename = "perceptionError")]
    pub perception_error: f64,
    #[serde(rename = "implementationError")]
    pub implementation_error: f64,
    /// Equilibrium fraction of good reputations.
    pub h: f64,
    /// Whether the search found the norm stable at this point.
    #[serde(rename = "isNash")]
    pub is_nash: bool,
}

impl StabilityRecord {
    pub fn norm(&self) -> Result<Norm, NormLookupError> {
        Norm::from_id(self.norm_id)
    }

    pub fn errors(&self) -> Result<ErrorParameters, DomainError> {
        ErrorParameters::new(
            self.assessment_error,
            self.implementation_error,
            self.perception_error,
        )
    }
}

/// A record with its recomputed margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityGridPoint {
    pub norm: Norm,
    pub errors: ErrorParameters,
    pub h: f64,
    pub margin: f64,
    pub is_nash: bool,
}

/// All records sharing one (norm, assessment error) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct NormSlice {
    pub norm: Norm,
    pub assessment_error: f64,
    /// Distinct perception errors, ascending.
    pub perception_errors: Vec<f64>,
    /// Distinct implementation errors, ascending.
    pub implementation_errors: Vec<f64>,
    pub records: Vec<StabilityRecord>,
}

/// Hashable key for an error value. `-0.0` and `0.0` share a key.
fn axis_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn distinct_sorted(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut unique: IndexMap<u64, f64> = IndexMap::new();
    for v in values {
        unique.entry(axis_key(v)).or_insert(v);
    }
    let mut out: Vec<f64> = unique.into_values().collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Group records by (norm, assessment error), keeping slices in the order
/// their first record appears.
///
/// # Errors
/// [`NormLookupError::UnknownId`] for a record whose `normID` is not one of
/// the leading eight.
pub fn partition_records(records: &[StabilityRecord]) -> Result<Vec<NormSlice>, NormLookupError> {
    let mut groups: IndexMap<(Norm, u64), Vec<StabilityRecord>> = IndexMap::new();
    for record in records {
        let norm = record.norm()?;
        groups
            .entry((norm, axis_key(record.assessment_error)))
            .or_default()
            .push(record.clone());
    }

    Ok(groups
        .into_iter()
        .map(|((norm, _), records)| {
            let assessment_error = records[0].assessment_error;
            NormSlice {
                norm,
                assessment_error,
                perception_errors: distinct_sorted(records.iter().map(|r| r.perception_error)),
                implementation_errors: distinct_sorted(
                    records.iter().map(|r| r.implementation_error),
                ),
                records,
            }
        })
        .collect())
}

/// Grid points and margin lattice of one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceEvaluation {
    pub points: Vec<StabilityGridPoint>,
    pub grid: MarginGrid,
}

/// Recompute the margin of every record in `slice` and lay the results out
/// on the slice's perception x implementation lattice.
///
/// Lattice cells no record covers stay NaN. If two records land on the same
/// cell the later one wins.
pub fn evaluate_slice(
    slice: &NormSlice,
    game: &GameParameters,
) -> Result<SliceEvaluation, DomainError> {
    let rows: IndexMap<u64, usize> = slice
        .perception_errors
        .iter()
        .enumerate()
        .map(|(i, &v)| (axis_key(v), i))
        .collect();
    let cols: IndexMap<u64, usize> = slice
        .implementation_errors
        .iter()
        .enumerate()
        .map(|(i, &v)| (axis_key(v), i))
        .collect();

    let mut grid = MarginGrid::empty(
        slice.perception_errors.clone(),
        slice.implementation_errors.clone(),
    );
    let mut points = Vec::with_capacity(slice.records.len());
    for record in &slice.records {
        let errors = record.errors()?;
        let margin = norm_margin(slice.norm, game, record.h, &errors)?;
        if let (Some(&row), Some(&col)) = (
            rows.get(&axis_key(record.perception_error)),
            cols.get(&axis_key(record.implementation_error)),
        ) {
            grid.margins[row][col] = margin;
        }
        points.push(StabilityGridPoint {
            norm: slice.norm,
            errors,
            h: record.h,
            margin,
            is_nash: record.is_nash,
        });
    }
    Ok(SliceEvaluation { points, grid })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(norm: Norm, mu: f64, e: f64, me: f64) -> StabilityRecord {
        StabilityRecord {
            norm_id: norm.id(),
            assessment_error: mu,
            perception_error: e,
            implementation_error: me,
            h: 0.9,
            is_nash: true,
        }
    }

    #[test]
    fn record_deserializes_from_camel_case_fields() {
        let json = r#"{"normID": 3002, "assessmentError": 0.02, "perceptionError": 0.01,
                       "implementationError": 0.03, "h": 0.95, "isNash": false}"#;
        let r: StabilityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.norm().unwrap(), Norm::L3);
        assert_eq!(r.implementation_error, 0.03);
        assert!(!r.is_nash);
    }

    #[test]
    fn partition_keeps_first_seen_slice_order() {
        let records = vec![
            record(Norm::L6, 0.02, 0.0, 0.0),
            record(Norm::L3, 0.02, 0.0, 0.0),
            record(Norm::L6, 0.0, 0.0, 0.0),
            record(Norm::L6, 0.02, 0.01, 0.0),
        ];
        let slices = partition_records(&records).unwrap();
        let keys: Vec<(Norm, f64)> = slices
            .iter()
            .map(|s| (s.norm, s.assessment_error))
            .collect();
        assert_eq!(
            keys,
            vec![(Norm::L6, 0.02), (Norm::L3, 0.02), (Norm::L6, 0.0)]
        );
        assert_eq!(slices[0].records.len(), 2);
    }

    #[test]
    fn axes_are_distinct_and_ascending() {
        let records = vec![
            record(Norm::L8, 0.01, 0.02, 0.01),
            record(Norm::L8, 0.01, 0.0, 0.01),
            record(Norm::L8, 0.01, 0.02, 0.0),
            record(Norm::L8, 0.01, -0.0, 0.0),
        ];
        let slice = &partition_records(&records).unwrap()[0];
        assert_eq!(slice.perception_errors, vec![0.0, 0.02]);
        assert_eq!(slice.implementation_errors, vec![0.0, 0.01]);
    }

    #[test]
    fn unknown_norm_id_is_rejected() {
        let mut r = record(Norm::L1, 0.0, 0.0, 0.0);
        r.norm_id = 7;
        assert_eq!(
            partition_records(&[r]).unwrap_err(),
            NormLookupError::UnknownId(7)
        );
    }

    #[test]
    fn evaluation_fills_covered_cells_only() {
        let game = GameParameters::new(1.0, 0.8).unwrap();
        let records = vec![
            record(Norm::L3, 0.0, 0.0, 0.0),
            record(Norm::L3, 0.0, 0.1, 0.1),
        ];
        let slice = &partition_records(&records).unwrap()[0];
        let eval = evaluate_slice(slice, &game).unwrap();
        assert_eq!(eval.points.len(), 2);
        assert_eq!(eval.grid.filled(), 2);
        assert!(eval.grid.get(0, 1).unwrap().is_nan());
        assert!((eval.grid.get(0, 0).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn evaluation_rejects_out_of_range_records() {
        let game = GameParameters::new(1.0, 0.8).unwrap();
        let mut r = record(Norm::L4, 0.0, 0.0, 0.0);
        r.h = 1.2;
        let slice = &partition_records(&[r]).unwrap()[0];
        assert!(matches!(
            evaluate_slice(slice, &game),
            Err(DomainError::ProbabilityOutOfRange { .. })
        ));
    }
}
