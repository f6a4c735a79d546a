use criterion::{black_box, criterion_group, criterion_main, Criterion};
use leading8_norms::{ErrorParameters, GameParameters, Norm};
use leading8_stability::{
    analyze, extract_boundary, norm_margin, AnalysisConfig, MarginGrid, StabilityRecord,
    ThresholdSolver, BOUNDARY_TOLERANCE,
};

fn axis() -> Vec<f64> {
    (0..51).map(|i| i as f64 * 0.002).collect()
}

fn sweep(norm: Norm, assessment: f64) -> Vec<StabilityRecord> {
    let axis = axis();
    let mut records = Vec::with_capacity(axis.len() * axis.len());
    for &e in &axis {
        for &me in &axis {
            records.push(StabilityRecord {
                norm_id: norm.id(),
                assessment_error: assessment,
                perception_error: e,
                implementation_error: me,
                h: 0.9,
                is_nash: true,
            });
        }
    }
    records
}

fn bench_margin(c: &mut Criterion) {
    let game = GameParameters::new(1.0, 0.8).unwrap();
    let errors = ErrorParameters::new(0.02, 0.03, 0.01).unwrap();
    c.bench_function("norm_margin_all_eight", |b| {
        b.iter(|| {
            for norm in Norm::ALL {
                black_box(norm_margin(norm, &game, black_box(0.9), &errors).unwrap());
            }
        })
    });
}

fn bench_threshold(c: &mut Criterion) {
    let solver = ThresholdSolver::new(&GameParameters::new(1.0, 0.8).unwrap()).unwrap();
    let sweep = axis();
    c.bench_function("threshold_curve_51", |b| {
        b.iter(|| solver.boundary(black_box(0.04), &sweep).unwrap())
    });
}

fn bench_extract(c: &mut Criterion) {
    let axis = axis();
    let margins = axis
        .iter()
        .map(|&e| axis.iter().map(|&me| e + me - 0.08).collect())
        .collect();
    let grid = MarginGrid {
        perception_errors: axis.clone(),
        implementation_errors: axis,
        margins,
    };
    c.bench_function("extract_boundary_51x51", |b| {
        b.iter(|| extract_boundary(black_box(&grid), BOUNDARY_TOLERANCE))
    });
}

fn bench_analyze(c: &mut Criterion) {
    let records = sweep(Norm::L8, 0.02);
    let config = AnalysisConfig::default();
    c.bench_function("analyze_l8_slice", |b| {
        b.iter(|| analyze(black_box(&records), &config).unwrap())
    });
}

criterion_group!(
    benches,
    bench_margin,
    bench_threshold,
    bench_extract,
    bench_analyze
);
criterion_main!(benches);
