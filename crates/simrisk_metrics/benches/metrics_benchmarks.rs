//! Benchmarks for risk-metrics computation.

use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use simrisk_engine::{SimulationTrial, TrialEnsemble};
use simrisk_metrics::RiskMetricsCalculator;

/// Deterministic synthetic ensemble; no RNG needed for timing.
fn synthetic_ensemble(num_trials: usize, num_variables: usize) -> TrialEnsemble {
    let names: Vec<String> = (0..num_variables).map(|i| format!("v{i}")).collect();
    let trials = (0..num_trials)
        .map(|t| {
            let values = (0..num_variables)
                .map(|v| 100.0 + ((t * 31 + v * 17) % 97) as f64 - 48.0)
                .collect();
            SimulationTrial::new(values, Vec::new())
        })
        .collect();
    TrialEnsemble::new(names, Vec::new(), None, 0, trials)
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_metrics_compute");
    for &n in &[10_000usize, 100_000] {
        let ensemble = synthetic_ensemble(n, 4);
        let baselines: BTreeMap<String, f64> = (0..4)
            .map(|i| (format!("v{i}"), 100.0))
            .collect();
        let calculator = RiskMetricsCalculator::new();

        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| black_box(calculator.compute(&ensemble, &baselines).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
