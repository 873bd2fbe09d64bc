//! End-to-end simulation tests: determinism, statistical convergence,
//! shock behaviour and validation.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use proptest::prelude::*;

use simrisk_core::{
    AdverseCondition, CorrelationMatrix, RandomVariable, Scenario, ValidationError,
};
use simrisk_engine::{CancelToken, SimulationConfig, SimulationEngine, SimulationError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn scenario_ab(rho: f64, conditions: Vec<AdverseCondition>) -> Scenario {
    let variables = vec![
        RandomVariable::normal("a", 100.0, 10.0).unwrap(),
        RandomVariable::normal("b", 50.0, 5.0).unwrap(),
    ];
    let correlation =
        CorrelationMatrix::new(vec!["a".into(), "b".into()], vec![1.0, rho, rho, 1.0]).unwrap();
    Scenario::new(variables, correlation, conditions).unwrap()
}

fn mean_and_std(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

#[test]
fn same_seed_bit_identical() {
    init_tracing();
    let conditions = vec![AdverseCondition::new("shock", 0.1, -0.2).unwrap()];
    let config = || {
        SimulationConfig::builder()
            .num_trials(5_000)
            .seed(42)
            .build()
            .unwrap()
    };

    let first = SimulationEngine::new(scenario_ab(0.5, conditions.clone()), config())
        .unwrap()
        .run()
        .unwrap();
    let second = SimulationEngine::new(scenario_ab(0.5, conditions), config())
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn different_seeds_differ() {
    let run = |seed: u64| {
        let config = SimulationConfig::builder()
            .num_trials(100)
            .seed(seed)
            .build()
            .unwrap();
        SimulationEngine::new(scenario_ab(0.5, Vec::new()), config)
            .unwrap()
            .run()
            .unwrap()
    };
    assert_ne!(run(1).trials(), run(2).trials());
}

#[test]
fn worked_example_means_and_correlation() {
    // Two normals a ~ N(100, 10), b ~ N(50, 5) with rho = 0.5 at 10k
    // trials: sample means land within a couple of standard errors and
    // the empirical correlation within 0.05 of the input.
    let config = SimulationConfig::builder()
        .num_trials(10_000)
        .seed(42)
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario_ab(0.5, Vec::new()), config)
        .unwrap()
        .run()
        .unwrap();

    let (mean_a, std_a) = mean_and_std(&ensemble.column(0));
    let (mean_b, std_b) = mean_and_std(&ensemble.column(1));
    assert!((98.0..=102.0).contains(&mean_a), "mean_a = {mean_a}");
    assert!((49.0..=51.0).contains(&mean_b), "mean_b = {mean_b}");
    assert_relative_eq!(std_a, 10.0, epsilon = 0.5);
    assert_relative_eq!(std_b, 5.0, epsilon = 0.3);

    let corr = ensemble.empirical_correlation(0, 1);
    assert!((0.45..=0.55).contains(&corr), "corr = {corr}");
}

#[test]
fn correlation_converges_at_scale() {
    let rho = 0.7;
    let config = SimulationConfig::builder()
        .num_trials(100_000)
        .seed(7)
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario_ab(rho, Vec::new()), config)
        .unwrap()
        .run()
        .unwrap();
    let corr = ensemble.empirical_correlation(0, 1);
    assert!((corr - rho).abs() < 0.02, "corr = {corr}");
}

#[test]
fn single_period_preserves_marginal_shape_without_conditions() {
    // With no adverse conditions and no clamping, single-period normals
    // can go negative: the marginal is exactly N(mean, std).
    let variables = vec![RandomVariable::normal("x", 0.0, 1.0).unwrap()];
    let correlation = CorrelationMatrix::identity(vec!["x".into()]);
    let scenario = Scenario::new(variables, correlation, Vec::new()).unwrap();

    let config = SimulationConfig::builder()
        .num_trials(20_000)
        .seed(11)
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario, config).unwrap().run().unwrap();

    let column = ensemble.column(0);
    let negative = column.iter().filter(|&&v| v < 0.0).count();
    let fraction = negative as f64 / column.len() as f64;
    assert!((fraction - 0.5).abs() < 0.02, "negative fraction = {fraction}");
}

#[test]
fn shock_lowers_conditional_mean() {
    let conditions = vec![AdverseCondition::new("hit", 0.3, -0.3).unwrap()];
    let config = SimulationConfig::builder()
        .num_trials(20_000)
        .seed(5)
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario_ab(0.0, conditions), config)
        .unwrap()
        .run()
        .unwrap();

    let (mut hit_sum, mut hit_n) = (0.0, 0usize);
    let (mut clear_sum, mut clear_n) = (0.0, 0usize);
    for trial in ensemble.trials() {
        if trial.fired().is_empty() {
            clear_sum += trial.values()[0];
            clear_n += 1;
        } else {
            hit_sum += trial.values()[0];
            hit_n += 1;
        }
    }
    assert!(hit_n > 0 && clear_n > 0);
    let hit_mean = hit_sum / hit_n as f64;
    let clear_mean = clear_sum / clear_n as f64;
    assert!(
        hit_mean < clear_mean - 10.0,
        "hit mean {hit_mean} vs clear mean {clear_mean}"
    );
}

#[test]
fn targeted_condition_spares_unlisted_variable() {
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), 1.0);
    let targeted = AdverseCondition::with_impacts("b only", 1.0, -0.5, Some(map)).unwrap();

    let config = SimulationConfig::builder()
        .num_trials(10_000)
        .seed(3)
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario_ab(0.0, vec![targeted]), config)
        .unwrap()
        .run()
        .unwrap();

    let (mean_a, _) = mean_and_std(&ensemble.column(0));
    let (mean_b, _) = mean_and_std(&ensemble.column(1));
    // 'a' is untouched; 'b' loses roughly half its value every trial.
    assert!((98.0..=102.0).contains(&mean_a), "mean_a = {mean_a}");
    assert!(mean_b < 30.0, "mean_b = {mean_b}");
}

#[test]
fn path_mode_values_stay_non_negative() {
    let variables = vec![
        RandomVariable::normal("a", 0.0, 0.1).unwrap(),
        RandomVariable::normal("b", -0.05, 0.2).unwrap(),
    ];
    let correlation = CorrelationMatrix::identity(vec!["a".into(), "b".into()]);
    let conditions = vec![AdverseCondition::new("crash", 0.4, -1.2).unwrap()];
    let scenario = Scenario::new(variables, correlation, conditions).unwrap();

    let config = SimulationConfig::builder()
        .num_trials(2_000)
        .horizon(36)
        .seed(17)
        .initial_values(vec![100.0, 10.0])
        .build()
        .unwrap();
    let ensemble = SimulationEngine::new(scenario, config).unwrap().run().unwrap();

    assert_eq!(ensemble.horizon(), Some(36));
    for trial in ensemble.trials() {
        for &value in trial.values() {
            assert!(value >= 0.0 && value.is_finite());
        }
    }
}

#[test]
fn non_psd_correlation_rejected_with_eigenvalue() {
    // Pairwise correlations of -0.9 between three variables cannot all
    // hold at once; the most negative eigenvalue is reported.
    let names = vec!["a".into(), "b".into(), "c".into()];
    let data = vec![1.0, -0.9, -0.9, -0.9, 1.0, -0.9, -0.9, -0.9, 1.0];
    let err = CorrelationMatrix::new(names, data).unwrap_err();
    match err {
        ValidationError::NotPositiveSemiDefinite { eigenvalue, .. } => {
            assert!(eigenvalue < -1e-8, "eigenvalue = {eigenvalue}");
        }
        other => panic!("expected NotPositiveSemiDefinite, got {other:?}"),
    }
}

#[test]
fn zero_trials_rejected_before_any_work() {
    let err = SimulationConfig::builder().num_trials(0).build().unwrap_err();
    assert!(matches!(err, ValidationError::InvalidTrialCount { count: 0, .. }));
}

#[test]
fn pre_cancelled_token_yields_cancelled_error() {
    let config = SimulationConfig::builder()
        .num_trials(50_000)
        .seed(1)
        .build()
        .unwrap();
    let mut engine = SimulationEngine::new(scenario_ab(0.5, Vec::new()), config).unwrap();

    let token = CancelToken::new();
    token.cancel();
    assert_eq!(
        engine.run_cancellable(&token).unwrap_err(),
        SimulationError::Cancelled
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn determinism_holds_for_any_seed(seed in any::<u64>()) {
        let config = || SimulationConfig::builder()
            .num_trials(200)
            .seed(seed)
            .build()
            .unwrap();
        let a = SimulationEngine::new(scenario_ab(0.3, Vec::new()), config())
            .unwrap()
            .run()
            .unwrap();
        let b = SimulationEngine::new(scenario_ab(0.3, Vec::new()), config())
            .unwrap()
            .run()
            .unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn all_values_finite_in_single_period(rho in -0.9f64..0.9, seed in any::<u64>()) {
        let config = SimulationConfig::builder()
            .num_trials(100)
            .seed(seed)
            .build()
            .unwrap();
        let ensemble = SimulationEngine::new(scenario_ab(rho, Vec::new()), config)
            .unwrap()
            .run()
            .unwrap();
        for trial in ensemble.trials() {
            for &value in trial.values() {
                prop_assert!(value.is_finite());
            }
        }
    }
}
