//! End-to-end optimizer behavior: convergence, reproducibility, and
//! cancellation on the built-in objectives.

use pso_core::{BuiltinObjective, Optimizer};
use pso_schema::{parse_config_str, ResolvedConfig};

fn config(extra: &str) -> ResolvedConfig {
    parse_config_str(extra).unwrap().resolve().unwrap()
}

#[test]
fn sphere_converges_towards_origin() {
    let mut optimizer = Optimizer::new(
        config("number_of_particles = 30\nmaximum_iterations = 300\ndimensions = 3\nseed = 42\n"),
        BuiltinObjective::Sphere,
    )
    .unwrap();
    let report = optimizer.run_until(|| false, |_, _| {}).unwrap();

    assert_eq!(report.iterations, 300);
    assert!(!report.cancelled);
    assert!(
        report.best_fitness < 1e-3,
        "sphere best fitness too high: {}",
        report.best_fitness
    );
    assert!(report.best_position.iter().all(|x| x.abs() < 0.1));
}

#[test]
fn history_never_increases() {
    let mut optimizer = Optimizer::new(
        config("maximum_iterations = 100\nseed = 7\n"),
        BuiltinObjective::Schwefel,
    )
    .unwrap();
    let report = optimizer.run_until(|| false, |_, _| {}).unwrap();

    assert_eq!(report.history.len(), 100);
    for pair in report.history.windows(2) {
        assert!(pair[1] <= pair[0], "history increased: {pair:?}");
    }
    assert_eq!(*report.history.last().unwrap(), report.best_fitness);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut optimizer = Optimizer::new(
            config("maximum_iterations = 50\nseed = 1234\n"),
            BuiltinObjective::Schwefel,
        )
        .unwrap();
        optimizer.run_until(|| false, |_, _| {}).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.best_position, b.best_position);
    assert_eq!(a.history, b.history);
}

#[test]
fn table_settles_on_lower_corner() {
    let mut optimizer = Optimizer::new(
        config("dimensions = 2\nobjective = \"table\"\nmaximum_iterations = 200\nseed = 5\n"),
        BuiltinObjective::Table,
    )
    .unwrap();
    let report = optimizer.run_until(|| false, |_, _| {}).unwrap();
    assert!(report.best_fitness <= -19.0, "{}", report.best_fitness);
    assert!(report.best_position.iter().all(|x| *x >= -10.0));
}

#[test]
fn custom_objective_closure() {
    let target = [3.0, -2.0];
    let objective = move |x: &[f64]| {
        x.iter()
            .zip(&target)
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>()
    };
    let mut optimizer = Optimizer::new(
        config("dimensions = 2\nmaximum_iterations = 300\nseed = 9\n"),
        objective,
    )
    .unwrap();
    let report = optimizer.run_until(|| false, |_, _| {}).unwrap();
    assert!((report.best_position[0] - 3.0).abs() < 0.05);
    assert!((report.best_position[1] + 2.0).abs() < 0.05);
}

#[test]
fn stop_request_ends_run_early() {
    let mut optimizer = Optimizer::new(
        config("maximum_iterations = 100\nseed = 3\n"),
        BuiltinObjective::Sphere,
    )
    .unwrap();
    let mut seen = 0;
    let mut calls = 0;
    let report = optimizer
        .run_until(
            || {
                calls += 1;
                calls > 10
            },
            |_, _| seen += 1,
        )
        .unwrap();
    assert!(report.cancelled);
    assert_eq!(report.iterations, 10);
    assert_eq!(report.history.len(), 10);
    assert_eq!(seen, 10);
}

#[test]
fn huge_iteration_count_can_be_stopped_before_first_iteration() {
    let mut optimizer = Optimizer::new(
        config("maximum_iterations = 4611686018427387904\nseed = 4\n"),
        BuiltinObjective::Sphere,
    )
    .unwrap();
    let report = optimizer.run_until(|| true, |_, _| {}).unwrap();
    assert!(report.cancelled);
    assert_eq!(report.iterations, 0);
    assert!(report.history.is_empty());
    assert!(report.best_fitness.is_infinite());
}

#[test]
fn from_config_uses_named_objective() {
    let raw = parse_config_str("objective = \"sphere\"\nmaximum_iterations = 20\nseed = 2\n").unwrap();
    let mut optimizer = Optimizer::from_config(&raw).unwrap();
    assert_eq!(optimizer.config().objective, "sphere");
    let report = optimizer.run_until(|| false, |_, _| {}).unwrap();
    assert_eq!(report.iterations, 20);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["iterations"], 20);
}
