use criterion::{criterion_group, criterion_main, Criterion};
use pso_core::{BuiltinObjective, Optimizer};
use pso_schema::{parse_config_str, ResolvedConfig};

fn config(toml: &str) -> ResolvedConfig {
    parse_config_str(toml).unwrap().resolve().unwrap()
}

fn bench_schwefel_default(c: &mut Criterion) {
    let resolved = config("seed = 1\n");
    c.bench_function("schwefel_30p_5d_500it", |b| {
        b.iter_with_setup(
            || Optimizer::new(resolved.clone(), BuiltinObjective::Schwefel).unwrap(),
            |mut optimizer| {
                optimizer.run_until(|| false, |_, _| {}).unwrap();
            },
        );
    });
}

fn bench_sphere_wide(c: &mut Criterion) {
    let resolved = config("dimensions = 50\nmaximum_iterations = 100\nseed = 1\n");
    c.bench_function("sphere_30p_50d_100it", |b| {
        b.iter_with_setup(
            || Optimizer::new(resolved.clone(), BuiltinObjective::Sphere).unwrap(),
            |mut optimizer| {
                optimizer.run_until(|| false, |_, _| {}).unwrap();
            },
        );
    });
}

fn bench_single_step(c: &mut Criterion) {
    let resolved = config("number_of_particles = 100\ndimensions = 10\nseed = 1\n");
    let mut optimizer = Optimizer::new(resolved, BuiltinObjective::Sphere).unwrap();
    let mut iteration = 0;
    c.bench_function("step_100p_10d", |b| {
        b.iter(|| {
            optimizer.step(iteration % 500).unwrap();
            iteration += 1;
        });
    });
}

criterion_group!(
    benches,
    bench_schwefel_default,
    bench_sphere_wide,
    bench_single_step
);
criterion_main!(benches);
