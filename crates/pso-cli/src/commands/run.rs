use super::{finish_bar, iteration_bar, json_pretty, EXIT_SUCCESS};
use pso_core::{shutdown_requested, CoreError, Optimizer};
use pso_schema::parse_config_file;
use std::path::Path;
use tracing::debug;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub objective: Option<String>,
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub particles: Option<usize>,
}

pub fn run(
    config_path: &Path,
    overrides: &Overrides,
    history: bool,
    json: bool,
) -> Result<u8, String> {
    let mut config = parse_config_file(config_path).map_err(|e| e.to_string())?;
    debug!("loaded optimizer config from {}", config_path.display());
    if let Some(objective) = &overrides.objective {
        config.objective.clone_from(objective);
    }
    if overrides.seed.is_some() {
        config.seed = overrides.seed;
    }
    if let Some(iterations) = overrides.iterations {
        config.maximum_iterations = iterations;
    }
    if let Some(particles) = overrides.particles {
        config.number_of_particles = particles;
    }

    let mut optimizer = Optimizer::from_config(&config).map_err(|e| match e {
        CoreError::Config(inner) => inner.to_string(),
        other => format!("config error: {other}"),
    })?;
    let iterations = optimizer.config().iterations;

    let pb = if json {
        None
    } else {
        Some(iteration_bar(iterations))
    };
    let outcome = optimizer.run_until(shutdown_requested, |_, best| {
        if let Some(ref pb) = pb {
            pb.inc(1);
            pb.set_message(format!("best {best:.6e}"));
        }
    });
    let report = match outcome {
        Ok(r) => {
            if let Some(ref pb) = pb {
                finish_bar(pb, !r.cancelled, if r.cancelled { "cancelled" } else { "done" });
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                finish_bar(pb, false, "optimization failed");
            }
            return Err(e.to_string());
        }
    };

    if json {
        let mut payload = serde_json::json!({
            "objective": optimizer.config().objective,
            "best_position": report.best_position,
            "best_fitness": report.best_fitness,
            "iterations": report.iterations,
            "cancelled": report.cancelled,
            "elapsed_ms": report.elapsed_ms(),
        });
        if history {
            payload["history"] = serde_json::json!(report.history);
        }
        println!("{}", json_pretty(&payload)?);
    } else {
        if history {
            for (i, best) in report.history.iter().enumerate() {
                println!("Iteration# {}\tG_Best_O = {best}", i + 1);
            }
        }
        println!("Optimize X values");
        for (i, x) in report.best_position.iter().enumerate() {
            println!("X[{i}] = {x}");
        }
        println!("best fitness: {}", report.best_fitness);
        println!(
            "{} ms ({} us)",
            report.elapsed_ms(),
            report.elapsed.as_micros()
        );
        if report.cancelled {
            println!(
                "stopped after {} of {iterations} iterations",
                report.iterations
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
