use crate::concurrency::shutdown_requested;
use crate::objective::{builtin, BuiltinObjective, Objective};
use crate::swarm::Swarm;
use crate::CoreError;
use pso_schema::{ConfigError, OptimizerConfig, ResolvedConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Upper bound on the history buffer reserved before a run starts.
const HISTORY_PREALLOC: usize = 4096;

/// Weights of the three velocity terms for one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub inertia: f64,
    pub cognitive: f64,
    pub social: f64,
}

impl Coefficients {
    /// `w·v + c1·r1·(p − x) + c2·r2·(g − x)`
    pub fn velocity(&self, v: f64, x: f64, personal: f64, global: f64, r1: f64, r2: f64) -> f64 {
        self.inertia * v + self.cognitive * r1 * (personal - x) + self.social * r2 * (global - x)
    }
}

/// Outcome of an optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    /// Iterations actually completed; below the configured count when cancelled.
    pub iterations: usize,
    /// Global best fitness after each completed iteration.
    pub history: Vec<f64>,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl RunReport {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Particle swarm optimizer over a box-bounded search space.
///
/// Positions start uniformly distributed inside the bounds with zero velocity.
/// Each iteration evaluates every particle, updates personal and global bests
/// on strict improvement, then moves every particle with a linearly decreasing
/// inertia weight. Velocities are clamped to a fraction of the bound span and
/// positions to the bounds.
pub struct Optimizer<O> {
    config: ResolvedConfig,
    objective: O,
    min_velocity: Vec<f64>,
    max_velocity: Vec<f64>,
    swarm: Swarm,
    rng: StdRng,
}

impl Optimizer<BuiltinObjective> {
    /// Validate a raw config and pair it with the built-in objective it names.
    pub fn from_config(config: &OptimizerConfig) -> Result<Self, CoreError> {
        let resolved = config.resolve()?;
        let objective = builtin(&resolved.objective)?;
        Self::new(resolved, objective)
    }
}

impl<O: Objective> Optimizer<O> {
    pub fn new(config: ResolvedConfig, objective: O) -> Result<Self, CoreError> {
        if config.particles == 0 {
            return Err(CoreError::EmptySwarm);
        }
        for (field, values) in [("lower", &config.lower), ("upper", &config.upper)] {
            if values.len() != config.dimensions {
                return Err(CoreError::DimensionMismatch {
                    field,
                    expected: config.dimensions,
                    found: values.len(),
                });
            }
        }
        for (dimension, (lower, upper)) in config.lower.iter().zip(&config.upper).enumerate() {
            if lower >= upper || !lower.is_finite() || !upper.is_finite() {
                return Err(ConfigError::EmptyRange {
                    dimension,
                    lower: *lower,
                    upper: *upper,
                }
                .into());
            }
        }
        if config.dimensions < objective.min_dimensions() {
            return Err(CoreError::ObjectiveDimensions {
                name: config.objective.clone(),
                required: objective.min_dimensions(),
                found: config.dimensions,
            });
        }

        let factor = config.velocity_factor;
        let min_velocity = config
            .lower
            .iter()
            .zip(&config.upper)
            .map(|(lo, hi)| factor * (lo - hi))
            .collect();
        let max_velocity = config
            .upper
            .iter()
            .zip(&config.lower)
            .map(|(hi, lo)| factor * (hi - lo))
            .collect();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut optimizer = Self {
            swarm: Swarm::new(config.dimensions, config.particles),
            config,
            objective,
            min_velocity,
            max_velocity,
            rng,
        };
        optimizer.init();
        Ok(optimizer)
    }

    /// Scatter every particle uniformly inside the bounds.
    fn init(&mut self) {
        let ResolvedConfig { lower, upper, .. } = &self.config;
        for particle in &mut self.swarm.particles {
            for ((x, lo), hi) in particle.position.iter_mut().zip(lower).zip(upper) {
                *x = (hi - lo) * self.rng.gen::<f64>() + lo;
            }
            particle.velocity.fill(0.0);
        }
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn swarm(&self) -> &Swarm {
        &self.swarm
    }

    pub fn best_position(&self) -> &[f64] {
        &self.swarm.best_global.position
    }

    pub fn best_fitness(&self) -> f64 {
        self.swarm.best_global.fitness
    }

    /// Inertia weight for `iteration`, decreasing linearly from max to min.
    pub fn inertia_weight(&self, iteration: usize) -> f64 {
        let c = &self.config;
        c.max_inertia_weight
            - (c.max_inertia_weight - c.min_inertia_weight) * iteration as f64
                / c.iterations as f64
    }

    /// Run a single iteration and return the global best fitness after it.
    pub fn step(&mut self, iteration: usize) -> Result<f64, CoreError> {
        let coefficients = Coefficients {
            inertia: self.inertia_weight(iteration),
            cognitive: self.config.cognitive,
            social: self.config.social,
        };
        let Swarm {
            particles,
            best_global,
        } = &mut self.swarm;

        for particle in particles.iter_mut() {
            let fitness = self.objective.evaluate(&particle.position);
            if !fitness.is_finite() {
                return Err(CoreError::NonFiniteFitness {
                    iteration,
                    value: fitness,
                });
            }
            particle.best_local.offer(&particle.position, fitness);
            best_global.offer(&particle.position, fitness);
        }

        let ResolvedConfig { lower, upper, .. } = &self.config;
        for particle in particles.iter_mut() {
            let dims = particle
                .position
                .iter_mut()
                .zip(particle.velocity.iter_mut())
                .zip(&particle.best_local.position)
                .zip(&best_global.position)
                .enumerate();
            for (d, (((x, v), personal), global)) in dims {
                let r1: f64 = self.rng.gen();
                let r2: f64 = self.rng.gen();
                *v = coefficients
                    .velocity(*v, *x, *personal, *global, r1, r2)
                    .clamp(self.min_velocity[d], self.max_velocity[d]);
                *x = (*x + *v).clamp(lower[d], upper[d]);
            }
        }

        Ok(best_global.fitness)
    }

    /// Run every configured iteration, stopping early on Ctrl-C.
    pub fn run(&mut self) -> Result<RunReport, CoreError> {
        self.run_until(shutdown_requested, |_, _| {})
    }

    /// Run until the configured iteration count or until `should_stop` returns
    /// true, which is checked before each iteration. `on_iteration` receives the
    /// zero-based iteration index and the global best fitness after it.
    pub fn run_until(
        &mut self,
        mut should_stop: impl FnMut() -> bool,
        mut on_iteration: impl FnMut(usize, f64),
    ) -> Result<RunReport, CoreError> {
        info!(
            "optimizing '{}': {} particles, {} dimensions, {} iterations",
            self.config.objective,
            self.config.particles,
            self.config.dimensions,
            self.config.iterations
        );
        let started = Instant::now();
        let mut history = Vec::with_capacity(self.config.iterations.min(HISTORY_PREALLOC));
        let mut cancelled = false;

        for iteration in 0..self.config.iterations {
            if should_stop() {
                info!("stopping after {iteration} iterations");
                cancelled = true;
                break;
            }
            let best = self.step(iteration)?;
            debug!("iteration {}: global best {best}", iteration + 1);
            history.push(best);
            on_iteration(iteration, best);
        }

        let elapsed = started.elapsed();
        info!(
            "best fitness {} after {} iterations in {:.3} ms",
            self.best_fitness(),
            history.len(),
            elapsed.as_secs_f64() * 1000.0
        );

        Ok(RunReport {
            best_position: self.swarm.best_global.position.clone(),
            best_fitness: self.swarm.best_global.fitness,
            iterations: history.len(),
            history,
            elapsed,
            cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pso_schema::parse_config_str;

    fn resolved(toml: &str) -> ResolvedConfig {
        parse_config_str(toml).unwrap().resolve().unwrap()
    }

    #[test]
    fn velocity_formula() {
        let c = Coefficients {
            inertia: 0.5,
            cognitive: 2.0,
            social: 2.0,
        };
        // 0.5*1 + 2*0.5*(3-1) + 2*0.25*(5-1)
        assert_eq!(c.velocity(1.0, 1.0, 3.0, 5.0, 0.5, 0.25), 0.5 + 2.0 + 2.0);
    }

    #[test]
    fn init_places_particles_inside_bounds() {
        let config = resolved("dimensions = 3\nlower_bound = [-1.0, 0.0, 10.0]\nupper_bound = [1.0, 5.0, 20.0]\nseed = 3\n");
        let optimizer = Optimizer::new(config.clone(), BuiltinObjective::Sphere).unwrap();
        for particle in &optimizer.swarm().particles {
            for (d, x) in particle.position.iter().enumerate() {
                assert!(*x >= config.lower[d] && *x <= config.upper[d]);
            }
            assert!(particle.velocity.iter().all(|v| *v == 0.0));
        }
        assert!(optimizer.best_fitness().is_infinite());
    }

    #[test]
    fn velocity_limits_follow_bound_span() {
        let config = resolved("dimensions = 2\nlower_bound = [-10.0, 0.0]\nupper_bound = [10.0, 1.0]\n");
        let optimizer = Optimizer::new(config, BuiltinObjective::Sphere).unwrap();
        assert_eq!(optimizer.min_velocity, vec![-4.0, -0.2]);
        assert_eq!(optimizer.max_velocity, vec![4.0, 0.2]);
    }

    #[test]
    fn inertia_decreases_linearly() {
        let config = resolved("maximum_iterations = 10\n");
        let optimizer = Optimizer::new(config, BuiltinObjective::Sphere).unwrap();
        assert!((optimizer.inertia_weight(0) - 0.9).abs() < 1e-12);
        assert!((optimizer.inertia_weight(5) - 0.55).abs() < 1e-12);
        assert!(optimizer.inertia_weight(9) > 0.2);
    }

    #[test]
    fn step_keeps_velocities_and_positions_clamped() {
        let config = resolved("dimensions = 4\nnumber_of_particles = 8\nseed = 11\n");
        let mut optimizer = Optimizer::new(config, BuiltinObjective::Schwefel).unwrap();
        for iteration in 0..20 {
            optimizer.step(iteration).unwrap();
            for particle in &optimizer.swarm().particles {
                for d in 0..4 {
                    assert!(particle.velocity[d].abs() <= 4.0 + 1e-12);
                    assert!((-10.0..=10.0).contains(&particle.position[d]));
                }
            }
        }
    }

    #[test]
    fn rejects_mismatched_bounds() {
        let mut config = resolved("dimensions = 2\n");
        config.upper.push(1.0);
        assert!(matches!(
            Optimizer::new(config, BuiltinObjective::Sphere),
            Err(CoreError::DimensionMismatch { field: "upper", .. })
        ));
    }

    #[test]
    fn rejects_too_few_dimensions_for_objective() {
        let config = resolved("dimensions = 1\nobjective = \"table\"\n");
        assert!(matches!(
            Optimizer::new(config, BuiltinObjective::Table),
            Err(CoreError::ObjectiveDimensions { required: 2, .. })
        ));
    }

    #[test]
    fn non_finite_fitness_is_an_error() {
        let config = resolved("dimensions = 1\nseed = 1\n");
        let mut optimizer = Optimizer::new(config, |_: &[f64]| f64::NAN).unwrap();
        assert!(matches!(
            optimizer.step(0),
            Err(CoreError::NonFiniteFitness { iteration: 0, .. })
        ));
    }

    #[test]
    fn from_config_rejects_unknown_objective() {
        let config = parse_config_str("objective = \"ackley\"\n").unwrap();
        assert!(matches!(
            Optimizer::from_config(&config),
            Err(CoreError::UnknownObjective { .. })
        ));
    }
}
