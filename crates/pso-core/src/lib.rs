//! Particle swarm optimization engine.
//!
//! This crate turns a validated `ResolvedConfig` from `pso-schema` and an
//! `Objective` into an `Optimizer`: swarm initialization, the inertia-weighted
//! velocity and position update, best tracking, and convergence history. It also
//! provides the built-in objective functions and a process-wide shutdown flag used
//! to stop long runs between iterations.

pub mod concurrency;
pub mod objective;
pub mod optimizer;
pub mod swarm;

pub use concurrency::{install_signal_handler, shutdown_requested};
pub use objective::{builtin, BuiltinObjective, Objective};
pub use optimizer::{Optimizer, RunReport};
pub use swarm::{Best, Particle, Swarm};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] pso_schema::ConfigError),
    #[error("unknown objective '{name}' (expected one of: {known})")]
    UnknownObjective { name: String, known: String },
    #[error("objective '{name}' needs at least {required} dimensions, config has {found}")]
    ObjectiveDimensions {
        name: String,
        required: usize,
        found: usize,
    },
    #[error("{field} has {found} entries, expected {expected}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("swarm must contain at least one particle")]
    EmptySwarm,
    #[error("objective returned non-finite value {value} at iteration {iteration}")]
    NonFiniteFitness { iteration: usize, value: f64 },
}
