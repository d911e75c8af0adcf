use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeToml(#[from] toml::ser::Error),
    #[error("config error: {field} must be at least 1")]
    Zero { field: &'static str },
    #[error("config error: {field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("config error: {field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("config error: {field} has {found} entries, expected {expected} (one per dimension)")]
    BoundLength {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("config error: dimension {dimension}: lower bound {lower} is not below upper bound {upper}")]
    EmptyRange {
        dimension: usize,
        lower: f64,
        upper: f64,
    },
    #[error("config error: min_inertia_weight {min} exceeds max_inertia_weight {max}")]
    InertiaOrder { min: f64, max: f64 },
    #[error("config error: velocity_factor must be positive, got {0}")]
    VelocityFactor(f64),
}

/// A search-space bound: one value for every dimension or one value each.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Bound {
    Uniform(f64),
    PerDimension(Vec<f64>),
}

impl Bound {
    fn expand(&self, field: &'static str, dimensions: usize) -> Result<Vec<f64>, ConfigError> {
        let values = match self {
            Self::Uniform(v) => vec![*v; dimensions],
            Self::PerDimension(values) => {
                if values.len() != dimensions {
                    return Err(ConfigError::BoundLength {
                        field,
                        expected: dimensions,
                        found: values.len(),
                    });
                }
                values.clone()
            }
        };
        for v in &values {
            finite(field, *v)?;
        }
        Ok(values)
    }
}

/// Optimizer configuration as written in `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizerConfig {
    #[serde(default = "default_particles")]
    pub number_of_particles: usize,
    #[serde(default = "default_iterations")]
    pub maximum_iterations: usize,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_lower")]
    pub lower_bound: Bound,
    #[serde(default = "default_upper")]
    pub upper_bound: Bound,
    #[serde(default = "default_min_inertia")]
    pub min_inertia_weight: f64,
    #[serde(default = "default_max_inertia")]
    pub max_inertia_weight: f64,
    /// Pull towards each particle's personal best (c1).
    #[serde(default = "default_acceleration")]
    pub cognitive: f64,
    /// Pull towards the swarm's global best (c2).
    #[serde(default = "default_acceleration")]
    pub social: f64,
    /// Velocity limit per dimension as a fraction of the bound span.
    #[serde(default = "default_velocity_factor")]
    pub velocity_factor: f64,
    #[serde(default = "default_objective")]
    pub objective: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            number_of_particles: default_particles(),
            maximum_iterations: default_iterations(),
            dimensions: default_dimensions(),
            lower_bound: default_lower(),
            upper_bound: default_upper(),
            min_inertia_weight: default_min_inertia(),
            max_inertia_weight: default_max_inertia(),
            cognitive: default_acceleration(),
            social: default_acceleration(),
            velocity_factor: default_velocity_factor(),
            objective: default_objective(),
            seed: None,
        }
    }
}

fn default_particles() -> usize {
    30
}

fn default_iterations() -> usize {
    500
}

fn default_dimensions() -> usize {
    5
}

fn default_lower() -> Bound {
    Bound::Uniform(-10.0)
}

fn default_upper() -> Bound {
    Bound::Uniform(10.0)
}

fn default_min_inertia() -> f64 {
    0.2
}

fn default_max_inertia() -> f64 {
    0.9
}

fn default_acceleration() -> f64 {
    2.0
}

fn default_velocity_factor() -> f64 {
    0.2
}

fn default_objective() -> String {
    "schwefel".to_owned()
}

/// Validated configuration with bounds expanded to one value per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub particles: usize,
    pub iterations: usize,
    pub dimensions: usize,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub min_inertia_weight: f64,
    pub max_inertia_weight: f64,
    pub cognitive: f64,
    pub social: f64,
    pub velocity_factor: f64,
    pub objective: String,
    pub seed: Option<u64>,
}

impl OptimizerConfig {
    /// Validate the configuration and expand the bounds.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        if self.number_of_particles == 0 {
            return Err(ConfigError::Zero {
                field: "number_of_particles",
            });
        }
        if self.maximum_iterations == 0 {
            return Err(ConfigError::Zero {
                field: "maximum_iterations",
            });
        }
        if self.dimensions == 0 {
            return Err(ConfigError::Zero {
                field: "dimensions",
            });
        }

        let lower = self.lower_bound.expand("lower_bound", self.dimensions)?;
        let upper = self.upper_bound.expand("upper_bound", self.dimensions)?;
        for (dimension, (lo, hi)) in lower.iter().zip(&upper).enumerate() {
            if lo >= hi {
                return Err(ConfigError::EmptyRange {
                    dimension,
                    lower: *lo,
                    upper: *hi,
                });
            }
        }

        non_negative("min_inertia_weight", self.min_inertia_weight)?;
        non_negative("max_inertia_weight", self.max_inertia_weight)?;
        if self.min_inertia_weight > self.max_inertia_weight {
            return Err(ConfigError::InertiaOrder {
                min: self.min_inertia_weight,
                max: self.max_inertia_weight,
            });
        }
        non_negative("cognitive", self.cognitive)?;
        non_negative("social", self.social)?;
        finite("velocity_factor", self.velocity_factor)?;
        if self.velocity_factor <= 0.0 {
            return Err(ConfigError::VelocityFactor(self.velocity_factor));
        }

        Ok(ResolvedConfig {
            particles: self.number_of_particles,
            iterations: self.maximum_iterations,
            dimensions: self.dimensions,
            lower,
            upper,
            min_inertia_weight: self.min_inertia_weight,
            max_inertia_weight: self.max_inertia_weight,
            cognitive: self.cognitive,
            social: self.social,
            velocity_factor: self.velocity_factor,
            objective: self.objective.trim().to_owned(),
            seed: self.seed,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

pub fn parse_config_str(input: &str) -> Result<OptimizerConfig, ConfigError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_config_file(path: impl AsRef<Path>) -> Result<OptimizerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config_str(&content)
}
