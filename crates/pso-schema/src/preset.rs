use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub config: &'static str,
}

pub const BUILTIN_PRESETS: &[Preset] = &[
    Preset {
        name: "schwefel",
        description: "Schwefel 1.2 in five dimensions, 30 particles, 500 iterations",
        config: r#"number_of_particles = 30
maximum_iterations = 500
dimensions = 5
lower_bound = -10.0
upper_bound = 10.0
objective = "schwefel"
"#,
    },
    Preset {
        name: "sphere",
        description: "Sphere function in ten dimensions, 30 particles, 500 iterations",
        config: r#"number_of_particles = 30
maximum_iterations = 500
dimensions = 10
lower_bound = -10.0
upper_bound = 10.0
objective = "sphere"
"#,
    },
    Preset {
        name: "table",
        description: "Linear table function on a two-dimensional box",
        config: r#"number_of_particles = 10
maximum_iterations = 500
dimensions = 2
lower_bound = -10.0
upper_bound = 10.0
objective = "table"
"#,
    },
    Preset {
        name: "quick",
        description: "Small seeded sphere run for smoke testing",
        config: r#"number_of_particles = 10
maximum_iterations = 50
dimensions = 2
lower_bound = -10.0
upper_bound = 10.0
objective = "sphere"
seed = 1
"#,
    },
];

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

pub fn list_presets() -> &'static [Preset] {
    BUILTIN_PRESETS
}
