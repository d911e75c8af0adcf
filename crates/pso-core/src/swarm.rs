use serde::Serialize;

/// Best position seen so far and its fitness (lower is better).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Best {
    pub position: Vec<f64>,
    pub fitness: f64,
}

impl Best {
    fn unset(dimensions: usize) -> Self {
        Self {
            position: vec![0.0; dimensions],
            fitness: f64::INFINITY,
        }
    }

    /// Replace the record when `fitness` is strictly better.
    pub fn offer(&mut self, position: &[f64], fitness: f64) -> bool {
        if fitness < self.fitness {
            self.position.clear();
            self.position.extend_from_slice(position);
            self.fitness = fitness;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub best_local: Best,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Swarm {
    pub particles: Vec<Particle>,
    pub best_global: Best,
}

impl Swarm {
    /// A swarm with every vector zeroed and every best unset.
    pub fn new(dimensions: usize, particles: usize) -> Self {
        let particle = Particle {
            position: vec![0.0; dimensions],
            velocity: vec![0.0; dimensions],
            best_local: Best::unset(dimensions),
        };
        Self {
            particles: vec![particle; particles],
            best_global: Best::unset(dimensions),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
