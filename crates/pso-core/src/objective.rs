//! Objective functions to minimize.

use crate::CoreError;
use std::fmt;

/// A function of a position vector; the optimizer minimizes it.
pub trait Objective {
    fn evaluate(&self, x: &[f64]) -> f64;

    /// Smallest position length the function is defined for.
    fn min_dimensions(&self) -> usize {
        1
    }
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        self(x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinObjective {
    /// Sum of squares.
    Sphere,
    /// Schwefel's problem 1.2: sum of squared prefix sums.
    Schwefel,
    /// `x[0] + x[1]`, unbounded below; the optimum sits on the lower corner.
    Table,
}

impl BuiltinObjective {
    pub const ALL: &'static [BuiltinObjective] = &[Self::Sphere, Self::Schwefel, Self::Table];

    pub fn name(self) -> &'static str {
        match self {
            Self::Sphere => "sphere",
            Self::Schwefel => "schwefel",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for BuiltinObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Objective for BuiltinObjective {
    fn evaluate(&self, x: &[f64]) -> f64 {
        match self {
            Self::Sphere => sphere(x),
            Self::Schwefel => schwefel(x),
            Self::Table => table(x),
        }
    }

    fn min_dimensions(&self) -> usize {
        match self {
            Self::Table => 2,
            Self::Sphere | Self::Schwefel => 1,
        }
    }
}

/// Look up a built-in objective by name.
pub fn builtin(name: &str) -> Result<BuiltinObjective, CoreError> {
    BuiltinObjective::ALL
        .iter()
        .copied()
        .find(|o| o.name() == name)
        .ok_or_else(|| CoreError::UnknownObjective {
            name: name.to_owned(),
            known: BuiltinObjective::ALL
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

pub fn schwefel(x: &[f64]) -> f64 {
    x.iter()
        .scan(0.0, |prefix, v| {
            *prefix += v;
            Some(*prefix * *prefix)
        })
        .sum()
}

/// Sum of the first two coordinates. Shorter inputs sum what is there;
/// the optimizer requires two dimensions through `min_dimensions`.
pub fn table(x: &[f64]) -> f64 {
    x.iter().take(2).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_is_sum_of_squares() {
        let var = [1.0, 2.001, 3.8459, 6.0123, 7.9991, 8.4312];
        let expected: f64 = var.iter().map(|v| v * v).sum();
        assert!((sphere(&var) - expected).abs() < 1e-12);
        assert_eq!(sphere(&[0.0; 4]), 0.0);
    }

    #[test]
    fn schwefel_sums_squared_prefixes() {
        // (1)^2 + (1+2)^2 + (1+2+3)^2
        assert_eq!(schwefel(&[1.0, 2.0, 3.0]), 1.0 + 9.0 + 36.0);
        assert_eq!(schwefel(&[0.0; 5]), 0.0);
    }

    #[test]
    fn table_adds_first_two_coordinates() {
        assert_eq!(table(&[1.5, -4.0]), -2.5);
        assert_eq!(BuiltinObjective::Table.min_dimensions(), 2);
    }

    #[test]
    fn table_tolerates_short_input() {
        assert_eq!(BuiltinObjective::Table.evaluate(&[1.0]), 1.0);
        assert_eq!(BuiltinObjective::Table.evaluate(&[]), 0.0);
        assert_eq!(table(&[1.0, 2.0, 100.0]), 3.0);
    }

    #[test]
    fn closures_are_objectives() {
        let shifted = |x: &[f64]| (x[0] - 3.0).powi(2);
        assert_eq!(shifted.evaluate(&[3.0]), 0.0);
        assert_eq!(shifted.min_dimensions(), 1);
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(builtin("sphere").unwrap(), BuiltinObjective::Sphere);
        assert_eq!(builtin("schwefel").unwrap(), BuiltinObjective::Schwefel);
        let err = builtin("rosenbrock").unwrap_err();
        assert!(err.to_string().contains("sphere, schwefel, table"), "{err}");
    }
}
