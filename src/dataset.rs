//! The sampled target-function dataset.
//!
//! Treated as an external, read-only collaborator by the specification
//! (§6); the exact sampling scheme is carried over from
//! `examples/original_source/src/Dataset.h` since the distillation left it
//! unspecified beyond "a read-only indexed collaborator."

use std::fmt;

/// `total = sample_total + 2` evenly spaced `(input, output)` pairs of
/// `f(x) = 0.4 * (sin(10x) + sin(20x) + sin(30x))`, sampled (inclusive) from
/// `sample_start` to `sample_end`.
#[derive(Debug, Clone)]
pub struct Dataset {
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl Dataset {
    pub fn new(sample_start: f64, sample_end: f64, sample_total: u64) -> Dataset {
        let size = (sample_total + 2) as usize;
        let interval = (sample_end - sample_start) / (sample_total + 1) as f64;

        let mut inputs = Vec::with_capacity(size);
        inputs.push(sample_start);
        for i in 0..sample_total {
            inputs.push(interval * (i + 1) as f64);
        }
        inputs.push(sample_end);

        let outputs = inputs.iter().copied().map(target_function).collect();

        Dataset { inputs, outputs }
    }

    /// Number of `(input, output)` pairs: `sample_total + 2`.
    pub fn total(&self) -> u64 {
        self.inputs.len() as u64
    }

    pub fn input(&self, i: u64) -> f64 {
        self.inputs[i as usize]
    }

    pub fn output(&self, i: u64) -> f64 {
        self.outputs[i as usize]
    }
}

impl Default for Dataset {
    /// `Dataset::new(0.0, 1.0, 100)`, giving `total() == 102`.
    fn default() -> Self {
        Dataset::new(0.0, 1.0, 100)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset({} points, x in [{}, {}])",
            self.total(),
            self.inputs.first().copied().unwrap_or(0.0),
            self.inputs.last().copied().unwrap_or(0.0)
        )
    }
}

fn target_function(x: f64) -> f64 {
    0.4 * ((10.0 * x).sin() + (20.0 * x).sin() + (30.0 * x).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dataset_matches_scenario_s1() {
        let d = Dataset::default();
        assert_eq!(d.total(), 102);
        assert_eq!(d.input(0), 0.0);
        assert_eq!(d.input(101), 1.0);
        for i in 0..d.total() {
            let x = d.input(i);
            let expected = 0.4 * ((10.0 * x).sin() + (20.0 * x).sin() + (30.0 * x).sin());
            assert_eq!(d.output(i), expected);
        }
    }

    #[test]
    fn interior_points_are_evenly_spaced() {
        let d = Dataset::new(0.0, 10.0, 4);
        assert_eq!(d.total(), 6);
        let expected = [0.0, 2.0, 4.0, 6.0, 8.0, 10.0];
        for (i, &e) in expected.iter().enumerate() {
            assert!((d.input(i as u64) - e).abs() < 1e-9);
        }
    }

    #[test]
    fn single_point_range_endpoints() {
        let d = Dataset::new(-1.0, 1.0, 0);
        assert_eq!(d.total(), 2);
        assert_eq!(d.input(0), -1.0);
        assert_eq!(d.input(1), 1.0);
    }
}
