//! A sum of `total` sine cells, `ŷ(x) = Σⱼ kⱼ·sin(aⱼ·x + bⱼ)`, fit by Adam.
//!
//! Independent of the GEP engine (`spec.md` §4.8); grounded against
//! `examples/original_source/src/Experiment/SineCells.h`.

use super::config::AdamConfig;
use crate::error::{GepError, GepResult};
use crate::rng::GepRng;
use std::fmt;

/// `k`, `a`, and `b` are parallel arrays, one entry per sine cell.
#[derive(Debug, Clone)]
pub struct SineCells {
    k: Vec<f64>,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl SineCells {
    /// Builds `total` sine cells with every coefficient drawn uniformly
    /// from `[min, max]`.
    pub fn new(total: usize, min: f64, max: f64, rng: &mut GepRng) -> GepResult<SineCells> {
        if total == 0 {
            return Err(GepError::configuration("sine cell total must be at least 1"));
        }
        let mut k = Vec::with_capacity(total);
        let mut a = Vec::with_capacity(total);
        let mut b = Vec::with_capacity(total);
        for _ in 0..total {
            k.push(rng.gen_range_f64(min, max));
            a.push(rng.gen_range_f64(min, max));
            b.push(rng.gen_range_f64(min, max));
        }
        Ok(SineCells { k, a, b })
    }

    pub fn total(&self) -> usize {
        self.k.len()
    }

    /// `Σⱼ kⱼ·sin(aⱼ·x + bⱼ)`.
    pub fn predict(&self, x: f64) -> f64 {
        self.k.iter().zip(&self.a).zip(&self.b).map(|((k, a), b)| k * (a * x + b).sin()).sum()
    }

    /// Fits the cells by full-batch Adam: gradients are accumulated over
    /// the entire dataset before each per-parameter update, matching the
    /// original's `fit()` loop exactly (not mini-batch).
    ///
    /// `callback`, if given, is invoked after every epoch with
    /// `(epoch_number, mean_squared_error)`.
    pub fn fit(
        &mut self,
        input: impl Fn(u64) -> f64,
        output: impl Fn(u64) -> f64,
        size_of_dataset: u64,
        config: &AdamConfig,
        mut callback: Option<&mut dyn FnMut(u64, f64)>,
    ) -> GepResult<()> {
        config.validate()?;
        let total = self.total();

        let mut mk = vec![0.0; total];
        let mut ma = vec![0.0; total];
        let mut mb = vec![0.0; total];
        let mut vk = vec![0.0; total];
        let mut va = vec![0.0; total];
        let mut vb = vec![0.0; total];

        for epoch in 0..config.epochs {
            let mut gk = vec![0.0; total];
            let mut ga = vec![0.0; total];
            let mut gb = vec![0.0; total];
            let mut errors = 0.0;

            for i in 0..size_of_dataset {
                let hx = input(i);
                let hy = output(i);
                let y = self.predict(hx);
                let error = y - hy;
                errors += error * error / 2.0;
                let derror = error;

                for j in 0..total {
                    let axb = self.a[j] * hx + self.b[j];
                    let sinaxb = axb.sin();
                    let tmp = derror * self.k[j] * axb.cos();
                    gk[j] += derror * sinaxb;
                    ga[j] += tmp * hx;
                    gb[j] += tmp;
                }
            }

            for j in 0..total {
                adam_step(&mut self.k[j], &mut mk[j], &mut vk[j], gk[j], config);
                adam_step(&mut self.a[j], &mut ma[j], &mut va[j], ga[j], config);
                adam_step(&mut self.b[j], &mut mb[j], &mut vb[j], gb[j], config);
            }

            if let Some(cb) = callback.as_deref_mut() {
                cb(epoch as u64 + 1, errors / size_of_dataset as f64);
            }
        }
        Ok(())
    }
}

fn adam_step(param: &mut f64, m: &mut f64, v: &mut f64, grad: f64, config: &AdamConfig) {
    *m = config.beta1 * *m + (1.0 - config.beta1) * grad;
    *v = config.beta2 * *v + (1.0 - config.beta2) * grad * grad;
    let mhat = *m / (1.0 - config.beta1);
    let vhat = *v / (1.0 - config.beta2);
    *param -= config.lr * mhat / (vhat.sqrt() + config.epsilon);
}

impl fmt::Display for SineCells {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.total() {
            if i > 0 && self.k[i] > 0.0 {
                write!(f, "+")?;
            }
            write!(f, "{}*sin({}*x", self.k[i], self.a[i])?;
            if self.b[i] > 0.0 {
                write!(f, "+")?;
            }
            write!(f, "{})", self.b[i])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    #[test]
    fn new_rejects_zero_cells() {
        let mut rng = GepRng::seed(1);
        assert!(matches!(SineCells::new(0, -1.0, 1.0, &mut rng), Err(GepError::Configuration(_))));
    }

    #[test]
    fn cells_stay_within_init_bounds() {
        let mut rng = GepRng::seed(2);
        let cells = SineCells::new(6, -0.5, 0.5, &mut rng).unwrap();
        for &v in cells.k.iter().chain(&cells.a).chain(&cells.b) {
            assert!((-0.5..=0.5).contains(&v));
        }
    }

    #[test]
    fn fitting_reduces_mean_squared_error_on_the_target_dataset() {
        let dataset = Dataset::default();
        let mut rng = GepRng::seed(3);
        let mut cells = SineCells::new(3, -1.0, 1.0, &mut rng).unwrap();

        let initial_mse: f64 = (0..dataset.total())
            .map(|i| {
                let e = cells.predict(dataset.input(i)) - dataset.output(i);
                e * e
            })
            .sum::<f64>()
            / dataset.total() as f64;

        let config = AdamConfig::default().with_epochs(200).with_lr(0.05);
        cells
            .fit(|i| dataset.input(i), |i| dataset.output(i), dataset.total(), &config, None)
            .unwrap();

        let final_mse: f64 = (0..dataset.total())
            .map(|i| {
                let e = cells.predict(dataset.input(i)) - dataset.output(i);
                e * e
            })
            .sum::<f64>()
            / dataset.total() as f64;

        assert!(final_mse < initial_mse, "expected MSE to drop, got {initial_mse} -> {final_mse}");
    }

    #[test]
    fn callback_fires_once_per_epoch_with_mean_squared_error() {
        let dataset = Dataset::new(0.0, 1.0, 10);
        let mut rng = GepRng::seed(4);
        let mut cells = SineCells::new(2, -1.0, 1.0, &mut rng).unwrap();
        let config = AdamConfig::default().with_epochs(5);

        let mut calls = Vec::new();
        let mut callback = |epoch: u64, mse: f64| calls.push((epoch, mse));
        cells
            .fit(|i| dataset.input(i), |i| dataset.output(i), dataset.total(), &config, Some(&mut callback))
            .unwrap();

        assert_eq!(calls.len(), 5);
        assert_eq!(calls.iter().map(|(e, _)| *e).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        for (_, mse) in &calls {
            assert!(*mse >= 0.0);
        }
    }

    #[test]
    fn display_prints_sign_aware_terms() {
        let cells = SineCells { k: vec![2.0, -3.0], a: vec![1.0, -1.0], b: vec![0.5, -0.5] };
        assert_eq!(format!("{cells}"), "2*sin(1*x+0.5)-3*sin(-1*x-0.5)");
    }
}
