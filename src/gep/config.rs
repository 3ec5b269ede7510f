//! GEP run configuration.
//!
//! [`GepConfig`] groups every parameter `MainProcess::run` needs, in the
//! teacher's builder-pattern style
//! (`examples/iyulab-u-metaheur/src/ga/config.rs`).

use crate::error::{GepError, GepResult};

/// Configuration for a single-island GEP run.
///
/// # Defaults
///
/// ```
/// use gep_regress::gep::GepConfig;
///
/// let config = GepConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.chromosome_length, 20);
/// ```
///
/// # Builder pattern
///
/// ```
/// use gep_regress::gep::GepConfig;
///
/// let config = GepConfig::default()
///     .with_population_size(300)
///     .with_chromosome_length(20)
///     .with_bounds(1.0, 4.0)
///     .with_max_generations(100)
///     .with_stop_fitness(0.99)
///     .with_keep(150)
///     .with_mutation_rate(0.1);
/// ```
#[derive(Debug, Clone)]
pub struct GepConfig {
    /// Number of chromosomes in the population (`N`).
    pub population_size: usize,
    /// Genes per chromosome (`L`). Must be at least [`Chromosome::MIN_LENGTH`](super::chromosome::Chromosome::MIN_LENGTH).
    pub chromosome_length: usize,
    /// Lower bound for randomly generated `NUMBER` terminals.
    pub init_min: f64,
    /// Upper bound for randomly generated `NUMBER` terminals.
    pub init_max: f64,
    /// Generation cap.
    pub max_generations: usize,
    /// Early-stop threshold: the run halts once the best fitness reaches
    /// this value.
    pub stop_fitness: f64,
    /// Elite count preserved each generation (`1 <= keep <= population_size`).
    pub keep: usize,
    /// Per-gene mutation probability, in `(0, 1]`.
    pub mutation_rate: f64,
    /// Random seed. `None` draws a fresh seed from `rand::random()`.
    pub seed: Option<u64>,
}

impl Default for GepConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            chromosome_length: 20,
            init_min: 1.0,
            init_max: 4.0,
            max_generations: 500,
            stop_fitness: 0.99,
            keep: 50,
            mutation_rate: 0.1,
            seed: None,
        }
    }
}

impl GepConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_chromosome_length(mut self, l: usize) -> Self {
        self.chromosome_length = l;
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.init_min = min;
        self.init_max = max;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_stop_fitness(mut self, f: f64) -> Self {
        self.stop_fitness = f;
        self
    }

    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep;
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The number of offspring produced (and slots overwritten) each
    /// generation: `N - keep`.
    pub fn kill(&self) -> usize {
        self.population_size.saturating_sub(self.keep)
    }

    pub fn validate(&self) -> GepResult<()> {
        use crate::gep::chromosome::Chromosome;

        if self.population_size < 2 {
            return Err(GepError::configuration("population_size must be at least 2"));
        }
        if self.chromosome_length < Chromosome::MIN_LENGTH {
            return Err(GepError::configuration(format!(
                "chromosome_length must be >= {}",
                Chromosome::MIN_LENGTH
            )));
        }
        if self.max_generations == 0 {
            return Err(GepError::configuration("max_generations must be at least 1"));
        }
        if self.keep < 1 || self.keep > self.population_size {
            return Err(GepError::configuration(format!(
                "keep must be in [1, population_size], got keep={} population_size={}",
                self.keep, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) || self.mutation_rate == 0.0 {
            return Err(GepError::configuration("mutation_rate must be in (0, 1]"));
        }
        if self.init_min > self.init_max {
            return Err(GepError::configuration("init_min must be <= init_max"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GepConfig::default().validate().is_ok());
    }

    #[test]
    fn builder_sets_every_field() {
        let config = GepConfig::default()
            .with_population_size(300)
            .with_chromosome_length(20)
            .with_bounds(1.0, 4.0)
            .with_max_generations(100)
            .with_stop_fitness(0.99)
            .with_keep(150)
            .with_mutation_rate(0.1)
            .with_seed(7);

        assert_eq!(config.population_size, 300);
        assert_eq!(config.chromosome_length, 20);
        assert_eq!((config.init_min, config.init_max), (1.0, 4.0));
        assert_eq!(config.max_generations, 100);
        assert!((config.stop_fitness - 0.99).abs() < 1e-12);
        assert_eq!(config.keep, 150);
        assert!((config.mutation_rate - 0.1).abs() < 1e-12);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.kill(), 150);
    }

    #[test]
    fn validate_rejects_short_chromosome() {
        let config = GepConfig::default().with_chromosome_length(4);
        assert!(matches!(config.validate(), Err(GepError::Configuration(_))));
    }

    #[test]
    fn validate_rejects_keep_out_of_range() {
        assert!(GepConfig::default().with_keep(0).validate().is_err());
        let over = GepConfig::default().with_population_size(10).with_keep(11);
        assert!(over.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_mutation_rate() {
        let config = GepConfig::default().with_mutation_rate(0.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn mutation_rate_is_clamped_by_builder() {
        let config = GepConfig::default().with_mutation_rate(5.0);
        assert!((config.mutation_rate - 1.0).abs() < 1e-12);
    }
}
