//! The single-island evolutionary loop: selection, crossover, mutation,
//! replacement, and ranking over one owned [`Population`].
//!
//! Grounded line-for-line against
//! `examples/original_source/src/GeneticAlgorithm/MainProcess.h`.

use super::chromosome::Chromosome;
use super::config::GepConfig;
use super::population::Population;
use crate::dataset::Dataset;
use crate::error::{GepError, GepResult};
use crate::rng::GepRng;
use std::sync::Arc;

/// A single, sequential GEP run: one population, one RNG stream, one
/// thread. Never spawns (`SPEC_FULL.md` §5).
pub struct MainProcess {
    config: GepConfig,
    population: Population,
    rng: GepRng,
    generation: usize,
}

impl MainProcess {
    /// Builds the initial random population and performs the first
    /// evaluate/rank pass (`spec.md` §4.6 steps 1–2).
    pub fn new(config: GepConfig, dataset: Arc<Dataset>, mut rng: GepRng) -> GepResult<MainProcess> {
        config.validate()?;

        let chromosomes = (0..config.population_size)
            .map(|_| Chromosome::random(config.chromosome_length, config.init_min, config.init_max, &mut rng))
            .collect::<GepResult<Vec<_>>>()?;
        let mut population = Population::new(chromosomes, dataset);

        if config.keep > 1 {
            population.sort()?;
        } else {
            population.best_index()?;
        }

        Ok(MainProcess { config, population, rng, generation: 0 })
    }

    /// Convenience constructor seeding its own RNG from `config.seed`
    /// (or OS entropy if unset), as the single-process entry point.
    pub fn with_seed(config: GepConfig, dataset: Arc<Dataset>) -> GepResult<MainProcess> {
        let rng = match config.seed {
            Some(seed) => GepRng::seed(seed),
            None => GepRng::seed(rand::random()),
        };
        Self::new(config, dataset, rng)
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn best(&self) -> GepResult<&Chromosome> {
        self.population.best()
    }

    pub fn best_fitness(&self) -> GepResult<f64> {
        self.population.best_fitness()
    }

    /// Runs generations until `max_generations` is reached or the best
    /// fitness meets `stop_fitness` (`spec.md` §4.6 step 3).
    pub fn run(&mut self) -> GepResult<()> {
        while self.generation < self.config.max_generations
            && self.population.best_fitness()? < self.config.stop_fitness
        {
            self.step()?;
        }
        Ok(())
    }

    /// Resumes with possibly changed `keep`/`stop_fitness`/`max_generations`/
    /// mutation rate. If `keep` was 1 and is now `>1`, sorts immediately to
    /// restore the sorted-prefix invariant before continuing
    /// (`spec.md` §4.6).
    pub fn run_continue(
        &mut self,
        max_generations: usize,
        stop_fitness: f64,
        keep: usize,
        mutation_rate: f64,
    ) -> GepResult<()> {
        let previous_keep = self.config.keep;
        self.config.max_generations = max_generations;
        self.config.stop_fitness = stop_fitness;
        self.config.keep = keep;
        self.config.mutation_rate = mutation_rate;
        self.config.validate()?;

        if previous_keep <= 1 && keep > 1 {
            self.population.sort()?;
        }

        self.run()
    }

    /// Installs `chromosome` into some non-best slot, scanning from the
    /// tail forward (`spec.md` §4.6).
    pub fn replace_chromosome(&mut self, chromosome: Chromosome) -> GepResult<()> {
        let best_idx = self.population.best_index()?;
        let len = self.population.len();
        let target = (0..len).rev().find(|&i| i != best_idx).unwrap_or(best_idx);
        self.population.set(target, chromosome)
    }

    fn step(&mut self) -> GepResult<()> {
        let kill = self.config.kill();
        if kill == 0 {
            self.generation += 1;
            return Ok(());
        }

        let parents = self.select_parents(2 * kill);
        let mut offspring = Vec::with_capacity(kill);
        for pair in parents.chunks(2) {
            let (a, b) = (pair[0], pair[1]);
            let mut child = self.population.get(a)?.crossover(self.population.get(b)?, &mut self.rng)?;
            child.mutate(self.config.mutation_rate, &mut self.rng)?;
            offspring.push(child);
        }

        self.replace(offspring)?;

        if self.config.keep > 1 {
            self.population.sort()?;
        } else {
            self.population.best_index()?;
        }

        self.generation += 1;
        Ok(())
    }

    /// Binary tournament: for each parent slot, draw two uniform random
    /// indices and keep the higher-fitness one, ties broken by the first
    /// draw (`spec.md` §4.6).
    fn select_parents(&mut self, count: usize) -> Vec<usize> {
        let n = self.population.len();
        (0..count)
            .map(|_| {
                let a = self.rng.gen_range_usize(0, n);
                let b = self.rng.gen_range_usize(0, n);
                let fa = self.population.get(a).and_then(|c| c.fitness(self.population.dataset())).unwrap_or(f64::MIN);
                let fb = self.population.get(b).and_then(|c| c.fitness(self.population.dataset())).unwrap_or(f64::MIN);
                if fb > fa {
                    b
                } else {
                    a
                }
            })
            .collect()
    }

    /// If `keep > 1`, overwrites slots `[keep, N)` in order (assumes the
    /// population is sorted descending). If `keep == 1`, walks the
    /// population and overwrites every non-best slot in turn — an
    /// intentional optimization avoiding a full sort every generation
    /// (`spec.md` §4.6d).
    fn replace(&mut self, offspring: Vec<Chromosome>) -> GepResult<()> {
        if self.config.keep > 1 {
            for (i, child) in offspring.into_iter().enumerate() {
                self.population.set(self.config.keep + i, child)?;
            }
            return Ok(());
        }

        let best_idx = self.population.best_index()?;
        let mut offspring = offspring.into_iter();
        for slot in 0..self.population.len() {
            if slot == best_idx {
                continue;
            }
            match offspring.next() {
                Some(child) => self.population.set(slot, child)?,
                None => break,
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MainProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainProcess")
            .field("generation", &self.generation)
            .field("population_size", &self.population.len())
            .finish()
    }
}
