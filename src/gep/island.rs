//! The island model: `K` independently-owned, independently-seeded
//! [`MainProcess`] instances run in parallel with periodic migration.
//!
//! Grounded against
//! `examples/original_source/src/GeneticAlgorithm/Multithreading.h`.

use super::chromosome::Chromosome;
use super::config::GepConfig;
use super::main_process::MainProcess;
use crate::dataset::Dataset;
use crate::error::{GepError, GepResult};
use crate::rng::{GepRng, MasterRng};
use std::sync::Arc;

/// Owns `Vec<MainProcess>`, nothing else — no shared mutable state between
/// islands during a run (`SPEC_FULL.md` §5).
pub struct IslandModel {
    islands: Vec<MainProcess>,
}

impl IslandModel {
    /// Builds `k` islands, each with the same hyperparameters but an
    /// independent PRNG stream derived from `master_seed`
    /// (`spec.md` §4.7).
    pub fn new(k: usize, config: GepConfig, dataset: Arc<Dataset>, master_seed: u64) -> GepResult<IslandModel> {
        if k < 1 {
            return Err(GepError::configuration("island count must be at least 1"));
        }
        let master = MasterRng::new(master_seed);
        let islands = (0..k)
            .map(|i| MainProcess::new(config.clone(), Arc::clone(&dataset), master.child_rng(i)))
            .collect::<GepResult<Vec<_>>>()?;
        Ok(IslandModel { islands })
    }

    pub fn len(&self) -> usize {
        self.islands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.islands.is_empty()
    }

    pub fn islands(&self) -> &[MainProcess] {
        &self.islands
    }

    /// Runs every island's `MainProcess::run` concurrently, one thread per
    /// island, and joins all of them before returning
    /// (`spec.md` §4.7, §5).
    pub fn run(&mut self) -> GepResult<()> {
        std::thread::scope(|scope| {
            let handles: Vec<_> =
                self.islands.iter_mut().map(|island| scope.spawn(move || island.run())).collect();
            join_all(handles)
        })
    }

    /// As [`Self::run`], but resuming every island via `run_continue`.
    pub fn run_continue(
        &mut self,
        max_generations: usize,
        stop_fitness: f64,
        keep: usize,
        mutation_rate: f64,
    ) -> GepResult<()> {
        std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .islands
                .iter_mut()
                .map(|island| scope.spawn(move || island.run_continue(max_generations, stop_fitness, keep, mutation_rate)))
                .collect();
            join_all(handles)
        })
    }

    /// Collects a deep copy of each island's current best, permutes them
    /// with an in-place Fisher–Yates shuffle, and installs copy `i` into
    /// island `i` (`spec.md` §4.7). Grounded against the original's
    /// `for i in 0..K-1: swap(data[i], data[uniform(i..K)])` loop, not a
    /// generic shuffle routine, to match its exact distribution.
    pub fn exchange(&mut self, rng: &mut GepRng) -> GepResult<()> {
        let mut migrants: Vec<Chromosome> =
            self.islands.iter().map(|island| island.best().cloned()).collect::<GepResult<Vec<_>>>()?;

        shuffle_migrants(&mut migrants, rng);

        for (island, migrant) in self.islands.iter_mut().zip(migrants) {
            island.replace_chromosome(migrant)?;
        }
        Ok(())
    }

    /// The maximum best-fitness across islands, ties broken by the lowest
    /// island index.
    pub fn max_fitness(&self) -> GepResult<f64> {
        let mut best = f64::MIN;
        for island in &self.islands {
            let f = island.best_fitness()?;
            if f > best {
                best = f;
            }
        }
        Ok(best)
    }

    /// The chromosome achieving [`Self::max_fitness`], ties broken by the
    /// lowest island index.
    pub fn best_chromosome(&self) -> GepResult<&Chromosome> {
        let mut best_idx = 0usize;
        let mut best_fitness = f64::MIN;
        for (i, island) in self.islands.iter().enumerate() {
            let f = island.best_fitness()?;
            if f > best_fitness {
                best_fitness = f;
                best_idx = i;
            }
        }
        self.islands[best_idx].best()
    }
}

/// In-place Fisher–Yates permutation of the migrant copies, grounded
/// against the original's `for i in 0..K-1: swap(data[i], data[uniform(i..K)])`
/// loop rather than a generic shuffle routine, to match its exact
/// distribution. Pulled out of [`IslandModel::exchange`] so invariant 8
/// (the multiset of migrants is unchanged by the permutation) can be
/// tested directly against this function instead of against island
/// `best()`s, which the permutation does not preserve (a migrated copy can
/// outrank — and become the new `best()` of — its destination island).
fn shuffle_migrants(migrants: &mut [Chromosome], rng: &mut GepRng) {
    let k = migrants.len();
    for i in 0..k.saturating_sub(1) {
        let j = rng.gen_range_usize(i, k);
        migrants.swap(i, j);
    }
}

fn join_all(handles: Vec<std::thread::ScopedJoinHandle<'_, GepResult<()>>>) -> GepResult<()> {
    let mut first_err = None;
    for handle in handles {
        let result = handle.join().expect("island thread panicked");
        if let Err(e) = result {
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
