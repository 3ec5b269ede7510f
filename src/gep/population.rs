//! A fixed-size, value-owning slot array of chromosomes with a cached best.

use super::chromosome::Chromosome;
use crate::dataset::Dataset;
use crate::error::{GepError, GepResult};
use std::cell::Cell;
use std::cmp::Ordering;
use std::sync::Arc;

/// Owns every chromosome outright: replacing a slot drops its previous
/// occupant (`spec.md` §4.5 "ownership transfers; previous occupant
/// destroyed unless identical").
pub struct Population {
    chromosomes: Vec<Chromosome>,
    dataset: Arc<Dataset>,
    /// `None` means the cached best is stale and must be rescanned.
    best_index: Cell<Option<usize>>,
}

impl Population {
    pub fn new(chromosomes: Vec<Chromosome>, dataset: Arc<Dataset>) -> Population {
        Population { chromosomes, dataset, best_index: Cell::new(None) }
    }

    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    pub fn get(&self, index: usize) -> GepResult<&Chromosome> {
        self.chromosomes
            .get(index)
            .ok_or_else(|| GepError::out_of_range(index, self.chromosomes.len()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chromosome> {
        self.chromosomes.iter()
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Installs `chromosome` at `index`, updating the best cache per the
    /// Open Question resolution in `SPEC_FULL.md` §9 / `DESIGN.md`: slot
    /// identity stands in for the original's pointer-identity check, since
    /// value-owning slots have no other notion of "the same occupant."
    pub fn set(&mut self, index: usize, chromosome: Chromosome) -> GepResult<()> {
        let len = self.chromosomes.len();
        if index >= len {
            return Err(GepError::out_of_range(index, len));
        }
        if let Some(best_idx) = self.best_index.get() {
            if index != best_idx {
                let best_fitness = self.chromosomes[best_idx].fitness(&self.dataset)?;
                let newcomer_fitness = chromosome.fitness(&self.dataset)?;
                if newcomer_fitness >= best_fitness {
                    self.best_index.set(None);
                }
            }
            // index == best_idx: installing into the cached-best slot itself
            // is treated as a replace-with-self; the cache stays valid.
        }
        self.chromosomes[index] = chromosome;
        Ok(())
    }

    /// The index of the highest-fitness individual, using and refreshing
    /// the cache. Per the source's documented quirk (`spec.md` §9), the
    /// scan's running maximum starts at `f64::MIN`, which is sound because
    /// fitness is always strictly positive (`1 / (err + 0.1) > 0`).
    pub fn best_index(&self) -> GepResult<usize> {
        if let Some(idx) = self.best_index.get() {
            return Ok(idx);
        }
        let mut best = 0usize;
        let mut best_fitness = f64::MIN;
        for (i, c) in self.chromosomes.iter().enumerate() {
            let f = c.fitness(&self.dataset)?;
            if f > best_fitness {
                best_fitness = f;
                best = i;
            }
        }
        self.best_index.set(Some(best));
        Ok(best)
    }

    pub fn best(&self) -> GepResult<&Chromosome> {
        let idx = self.best_index()?;
        self.get(idx)
    }

    pub fn best_fitness(&self) -> GepResult<f64> {
        self.best()?.fitness(&self.dataset)
    }

    /// Sorts descending by fitness; marks the cache valid with index 0
    /// (invariant 6).
    pub fn sort(&mut self) -> GepResult<()> {
        let mut fitnesses = Vec::with_capacity(self.chromosomes.len());
        for c in &self.chromosomes {
            fitnesses.push(c.fitness(&self.dataset)?);
        }
        let mut order: Vec<usize> = (0..self.chromosomes.len()).collect();
        order.sort_by(|&a, &b| fitnesses[b].partial_cmp(&fitnesses[a]).unwrap_or(Ordering::Equal));
        self.chromosomes = order.into_iter().map(|i| self.chromosomes[i].clone()).collect();
        self.best_index.set(Some(0));
        Ok(())
    }
}
