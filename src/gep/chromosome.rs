//! The fixed-length linear genome and its decoding into an expression tree.
//!
//! This is the central algorithm of the whole engine (`SPEC_FULL.md` §4.4):
//! a breadth-first, arity-driven expansion of the head into an expression
//! tree, with the tail supplying terminals and the `END` sentinel
//! redirecting an operator's child slot straight to the first tail gene.

use crate::dataset::Dataset;
use crate::error::{GepError, GepResult};
use crate::op::Op;
use crate::rng::GepRng;
use crate::tree::ExprTree;
use std::cell::Cell;
use std::collections::VecDeque;
use std::fmt;

/// A fixed-length linear genome: `[0, tail_start)` holds operators (the
/// head), `[tail_start, length)` holds terminals (the tail), with
/// `tail_start = length / 2 - 1`.
#[derive(Debug, Clone)]
pub struct Chromosome {
    genes: Vec<Op>,
    fitness_cache: Cell<Option<f64>>,
}

impl Chromosome {
    /// Minimum chromosome length: guarantees enough tail terminals to
    /// satisfy any head that uses only binary operators up to `END`.
    pub const MIN_LENGTH: usize = 8;

    /// Builds a random chromosome: head filled with random operators, tail
    /// with random numbers in `[min, max]`.
    ///
    /// Per the specification's Open Question (`SPEC_FULL.md` §9): the
    /// initial population factory never inserts `VARIABLE` terminals —
    /// only `NUMBER`s. Variables enter the gene pool later, via mutation
    /// and crossover kind-mixing.
    pub fn random(length: usize, min: f64, max: f64, rng: &mut GepRng) -> GepResult<Chromosome> {
        if length < Self::MIN_LENGTH {
            return Err(GepError::configuration(format!(
                "chromosome length must be >= {}, got {length}",
                Self::MIN_LENGTH
            )));
        }
        let tail_start = tail_start_of(length);
        let mut genes = Vec::with_capacity(length);
        for _ in 0..tail_start {
            genes.push(Op::random_operator(rng));
        }
        for _ in tail_start..length {
            genes.push(Op::random_number(min, max, rng));
        }
        Ok(Chromosome { genes, fitness_cache: Cell::new(None) })
    }

    pub fn length(&self) -> usize {
        self.genes.len()
    }

    /// The index where the tail begins: `length / 2 - 1`.
    pub fn tail_start(&self) -> usize {
        tail_start_of(self.genes.len())
    }

    pub fn gene(&self, offset: usize) -> GepResult<&Op> {
        self.genes
            .get(offset)
            .ok_or_else(|| GepError::out_of_range(offset, self.genes.len()))
    }

    /// Replaces the gene at `offset`. Invalidates the fitness cache only
    /// when the replacement differs from the current gene (invariant 5).
    pub fn set_gene(&mut self, offset: usize, value: Op) -> GepResult<()> {
        let len = self.genes.len();
        let slot = self
            .genes
            .get_mut(offset)
            .ok_or_else(|| GepError::out_of_range(offset, len))?;
        if *slot != value {
            *slot = value;
            self.fitness_cache.set(None);
        }
        Ok(())
    }

    /// Decodes the genome into its expression tree (`SPEC_FULL.md` §4.4).
    pub fn build_tree(&self) -> GepResult<ExprTree> {
        if self.genes[0].is_end() {
            return Ok(ExprTree::zero());
        }

        // Arena of (op, child indices) filled breadth-first, then converted
        // into an owning `ExprTree` bottom-up once every slot is resolved.
        struct Pending {
            op: Op,
            children: Vec<usize>,
        }
        let mut arena: Vec<Pending> = vec![Pending { op: self.genes[0].clone(), children: Vec::new() }];
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(0);

        let length = self.genes.len();
        let tail_start = self.tail_start();
        let mut k = 1usize;

        while let Some(parent) = queue.pop_front() {
            let arity = arena[parent].op.arity();
            for _ in 0..arity {
                if k >= length {
                    return Err(GepError::decoding(
                        "decoder ran past the end of the genome before all child slots were filled",
                    ));
                }
                let mut candidate = self.genes[k].clone();
                let enqueue = if candidate.is_end() {
                    k = tail_start;
                    candidate = self.genes[tail_start].clone();
                    false
                } else {
                    candidate.is_operator()
                };
                let idx = arena.len();
                arena.push(Pending { op: candidate, children: Vec::new() });
                arena[parent].children.push(idx);
                if enqueue {
                    queue.push_back(idx);
                }
                k += 1;
            }
        }

        fn assemble(arena: &[Pending], idx: usize) -> ExprTree {
            let node = &arena[idx];
            match node.children.len() {
                0 => ExprTree::Leaf(node.op.clone()),
                1 => ExprTree::Unary(node.op.clone(), Box::new(assemble(arena, node.children[0]))),
                2 => ExprTree::Binary(
                    node.op.clone(),
                    Box::new(assemble(arena, node.children[0])),
                    Box::new(assemble(arena, node.children[1])),
                ),
                n => unreachable!("arity {n} impossible for a decoded node"),
            }
        }

        Ok(assemble(&arena, 0))
    }

    /// `1 / (mean absolute error + 0.1)` over the dataset, cached until the
    /// next gene mutation (invariant 4).
    pub fn fitness(&self, dataset: &Dataset) -> GepResult<f64> {
        if let Some(cached) = self.fitness_cache.get() {
            return Ok(cached);
        }
        let tree = self.build_tree()?;
        let total = dataset.total();
        let err: f64 = (0..total)
            .map(|i| (tree.eval(dataset.input(i)) - dataset.output(i)).abs())
            .sum::<f64>()
            / total as f64;
        let fitness = 1.0 / (err + 0.1);
        self.fitness_cache.set(Some(fitness));
        Ok(fitness)
    }

    /// Recombines `self` and `other` into a new chromosome
    /// (`SPEC_FULL.md` §4.4). Both must share the same length.
    pub fn crossover(&self, other: &Chromosome, rng: &mut GepRng) -> GepResult<Chromosome> {
        if self.length() != other.length() {
            return Err(GepError::configuration(format!(
                "crossover requires equal-length chromosomes, got {} and {}",
                self.length(),
                other.length()
            )));
        }
        let tail_start = self.tail_start();
        let split = rng.gen_range_usize(1, tail_start);

        let mut genes = Vec::with_capacity(self.length());
        for i in 0..split {
            genes.push(Op::create_like(&self.genes[i]));
        }
        for i in split..tail_start {
            genes.push(Op::create_like(&other.genes[i]));
        }
        for i in tail_start..self.length() {
            genes.push(mix_terminal(&self.genes[i], &other.genes[i], rng));
        }

        Ok(Chromosome { genes, fitness_cache: Cell::new(None) })
    }

    /// Mutates each gene independently with probability `r`
    /// (`SPEC_FULL.md` §4.4). Replaced head genes become fresh operators;
    /// replaced tail genes become fresh terminals using the existing
    /// slot's bounds, or `(0, 1)` if none apply.
    pub fn mutate(&mut self, r: f64, rng: &mut GepRng) -> GepResult<()> {
        if r <= 0.0 {
            return Ok(());
        }
        let tail_start = self.tail_start();
        for i in 0..self.length() {
            if rng.gen_bool(r) {
                let replacement = if i < tail_start {
                    Op::random_operator(rng)
                } else {
                    let (min, max) = self.genes[i].bounds().unwrap_or((0.0, 1.0));
                    Op::random_terminal(min, max, rng)
                };
                self.set_gene(i, replacement)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.build_tree() {
            Ok(tree) => write!(f, "{tree}"),
            Err(e) => write!(f, "<{e}>"),
        }
    }
}

fn tail_start_of(length: usize) -> usize {
    length / 2 - 1
}

/// A `NUMBER`'s arithmetic value for crossover mixing; a `VARIABLE` has no
/// fixed value to mix, so it contributes `0.0` to the average (it is never
/// read back out unless the mixed result's chosen kind is itself `NUMBER`,
/// in which case the other parent's value dominates or both are numeric).
fn mixable_value(op: &Op) -> f64 {
    match op {
        Op::Number { value, .. } => *value,
        Op::Variable { .. } => 0.0,
        Op::Operator(_) => unreachable!("tail gene must be a terminal"),
    }
}

fn mix_terminal(a: &Op, b: &Op, rng: &mut GepRng) -> Op {
    let (a_min, a_max) = a.bounds().expect("tail gene must be a terminal");
    let mix = (mixable_value(a) + mixable_value(b)) / 2.0;
    let both_number = matches!(a, Op::Number { .. }) && matches!(b, Op::Number { .. });
    let both_variable = matches!(a, Op::Variable { .. }) && matches!(b, Op::Variable { .. });

    let make_number = if both_number {
        true
    } else if both_variable {
        false
    } else {
        // Differing kinds: choose uniformly between A's and B's kind.
        let chosen = if rng.gen_bool(0.5) { a } else { b };
        matches!(chosen, Op::Number { .. })
    };

    if make_number {
        Op::Number { value: mix, min: a_min, max: a_max }
    } else {
        Op::Variable { min: a_min, max: a_max }
    }
}
