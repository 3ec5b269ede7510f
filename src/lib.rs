//! Gene Expression Programming engine for univariate symbolic regression.
//!
//! A linear chromosome (head of operators, tail of terminals) decodes
//! breadth-first into an expression tree; a single-island
//! [`gep::MainProcess`] evolves a population of chromosomes against a
//! sampled target function, and [`gep::IslandModel`] runs several such
//! populations in parallel with periodic migration.
//!
//! A second, independent track — [`adam::SineCells`] — fits a sum of sine
//! terms to the same kind of dataset by full-batch Adam, as a baseline
//! unrelated to the evolutionary core.
//!
//! # Example
//!
//! ```
//! use gep_regress::dataset::Dataset;
//! use gep_regress::gep::{GepConfig, MainProcess};
//! use std::sync::Arc;
//!
//! let config = GepConfig::default()
//!     .with_population_size(60)
//!     .with_chromosome_length(12)
//!     .with_max_generations(5)
//!     .with_keep(30)
//!     .with_seed(1);
//!
//! let mut process = MainProcess::with_seed(config, Arc::new(Dataset::default())).unwrap();
//! process.run().unwrap();
//! println!("best fitness: {}", process.best_fitness().unwrap());
//! ```

pub mod adam;
pub mod dataset;
pub mod error;
pub mod gep;
pub mod op;
pub mod rng;
pub mod tree;
