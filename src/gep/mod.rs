//! The Gene Expression Programming engine: chromosome encoding, decoding
//! into expression trees, a single-island evolutionary loop, and a
//! parallel island model with migration.

pub mod chromosome;
pub mod config;
pub mod island;
pub mod main_process;
pub mod population;

pub use chromosome::Chromosome;
pub use config::GepConfig;
pub use island::IslandModel;
pub use main_process::MainProcess;
pub use population::Population;
