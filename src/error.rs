//! Typed error taxonomy for the GEP engine.
//!
//! All fatal conditions described in the specification — malformed
//! configuration, chromosome decoding corruption, and out-of-range slot
//! access — surface as a [`GepError`] instead of a panic or a raw string.
//! The only numeric condition that is *not* an error is protected division,
//! which silently returns `0.0` (see [`crate::op::Op::eval`]).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type GepResult<T> = Result<T, GepError>;

/// Fatal errors raised by the GEP engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GepError {
    /// A programmer error in the parameters passed to a constructor or
    /// `run`/`run_continue` call: chromosome length too short, elite count
    /// larger than the population, fewer than one island, mismatched
    /// crossover operand lengths, and similar.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Chromosome decoding ran past the end of the genome. Under the
    /// head/tail invariant this must never happen; seeing it means a
    /// chromosome was constructed or mutated in violation of that
    /// invariant.
    #[error("chromosome decoding failed: {0}")]
    Decoding(String),

    /// A gene or chromosome slot was addressed outside its valid range.
    #[error("index {index} out of range (length {length})")]
    OutOfRange { index: usize, length: usize },
}

impl GepError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        GepError::Configuration(message.into())
    }

    pub(crate) fn decoding(message: impl Into<String>) -> Self {
        GepError::Decoding(message.into())
    }

    pub(crate) fn out_of_range(index: usize, length: usize) -> Self {
        GepError::OutOfRange { index, length }
    }
}
