//! `Op`: the tagged value every chromosome gene and tree node holds.
//!
//! An `Op` is either an **operator** (a head-slot symbol: `ADD`, `SUB`,
//! `MUL`, `DIV`, `SIN`, or the `END` sentinel) or a **terminal** (a
//! tail-slot value: a bounded `NUMBER` or a `VARIABLE` standing for the
//! current sample's `x`). The side tag used by decoding and printing lives
//! on the tree node, not on `Op` itself — see [`crate::tree`].

use crate::rng::GepRng;
use std::fmt;

/// The six operator symbols a head slot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Sin,
    /// Sentinel: redirects subtree expansion to the first tail slot.
    End,
}

impl OperatorKind {
    const ALL: [OperatorKind; 6] = [
        OperatorKind::Add,
        OperatorKind::Sub,
        OperatorKind::Mul,
        OperatorKind::Div,
        OperatorKind::Sin,
        OperatorKind::End,
    ];

    /// Number of children this operator consumes during decoding.
    ///
    /// `END` has arity 0: it never gets its own children filled, it
    /// redirects a slot requested by its *parent* to a tail terminal.
    pub fn arity(self) -> usize {
        match self {
            OperatorKind::Add | OperatorKind::Sub | OperatorKind::Mul | OperatorKind::Div => 2,
            OperatorKind::Sin => 1,
            OperatorKind::End => 0,
        }
    }
}

/// A single gene: either an operator or a terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Operator(OperatorKind),
    Number { value: f64, min: f64, max: f64 },
    Variable { min: f64, max: f64 },
}

/// Denominators smaller than this in magnitude make `DIV` return `0.0`
/// instead of dividing, per the protected-division rule.
pub const DIV_EPSILON: f64 = 1e-18;

impl Op {
    /// A fresh `NUMBER` with a value drawn uniformly from `[min, max]`.
    pub fn random_number(min: f64, max: f64, rng: &mut GepRng) -> Op {
        Op::Number {
            value: rng.gen_range_f64(min, max),
            min,
            max,
        }
    }

    /// A fresh operator, uniform over all six symbols (including `END`).
    pub fn random_operator(rng: &mut GepRng) -> Op {
        let idx = rng.gen_range_usize(0, OperatorKind::ALL.len());
        Op::Operator(OperatorKind::ALL[idx])
    }

    /// A fresh terminal: `NUMBER` with probability 1/2, else `VARIABLE`.
    pub fn random_terminal(min: f64, max: f64, rng: &mut GepRng) -> Op {
        if rng.gen_bool(0.5) {
            Op::random_number(min, max, rng)
        } else {
            Op::Variable { min, max }
        }
    }

    /// A structurally identical `Op`: same operator kind, or same terminal
    /// kind and bounds (and, for `NUMBER`, the same value). Any side tag
    /// carried by the *caller's* tree node is not part of `Op` and so is
    /// never copied — a fresh node built from this `Op` starts `Unset`.
    pub fn create_like(source: &Op) -> Op {
        source.clone()
    }

    pub fn arity(&self) -> usize {
        match self {
            Op::Operator(kind) => kind.arity(),
            Op::Number { .. } | Op::Variable { .. } => 0,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Op::Operator(_))
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_operator()
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Op::Operator(OperatorKind::End))
    }

    /// The terminal's configured bounds, if this is a terminal.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Op::Number { min, max, .. } => Some((*min, *max)),
            Op::Variable { min, max } => Some((*min, *max)),
            Op::Operator(_) => None,
        }
    }

    /// The value of a `NUMBER` terminal, evaluated at the current `x` for
    /// a `VARIABLE` terminal. Panics if called on an operator; callers
    /// only invoke this on tree leaves, which are always terminals by
    /// construction.
    pub fn leaf_value(&self, x: f64) -> f64 {
        match self {
            Op::Number { value, .. } => *value,
            Op::Variable { .. } => x,
            Op::Operator(_) => panic!("leaf_value called on an operator Op"),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Number { value, .. } => {
                if *value < 0.0 {
                    write!(f, "({value})")
                } else {
                    write!(f, "{value}")
                }
            }
            Op::Variable { .. } => write!(f, "x"),
            Op::Operator(kind) => write!(f, "{kind:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_number_stays_in_bounds() {
        let mut rng = GepRng::seed(1);
        for _ in 0..500 {
            match Op::random_number(-2.0, 5.0, &mut rng) {
                Op::Number { value, min, max } => {
                    assert!((min..=max).contains(&value));
                    assert_eq!((min, max), (-2.0, 5.0));
                }
                _ => panic!("expected a Number"),
            }
        }
    }

    #[test]
    fn random_operator_is_one_of_six() {
        let mut rng = GepRng::seed(2);
        for _ in 0..500 {
            let op = Op::random_operator(&mut rng);
            assert!(op.is_operator());
            assert!(op.arity() <= 2);
        }
    }

    #[test]
    fn random_terminal_is_never_an_operator() {
        let mut rng = GepRng::seed(3);
        for _ in 0..500 {
            let op = Op::random_terminal(0.0, 1.0, &mut rng);
            assert!(op.is_terminal());
        }
    }

    #[test]
    fn create_like_preserves_kind_and_bounds_and_resets_side() {
        let number = Op::Number { value: 3.5, min: 0.0, max: 10.0 };
        let copy = Op::create_like(&number);
        assert_eq!(copy, number);

        let variable = Op::Variable { min: -1.0, max: 1.0 };
        assert_eq!(Op::create_like(&variable), variable);

        let op = Op::Operator(OperatorKind::Sin);
        assert_eq!(Op::create_like(&op), op);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn create_like_preserves_kind_and_bounds_for_any_seed(seed in any::<u64>()) {
                let mut rng = GepRng::seed(seed);

                let op = Op::random_operator(&mut rng);
                prop_assert_eq!(Op::create_like(&op), op);

                let terminal = Op::random_terminal(-5.0, 5.0, &mut rng);
                let copy = Op::create_like(&terminal);
                prop_assert_eq!(
                    std::mem::discriminant(&copy),
                    std::mem::discriminant(&terminal)
                );
                prop_assert_eq!(copy.bounds(), terminal.bounds());
            }
        }
    }

    #[test]
    fn arity_matches_spec() {
        assert_eq!(OperatorKind::Add.arity(), 2);
        assert_eq!(OperatorKind::Sub.arity(), 2);
        assert_eq!(OperatorKind::Mul.arity(), 2);
        assert_eq!(OperatorKind::Div.arity(), 2);
        assert_eq!(OperatorKind::Sin.arity(), 1);
        assert_eq!(OperatorKind::End.arity(), 0);
        assert_eq!(Op::Number { value: 0.0, min: 0.0, max: 1.0 }.arity(), 0);
        assert_eq!(Op::Variable { min: 0.0, max: 1.0 }.arity(), 0);
    }
}
