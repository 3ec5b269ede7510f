//! The expression tree a chromosome decodes into.
//!
//! A single owning recursive enum (see `SPEC_FULL.md` §4.3) rather than an
//! arena of indexed nodes: trees here are small, rebuilt on every fitness
//! evaluation, and never mutated after construction, so `Box` ownership is
//! simpler than index-stable arena bookkeeping and needs none of it.

use crate::op::{Op, OperatorKind};
use std::fmt;

/// A node in the decoded expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprTree {
    /// A terminal: `NUMBER` or `VARIABLE`.
    Leaf(Op),
    /// `SIN` applied to one child.
    Unary(Op, Box<ExprTree>),
    /// `ADD`/`SUB`/`MUL`/`DIV` applied to two children, in decoded order.
    Binary(Op, Box<ExprTree>, Box<ExprTree>),
}

impl ExprTree {
    /// The constant-0 tree decoded when `gene[0]` is `END`.
    pub fn zero() -> ExprTree {
        ExprTree::Leaf(Op::Number { value: 0.0, min: 0.0, max: 0.0 })
    }

    /// Evaluates the tree at the given `x`. `DIV` is protected: a
    /// denominator smaller in magnitude than [`crate::op::DIV_EPSILON`]
    /// yields `0.0` instead of dividing.
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            ExprTree::Leaf(op) => op.leaf_value(x),
            ExprTree::Unary(op, child) => {
                let v = child.eval(x);
                match op {
                    Op::Operator(OperatorKind::Sin) => v.sin(),
                    _ => unreachable!("Unary node must hold SIN"),
                }
            }
            ExprTree::Binary(op, left, right) => {
                let l = left.eval(x);
                let r = right.eval(x);
                match op {
                    Op::Operator(OperatorKind::Add) => l + r,
                    Op::Operator(OperatorKind::Sub) => l - r,
                    Op::Operator(OperatorKind::Mul) => l * r,
                    Op::Operator(OperatorKind::Div) => {
                        if r.abs() < crate::op::DIV_EPSILON {
                            0.0
                        } else {
                            l / r
                        }
                    }
                    _ => unreachable!("Binary node must hold ADD/SUB/MUL/DIV"),
                }
            }
        }
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprTree::Leaf(op) => write!(f, "{op}"),
            ExprTree::Unary(_, child) => write!(f, "sin({child})"),
            ExprTree::Binary(op, left, right) => {
                let symbol = match op {
                    Op::Operator(OperatorKind::Add) => "+",
                    Op::Operator(OperatorKind::Sub) => "-",
                    Op::Operator(OperatorKind::Mul) => "*",
                    Op::Operator(OperatorKind::Div) => "/",
                    _ => unreachable!("Binary node must hold ADD/SUB/MUL/DIV"),
                };
                write!(f, "({left}{symbol}{right})")
            }
        }
    }
}
