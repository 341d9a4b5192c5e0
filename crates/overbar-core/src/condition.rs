//! Boolean gating conditions over a subject pair.
//!
//! A layout's condition is built once from its configured sub-conditions and
//! evaluated every tick. Each sub-condition is a comparison of two
//! placeholder expressions; sub-conditions fold left-to-right into a single
//! predicate, each combined with the accumulator through its `gate`
//! (AND/OR), starting from the constant TRUE.
//!
//! The condition is a tagged expression tree rather than a closure chain, so
//! composition order is auditable and evaluation is a pure recursive
//! dispatch with no captured mutable state.
//!
//! # Example
//!
//! ```
//! use overbar_core::condition::{Condition, ConditionConfig};
//! use overbar_core::placeholder::Placeholders;
//! use overbar_core::subject::{Subject, SubjectPair};
//!
//! let placeholders = Placeholders::standard();
//! let configs: Vec<ConditionConfig> = serde_json::from_value(serde_json::json!([
//!     { "left": "percent", "op": "<", "right": "50" }
//! ])).unwrap();
//! let condition = Condition::build(&configs, &placeholders).unwrap();
//!
//! let pair = SubjectPair::new(
//!     Subject::new("Zombie", 4.0, 20.0),
//!     Subject::new("Steve", 20.0, 20.0),
//! );
//! assert!(condition.eval(&pair));
//! ```

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::placeholder::{ExprError, Placeholder, Placeholders, Value};
use crate::subject::SubjectPair;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while building a condition.
#[derive(Debug, Error)]
pub enum ConditionError {
    /// A sub-condition named a gate other than `and`/`or`.
    #[error("unsupported gate '{gate}' (expected 'and' or 'or')")]
    UnsupportedGate { gate: String },

    /// A sub-condition named an unknown comparison operator.
    #[error("unknown comparison operator '{op}'")]
    UnknownOperator { op: String },

    /// An operand expression failed to parse.
    #[error("invalid condition operand: {0}")]
    Operand(#[from] ExprError),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// One configured sub-condition, as it appears under a layout's
/// `conditions` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Left operand expression.
    pub left: String,
    /// Comparison operator: `==`, `!=`, `>`, `>=`, `<`, `<=`.
    pub op: String,
    /// Right operand expression.
    pub right: String,
    /// Negate this sub-condition before combining.
    #[serde(default)]
    pub not: bool,
    /// Gate combining this sub-condition with the accumulated one.
    /// Case-insensitive; defaults to `and`.
    #[serde(default)]
    pub gate: Option<String>,
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

/// The boolean combinator folding a sub-condition into the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    And,
    Or,
}

impl FromStr for Gate {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(Gate::And),
            "or" => Ok(Gate::Or),
            other => Err(ConditionError::UnsupportedGate {
                gate: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// A comparison operator over two placeholder values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    fn matches(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

impl FromStr for CompareOp {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            other => Err(ConditionError::UnknownOperator {
                op: other.to_owned(),
            }),
        }
    }
}

/// A leaf predicate: two placeholder expressions under a comparison
/// operator.
///
/// Numbers compare numerically, booleans compare by equality, everything
/// else falls back to lexical comparison of the rendered strings.
#[derive(Debug, Clone)]
pub struct Comparison {
    left: Placeholder,
    op: CompareOp,
    right: Placeholder,
}

impl Comparison {
    /// Parse a sub-condition's operands and operator.
    pub fn parse(config: &ConditionConfig, placeholders: &Placeholders) -> Result<Self, ConditionError> {
        Ok(Self {
            left: placeholders.parse(&config.left)?,
            op: config.op.parse()?,
            right: placeholders.parse(&config.right)?,
        })
    }

    /// Evaluate against a subject pair.
    pub fn eval(&self, pair: &SubjectPair) -> bool {
        let left = self.left.value(pair);
        let right = self.right.value(pair);
        match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => match a.partial_cmp(b) {
                Some(ordering) => self.op.matches(ordering),
                // NaN compares false against everything.
                None => false,
            },
            (Value::Bool(a), Value::Bool(b))
                if matches!(self.op, CompareOp::Eq | CompareOp::Ne) =>
            {
                self.op.matches(a.cmp(b))
            }
            _ => self.op.matches(left.render().cmp(&right.render())),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition
// ---------------------------------------------------------------------------

/// A boolean predicate over a subject pair, built once and evaluated every
/// tick.
#[derive(Debug, Clone)]
pub enum Condition {
    /// The constant TRUE predicate the fold starts from.
    True,
    Leaf(Comparison),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    /// Left-fold the configured sub-conditions into a single predicate.
    ///
    /// The fold starts at [`Condition::True`] and combines each
    /// sub-condition in configuration order, so `[A and], [B or]` yields
    /// `(TRUE and A) or B`, not `TRUE and (A or B)`.
    pub fn build(
        configs: &[ConditionConfig],
        placeholders: &Placeholders,
    ) -> Result<Self, ConditionError> {
        let mut acc = Condition::True;
        for config in configs {
            let mut leaf = Condition::Leaf(Comparison::parse(config, placeholders)?);
            if config.not {
                leaf = Condition::Not(Box::new(leaf));
            }
            let gate = match &config.gate {
                Some(gate) => gate.parse()?,
                None => Gate::And,
            };
            acc = match gate {
                Gate::And => Condition::And(Box::new(acc), Box::new(leaf)),
                Gate::Or => Condition::Or(Box::new(acc), Box::new(leaf)),
            };
        }
        Ok(acc)
    }

    /// Evaluate against a subject pair. Pure; safe to call every tick.
    pub fn eval(&self, pair: &SubjectPair) -> bool {
        match self {
            Condition::True => true,
            Condition::Leaf(cmp) => cmp.eval(pair),
            Condition::Not(inner) => !inner.eval(pair),
            Condition::And(left, right) => left.eval(pair) && right.eval(pair),
            Condition::Or(left, right) => left.eval(pair) || right.eval(pair),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
