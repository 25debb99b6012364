//! Evaluation and run error types
//!
//! This module defines [`EvalError`], raised by the expression evaluator, and
//! [`RunError`], the engine-level wrapper that adds the failures only the
//! engine can detect (the loop iteration limit, cooperative cancellation).
//!
//! All evaluation errors are fatal to the run: the engine catches them,
//! transitions to its failed state, and surfaces the message verbatim in the
//! log and the final snapshot. Every [`EvalError`] carries the offending
//! expression text so the message points at what the user wrote.

use std::fmt;

/// Errors raised while evaluating one expression
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A referenced variable is not in the environment
    UndefinedVariable { name: String, expr: String },

    /// An operand had the wrong type for the operation
    TypeError {
        expected: &'static str,
        found: &'static str,
        expr: String,
    },

    /// Array index outside the array's bounds
    IndexOutOfBounds { index: f64, len: usize, expr: String },

    /// Array index with a fractional part
    FractionalIndex { index: f64, expr: String },

    /// Property access other than `.length`
    UnknownProperty { property: String, expr: String },

    /// The expression text could not be read as an expression at all
    Malformed { reason: String, expr: String },
}

impl EvalError {
    /// The source text of the expression that failed
    pub fn expr(&self) -> &str {
        match self {
            EvalError::UndefinedVariable { expr, .. } => expr,
            EvalError::TypeError { expr, .. } => expr,
            EvalError::IndexOutOfBounds { expr, .. } => expr,
            EvalError::FractionalIndex { expr, .. } => expr,
            EvalError::UnknownProperty { expr, .. } => expr,
            EvalError::Malformed { expr, .. } => expr,
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UndefinedVariable { name, expr } => {
                write!(
                    f,
                    "Cannot evaluate `{}`: variable `{}` is not defined",
                    expr, name
                )
            }
            EvalError::TypeError {
                expected,
                found,
                expr,
            } => {
                write!(
                    f,
                    "Cannot evaluate `{}`: expected {}, got {}",
                    expr, expected, found
                )
            }
            EvalError::IndexOutOfBounds { index, len, expr } => {
                write!(
                    f,
                    "Cannot evaluate `{}`: index {} is out of bounds (length {})",
                    expr,
                    crate::runtime::value::format_number(*index),
                    len
                )
            }
            EvalError::FractionalIndex { index, expr } => {
                write!(
                    f,
                    "Cannot evaluate `{}`: index {} is not a whole number",
                    expr, index
                )
            }
            EvalError::UnknownProperty { property, expr } => {
                write!(
                    f,
                    "Cannot evaluate `{}`: unknown property `{}` (only `length` is supported)",
                    expr, property
                )
            }
            EvalError::Malformed { reason, expr } => {
                write!(f, "Cannot evaluate `{}`: {}", expr, reason)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Errors that end a run, from the engine's point of view
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    /// An expression failed to evaluate
    Eval(EvalError),

    /// A loop ran past the defensive iteration limit
    LoopLimit { var: String, limit: usize },

    /// Cancellation observed at a suspension point (internal signal, not a real error)
    Interrupted,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Eval(err) => write!(f, "{}", err),
            RunError::LoopLimit { var, limit } => {
                write!(
                    f,
                    "Loop over `{}` exceeded {} iterations and was stopped",
                    var, limit
                )
            }
            RunError::Interrupted => write!(f, "Execution cancelled"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Eval(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EvalError> for RunError {
    fn from(err: EvalError) -> Self {
        RunError::Eval(err)
    }
}
