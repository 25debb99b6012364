//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents all runtime values
//! in the script interpreter. Values are tagged; there is no implicit coercion
//! beyond what the arithmetic operators themselves require.
//!
//! # Value Types
//!
//! - [`Value::Number`]: IEEE 754 double
//! - [`Value::Array`]: flat, owned list of numbers
//! - [`Value::Bool`]: comparison result
//!
//! Arrays hold numbers only. The script's array literals are flat lists, and
//! indexing always yields a number, so `Vec<f64>` is the whole story.

use std::fmt;

/// Runtime values in the interpreter
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Array(Vec<f64>),
    Bool(bool),
}

impl Value {
    /// Get the numeric value, returns None if not a Number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Display tag for the variable table ("number", "array", "boolean")
    pub fn type_tag(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Array(_) => "array",
            Value::Bool(_) => "boolean",
        }
    }

    /// Condition semantics: booleans as-is, numbers non-zero and non-NaN,
    /// arrays always true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Array(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Array(items) => {
                let rendered: Vec<String> =
                    items.iter().map(|n| format_number(*n)).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Format a number the way the script writes them: whole values without a
/// fractional part (`5`, not `5.0`), everything else in shortest float form.
pub fn format_number(n: f64) -> String {
    if n == n.trunc() && n.abs() < 1e15 {
        // Normalize -0.0 so it renders as plain 0
        let n = if n == 0.0 { 0.0 } else { n };
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
