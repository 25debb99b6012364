//! Script text handling
//!
//! This module turns raw source text into something the engine can execute:
//! - [`validate`]: rejects foreign-dialect syntax before execution starts
//! - [`line`]: classifies each line into one of a handful of statement shapes
//! - [`blocks`]: locates loop body boundaries by brace depth
//!
//! # No grammar
//!
//! The script language is deliberately recognized by a prioritized list of
//! structural matchers, not a parser: the statement shapes are fixed, and any
//! line that matches none of them is skipped rather than rejected, so prose
//! mixed into a script never aborts a run.

pub mod blocks;
pub mod line;
pub mod validate;

use validate::ForeignSyntax;

/// A validated script, split into lines. Immutable once built: the only
/// constructor runs the dialect validator, so an unvalidated `Script`
/// cannot reach the engine.
#[derive(Debug, Clone)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    /// Validate the source and split it into lines.
    pub fn parse(source: &str) -> Result<Self, ForeignSyntax> {
        validate::validate(source)?;
        Ok(Script {
            lines: source.lines().map(str::to_string).collect(),
        })
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_lines() {
        let script = Script::parse("let x = 1;\nlet y = 2;").unwrap();
        assert_eq!(script.line_count(), 2);
        assert_eq!(script.lines()[0], "let x = 1;");
    }

    #[test]
    fn test_parse_rejects_foreign_syntax() {
        assert!(Script::parse("print(x)").is_err());
    }
}
