//! Foreign-dialect validation
//!
//! The script language intentionally looks like several mainstream scripting
//! languages, so the most common user error is pasting a script written in
//! one of them. Silently misexecuting such a script would produce confusing
//! wrong-answer runs; this gate rejects it up front with a message naming the
//! offending construct and its native equivalent.
//!
//! Matching is word-boundary aware: `definition` must not trigger the `def`
//! check, and `TrueCount` must not trigger the `True` check.

use std::error::Error;
use std::fmt;

/// A foreign-dialect construct found in the source. Execution never starts
/// when one of these is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForeignSyntax {
    /// `self.` member access
    SelfReceiver,
    /// `def` function definition keyword
    DefKeyword,
    /// `class` definition keyword
    ClassKeyword,
    /// `True` / `False` / `None` literal
    CapitalizedLiteral(&'static str),
    /// `print(...)` call
    PrintCall,
    /// `range(...)` iteration helper
    RangeCall,
}

impl fmt::Display for ForeignSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForeignSyntax::SelfReceiver => write!(
                f,
                "`self.` is not supported; declare plain variables with `let` instead"
            ),
            ForeignSyntax::DefKeyword => write!(
                f,
                "`def` blocks are not supported; this language has no functions — write statements at the top level"
            ),
            ForeignSyntax::ClassKeyword => write!(
                f,
                "`class` definitions are not supported; only `let` declarations, `for` loops and `if` statements are"
            ),
            ForeignSyntax::CapitalizedLiteral(word) => write!(
                f,
                "`{}` is not a value here; use lowercase `true` / `false`",
                word
            ),
            ForeignSyntax::PrintCall => write!(
                f,
                "`print(...)` is not supported; assign to a variable and watch the variable panel instead"
            ),
            ForeignSyntax::RangeCall => write!(
                f,
                "`range(...)` is not supported; use a three-clause loop: `for (let i = 0; i < n; i++)`"
            ),
        }
    }
}

impl Error for ForeignSyntax {}

/// Scan raw source text for foreign-dialect markers. The first match wins.
pub fn validate(source: &str) -> Result<(), ForeignSyntax> {
    if word_followed_by(source, "self", ".") {
        return Err(ForeignSyntax::SelfReceiver);
    }
    if word_followed_by(source, "def", " ") {
        return Err(ForeignSyntax::DefKeyword);
    }
    if word_followed_by(source, "class", " ") {
        return Err(ForeignSyntax::ClassKeyword);
    }
    for literal in ["True", "False", "None"] {
        if contains_word(source, literal) {
            return Err(ForeignSyntax::CapitalizedLiteral(literal));
        }
    }
    if calls_function(source, "print") {
        return Err(ForeignSyntax::PrintCall);
    }
    if calls_function(source, "range") {
        return Err(ForeignSyntax::RangeCall);
    }
    Ok(())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether `word` occurs with word boundaries on both sides.
fn contains_word(haystack: &str, word: &str) -> bool {
    word_positions(haystack, word).next().is_some()
}

/// Whether `word` occurs as a whole word immediately followed by `suffix`.
fn word_followed_by(haystack: &str, word: &str, suffix: &str) -> bool {
    word_positions(haystack, word).any(|end| haystack[end..].starts_with(suffix))
}

/// Whether `name` occurs as a whole word followed by `(`, with optional
/// whitespace between.
fn calls_function(haystack: &str, name: &str) -> bool {
    word_positions(haystack, name)
        .any(|end| haystack[end..].trim_start().starts_with('('))
}

/// Byte offsets just past each whole-word occurrence of `word`.
fn word_positions<'a>(
    haystack: &'a str,
    word: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    haystack.match_indices(word).filter_map(move |(start, _)| {
        let end = start + word.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !is_word_char(c));
        let after_ok = haystack[end..]
            .chars()
            .next()
            .is_none_or(|c| !is_word_char(c));
        (before_ok && after_ok).then_some(end)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_native_script() {
        let source = "let arr = [1, 2, 3];\nfor (let i = 0; i < arr.length; i++) {\n  sum = sum + arr[i];\n}";
        assert!(validate(source).is_ok());
    }

    #[test]
    fn test_rejects_self_receiver() {
        assert_eq!(
            validate("self.total = 0"),
            Err(ForeignSyntax::SelfReceiver)
        );
    }

    #[test]
    fn test_rejects_def_and_class() {
        assert_eq!(validate("def add(a, b):"), Err(ForeignSyntax::DefKeyword));
        assert_eq!(validate("class Foo:"), Err(ForeignSyntax::ClassKeyword));
    }

    #[test]
    fn test_rejects_capitalized_literals() {
        assert_eq!(
            validate("let done = True"),
            Err(ForeignSyntax::CapitalizedLiteral("True"))
        );
        assert_eq!(
            validate("let x = None"),
            Err(ForeignSyntax::CapitalizedLiteral("None"))
        );
    }

    #[test]
    fn test_rejects_print_and_range() {
        assert_eq!(validate("print(sum)"), Err(ForeignSyntax::PrintCall));
        assert_eq!(validate("print (sum)"), Err(ForeignSyntax::PrintCall));
        assert_eq!(
            validate("for i in range(10):"),
            Err(ForeignSyntax::RangeCall)
        );
    }

    #[test]
    fn test_word_boundaries_do_not_overmatch() {
        // Identifiers that merely contain the foreign words are fine.
        assert!(validate("let definition = 1;").is_ok());
        assert!(validate("let TrueCount = 2;").is_ok());
        assert!(validate("let classes = 3;").is_ok());
        assert!(validate("let myself = 4;\nlet x = myself + 1;").is_ok());
        // `print` as a plain variable (no call) is fine too.
        assert!(validate("let print_total = 5;").is_ok());
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(
            validate("self.x = 1\nprint(x)"),
            Err(ForeignSyntax::SelfReceiver)
        );
    }

    #[test]
    fn test_messages_name_construct_and_replacement() {
        let msg = ForeignSyntax::PrintCall.to_string();
        assert!(msg.contains("print"));
        assert!(msg.contains("variable"));
        let msg = ForeignSyntax::RangeCall.to_string();
        assert!(msg.contains("range"));
        assert!(msg.contains("for (let i = 0; i < n; i++)"));
    }
}
