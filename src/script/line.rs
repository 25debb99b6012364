//! Line classification
//!
//! Each source line is matched against a prioritized list of fixed statement
//! shapes and tagged as one [`Line`] variant. This is deliberately not a
//! grammar: the engine only needs to recognize a handful of shapes quickly
//! and safely, and anything else is [`Line::Unrecognized`] — skipped, never
//! an error.
//!
//! Right-hand sides come back cleaned: inline `//` comments, one trailing
//! `;` and surrounding whitespace are stripped, so downstream evaluation
//! sees just the expression text.

use std::fmt;

/// Comparison operator in expressions and loop conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    /// All operators, longest spelling first so `<=` wins over `<`.
    const SPELLINGS: [(&'static str, CmpOp); 6] = [
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }

    /// Apply to two numbers (IEEE ordering, so NaN compares false except `!=`)
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// How a loop variable advances each iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IncrementRule {
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `+= k` for a literal k
    AddAssign(f64),
}

impl IncrementRule {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            IncrementRule::Increment => value + 1.0,
            IncrementRule::Decrement => value - 1.0,
            IncrementRule::AddAssign(step) => value + step,
        }
    }
}

/// Parsed three-clause loop header: `for (let VAR = START; VAR OP BOUND; VAR++)`.
///
/// `cond_var` is captured for display but iteration always advances the
/// frame's own loop variable.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopHeader {
    pub var: String,
    pub start: String,
    pub cond_var: String,
    pub op: CmpOp,
    pub bound: String,
    pub step: IncrementRule,
}

/// Statement shape of one source line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Blank,
    Comment,
    Declaration { name: String, rhs: String },
    LoopHeader(LoopHeader),
    Conditional { condition: String },
    Assignment { name: String, rhs: String },
    Unrecognized,
}

/// Classify one line. Matchers run in priority order; the first hit wins.
pub fn classify(raw: &str) -> Line {
    let line = raw.trim();
    if line.is_empty() {
        return Line::Blank;
    }
    if line.starts_with("//") {
        return Line::Comment;
    }
    if let Some(rest) = keyword(line, "let") {
        if let Some((name, rhs)) = parse_binding(rest) {
            return Line::Declaration { name, rhs };
        }
    }
    if let Some(rest) = keyword(line, "for") {
        if let Some(header) = parse_loop_header(rest) {
            return Line::LoopHeader(header);
        }
    }
    if let Some(rest) = keyword(line, "if") {
        if let Some(condition) = parse_conditional(rest) {
            return Line::Conditional { condition };
        }
    }
    if let Some((name, rhs)) = parse_binding(line) {
        return Line::Assignment { name, rhs };
    }
    Line::Unrecognized
}

/// Strip a leading keyword, requiring a non-identifier character after it
/// (so `letter = 1` is not a declaration).
fn keyword<'a>(line: &'a str, word: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(word)?;
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest),
    }
}

/// Leading identifier: `[A-Za-z_][A-Za-z0-9_]*`.
fn ident(s: &str) -> Option<(&str, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_alphabetic() || c == '_' => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !c.is_alphanumeric() && *c != '_')
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some((&s[..end], &s[end..]))
}

/// `NAME = RHS` where the `=` is a plain assignment, not `==`.
fn parse_binding(s: &str) -> Option<(String, String)> {
    let (name, rest) = ident(s.trim_start())?;
    let rest = rest.trim_start();
    let rhs = rest.strip_prefix('=')?;
    if rhs.starts_with('=') {
        return None; // `==` comparison, not an assignment
    }
    let rhs = clean_rhs(rhs);
    if rhs.is_empty() {
        return None;
    }
    Some((name.to_string(), rhs))
}

/// Strip an inline `//` comment, then one trailing `;`, then whitespace.
fn clean_rhs(s: &str) -> String {
    let s = match s.find("//") {
        Some(i) => &s[..i],
        None => s,
    };
    let s = s.trim();
    s.strip_suffix(';').unwrap_or(s).trim().to_string()
}

/// The parenthesized group at the start of `s` (after whitespace), balanced.
/// Returns the inner text and whatever follows the closing parenthesis.
fn paren_group(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    let rest = s.strip_prefix('(')?;
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&rest[..i], &rest[i + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Three clauses inside `for (...)`: `let VAR = START; COND_VAR OP BOUND; VAR++`.
fn parse_loop_header(s: &str) -> Option<LoopHeader> {
    let (inner, _after) = paren_group(s)?;
    let clauses: Vec<&str> = inner.split(';').collect();
    if clauses.len() != 3 {
        return None;
    }

    // init: `let VAR = START`
    let init = keyword(clauses[0].trim(), "let")?;
    let (var, rest) = ident(init.trim_start())?;
    let rest = rest.trim_start();
    let start = rest.strip_prefix('=')?;
    if start.starts_with('=') {
        return None;
    }
    let start = start.trim();
    if start.is_empty() {
        return None;
    }

    // condition: `COND_VAR OP BOUND`
    let (cond_var, rest) = ident(clauses[1].trim())?;
    let rest = rest.trim_start();
    let (op, bound) = CmpOp::SPELLINGS
        .iter()
        .find_map(|(sym, op)| rest.strip_prefix(sym).map(|b| (*op, b.trim())))?;
    if bound.is_empty() {
        return None;
    }

    // increment: `VAR++`, `VAR--` or `VAR += K`
    let (_, rest) = ident(clauses[2].trim())?;
    let rest = rest.trim_start();
    let step = if rest == "++" {
        IncrementRule::Increment
    } else if rest == "--" {
        IncrementRule::Decrement
    } else if let Some(amount) = rest.strip_prefix("+=") {
        IncrementRule::AddAssign(amount.trim().parse::<f64>().ok()?)
    } else {
        return None;
    };

    Some(LoopHeader {
        var: var.to_string(),
        start: start.to_string(),
        cond_var: cond_var.to_string(),
        op,
        bound: bound.to_string(),
        step,
    })
}

/// `if (COND)` with an optional trailing `{`.
fn parse_conditional(s: &str) -> Option<String> {
    let (inner, after) = paren_group(s)?;
    let condition = inner.trim();
    if condition.is_empty() {
        return None;
    }
    match after.trim() {
        "" | "{" => Some(condition.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment() {
        assert_eq!(classify(""), Line::Blank);
        assert_eq!(classify("   "), Line::Blank);
        assert_eq!(classify("// a note"), Line::Comment);
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            classify("let sum = 0;"),
            Line::Declaration {
                name: "sum".to_string(),
                rhs: "0".to_string()
            }
        );
        assert_eq!(
            classify("let arr = [5, 2, 8, 1, 9];"),
            Line::Declaration {
                name: "arr".to_string(),
                rhs: "[5, 2, 8, 1, 9]".to_string()
            }
        );
    }

    #[test]
    fn test_declaration_rhs_is_cleaned() {
        assert_eq!(
            classify("let x = a + b; // running total"),
            Line::Declaration {
                name: "x".to_string(),
                rhs: "a + b".to_string()
            }
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            classify("sum = sum + arr[i];"),
            Line::Assignment {
                name: "sum".to_string(),
                rhs: "sum + arr[i]".to_string()
            }
        );
    }

    #[test]
    fn test_equality_is_not_assignment() {
        assert_eq!(classify("x == 5"), Line::Unrecognized);
        assert_eq!(classify("x += 1;"), Line::Unrecognized);
    }

    #[test]
    fn test_letter_prefixed_identifier_is_assignment() {
        assert_eq!(
            classify("letter = 1;"),
            Line::Assignment {
                name: "letter".to_string(),
                rhs: "1".to_string()
            }
        );
    }

    #[test]
    fn test_loop_header() {
        let header = match classify("for (let i = 0; i < arr.length; i++) {") {
            Line::LoopHeader(h) => h,
            other => panic!("expected loop header, got {:?}", other),
        };
        assert_eq!(header.var, "i");
        assert_eq!(header.start, "0");
        assert_eq!(header.cond_var, "i");
        assert_eq!(header.op, CmpOp::Lt);
        assert_eq!(header.bound, "arr.length");
        assert_eq!(header.step, IncrementRule::Increment);
    }

    #[test]
    fn test_loop_header_variants() {
        let header = match classify("for (let k = 10; k >= 0; k--)") {
            Line::LoopHeader(h) => h,
            other => panic!("expected loop header, got {:?}", other),
        };
        assert_eq!(header.op, CmpOp::Ge);
        assert_eq!(header.step, IncrementRule::Decrement);

        let header = match classify("for (let j = 0; j != n; j += 2) {") {
            Line::LoopHeader(h) => h,
            other => panic!("expected loop header, got {:?}", other),
        };
        assert_eq!(header.op, CmpOp::Ne);
        assert_eq!(header.step, IncrementRule::AddAssign(2.0));
    }

    #[test]
    fn test_non_three_clause_loops_are_unrecognized() {
        assert_eq!(classify("for (let i = 0; i < 5) {"), Line::Unrecognized);
        assert_eq!(classify("for x in items {"), Line::Unrecognized);
        assert_eq!(
            classify("for (let i = 0; i < 5; i = i + 1) {"),
            Line::Unrecognized
        );
        assert_eq!(
            classify("for (let i = 0; i < 5; i += n) {"),
            Line::Unrecognized
        );
        assert_eq!(classify("while (x < 5) {"), Line::Unrecognized);
    }

    #[test]
    fn test_conditional() {
        assert_eq!(
            classify("if (current > max) {"),
            Line::Conditional {
                condition: "current > max".to_string()
            }
        );
        assert_eq!(
            classify("if (x == 5)"),
            Line::Conditional {
                condition: "x == 5".to_string()
            }
        );
        // Nested parentheses stay balanced.
        assert_eq!(
            classify("if ((a + b) > c) {"),
            Line::Conditional {
                condition: "(a + b) > c".to_string()
            }
        );
    }

    #[test]
    fn test_conditional_with_trailing_junk_is_unrecognized() {
        assert_eq!(classify("if (x > 0) y = 1;"), Line::Unrecognized);
    }

    #[test]
    fn test_stray_braces_are_unrecognized() {
        assert_eq!(classify("}"), Line::Unrecognized);
        assert_eq!(classify("{"), Line::Unrecognized);
    }

    #[test]
    fn test_increment_rule_apply() {
        assert_eq!(IncrementRule::Increment.apply(4.0), 5.0);
        assert_eq!(IncrementRule::Decrement.apply(4.0), 3.0);
        assert_eq!(IncrementRule::AddAssign(3.0).apply(4.0), 7.0);
    }

    #[test]
    fn test_cmp_op_compare() {
        assert!(CmpOp::Lt.compare(1.0, 2.0));
        assert!(!CmpOp::Lt.compare(2.0, 2.0));
        assert!(CmpOp::Le.compare(2.0, 2.0));
        assert!(CmpOp::Ne.compare(f64::NAN, f64::NAN));
        assert!(!CmpOp::Eq.compare(f64::NAN, f64::NAN));
    }
}
