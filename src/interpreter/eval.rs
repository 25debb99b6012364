//! Expression evaluation
//!
//! A hand-written tokenizer and recursive-descent walk over the closed
//! expression grammar:
//!
//! ```text
//! expression := additive (cmp additive)?          one comparison level
//! additive   := term (('+' | '-') term)*
//! term       := unary (('*' | '/') unary)*
//! unary      := ('-' | '+') unary | postfix
//! postfix    := primary ('[' expression ']' | '.' ident)*
//! primary    := number | ident | '(' expression ')'
//! ```
//!
//! Evaluation happens during the descent — expressions are one-shot strings
//! read against the live [`Environment`], so there is nothing to gain from
//! building a tree first. Evaluation is pure: all mutation happens in the
//! engine after a value comes back. Arbitrary text never reaches any dynamic
//! execution facility; this module is the only thing that reads it.

use crate::interpreter::errors::EvalError;
use crate::runtime::env::Environment;
use crate::runtime::value::{format_number, Value};
use crate::script::line::CmpOp;
use std::fmt;

/// Evaluate a statement right-hand side. Bare number literals and flat array
/// literals are parsed directly, bypassing the expression grammar; anything
/// else goes through [`evaluate`].
pub fn eval_rhs(text: &str, env: &Environment) -> Result<Value, EvalError> {
    let text = text.trim();
    if let Some(n) = number_literal(text) {
        return Ok(Value::Number(n));
    }
    if text.len() >= 2 && text.starts_with('[') && text.ends_with(']') {
        return array_literal(text).map(Value::Array);
    }
    evaluate(text, env)
}

/// Evaluate one pure expression against the environment.
pub fn evaluate(expr: &str, env: &Environment) -> Result<Value, EvalError> {
    let tokens = tokenize(expr)?;
    let mut ev = Evaluator {
        tokens,
        pos: 0,
        env,
        expr,
    };
    let value = ev.expression()?;
    match ev.peek() {
        None => Ok(value),
        Some(tok) => {
            let reason = format!("unexpected `{}` after the expression", tok);
            Err(ev.malformed(reason))
        }
    }
}

/// A bare numeric literal (optionally signed). Word-shaped spellings like
/// `inf` or `NaN` are deliberately not literals; they resolve as variables.
fn number_literal(text: &str) -> Option<f64> {
    let rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let first = rest.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    text.parse::<f64>().ok()
}

/// A flat `[n, n, ...]` literal. Nested arrays and non-numeric elements are
/// malformed, matching the script language's number-only arrays.
fn array_literal(text: &str) -> Result<Vec<f64>, EvalError> {
    let inner = text[1..text.len() - 1].trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    inner
        .split(',')
        .map(|part| {
            let part = part.trim();
            number_literal(part).ok_or_else(|| EvalError::Malformed {
                reason: format!("array literals hold plain numbers, but found `{}`", part),
                expr: text.to_string(),
            })
        })
        .collect()
}

// ========== Tokenizer ==========

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Cmp(CmpOp),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dot,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Number(n) => write!(f, "{}", format_number(*n)),
            Tok::Ident(name) => write!(f, "{}", name),
            Tok::Plus => write!(f, "+"),
            Tok::Minus => write!(f, "-"),
            Tok::Star => write!(f, "*"),
            Tok::Slash => write!(f, "/"),
            Tok::Cmp(op) => write!(f, "{}", op),
            Tok::LParen => write!(f, "("),
            Tok::RParen => write!(f, ")"),
            Tok::LBracket => write!(f, "["),
            Tok::RBracket => write!(f, "]"),
            Tok::Dot => write!(f, "."),
        }
    }
}

fn tokenize(expr: &str) -> Result<Vec<Tok>, EvalError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let malformed = |reason: String| EvalError::Malformed {
        reason,
        expr: expr.to_string(),
    };

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '+' => {
                tokens.push(Tok::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Tok::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Tok::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Tok::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Tok::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Tok::RParen);
                i += 1;
            }
            '[' => {
                tokens.push(Tok::LBracket);
                i += 1;
            }
            ']' => {
                tokens.push(Tok::RBracket);
                i += 1;
            }
            '<' | '>' => {
                let two = chars.get(i + 1) == Some(&'=');
                let op = match (c, two) {
                    ('<', true) => CmpOp::Le,
                    ('<', false) => CmpOp::Lt,
                    ('>', true) => CmpOp::Ge,
                    _ => CmpOp::Gt,
                };
                tokens.push(Tok::Cmp(op));
                i += if two { 2 } else { 1 };
            }
            '=' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Tok::Cmp(CmpOp::Eq));
                    i += 2;
                } else {
                    return Err(malformed(
                        "`=` is assignment; use `==` to compare".to_string(),
                    ));
                }
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Tok::Cmp(CmpOp::Ne));
                    i += 2;
                } else {
                    return Err(malformed("expected `!=`".to_string()));
                }
            }
            '.' if chars.get(i + 1).is_some_and(char::is_ascii_digit) => {
                let (n, end) = scan_number(&chars, i, expr)?;
                tokens.push(Tok::Number(n));
                i = end;
            }
            '.' => {
                tokens.push(Tok::Dot);
                i += 1;
            }
            c if c.is_ascii_digit() => {
                let (n, end) = scan_number(&chars, i, expr)?;
                tokens.push(Tok::Number(n));
                i = end;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i;
                while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                    end += 1;
                }
                tokens.push(Tok::Ident(chars[i..end].iter().collect()));
                i = end;
            }
            other => {
                return Err(malformed(format!("unexpected character `{}`", other)));
            }
        }
    }
    Ok(tokens)
}

/// Scan a number starting at `start`: digits, optional fraction, optional
/// exponent. Returns the value and the index just past it.
fn scan_number(chars: &[char], start: usize, expr: &str) -> Result<(f64, usize), EvalError> {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    if end < chars.len() && chars[end] == '.' {
        end += 1;
        while end < chars.len() && chars[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < chars.len() && (chars[end] == 'e' || chars[end] == 'E') {
        let mut exp = end + 1;
        if exp < chars.len() && (chars[exp] == '+' || chars[exp] == '-') {
            exp += 1;
        }
        if exp < chars.len() && chars[exp].is_ascii_digit() {
            end = exp;
            while end < chars.len() && chars[end].is_ascii_digit() {
                end += 1;
            }
        }
    }
    let text: String = chars[start..end].iter().collect();
    let n = text.parse::<f64>().map_err(|_| EvalError::Malformed {
        reason: format!("invalid number `{}`", text),
        expr: expr.to_string(),
    })?;
    Ok((n, end))
}

// ========== Recursive descent ==========

struct Evaluator<'a> {
    tokens: Vec<Tok>,
    pos: usize,
    env: &'a Environment,
    expr: &'a str,
}

impl Evaluator<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn malformed(&self, reason: String) -> EvalError {
        EvalError::Malformed {
            reason,
            expr: self.expr.to_string(),
        }
    }

    fn type_error(&self, expected: &'static str, found: &Value) -> EvalError {
        EvalError::TypeError {
            expected,
            found: found.type_tag(),
            expr: self.expr.to_string(),
        }
    }

    fn expression(&mut self) -> Result<Value, EvalError> {
        let left = self.additive()?;
        if let Some(Tok::Cmp(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.additive()?;
            return self.compare(op, left, right);
        }
        Ok(left)
    }

    fn additive(&mut self) -> Result<Value, EvalError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Tok::Plus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = self.arith('+', value, rhs)?;
                }
                Some(Tok::Minus) => {
                    self.pos += 1;
                    let rhs = self.term()?;
                    value = self.arith('-', value, rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Value, EvalError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Tok::Star) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = self.arith('*', value, rhs)?;
                }
                Some(Tok::Slash) => {
                    self.pos += 1;
                    let rhs = self.unary()?;
                    value = self.arith('/', value, rhs)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<Value, EvalError> {
        match self.peek() {
            Some(Tok::Minus) => {
                self.pos += 1;
                let value = self.unary()?;
                let n = self.expect_number(value)?;
                Ok(Value::Number(-n))
            }
            Some(Tok::Plus) => {
                self.pos += 1;
                let value = self.unary()?;
                let n = self.expect_number(value)?;
                Ok(Value::Number(n))
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) -> Result<Value, EvalError> {
        let mut value = self.primary()?;
        loop {
            match self.peek() {
                Some(Tok::LBracket) => {
                    self.pos += 1;
                    let index = self.expression()?;
                    match self.advance() {
                        Some(Tok::RBracket) => {}
                        _ => return Err(self.malformed("expected `]`".to_string())),
                    }
                    value = self.index(value, index)?;
                }
                Some(Tok::Dot) => {
                    self.pos += 1;
                    let property = match self.advance() {
                        Some(Tok::Ident(name)) => name,
                        _ => {
                            return Err(
                                self.malformed("expected a property name after `.`".to_string())
                            )
                        }
                    };
                    if property != "length" {
                        return Err(EvalError::UnknownProperty {
                            property,
                            expr: self.expr.to_string(),
                        });
                    }
                    value = self.length(value)?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<Value, EvalError> {
        match self.advance() {
            Some(Tok::Number(n)) => Ok(Value::Number(n)),
            Some(Tok::Ident(name)) => {
                self.env
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| EvalError::UndefinedVariable {
                        name,
                        expr: self.expr.to_string(),
                    })
            }
            Some(Tok::LParen) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Tok::RParen) => Ok(value),
                    _ => Err(self.malformed("expected `)`".to_string())),
                }
            }
            Some(tok) => Err(self.malformed(format!("expected a value, found `{}`", tok))),
            None => Err(self.malformed("the expression ends early".to_string())),
        }
    }

    // ========== Operations ==========

    fn expect_number(&self, value: Value) -> Result<f64, EvalError> {
        match value.as_number() {
            Some(n) => Ok(n),
            None => Err(self.type_error("a number", &value)),
        }
    }

    fn arith(&self, op: char, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        let a = self.expect_number(lhs)?;
        let b = self.expect_number(rhs)?;
        // IEEE semantics throughout: division by zero is an infinity.
        let n = match op {
            '+' => a + b,
            '-' => a - b,
            '*' => a * b,
            _ => a / b,
        };
        Ok(Value::Number(n))
    }

    fn compare(&self, op: CmpOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
        match (op, &lhs, &rhs) {
            (_, Value::Number(a), Value::Number(b)) => Ok(Value::Bool(op.compare(*a, *b))),
            (CmpOp::Eq, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a == b)),
            (CmpOp::Ne, Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(a != b)),
            _ => {
                let offender = if lhs.as_number().is_none() { &lhs } else { &rhs };
                Err(self.type_error("a number", offender))
            }
        }
    }

    fn index(&self, target: Value, index: Value) -> Result<Value, EvalError> {
        let items = match &target {
            Value::Array(items) => items,
            _ => return Err(self.type_error("an array", &target)),
        };
        let idx = match index {
            Value::Number(n) => n,
            other => return Err(self.type_error("a number", &other)),
        };
        if idx.fract() != 0.0 {
            return Err(EvalError::FractionalIndex {
                index: idx,
                expr: self.expr.to_string(),
            });
        }
        if idx < 0.0 || idx >= items.len() as f64 {
            return Err(EvalError::IndexOutOfBounds {
                index: idx,
                len: items.len(),
                expr: self.expr.to_string(),
            });
        }
        Ok(Value::Number(items[idx as usize]))
    }

    fn length(&self, target: Value) -> Result<Value, EvalError> {
        match target {
            Value::Array(items) => Ok(Value::Number(items.len() as f64)),
            other => Err(self.type_error("an array", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        let mut env = Environment::new();
        env.bind("arr", Value::Array(vec![5.0, 2.0, 8.0]));
        env.bind("n", Value::Number(4.0));
        env
    }

    #[test]
    fn test_precedence_and_parentheses() {
        let env = env();
        assert_eq!(evaluate("1 + 2 * 3", &env), Ok(Value::Number(7.0)));
        assert_eq!(evaluate("(1 + 2) * 3", &env), Ok(Value::Number(9.0)));
        assert_eq!(evaluate("7 / 2", &env), Ok(Value::Number(3.5)));
    }

    #[test]
    fn test_unary_minus() {
        let env = env();
        assert_eq!(evaluate("-n + 10", &env), Ok(Value::Number(6.0)));
        assert_eq!(evaluate("2 * -3", &env), Ok(Value::Number(-6.0)));
    }

    #[test]
    fn test_division_by_zero_is_infinity() {
        let env = env();
        assert_eq!(evaluate("1 / 0", &env), Ok(Value::Number(f64::INFINITY)));
    }

    #[test]
    fn test_comparisons() {
        let env = env();
        assert_eq!(evaluate("2 < 3", &env), Ok(Value::Bool(true)));
        assert_eq!(evaluate("n >= 4", &env), Ok(Value::Bool(true)));
        assert_eq!(evaluate("1 + 1 == 2", &env), Ok(Value::Bool(true)));
        assert_eq!(evaluate("n != 4", &env), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_chained_comparison_is_malformed() {
        let env = env();
        let err = evaluate("1 < 2 < 3", &env).unwrap_err();
        assert!(matches!(err, EvalError::Malformed { .. }));
    }

    #[test]
    fn test_indexing_and_length() {
        let env = env();
        assert_eq!(evaluate("arr[1]", &env), Ok(Value::Number(2.0)));
        assert_eq!(evaluate("arr[1 + 1]", &env), Ok(Value::Number(8.0)));
        assert_eq!(evaluate("arr.length", &env), Ok(Value::Number(3.0)));
        assert_eq!(
            evaluate("arr[arr.length - 1]", &env),
            Ok(Value::Number(8.0))
        );
    }

    #[test]
    fn test_undefined_variable() {
        let err = evaluate("x + 1", &Environment::new()).unwrap_err();
        assert_eq!(
            err,
            EvalError::UndefinedVariable {
                name: "x".to_string(),
                expr: "x + 1".to_string()
            }
        );
        assert!(err.to_string().contains("`x`"));
    }

    #[test]
    fn test_index_out_of_bounds_names_expression() {
        let env = env();
        let err = evaluate("arr[5]", &env).unwrap_err();
        assert!(matches!(err, EvalError::IndexOutOfBounds { len: 3, .. }));
        assert_eq!(err.expr(), "arr[5]");
        assert!(err.to_string().contains("arr[5]"));
    }

    #[test]
    fn test_negative_and_fractional_indexes() {
        let env = env();
        assert!(matches!(
            evaluate("arr[0 - 1]", &env),
            Err(EvalError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            evaluate("arr[1 / 2]", &env),
            Err(EvalError::FractionalIndex { .. })
        ));
    }

    #[test]
    fn test_type_errors() {
        let env = env();
        assert!(matches!(
            evaluate("arr + 1", &env),
            Err(EvalError::TypeError { found: "array", .. })
        ));
        assert!(matches!(
            evaluate("n[0]", &env),
            Err(EvalError::TypeError { found: "number", .. })
        ));
        assert!(matches!(
            evaluate("n.length", &env),
            Err(EvalError::TypeError { found: "number", .. })
        ));
    }

    #[test]
    fn test_unknown_property() {
        let env = env();
        let err = evaluate("arr.size", &env).unwrap_err();
        assert_eq!(
            err,
            EvalError::UnknownProperty {
                property: "size".to_string(),
                expr: "arr.size".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_expressions() {
        let env = env();
        assert!(matches!(
            evaluate("1 +", &env),
            Err(EvalError::Malformed { .. })
        ));
        assert!(matches!(
            evaluate("x = 5", &env),
            Err(EvalError::Malformed { .. })
        ));
        assert!(matches!(
            evaluate("1 ? 2", &env),
            Err(EvalError::Malformed { .. })
        ));
        assert!(matches!(
            evaluate("(1 + 2", &env),
            Err(EvalError::Malformed { .. })
        ));
        assert!(matches!(
            evaluate("1 2", &env),
            Err(EvalError::Malformed { .. })
        ));
    }

    #[test]
    fn test_rhs_literal_bypass() {
        let env = Environment::new();
        assert_eq!(eval_rhs("42", &env), Ok(Value::Number(42.0)));
        assert_eq!(eval_rhs("-2.5", &env), Ok(Value::Number(-2.5)));
        assert_eq!(
            eval_rhs("[5, 2, 8, 1, 9]", &env),
            Ok(Value::Array(vec![5.0, 2.0, 8.0, 1.0, 9.0]))
        );
        assert_eq!(eval_rhs("[]", &env), Ok(Value::Array(vec![])));
    }

    #[test]
    fn test_rhs_bad_array_literals() {
        let env = env();
        assert!(matches!(
            eval_rhs("[1, x]", &env),
            Err(EvalError::Malformed { .. })
        ));
        assert!(matches!(
            eval_rhs("[[1], [2]]", &env),
            Err(EvalError::Malformed { .. })
        ));
    }

    #[test]
    fn test_rhs_falls_back_to_evaluator() {
        let env = env();
        assert_eq!(eval_rhs("n * 2", &env), Ok(Value::Number(8.0)));
    }
}
