//! Loop body extraction
//!
//! Given the line index of a loop header, scan forward counting `{` and `}`
//! per line; the body ends on the line where the depth returns to zero. Body
//! lines are trimmed, keep their original line index (so snapshots can point
//! at the true line), and drop blanks and pure delimiter lines. Braces inside
//! the body only matter for boundary detection — the body itself is executed
//! as a flat sequence, one nesting level total.

/// A body line together with its index in the full script
pub type BodyLine = (usize, String);

/// Locate a loop body. Returns the filtered body lines and the index of the
/// closing line. When no terminator exists the body is empty and the end
/// index is the header itself, so the caller resumes on the next line.
pub fn extract_body(lines: &[String], header: usize) -> (Vec<BodyLine>, usize) {
    let mut depth: i32 = 0;
    let mut end = header;
    for (i, raw) in lines.iter().enumerate().skip(header) {
        depth += raw.matches('{').count() as i32;
        depth -= raw.matches('}').count() as i32;
        if depth == 0 && raw.contains('}') {
            end = i;
            break;
        }
    }

    let mut body = Vec::new();
    for i in (header + 1)..end {
        let trimmed = lines[i].trim();
        if trimmed.is_empty() || trimmed == "{" || trimmed == "}" {
            continue;
        }
        body.push((i, trimmed.to_string()));
    }

    (body, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(source: &str) -> Vec<String> {
        source.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_brace_on_header_line() {
        let script = lines("for (let i = 0; i < 3; i++) {\n  sum = sum + i;\n}");
        let (body, end) = extract_body(&script, 0);
        assert_eq!(end, 2);
        assert_eq!(body, vec![(1, "sum = sum + i;".to_string())]);
    }

    #[test]
    fn test_brace_on_next_line() {
        let script = lines("for (let i = 0; i < 3; i++)\n{\n  sum = sum + i;\n}");
        let (body, end) = extract_body(&script, 0);
        assert_eq!(end, 3);
        assert_eq!(body, vec![(2, "sum = sum + i;".to_string())]);
    }

    #[test]
    fn test_blanks_are_filtered() {
        let script = lines("for (let i = 0; i < 3; i++) {\n\n  a = 1;\n  b = 2;\n}");
        let (body, end) = extract_body(&script, 0);
        assert_eq!(end, 4);
        let texts: Vec<&str> = body.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["a = 1;", "b = 2;"]);
    }

    #[test]
    fn test_inner_braces_counted_for_boundary() {
        let script = lines(
            "for (let i = 1; i < n; i++) {\n  let c = arr[i];\n  if (c > max) {\n    max = c;\n  }\n}",
        );
        let (body, end) = extract_body(&script, 0);
        assert_eq!(end, 5);
        let texts: Vec<&str> = body.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["let c = arr[i];", "if (c > max) {", "max = c;"]);
        // Original indexes are preserved.
        assert_eq!(body[0].0, 1);
        assert_eq!(body[2].0, 3);
    }

    #[test]
    fn test_missing_terminator_yields_empty_body() {
        let script = lines("for (let i = 0; i < 3; i++) {\n  sum = sum + i;");
        let (body, end) = extract_body(&script, 0);
        assert_eq!(end, 0);
        assert!(body.is_empty());
    }

    #[test]
    fn test_header_in_middle_of_script() {
        let script = lines("let sum = 0;\nfor (let i = 0; i < 3; i++) {\n  sum = sum + i;\n}\nlet done = 1;");
        let (body, end) = extract_body(&script, 1);
        assert_eq!(end, 3);
        assert_eq!(body, vec![(2, "sum = sum + i;".to_string())]);
    }
}
