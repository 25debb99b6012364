//! Script source pane rendering with syntax highlighting
//!
//! Displays the script being executed with basic syntax highlighting, line
//! numbers, and a marker on the line the engine is currently on; the view
//! scrolls as needed to keep that line visible. When a run fails, the
//! offending line is drawn in the error style instead.
//!
//! The highlighter is a small character walk, not a lexer: keywords, numbers,
//! comments and delimiters are enough for scripts this size.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for one script line
fn highlight_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Comments run to the end of the line
        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            if !current_word.is_empty() {
                spans.push(flush_word(&mut current_word));
            }
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(
                rest,
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Delimiters end the current word
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                spans.push(flush_word(&mut current_word));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' | ';' | ',' | '.' => {
                    Style::default().fg(DEFAULT_THEME.fg)
                }
                _ => Style::default(),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        spans.push(flush_word(&mut current_word));
    }

    Line::from(spans)
}

fn flush_word(word: &mut String) -> Span<'static> {
    let style = word_style(word);
    let span = Span::styled(word.clone(), style);
    word.clear();
    span
}

fn word_style(word: &str) -> Style {
    if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return Style::default().fg(DEFAULT_THEME.number);
    }
    match word {
        "let" | "for" | "if" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "length" => Style::default().fg(DEFAULT_THEME.type_name),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the script source pane. `current_line` and `error_line` are
/// zero-based indexes into `lines`.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    current_line: Option<usize>,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Script ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Follow the executing line whenever it leaves the window
    if let Some(current) = current_line {
        if current < *scroll_offset {
            *scroll_offset = current;
        } else if current >= *scroll_offset + visible_height {
            *scroll_offset = current + 1 - visible_height;
        }
    }

    // Clamp scroll offset only if content exceeds visible area
    if total_lines > visible_height {
        let max_scroll = total_lines - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_error = error_line == Some(idx);
            let is_current = current_line == Some(idx);
            let line_num_str = format!("{:3} ", idx + 1);

            let (num_style, content_base_style) = if is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(ratatui::style::Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (
                    Style::default().fg(DEFAULT_THEME.comment),
                    Style::default(),
                )
            };

            let mut content_line = highlight_line(line);

            if is_error {
                for span in &mut content_line.spans {
                    span.style = content_base_style;
                }
            } else if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.patch(content_base_style);
                }
            }

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
