//! Array visualization pane
//!
//! Draws the tracked array as a row of boxed slots, each with its `[i]` index
//! above and the element value inside. The slot the loop variable points at
//! is highlighted, which is what makes a stepping run over an array readable
//! at a glance.

use crate::runtime::value::format_number;
use crate::snapshot::ArrayView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the array pane. `highlighted` is a slot index into the view.
pub fn render_array_pane(
    frame: &mut Frame,
    area: Rect,
    view: Option<&ArrayView>,
    highlighted: Option<usize>,
) {
    let block = Block::default()
        .title(" Array ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    let Some(view) = view else {
        let paragraph = Paragraph::new("(no array yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let name_line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            view.name.clone(),
            Style::default()
                .fg(DEFAULT_THEME.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                " ({} {})",
                view.items.len(),
                if view.items.len() == 1 { "item" } else { "items" }
            ),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ]);

    if view.items.is_empty() {
        let lines = vec![
            name_line,
            Line::from(Span::styled(
                " []",
                Style::default().fg(DEFAULT_THEME.comment),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let labels: Vec<String> = view.items.iter().map(|n| format_number(*n)).collect();
    let cell = labels
        .iter()
        .map(|label| label.len())
        .max()
        .unwrap_or(1)
        .max(3)
        + 2;

    let border = Style::default().fg(DEFAULT_THEME.border_normal);

    let mut top = String::from(" ┌");
    let mut bottom = String::from(" └");
    for i in 0..labels.len() {
        top.push_str(&"─".repeat(cell));
        bottom.push_str(&"─".repeat(cell));
        top.push(if i + 1 == labels.len() { '┐' } else { '┬' });
        bottom.push(if i + 1 == labels.len() { '┘' } else { '┴' });
    }

    let mut value_spans = vec![Span::raw(" "), Span::styled("│", border)];
    for (i, label) in labels.iter().enumerate() {
        let style = if highlighted == Some(i) {
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.number)
        };
        value_spans.push(Span::styled(centered(label, cell), style));
        value_spans.push(Span::styled("│", border));
    }

    let mut index_spans = vec![Span::raw("  ")];
    for i in 0..labels.len() {
        let style = if highlighted == Some(i) {
            Style::default()
                .fg(DEFAULT_THEME.secondary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_THEME.comment)
        };
        index_spans.push(Span::styled(centered(&format!("[{}]", i), cell), style));
        index_spans.push(Span::raw(" "));
    }

    let lines = vec![
        name_line,
        Line::from(index_spans),
        Line::from(Span::styled(top, border)),
        Line::from(value_spans),
        Line::from(Span::styled(bottom, border)),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Pad `text` with spaces on both sides to `width` characters.
fn centered(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.len());
    let left = pad / 2;
    format!(
        "{}{}{}",
        " ".repeat(left),
        text,
        " ".repeat(pad - left)
    )
}
