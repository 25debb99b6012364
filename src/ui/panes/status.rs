//! Status bar rendering with keybindings and state indicators

use crate::snapshot::RunStatus;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Everything the status bar needs from the application state.
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    /// Status of the snapshot being shown, if any.
    pub status: Option<&'a RunStatus>,
    /// Whether a worker thread is still producing snapshots.
    pub running: bool,
    /// Step number of the shown snapshot.
    pub step: Option<usize>,
    /// Total snapshots in history.
    pub total: usize,
    /// True while the user is reviewing an earlier step.
    pub reviewing: bool,
    pub speed: u8,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = ratatui::layout::Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([
            ratatui::layout::Constraint::Percentage(45),
            ratatui::layout::Constraint::Percentage(55),
        ])
        .split(area);

    // Left side: step position and status message
    let step_text = match data.step {
        Some(step) => format!(" Step {}/{} ", step + 1, data.total),
        None => " Step -/- ".to_string(),
    };

    let is_failed = matches!(data.status, Some(RunStatus::Failed(_)));
    let left_spans = vec![
        Span::styled(
            step_text,
            Style::default()
                .bg(if is_failed {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.primary
                })
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if is_failed {
                    DEFAULT_THEME.error
                } else {
                    DEFAULT_THEME.fg
                }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);

    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with a state indicator at the end
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = vec![
        Span::styled(" r ", key_style),
        Span::styled(" run ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" c ", key_style),
        Span::styled(" cancel ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" 1-4 ", key_style),
        Span::styled(" demo ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" +/- ", key_style),
        Span::styled(format!(" speed {} ", data.speed), desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled(" ←/→ ", key_style),
        Span::styled(" review ", desc_style),
        Span::styled("│", sep_style),
        Span::styled(" ", desc_style),
        Span::styled("q", key_style),
        Span::styled(" quit ", desc_style),
    ];

    let (badge, badge_style) = if data.running {
        (
            " ▶ RUNNING ",
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else if data.reviewing {
        (
            " ◆ REVIEW ",
            Style::default()
                .bg(DEFAULT_THEME.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        match data.status {
            Some(RunStatus::Failed(_)) => (
                " ✗ FAILED ",
                Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Some(RunStatus::Completed) => (
                " ✓ DONE ",
                Style::default()
                    .bg(DEFAULT_THEME.success)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => (
                " ○ IDLE ",
                Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black),
            ),
        }
    };

    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(badge, badge_style));

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);

    frame.render_widget(right_paragraph, layout[1]);
}
