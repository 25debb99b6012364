//! Variables pane rendering
//!
//! One row per variable, in declaration order: name and display value on the
//! left, the type tag right-aligned at the pane edge. Values arrive
//! pre-formatted in the snapshot so this pane never touches the runtime
//! types.

use crate::snapshot::VarCard;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the variables pane
pub fn render_vars_pane(
    frame: &mut Frame,
    area: Rect,
    variables: &[VarCard],
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
        .title(" Variables ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if variables.is_empty() {
        let list = List::new(vec![
            ListItem::new(" (no variables)").style(Style::default().fg(DEFAULT_THEME.comment)),
        ])
        .block(block);
        frame.render_widget(list, area);
        return;
    }

    // Account for borders when right-aligning the type tags
    let content_width = area.width.saturating_sub(2) as usize;

    let all_items: Vec<ListItem> = variables
        .iter()
        .map(|card| {
            let tag = format!("({})", card.type_tag);
            // " " + name + " = " + value
            let left_width = 1 + card.name.len() + 3 + card.value.len();
            let padding = content_width.saturating_sub(left_width + tag.len());
            let row = Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    card.name.clone(),
                    Style::default()
                        .fg(DEFAULT_THEME.primary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(card.value.clone(), Style::default().fg(DEFAULT_THEME.number)),
                Span::raw(" ".repeat(padding)),
                Span::styled(tag, Style::default().fg(DEFAULT_THEME.type_name)),
            ]);
            ListItem::new(row)
        })
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
