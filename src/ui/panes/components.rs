//! Component list pane

use crate::ui::theme::DEFAULT_PALETTE;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// One row of the list
pub struct ComponentRow<'a> {
    pub key: &'a str,
    pub name: &'a str,
    pub is_selected: bool,
    pub has_error: bool,
}

pub fn render_components_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[ComponentRow],
    cursor: usize,
    global_error: bool,
    is_focused: bool,
) {
    let border_color = if is_focused {
        DEFAULT_PALETTE.border_focused
    } else {
        DEFAULT_PALETTE.border_normal
    };

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let marker = if row.is_selected { "● " } else { "  " };
            let key_style = if row.has_error {
                Style::default().fg(DEFAULT_PALETTE.error)
            } else {
                Style::default().fg(DEFAULT_PALETTE.tag)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_PALETTE.secondary)),
                Span::styled(row.key.to_string(), key_style),
                Span::styled(
                    format!("  {}", row.name),
                    Style::default().fg(DEFAULT_PALETTE.comment),
                ),
            ]))
        })
        .collect();

    let title = if global_error {
        Line::from(vec![
            Span::raw(" Components "),
            Span::styled("(global overrides broken) ", Style::default().fg(DEFAULT_PALETTE.error)),
        ])
    } else {
        Line::from(" Components ")
    };

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .highlight_style(
            Style::default()
                .bg(DEFAULT_PALETTE.current_line_bg)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(cursor.min(rows.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
