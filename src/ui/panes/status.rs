//! Status bar rendering with keybindings and save state

use crate::ui::theme::DEFAULT_PALETTE;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub is_error: bool,
    pub save_pending: bool,
    pub component_count: usize,
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, data: &StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let badge = if data.save_pending {
        Span::styled(
            " ● UNSAVED ",
            Style::default()
                .bg(DEFAULT_PALETTE.secondary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            " SAVED ",
            Style::default()
                .bg(DEFAULT_PALETTE.success)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
    };

    let left_spans = vec![
        badge,
        Span::styled(
            format!(" {} components ", data.component_count),
            Style::default()
                .bg(DEFAULT_PALETTE.current_line_bg)
                .fg(DEFAULT_PALETTE.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_PALETTE.current_line_bg)
                .fg(if data.is_error {
                    DEFAULT_PALETTE.error
                } else {
                    DEFAULT_PALETTE.fg
                }),
        ),
    ];

    frame.render_widget(
        Paragraph::new(Line::from(left_spans))
            .style(Style::default().bg(DEFAULT_PALETTE.current_line_bg))
            .alignment(Alignment::Left),
        layout[0],
    );

    let key_style = Style::default().bg(DEFAULT_PALETTE.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_PALETTE.current_line_bg)
        .fg(DEFAULT_PALETTE.fg);

    let mut right_spans = Vec::new();
    for (keys, desc) in [
        ("⇥", "focus"),
        ("^O", "overrides/render"),
        ("^G", "global"),
        ("^N", "new"),
        ("^F", "fonts"),
        ("^E", "export"),
        ("^R", "reset global"),
        ("^Q", "quit"),
    ] {
        right_spans.push(Span::styled(format!(" {keys} "), key_style));
        right_spans.push(Span::styled(format!(" {desc} "), desc_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right_spans))
            .style(Style::default().bg(DEFAULT_PALETTE.current_line_bg))
            .alignment(Alignment::Right),
        layout[1],
    );
}
