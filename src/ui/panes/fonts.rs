//! Font picker popup

use crate::fonts::FontFamily;
use crate::ui::panes::prompt::centered;
use crate::ui::theme::DEFAULT_PALETTE;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Default)]
pub struct FontPicker {
    pub families: Vec<FontFamily>,
    pub cursor: usize,
}

impl FontPicker {
    pub fn new(families: Vec<FontFamily>) -> Self {
        FontPicker { families, cursor: 0 }
    }

    pub fn current(&self) -> Option<&FontFamily> {
        self.families.get(self.cursor)
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.families.len() {
            self.cursor += 1;
        }
    }
}

/// Draw the picker; families listed in `active` get a check mark
pub fn render_font_picker(frame: &mut Frame, area: Rect, picker: &FontPicker, active: &[String]) {
    let popup = centered(area, 44, 16);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Fonts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_PALETTE.border_focused));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if picker.families.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No fonts available (see the log)",
                Style::default().fg(DEFAULT_PALETTE.error),
            )),
            rows[0],
        );
    } else {
        let items: Vec<ListItem> = picker
            .families
            .iter()
            .map(|font| {
                let on = active.iter().any(|family| *family == font.family);
                ListItem::new(Line::from(vec![
                    Span::styled(
                        if on { "✓ " } else { "  " },
                        Style::default().fg(DEFAULT_PALETTE.success),
                    ),
                    Span::styled(font.family.clone(), Style::default().fg(DEFAULT_PALETTE.fg)),
                ]))
            })
            .collect();
        let list = List::new(items).highlight_style(
            Style::default()
                .bg(DEFAULT_PALETTE.current_line_bg)
                .add_modifier(Modifier::BOLD),
        );
        let mut state = ListState::default();
        state.select(Some(picker.cursor.min(picker.families.len() - 1)));
        frame.render_stateful_widget(list, rows[0], &mut state);
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            "↵ toggle · i insert stack · esc close",
            Style::default().fg(DEFAULT_PALETTE.comment),
        )),
        rows[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_in_range() {
        let mut picker = FontPicker::new(vec![FontFamily::new("Inter"), FontFamily::new("Lora")]);
        picker.move_up();
        assert_eq!(picker.cursor, 0);
        picker.move_down();
        picker.move_down();
        assert_eq!(picker.current(), Some(&FontFamily::new("Lora")));
    }
}
