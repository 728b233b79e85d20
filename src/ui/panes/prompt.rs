//! Add-component prompt drawn over the panes

use crate::ui::theme::DEFAULT_PALETTE;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptField {
    Key,
    Name,
}

#[derive(Debug, Clone, Default)]
pub struct AddPrompt {
    pub key: String,
    pub name: String,
    pub on_name: bool,
    pub error: Option<String>,
}

impl AddPrompt {
    pub fn field(&self) -> PromptField {
        if self.on_name {
            PromptField::Name
        } else {
            PromptField::Key
        }
    }

    pub fn current_mut(&mut self) -> &mut String {
        if self.on_name {
            &mut self.name
        } else {
            &mut self.key
        }
    }
}

pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_add_prompt(frame: &mut Frame, area: Rect, prompt: &AddPrompt) {
    let popup = centered(area, 50, 8);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" New component ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_PALETTE.border_focused));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let field_line = |label: &str, value: &str, active: bool| {
        let label_style = if active {
            Style::default()
                .fg(DEFAULT_PALETTE.border_focused)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(DEFAULT_PALETTE.comment)
        };
        let mut spans = vec![
            Span::styled(format!("{label:>5}: "), label_style),
            Span::styled(value.to_string(), Style::default().fg(DEFAULT_PALETTE.fg)),
        ];
        if active {
            spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(field_line("Key", &prompt.key, prompt.field() == PromptField::Key)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(field_line("Name", &prompt.name, prompt.field() == PromptField::Name)),
        rows[1],
    );

    let footer = match &prompt.error {
        Some(error) => Span::styled(error.clone(), Style::default().fg(DEFAULT_PALETTE.error)),
        None => Span::styled(
            "⇥ switch field · ↵ add · esc cancel",
            Style::default().fg(DEFAULT_PALETTE.comment),
        ),
    };
    frame.render_widget(Paragraph::new(Line::from(footer)), rows[3]);
}
