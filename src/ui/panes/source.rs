//! Source editor pane
//!
//! Shows the snippet being edited with light syntax highlighting, a cursor
//! and, when the snippet fails to evaluate, the error under the text with
//! the failing line marked.

use crate::interpreter::EvalFailure;
use crate::ui::editor::TextBuffer;
use crate::ui::theme::DEFAULT_PALETTE;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Highlighting for the snippet language
fn highlight_line(line: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    let flush = |word: &mut String, spans: &mut Vec<Span<'static>>, next: Option<char>| {
        if !word.is_empty() {
            spans.push(Span::styled(word.clone(), word_style(word, next == Some('('))));
            word.clear();
        }
    };

    while i < chars.len() {
        let c = chars[i];

        if c == '/' && chars.get(i + 1) == Some(&'/') {
            flush(&mut word, &mut spans, None);
            spans.push(Span::styled(
                chars[i..].iter().collect::<String>(),
                Style::default().fg(DEFAULT_PALETTE.comment),
            ));
            return spans;
        }

        if c == '"' || c == '\'' || c == '`' {
            flush(&mut word, &mut spans, None);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            spans.push(Span::styled(
                chars[i..end].iter().collect::<String>(),
                Style::default().fg(DEFAULT_PALETTE.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && c != '$' {
            flush(&mut word, &mut spans, Some(c));
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_PALETTE.primary),
                _ => Style::default().fg(DEFAULT_PALETTE.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        word.push(c);
        i += 1;
    }

    flush(&mut word, &mut spans, None);
    spans
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "const" | "let" | "return" | "if" | "else" | "throw" | "new" | "typeof" | "in" => {
            Style::default()
                .fg(DEFAULT_PALETTE.keyword)
                .add_modifier(Modifier::BOLD)
        }
        "true" | "false" | "null" | "undefined" => Style::default().fg(DEFAULT_PALETTE.number),
        _ if word.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
            Style::default().fg(DEFAULT_PALETTE.number)
        }
        _ if is_call => Style::default().fg(DEFAULT_PALETTE.tag),
        _ => Style::default().fg(DEFAULT_PALETTE.fg),
    }
}

/// Split `spans` so the char at `col` gets the cursor style
fn with_cursor(spans: Vec<Span<'static>>, col: usize) -> Vec<Span<'static>> {
    let cursor_style = Style::default().add_modifier(Modifier::REVERSED);
    let mut out = Vec::with_capacity(spans.len() + 2);
    let mut seen = 0;
    let mut placed = false;

    for span in spans {
        let len = span.content.chars().count();
        if placed || col >= seen + len {
            seen += len;
            out.push(span);
            continue;
        }
        let chars: Vec<char> = span.content.chars().collect();
        let at = col - seen;
        let before: String = chars[..at].iter().collect();
        let after: String = chars[at + 1..].iter().collect();
        if !before.is_empty() {
            out.push(Span::styled(before, span.style));
        }
        out.push(Span::styled(chars[at].to_string(), span.style.patch(cursor_style)));
        if !after.is_empty() {
            out.push(Span::styled(after, span.style));
        }
        placed = true;
        seen += len;
    }

    if !placed {
        out.push(Span::styled(" ", cursor_style));
    }
    out
}

/// Render the editor pane
#[allow(clippy::too_many_arguments)]
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    buffer: &TextBuffer,
    error: Option<&EvalFailure>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_color = if is_focused {
        DEFAULT_PALETTE.border_focused
    } else {
        DEFAULT_PALETTE.border_normal
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(match error {
            Some(_) => [Constraint::Min(3), Constraint::Length(3)],
            None => [Constraint::Min(3), Constraint::Length(0)],
        })
        .split(area);

    let (cursor_row, cursor_col) = buffer.cursor();
    let error_line = error
        .and_then(|failure| failure.location)
        .map(|location| location.line.saturating_sub(1));

    // Keep the cursor inside the visible window
    let visible = chunks[0].height.saturating_sub(2) as usize;
    if cursor_row < *scroll {
        *scroll = cursor_row;
    } else if visible > 0 && cursor_row >= *scroll + visible {
        *scroll = cursor_row + 1 - visible;
    }

    let lines: Vec<Line> = buffer
        .lines()
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible.max(1))
        .map(|(row, text)| {
            let gutter_style = if Some(row) == error_line {
                Style::default().fg(DEFAULT_PALETTE.error)
            } else {
                Style::default().fg(DEFAULT_PALETTE.comment)
            };
            let mut spans = vec![Span::styled(format!("{:>3} ", row + 1), gutter_style)];
            let body = highlight_line(text);
            if is_focused && row == cursor_row {
                spans.extend(with_cursor(body, cursor_col));
            } else {
                spans.extend(body);
            }
            let line = Line::from(spans);
            if row == cursor_row && is_focused {
                line.style(Style::default().bg(DEFAULT_PALETTE.current_line_bg))
            } else {
                line
            }
        })
        .collect();

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    frame.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    if let Some(failure) = error {
        let message = Paragraph::new(Line::from(Span::styled(
            failure.summary(),
            Style::default().fg(DEFAULT_PALETTE.error),
        )))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(DEFAULT_PALETTE.error)),
        );
        frame.render_widget(message, chunks[1]);
    }
}
