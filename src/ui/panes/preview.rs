//! Preview grid pane
//!
//! One block of lines per size x variant cell: a header, the resolved style
//! for that cell, and the rendered element tree. A cell whose renderer
//! failed shows its error inline in red and nothing else.

use crate::render::{resolved_style, PreviewCell, RenderProps};
use crate::ui::theme::DEFAULT_PALETTE;
use crate::value::{Element, Node, Value};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct PreviewRenderData<'a> {
    pub key: Option<&'a str>,
    pub cells: &'a [PreviewCell],
    pub theme: &'a Value,
}

fn label(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("default")
}

/// Compact `{ a: 1, b: "x" }` form of a style object
fn style_summary(style: &Value) -> String {
    match style {
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{key}: {}", style_summary(value)))
                .collect();
            format!("{{ {} }}", fields.join(", "))
        }
        Value::String(s) => format!("{s:?}"),
        other => other.to_display_string(),
    }
}

fn element_lines(element: &Element, depth: usize, out: &mut Vec<Line<'static>>) {
    let indent = "  ".repeat(depth + 1);
    let mut spans = vec![
        Span::raw(indent.clone()),
        Span::styled(format!("<{}", element.tag), Style::default().fg(DEFAULT_PALETTE.tag)),
    ];
    for (name, value) in &element.props {
        if value.is_nullish() {
            continue;
        }
        spans.push(Span::styled(format!(" {name}="), Style::default().fg(DEFAULT_PALETTE.prop)));
        spans.push(Span::styled(
            style_summary(value),
            Style::default().fg(DEFAULT_PALETTE.string),
        ));
    }

    if element.children.is_empty() {
        spans.push(Span::styled(" />", Style::default().fg(DEFAULT_PALETTE.tag)));
        out.push(Line::from(spans));
        return;
    }

    spans.push(Span::styled(">", Style::default().fg(DEFAULT_PALETTE.tag)));
    out.push(Line::from(spans));
    for child in &element.children {
        match child {
            Node::Element(child) => element_lines(child, depth + 1, out),
            Node::Text(text) => out.push(Line::from(vec![
                Span::raw("  ".repeat(depth + 2)),
                Span::styled(text.clone(), Style::default().fg(DEFAULT_PALETTE.fg)),
            ])),
        }
    }
    out.push(Line::from(vec![
        Span::raw(indent),
        Span::styled(format!("</{}>", element.tag), Style::default().fg(DEFAULT_PALETTE.tag)),
    ]));
}

/// Lines for the whole grid
pub fn preview_lines(data: &PreviewRenderData) -> Vec<Line<'static>> {
    let Some(key) = data.key else {
        return vec![Line::from(Span::styled(
            "No component selected",
            Style::default().fg(DEFAULT_PALETTE.comment),
        ))];
    };

    let mut lines = Vec::new();
    for cell in data.cells {
        lines.push(Line::from(Span::styled(
            format!("{} · {}", label(&cell.size), label(&cell.variant)),
            Style::default()
                .fg(DEFAULT_PALETTE.secondary)
                .add_modifier(Modifier::BOLD),
        )));

        match &cell.output {
            Ok(element) => {
                let props = RenderProps {
                    size: cell.size.clone(),
                    variant: cell.variant.clone(),
                };
                lines.push(Line::from(vec![
                    Span::styled("  style ", Style::default().fg(DEFAULT_PALETTE.comment)),
                    Span::styled(
                        style_summary(&resolved_style(data.theme, key, &props)),
                        Style::default().fg(DEFAULT_PALETTE.fg),
                    ),
                ]));
                element_lines(element, 0, &mut lines);
            }
            Err(failure) => lines.push(Line::from(Span::styled(
                format!("  ✗ {}", failure.message),
                Style::default().fg(DEFAULT_PALETTE.error),
            ))),
        }
        lines.push(Line::default());
    }
    lines
}

pub fn render_preview_pane(
    frame: &mut Frame,
    area: Rect,
    data: &PreviewRenderData,
    is_focused: bool,
    scroll: &mut usize,
) {
    let border_color = if is_focused {
        DEFAULT_PALETTE.border_focused
    } else {
        DEFAULT_PALETTE.border_normal
    };

    let lines = preview_lines(data);
    *scroll = (*scroll).min(lines.len().saturating_sub(1));

    let failures = data.cells.iter().filter(|cell| cell.output.is_err()).count();
    let title = match failures {
        0 => format!(" Preview ({} cells) ", data.cells.len()),
        n => format!(" Preview ({} cells, {n} failed) ", data.cells.len()),
    };

    let paragraph = Paragraph::new(lines)
        .scroll((u16::try_from(*scroll).unwrap_or(u16::MAX), 0))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderFailure;
    use crate::value::Object;
    use std::rc::Rc;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_failed_cell_is_inline() {
        let mut props = Object::new();
        props.insert("size".to_string(), Value::from("sm"));
        let ok = Rc::new(Element::new("Button", props, vec![Node::Text("Hi".to_string())]));
        let cells = vec![
            PreviewCell {
                size: Some("sm".to_string()),
                variant: None,
                output: Ok(ok),
            },
            PreviewCell {
                size: None,
                variant: None,
                output: Err(RenderFailure {
                    key: "Button".to_string(),
                    message: "boom".to_string(),
                }),
            },
        ];
        let theme = Value::empty_object();
        let lines = preview_lines(&PreviewRenderData {
            key: Some("Button"),
            cells: &cells,
            theme: &theme,
        });
        let text: Vec<String> = lines.iter().map(line_text).collect();

        assert_eq!(text[0], "sm · default");
        assert!(text.contains(&"  <Button size=\"sm\">".to_string()));
        assert!(text.contains(&"    Hi".to_string()));
        assert!(text.contains(&"default · default".to_string()));
        assert!(text.contains(&"  ✗ boom".to_string()));
    }
}
