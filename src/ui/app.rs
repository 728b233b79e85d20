//! Main TUI application state and logic

use crate::store::NewComponent;
use crate::studio::Studio;
use crate::ui::editor::{EditTarget, TextBuffer};
use crate::ui::panes::{
    self, AddPrompt, ComponentRow, FontPicker, PreviewRenderData, StatusRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Components,
    Editor,
    Preview,
}

impl FocusedPane {
    /// Move focus to the next pane (components -> editor -> preview)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Components => FocusedPane::Editor,
            FocusedPane::Editor => FocusedPane::Preview,
            FocusedPane::Preview => FocusedPane::Components,
        }
    }
}

pub struct App {
    pub studio: Studio,

    /// Where Ctrl-E writes the exported theme
    pub export_path: PathBuf,

    pub focused_pane: FocusedPane,

    /// Highlighted row in the component list
    pub list_cursor: usize,

    /// Snippet bound to the editor
    pub target: EditTarget,
    pub buffer: TextBuffer,

    pub editor_scroll: usize,
    pub preview_scroll: usize,

    /// Open add-component popup, if any
    pub prompt: Option<AddPrompt>,

    /// Open font picker, if any
    pub font_picker: Option<FontPicker>,

    pub should_quit: bool,

    pub status_message: String,
    pub status_is_error: bool,
}

impl App {
    pub fn new(studio: Studio, export_path: PathBuf) -> Self {
        let target = match studio.store().selected() {
            Some(key) => EditTarget::Overrides(key.to_string()),
            None => EditTarget::Global,
        };
        let list_cursor = studio
            .store()
            .selected()
            .and_then(|selected| studio.store().keys().position(|key| key == selected))
            .unwrap_or(0);

        let mut app = App {
            studio,
            export_path,
            focused_pane: FocusedPane::Components,
            list_cursor,
            target: EditTarget::Global,
            buffer: TextBuffer::default(),
            editor_scroll: 0,
            preview_scroll: 0,
            prompt: None,
            font_picker: None,
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
        };
        app.open_target(target);
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.studio.tick(Instant::now()) {
                self.set_status("Saved");
            }
        }

        self.studio.flush();
        Ok(())
    }

    fn keys(&self) -> Vec<String> {
        self.studio.store().keys().map(str::to_string).collect()
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.status_is_error = true;
    }

    /// Bind the editor to `target` and load its current text
    fn open_target(&mut self, target: EditTarget) {
        let store = self.studio.store();
        let text = match &target {
            EditTarget::Global => store.global_overrides_source(),
            EditTarget::Overrides(key) => store.overrides_source(key),
            EditTarget::Render(key) => store.render_source(key),
        };
        self.buffer = TextBuffer::from_text(text);
        self.editor_scroll = 0;
        self.target = target;
    }

    /// Push the buffer into the store
    fn commit(&mut self) {
        let text = self.buffer.text();
        match &self.target {
            EditTarget::Global => self.studio.set_global_overrides_source(&text),
            EditTarget::Overrides(key) => {
                self.studio.set_overrides_source(key, &text);
            }
            EditTarget::Render(key) => {
                self.studio.set_render_source(key, &text);
            }
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(20),
                Constraint::Percentage(45),
                Constraint::Percentage(35),
            ])
            .split(main_chunks[0]);

        let composed = self.studio.theme();
        let store = self.studio.store();

        let rows: Vec<ComponentRow> = store
            .components()
            .map(|entry| ComponentRow {
                key: &entry.key,
                name: &entry.name,
                is_selected: store.selected() == Some(entry.key.as_str()),
                has_error: composed.component_error(&entry.key).is_some(),
            })
            .collect();
        panes::render_components_pane(
            frame,
            columns[0],
            &rows,
            self.list_cursor,
            composed.global_error.is_some(),
            self.focused_pane == FocusedPane::Components,
        );

        let render_error;
        let error = match &self.target {
            EditTarget::Global => composed.global_error.as_ref(),
            EditTarget::Overrides(key) => composed.component_error(key),
            EditTarget::Render(key) => {
                render_error = self
                    .studio
                    .evaluator()
                    .evaluate(store.render_source(key))
                    .err();
                render_error.as_ref()
            }
        };
        panes::render_source_pane(
            frame,
            columns[1],
            &self.target.title(),
            &self.buffer,
            error,
            self.focused_pane == FocusedPane::Editor,
            &mut self.editor_scroll,
        );

        let preview_key = self.target.component().or(store.selected());
        let cells = preview_key
            .map(|key| self.studio.preview_grid(key))
            .unwrap_or_default();
        panes::render_preview_pane(
            frame,
            columns[2],
            &PreviewRenderData {
                key: preview_key,
                cells: &cells,
                theme: &composed.theme,
            },
            self.focused_pane == FocusedPane::Preview,
            &mut self.preview_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &StatusRenderData {
                message: &self.status_message,
                is_error: self.status_is_error,
                save_pending: self.studio.save_pending(),
                component_count: store.len(),
            },
        );

        if let Some(prompt) = &self.prompt {
            panes::render_add_prompt(frame, size, prompt);
        }
        if let Some(picker) = &self.font_picker {
            panes::render_font_picker(frame, size, picker, self.studio.store().fonts());
        }
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.prompt.is_some() {
            self.handle_prompt_key(key);
            return;
        }
        if self.font_picker.is_some() {
            self.handle_font_key(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('o') => self.toggle_snippet(),
                KeyCode::Char('g') => {
                    self.open_target(EditTarget::Global);
                    self.focused_pane = FocusedPane::Editor;
                }
                KeyCode::Char('n') => self.prompt = Some(AddPrompt::default()),
                KeyCode::Char('f') => {
                    self.font_picker = Some(FontPicker::new(self.studio.available_fonts()))
                }
                KeyCode::Char('e') => self.export(),
                KeyCode::Char('r') => {
                    self.studio.reset_global_overrides();
                    if self.target == EditTarget::Global {
                        self.open_target(EditTarget::Global);
                    }
                    self.set_status("Global overrides reset");
                }
                _ => {}
            }
            return;
        }

        if key.code == KeyCode::Tab {
            self.focused_pane = self.focused_pane.next();
            return;
        }

        match self.focused_pane {
            FocusedPane::Components => self.handle_list_key(key),
            FocusedPane::Editor => self.handle_editor_key(key),
            FocusedPane::Preview => match key.code {
                KeyCode::Up => self.preview_scroll = self.preview_scroll.saturating_sub(1),
                KeyCode::Down => self.preview_scroll = self.preview_scroll.saturating_add(1),
                _ => {}
            },
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let keys = self.keys();
        match key.code {
            KeyCode::Up => self.list_cursor = self.list_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.list_cursor + 1 < keys.len() {
                    self.list_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(key) = keys.get(self.list_cursor) {
                    self.studio.select(Some(key.as_str()));
                    self.open_target(EditTarget::Overrides(key.clone()));
                    self.preview_scroll = 0;
                    self.focused_pane = FocusedPane::Editor;
                }
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                if let Some(key) = keys.get(self.list_cursor) {
                    if self.studio.remove_component(key).is_some() {
                        info!(key = %key, "removed component");
                        if self.target.component() == Some(key.as_str()) {
                            self.open_target(EditTarget::Global);
                        }
                        self.list_cursor = self.list_cursor.min(keys.len().saturating_sub(2));
                        self.set_status(format!("Removed {key}"));
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let edited = match key.code {
            KeyCode::Char(c) => {
                self.buffer.insert_char(c);
                true
            }
            KeyCode::Enter => {
                self.buffer.insert_newline();
                true
            }
            KeyCode::Backspace => {
                self.buffer.backspace();
                true
            }
            KeyCode::Delete => {
                self.buffer.delete();
                true
            }
            KeyCode::Left => {
                self.buffer.move_left();
                false
            }
            KeyCode::Right => {
                self.buffer.move_right();
                false
            }
            KeyCode::Up => {
                self.buffer.move_up();
                false
            }
            KeyCode::Down => {
                self.buffer.move_down();
                false
            }
            KeyCode::Home => {
                self.buffer.home();
                false
            }
            KeyCode::End => {
                self.buffer.end();
                false
            }
            KeyCode::Esc => {
                self.focused_pane = FocusedPane::Components;
                false
            }
            _ => false,
        };
        if edited {
            self.commit();
        }
    }

    /// Switch between a component's overrides and render snippets
    fn toggle_snippet(&mut self) {
        let next = match &self.target {
            EditTarget::Overrides(key) => EditTarget::Render(key.clone()),
            EditTarget::Render(key) => EditTarget::Overrides(key.clone()),
            EditTarget::Global => match self.studio.store().selected() {
                Some(key) => EditTarget::Overrides(key.to_string()),
                None => {
                    self.set_error("Select a component first");
                    return;
                }
            },
        };
        self.open_target(next);
        self.focused_pane = FocusedPane::Editor;
    }

    fn export(&mut self) {
        let source = self.studio.export_source();
        if source.is_empty() {
            self.set_error("Theme cannot be exported");
            return;
        }
        match fs::write(&self.export_path, source) {
            Ok(()) => {
                info!(path = %self.export_path.display(), "exported theme");
                self.set_status(format!("Exported to {}", self.export_path.display()));
            }
            Err(err) => {
                warn!(path = %self.export_path.display(), error = %err, "export failed");
                self.set_error(format!("Export failed: {err}"));
            }
        }
    }

    fn handle_font_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.font_picker.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.font_picker = None,
            KeyCode::Char('f') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.font_picker = None
            }
            KeyCode::Up => picker.move_up(),
            KeyCode::Down => picker.move_down(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(font) = picker.current().cloned() {
                    let family = font.family;
                    if self.studio.toggle_font(&family) {
                        self.set_status(format!("Loaded {family}"));
                    } else {
                        self.set_status(format!("Removed {family}"));
                    }
                }
            }
            KeyCode::Char('i') => {
                if self.studio.store().fonts().is_empty() {
                    self.set_error("Select a font first");
                } else if self.studio.insert_font_stack() {
                    self.font_picker = None;
                    self.open_target(EditTarget::Global);
                    self.focused_pane = FocusedPane::Editor;
                    self.set_status("Font stack added to global overrides");
                } else {
                    self.set_error("Global overrides have no object to extend");
                }
            }
            _ => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.prompt = None,
            KeyCode::Tab => prompt.on_name = !prompt.on_name,
            KeyCode::Backspace => {
                prompt.current_mut().pop();
            }
            KeyCode::Char(c) => prompt.current_mut().push(c),
            KeyCode::Enter => {
                let new = NewComponent::new(prompt.key.clone(), prompt.name.clone());
                let key = prompt.key.clone();
                match self.studio.add_component(new) {
                    Ok(()) => {
                        self.prompt = None;
                        self.studio.select(Some(key.as_str()));
                        self.list_cursor = self.keys().iter().position(|k| *k == key).unwrap_or(0);
                        self.open_target(EditTarget::Overrides(key.clone()));
                        self.set_status(format!("Added {key}"));
                    }
                    Err(err) => prompt.error = Some(err.to_string()),
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DataStore;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn app() -> App {
        App::new(Studio::new(DataStore::with_defaults()), PathBuf::from("theme.js"))
    }

    #[test]
    fn test_enter_selects_and_edits_overrides() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.studio.store().selected(), Some("Checkbox"));
        assert_eq!(app.target, EditTarget::Overrides("Checkbox".to_string()));
        assert_eq!(app.focused_pane, FocusedPane::Editor);

        ctrl(&mut app, 'o');
        assert_eq!(app.target, EditTarget::Render("Checkbox".to_string()));
    }

    #[test]
    fn test_typing_commits_to_store() {
        let mut app = app();
        ctrl(&mut app, 'g');
        app.buffer = TextBuffer::from_text("");
        for c in "{ a: 1 }".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.studio.store().global_overrides_source(), "{ a: 1 }");
    }

    #[test]
    fn test_font_picker_toggles_and_inserts_stack() {
        let mut app = app();
        ctrl(&mut app, 'f');
        let picker = app.font_picker.as_ref().expect("picker open");
        let first = picker.current().expect("catalog is not empty").family.clone();

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.studio.store().fonts(), [first.clone()]);

        press(&mut app, KeyCode::Char('i'));
        assert!(app.font_picker.is_none());
        assert_eq!(app.target, EditTarget::Global);
        assert!(app.buffer.text().contains("fonts:"));
        assert!(app.studio.theme().global_error.is_none());

        ctrl(&mut app, 'f');
        press(&mut app, KeyCode::Enter);
        assert!(app.studio.store().fonts().is_empty());
        press(&mut app, KeyCode::Esc);
        assert!(app.font_picker.is_none());
    }

    #[test]
    fn test_prompt_reports_validation_error() {
        let mut app = app();
        ctrl(&mut app, 'n');
        for c in "Button".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in "Again".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        let prompt = app.prompt.as_ref().unwrap();
        assert!(prompt.error.as_deref().unwrap().contains("already exists"));

        press(&mut app, KeyCode::Esc);
        assert!(app.prompt.is_none());
    }
}
