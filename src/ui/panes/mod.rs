//! TUI pane rendering modules
//!
//! - [`components`]: registered components, selection and error markers
//! - [`source`]: the snippet editor with highlighting and inline errors
//! - [`preview`]: the size x variant preview grid
//! - [`status`]: status bar with keybindings and save state
//! - [`prompt`]: the add-component popup
//! - [`fonts`]: the font picker popup
//!
//! Each module exports a `render_*` function taking the data it shows; panes
//! hold no state of their own beyond scroll offsets passed in by the app.

pub mod components;
pub mod fonts;
pub mod preview;
pub mod prompt;
pub mod source;
pub mod status;

pub use components::{render_components_pane, ComponentRow};
pub use fonts::{render_font_picker, FontPicker};
pub use preview::{render_preview_pane, PreviewRenderData};
pub use prompt::{render_add_prompt, AddPrompt};
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
