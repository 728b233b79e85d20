//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into four layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, add prompt
//! - **[`editor`]**: the text buffer the source pane edits
//! - **[`panes`]**: stateless render functions for each visible pane (components,
//!   source, preview, status bar, prompt)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with a [`Studio`] and
//! call [`App::run`] to start the event loop.
//!
//! [`Studio`]: crate::studio::Studio
//! [`App::run`]: app::App::run

pub mod app;
pub mod editor;
pub mod panes;
pub mod theme;

pub use app::App;
