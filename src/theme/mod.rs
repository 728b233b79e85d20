//! Theme composition and export
//!
//! - [`base`]: the built-in base theme source
//! - [`merge`]: deep merge with user values taking precedence
//! - [`compositor`]: evaluates overrides and builds the composed theme
//! - [`export`]: `export const theme = ...` text

pub mod base;
pub mod compositor;
pub mod export;
pub mod merge;

pub use compositor::{ComposedTheme, ThemeCompositor};
pub use export::{export_theme, ExportError};
pub use merge::deep_merge;
