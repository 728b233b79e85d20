//! # Introduction
//!
//! themelab is a live theme editor. Style overrides and component previews
//! are written as small JavaScript-like snippets, evaluated inside a
//! capability sandbox, merged into one theme, and rendered into previews
//! for every size and variant the theme declares.
//!
//! ## Evaluation pipeline
//!
//! ```text
//! Source → Lexer → Parser → Expr AST → Interpreter → Value
//!                                                      │
//! DataStore ──► ThemeCompositor ──► composed theme ──► export
//!           └─► RendererBridge  ──► Element previews
//! ```
//!
//! 1. [`parser`]: tokenises a snippet and builds an expression AST.
//! 2. [`value`]: immutable runtime values, preview elements and the JSON
//!    bridge.
//! 3. [`interpreter`]: walks the AST against an explicit
//!    [`interpreter::Capabilities`] set; [`interpreter::Evaluator`] caches
//!    results by source text.
//! 4. [`store`]: the editable state ([`store::DataStore`]) and its
//!    serialized [`store::Snapshot`].
//! 5. [`theme`]: base theme, deep merge, composition and export.
//! 6. [`render`]: renders component snippets into preview cells, one
//!    failure per cell.
//! 7. [`persistence`]: debounced saving to a key-value backend.
//! 8. [`fonts`]: best-effort font catalog.
//! 9. [`studio`]: the facade the UI drives.
//! 10. [`ui`]: ratatui-based TUI; not part of the stable library API.

pub mod config;
pub mod fonts;
pub mod interpreter;
pub mod parser;
pub mod persistence;
pub mod render;
pub mod store;
pub mod studio;
pub mod theme;
pub mod ui;
pub mod value;
