//! Snippet source parser
//!
//! This module transforms override and render snippets into an expression tree:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser state, helpers and the [`parse_snippet`] entry point
//! - [`ast`]: Expression and statement node definitions
//!
//! # Supported Subset
//!
//! Snippets are a single JavaScript-style expression:
//! - Object, array, string, number and template literals
//! - Arrow functions and `function` expressions with destructuring parameters
//! - Member access, optional chaining, calls and `new`
//! - Block bodies with `const`/`let`, `if`/`else`, `return` and `throw`
//! - No loops, classes, modules, `this` or property assignment
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse_snippet, ParseError, Parser};
