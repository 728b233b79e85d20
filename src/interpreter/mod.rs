//! Sandboxed snippet interpreter
//!
//! This module provides the evaluation side of the editor:
//! - [`evaluator`]: cached entry point that turns source text into values
//! - [`engine`]: tree-walking interpreter and call machinery
//! - [`builtins`]: the capability set snippets can reach
//! - [`errors`]: runtime error types
//!
//! # Execution Model
//!
//! A snippet is one expression. Its value is usually plain data (a theme
//! override object) or a function (a component renderer). Functions keep
//! their defining scope and can be called later through
//! [`evaluator::Evaluator::call`].
//!
//! # Sandbox
//!
//! Identifiers resolve through local bindings and then the capability set;
//! nothing else is reachable. Values are immutable, only local `let`
//! bindings can be reassigned. Call depth, expression nesting and the length
//! of built strings and arrays are all bounded, so hostile text fails with an
//! error instead of exhausting the stack or memory.

pub mod builtins;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod evaluator;
mod expressions;
pub mod ops;
pub mod scope;
mod statements;

pub use builtins::Capabilities;
pub use errors::RuntimeError;
pub use evaluator::{EvalFailure, Evaluator, FailureKind};
