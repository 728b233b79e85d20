//! Cached snippet evaluation
//!
//! [`Evaluator`] is the boundary between user-authored text and the rest of
//! the editor. It never panics on bad input: syntax errors and runtime errors
//! come back as an [`EvalFailure`] the caller can show or fall back from.
//!
//! Results are memoized by exact source text. A cache hit returns a clone of
//! the stored value, and since values are reference counted a function
//! produced by a snippet keeps its identity across evaluations of the same
//! text.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::interpreter::builtins::Capabilities;
use crate::interpreter::constants::{DEFAULT_MAX_CALL_DEPTH, MAX_CACHED_SOURCES};
use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::parser::{ParseError, Parser};
use crate::value::Value;

/// Which stage rejected the snippet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Parse,
    Runtime,
}

/// A contained evaluation failure carrying the original error message
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct EvalFailure {
    pub kind: FailureKind,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl EvalFailure {
    /// Message prefixed with the position, for inline display
    pub fn summary(&self) -> String {
        match self.location {
            Some(loc) => format!("{}:{}: {}", loc.line, loc.column, self.message),
            None => self.message.clone(),
        }
    }
}

impl From<ParseError> for EvalFailure {
    fn from(err: ParseError) -> Self {
        EvalFailure {
            kind: FailureKind::Parse,
            message: err.message,
            location: Some(err.location),
        }
    }
}

impl From<RuntimeError> for EvalFailure {
    fn from(err: RuntimeError) -> Self {
        EvalFailure {
            kind: FailureKind::Runtime,
            location: Some(err.location()),
            message: err.to_string(),
        }
    }
}

/// Sandboxed, memoizing evaluator for theme and render snippets
pub struct Evaluator {
    capabilities: Rc<Capabilities>,
    max_call_depth: usize,
    cache: RefCell<FxHashMap<String, Result<Value, EvalFailure>>>,
    compilations: Cell<usize>,
}

impl Evaluator {
    pub fn new(capabilities: Capabilities) -> Self {
        Evaluator {
            capabilities: Rc::new(capabilities),
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            cache: RefCell::new(FxHashMap::default()),
            compilations: Cell::new(0),
        }
    }

    pub fn with_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Evaluate `source` as a single expression.
    pub fn evaluate(&self, source: &str) -> Result<Value, EvalFailure> {
        if let Some(cached) = self.cache.borrow().get(source) {
            return cached.clone();
        }

        self.compilations.set(self.compilations.get() + 1);
        let result = self.evaluate_uncached(source);
        match &result {
            Ok(_) => debug!(bytes = source.len(), "evaluated snippet"),
            Err(failure) => debug!(
                bytes = source.len(),
                kind = ?failure.kind,
                error = %failure.summary(),
                "snippet failed"
            ),
        }

        let mut cache = self.cache.borrow_mut();
        if cache.len() >= MAX_CACHED_SOURCES {
            debug!(entries = cache.len(), "evaluation cache full, clearing");
            cache.clear();
        }
        cache.insert(source.to_string(), result.clone());
        result
    }

    /// Invoke a function value produced by an earlier evaluation.
    pub fn call(&self, function: &Value, args: &[Value]) -> Result<Value, EvalFailure> {
        self.interpreter()
            .call(function, args, SourceLocation::default())
            .map_err(EvalFailure::from)
    }

    /// How many sources were actually parsed and run (cache misses)
    pub fn compilations(&self) -> usize {
        self.compilations.get()
    }

    pub fn cached_sources(&self) -> usize {
        self.cache.borrow().len()
    }

    fn interpreter(&self) -> Interpreter {
        Interpreter::new(self.capabilities.clone()).with_call_depth(self.max_call_depth)
    }

    fn evaluate_uncached(&self, source: &str) -> Result<Value, EvalFailure> {
        let wrapped = wrap_source(source);
        // The opening paren sits at column 0 so user columns start at 1
        let expr = Parser::with_origin(&wrapped, SourceLocation::new(1, 0))?.parse_snippet()?;
        Ok(self.interpreter().run(&expr)?)
    }
}

/// Parenthesize a snippet so a leading `{` reads as an object literal.
/// Trailing semicolons are dropped; the newline before `)` ends any
/// trailing line comment.
fn wrap_source(source: &str) -> String {
    let body = source.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    format!("({}\n)", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> Evaluator {
        Evaluator::new(Capabilities::standard())
    }

    #[test]
    fn test_wrap_source() {
        assert_eq!(wrap_source("{ a: 1 };\n  "), "({ a: 1 }\n)");
        assert_eq!(wrap_source("x // note"), "(x // note\n)");
    }

    #[test]
    fn test_object_literal_is_not_a_block() {
        let value = evaluator().evaluate("{ a: 1 }").unwrap();
        assert_eq!(value.get_path("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_results_are_cached_by_source() {
        let eval = evaluator();
        let first = eval.evaluate("() => 1").unwrap();
        let second = eval.evaluate("() => 1").unwrap();
        assert_eq!(eval.compilations(), 1);
        match (&first, &second) {
            (Value::Function(a), Value::Function(b)) => assert!(Rc::ptr_eq(a, b)),
            other => panic!("Expected functions, got {:?}", other),
        }
    }

    #[test]
    fn test_failures_are_cached_too() {
        let eval = evaluator();
        assert!(eval.evaluate("{ a: ").is_err());
        assert!(eval.evaluate("{ a: ").is_err());
        assert_eq!(eval.compilations(), 1);
    }

    #[test]
    fn test_parse_failure_location_points_into_user_text() {
        let failure = evaluator().evaluate("{ a: @ }").unwrap_err();
        assert_eq!(failure.kind, FailureKind::Parse);
        assert_eq!(failure.location, Some(SourceLocation::new(1, 6)));
    }

    #[test]
    fn test_call_depth_is_bounded() {
        let eval = evaluator().with_call_depth(16);
        let failure = eval
            .evaluate("(() => { const f = (n) => f(n + 1); return f(0) })()")
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Runtime);
        assert!(failure.message.contains("Maximum call stack size exceeded"));
    }
}
