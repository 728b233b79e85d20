//! Runtime error types for the snippet interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! while evaluating a snippet or calling a function it produced (as opposed to
//! parse errors, which are reported before evaluation starts).
//!
//! Runtime errors never escape the evaluator as panics: they are captured and
//! surfaced to the editor as inline messages.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during evaluation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    /// Reference to a name that is neither bound nor a capability
    #[error("{name} is not defined")]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    /// Assignment to a `const` binding
    #[error("Assignment to constant variable '{name}'")]
    ConstAssignment {
        name: String,
        location: SourceLocation,
    },

    /// Assignment to a name provided by the capability set
    #[error("'{name}' is read-only")]
    ReadOnlyCapability {
        name: String,
        location: SourceLocation,
    },

    /// Second declaration of a name in the same block
    #[error("Identifier '{name}' has already been declared")]
    Redeclaration {
        name: String,
        location: SourceLocation,
    },

    /// Operation applied to a value of the wrong kind
    #[error("{message}")]
    TypeError {
        message: String,
        location: SourceLocation,
    },

    /// Call of a non-function value
    #[error("{callee} is not a function")]
    NotCallable {
        callee: String,
        location: SourceLocation,
    },

    /// `new` applied to a function that cannot construct
    #[error("{callee} is not a constructor")]
    NotConstructible {
        callee: String,
        location: SourceLocation,
    },

    /// Nested calls exceeded the configured limit
    #[error("Maximum call stack size exceeded ({limit} frames)")]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },

    /// Expressions nested past the evaluator's stack budget
    #[error("Maximum call stack size exceeded ({limit} nested expressions)")]
    NestingTooDeep {
        limit: usize,
        location: SourceLocation,
    },

    /// String or array grew past its size limit
    #[error("Invalid {kind} length (limit {limit})")]
    LengthExceeded {
        kind: &'static str,
        limit: usize,
        location: SourceLocation,
    },

    /// Value raised by a `throw` statement
    #[error("{message}")]
    Thrown {
        message: String,
        location: SourceLocation,
    },

    /// Bad argument to a capability function
    #[error("{function}: {message}")]
    InvalidArgument {
        function: String,
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::UndefinedVariable { location, .. }
            | RuntimeError::ConstAssignment { location, .. }
            | RuntimeError::ReadOnlyCapability { location, .. }
            | RuntimeError::Redeclaration { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::NotCallable { location, .. }
            | RuntimeError::NotConstructible { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::NestingTooDeep { location, .. }
            | RuntimeError::LengthExceeded { location, .. }
            | RuntimeError::Thrown { location, .. }
            | RuntimeError::InvalidArgument { location, .. } => *location,
        }
    }

    pub fn type_error(message: impl Into<String>, location: SourceLocation) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
            location,
        }
    }

    pub fn invalid_argument(
        function: &str,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        RuntimeError::InvalidArgument {
            function: function.to_string(),
            message: message.into(),
            location,
        }
    }
}
