pub mod access;
pub mod binary;
pub mod methods;
pub mod unary;

// Most operator code lives in `impl Interpreter` blocks; the equality
// helpers are also used by the built-in methods.
pub use binary::{loose_equals, same_value_zero, strict_equals};

use crate::interpreter::constants::{MAX_ARRAY_LENGTH, MAX_STRING_LENGTH};
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;

pub(crate) fn check_string_length(len: usize, location: SourceLocation) -> Result<(), RuntimeError> {
    if len > MAX_STRING_LENGTH {
        return Err(RuntimeError::LengthExceeded {
            kind: "string",
            limit: MAX_STRING_LENGTH,
            location,
        });
    }
    Ok(())
}

pub(crate) fn check_array_length(len: usize, location: SourceLocation) -> Result<(), RuntimeError> {
    if len > MAX_ARRAY_LENGTH {
        return Err(RuntimeError::LengthExceeded {
            kind: "array",
            limit: MAX_ARRAY_LENGTH,
            location,
        });
    }
    Ok(())
}
