// Constants for the snippet interpreter

/// Maximum nesting of function calls before evaluation fails
/// Kept low enough that the tree walker stays well inside a 2 MiB thread stack
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;

/// Maximum nesting of expression evaluation, counted across calls
pub const MAX_EVAL_DEPTH: usize = 200;

/// Longest string, in bytes, that operators and methods will build
pub const MAX_STRING_LENGTH: usize = 1 << 22;

/// Longest array that spreads and methods will build
pub const MAX_ARRAY_LENGTH: usize = 1 << 20;

/// Number of distinct sources the evaluator caches before starting over
pub const MAX_CACHED_SOURCES: usize = 1024;
