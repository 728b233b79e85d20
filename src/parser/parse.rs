//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, and the snippet entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `expressions`: Parsing expressions with precedence climbing
//! - `statements`: Parsing block bodies and binding patterns
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};
use std::fmt;

/// Deepest nesting of expressions, statements and patterns a snippet may use.
/// Deeper input fails to parse instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser error type
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Recursive descent parser for snippet expressions
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,

    /// Current nesting level, see [`MAX_NESTING_DEPTH`]
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        Self::with_origin(source, SourceLocation::new(1, 1))
    }

    /// Parser for a fragment that starts at `origin` inside a larger snippet.
    pub fn with_origin(source: &str, origin: SourceLocation) -> Result<Self, ParseError> {
        let mut lexer = Lexer::with_origin(source, origin);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            depth: 0,
        })
    }

    /// Parse a whole snippet: exactly one expression, optionally followed by
    /// semicolons, then end of input.
    pub fn parse_snippet(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;

        while self.match_token(&Token::Semicolon(self.current_location())) {}

        if !self.is_at_end() {
            return Err(ParseError {
                message: format!("Unexpected {} after expression", self.peek()),
                location: self.current_location(),
            });
        }

        Ok(expr)
    }

    // ===== Helper methods =====

    /// Enter one nesting level, failing once the limit is reached
    pub(crate) fn descend(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError {
                message: format!("Nesting exceeds {} levels", MAX_NESTING_DEPTH),
                location: self.current_location(),
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    pub(crate) fn match_token(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek(), Token::Eof(_))
    }

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub(crate) fn peek_token(&self) -> Token {
        self.tokens[self.position].clone()
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.position + n)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous().location()
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location()
    }

    pub(crate) fn expect_token(
        &mut self,
        token: &Token,
        message: &str,
    ) -> Result<(), ParseError> {
        if self.check(token) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError {
                message: format!("{}, found {}", message, self.peek()),
                location: self.current_location(),
            })
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LParen(self.current_location()),
            &format!("Expected '(' {ctx}"),
        )
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::RParen(self.current_location()),
            &format!("Expected ')' {ctx}"),
        )
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(
            &Token::LBrace(self.current_location()),
            &format!("Expected '{{' {ctx}"),
        )
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Ok(name)
        } else {
            Err(ParseError {
                message: format!("Expected identifier, found {}", self.peek()),
                location: self.current_location(),
            })
        }
    }

    /// Error for the current token in a given context
    pub(crate) fn unexpected(&self, ctx: &str) -> ParseError {
        ParseError {
            message: format!("Unexpected {} {}", self.peek(), ctx),
            location: self.current_location(),
        }
    }
}

/// Parse a snippet into its expression tree.
pub fn parse_snippet(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source)?.parse_snippet()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_literal() {
        let expr = parse_snippet("({ colors: { brand: { 500: '#ff0000' } } })").unwrap();

        match expr {
            Expr::Object(members, _) => {
                assert_eq!(members.len(), 1);
                match &members[0] {
                    ObjectMember::Property {
                        key: PropertyKey::Named(name),
                        value: Expr::Object(..),
                    } => assert_eq!(name, "colors"),
                    other => panic!("Expected colors property, got {:?}", other),
                }
            }
            other => panic!("Expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_arrow_with_destructuring() {
        let expr = parse_snippet("({ size, variant = 'solid' }) => size").unwrap();

        match expr {
            Expr::Function(function) => {
                assert_eq!(function.params.len(), 1);
                match &function.params[0].target {
                    Pattern::Object { properties, rest } => {
                        assert_eq!(properties.len(), 2);
                        assert!(properties[1].default.is_some());
                        assert!(rest.is_none());
                    }
                    other => panic!("Expected object pattern, got {:?}", other),
                }
                assert!(matches!(function.body, FunctionBody::Expr(_)));
            }
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_block_body() {
        let source = "(props) => {\n  const x = props.size\n  if (!x) return null\n  return x\n}";
        let expr = parse_snippet(source).unwrap();

        match expr {
            Expr::Function(function) => match &function.body {
                FunctionBody::Block(stmts) => assert_eq!(stmts.len(), 3),
                other => panic!("Expected block body, got {:?}", other),
            },
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_semicolon_is_accepted() {
        assert!(parse_snippet("({ a: 1 });;").is_ok());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let err = parse_snippet("({ a: 1 }) b").unwrap_err();
        assert!(err.message.contains("after expression"));
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        for open in ["[", "(", "{ a: ", "-", "!(", "x => "] {
            let source = open.repeat(100_000);
            let err = parse_snippet(&source).unwrap_err();
            assert!(err.message.contains("Nesting exceeds"), "{open}: {}", err.message);
        }
    }

    #[test]
    fn test_nested_template_holes_count_toward_nesting() {
        let n = 1_000;
        let source = format!("{}1{}", "`${".repeat(n), "}`".repeat(n));
        let err = parse_snippet(&source).unwrap_err();
        assert!(err.message.contains("Nesting exceeds"), "{}", err.message);
    }

    #[test]
    fn test_long_operator_chain_is_an_error() {
        let source = format!("1{}", " + 1".repeat(100_000));
        let err = parse_snippet(&source).unwrap_err();
        assert!(err.message.contains("Nesting exceeds"), "{}", err.message);

        let source = format!("a{}", ".b".repeat(100_000));
        assert!(parse_snippet(&source).is_err());
    }

    #[test]
    fn test_nesting_within_limit_parses() {
        let depth = MAX_NESTING_DEPTH / 2;
        let source = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
        assert!(parse_snippet(&source).is_ok());
    }

    #[test]
    fn test_member_assignment_is_rejected() {
        let err = parse_snippet("(x) => { x.a = 1 }").unwrap_err();
        assert!(err.message.contains("not supported"));
    }
}
