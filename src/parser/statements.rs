//! Statement and binding-pattern parsing
//!
//! Statements only appear inside block-bodied functions. Semicolons are
//! optional; a `return` followed by a line break returns `undefined`.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse statements after an opening '{' through the matching '}'
    pub(crate) fn parse_block_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();

        loop {
            while self.match_token(&Token::Semicolon(self.current_location())) {}

            if self.match_token(&Token::RBrace(self.current_location())) {
                return Ok(statements);
            }
            if self.is_at_end() {
                return Err(ParseError {
                    message: "Expected '}' after block, found end of input".to_string(),
                    location: self.current_location(),
                });
            }

            statements.push(self.parse_statement()?);
        }
    }

    /// Parse a statement
    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.descend()?;
        let stmt = self.parse_statement_inner();
        self.ascend(1);
        stmt
    }

    fn parse_statement_inner(&mut self) -> Result<Stmt, ParseError> {
        let loc = self.current_location();

        if self.match_token(&Token::Const(loc)) {
            return self.parse_declaration(DeclKind::Const, loc);
        }

        if self.match_token(&Token::Let(loc)) {
            return self.parse_declaration(DeclKind::Let, loc);
        }

        if self.match_token(&Token::If(loc)) {
            return self.parse_if_statement(loc);
        }

        if self.match_token(&Token::Return(loc)) {
            let ends_here = matches!(
                self.peek(),
                Token::Semicolon(_) | Token::RBrace(_) | Token::Eof(_)
            ) || self.current_location().line > loc.line;

            let expr = if ends_here {
                None
            } else {
                Some(self.parse_expression()?)
            };
            self.end_statement();
            return Ok(Stmt::Return {
                expr,
                location: loc,
            });
        }

        if self.match_token(&Token::Throw(loc)) {
            let expr = self.parse_expression()?;
            self.end_statement();
            return Ok(Stmt::Throw {
                expr,
                location: loc,
            });
        }

        if self.match_token(&Token::LBrace(loc)) {
            let body = self.parse_block_body()?;
            return Ok(Stmt::Block {
                body,
                location: loc,
            });
        }

        // Otherwise, it's an expression statement
        let expr = self.parse_expression()?;
        self.end_statement();
        Ok(Stmt::Expression {
            expr,
            location: loc,
        })
    }

    /// Parse `const|let pattern [= init]`
    fn parse_declaration(
        &mut self,
        kind: DeclKind,
        loc: SourceLocation,
    ) -> Result<Stmt, ParseError> {
        let pattern = self.parse_binding_pattern()?;

        let init = if self.match_token(&Token::Eq(self.current_location())) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let needs_init = kind == DeclKind::Const || !matches!(pattern, Pattern::Ident(_));
        if init.is_none() && needs_init {
            return Err(ParseError {
                message: "Missing initializer in declaration".to_string(),
                location: self.current_location(),
            });
        }

        self.end_statement();
        Ok(Stmt::Declare {
            kind,
            pattern,
            init,
            location: loc,
        })
    }

    /// Parse if statement
    fn parse_if_statement(&mut self, loc: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_statement_or_block()?;

        let else_branch = if self.match_token(&Token::Else(self.current_location())) {
            Some(self.parse_statement_or_block()?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location: loc,
        })
    }

    /// Parse statement or block (for if/else bodies)
    fn parse_statement_or_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.match_token(&Token::LBrace(self.current_location())) {
            self.parse_block_body()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    fn end_statement(&mut self) {
        self.match_token(&Token::Semicolon(self.current_location()));
    }

    /// Parse a parameter list after '(' through ')'
    pub(crate) fn parse_parameters(
        &mut self,
    ) -> Result<(Vec<PatternElement>, Option<String>), ParseError> {
        let mut params = Vec::new();
        let mut rest = None;

        while !self.check(&Token::RParen(self.current_location())) {
            if self.match_token(&Token::Ellipsis(self.current_location())) {
                rest = Some(self.expect_identifier()?);
                break;
            }

            let target = self.parse_binding_pattern()?;
            let default = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            params.push(PatternElement { target, default });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_rparen("after parameters")?;
        Ok((params, rest))
    }

    /// Parse an identifier, object pattern or array pattern
    pub(crate) fn parse_binding_pattern(&mut self) -> Result<Pattern, ParseError> {
        let loc = self.current_location();

        let pattern = if self.match_token(&Token::LBrace(loc)) {
            self.descend()?;
            self.parse_object_pattern()
        } else if self.match_token(&Token::LBracket(loc)) {
            self.descend()?;
            self.parse_array_pattern()
        } else {
            return Ok(Pattern::Ident(self.expect_identifier()?));
        };
        self.ascend(1);
        pattern
    }

    /// Parse `{ a, b: c, d = 1, ...rest }` after the '{'
    fn parse_object_pattern(&mut self) -> Result<Pattern, ParseError> {
        let mut properties = Vec::new();
        let mut rest = None;

        while !self.check(&Token::RBrace(self.current_location())) {
            if self.match_token(&Token::Ellipsis(self.current_location())) {
                rest = Some(self.expect_identifier()?);
                break;
            }

            let key_token = self.peek_token();
            let key = self.parse_property_key()?;

            let target = if self.match_token(&Token::Colon(self.current_location())) {
                self.parse_binding_pattern()?
            } else if let Token::Ident(name, _) = key_token {
                Pattern::Ident(name)
            } else {
                return Err(ParseError {
                    message: format!("Expected ':' after pattern key, found {}", self.peek()),
                    location: self.current_location(),
                });
            };

            let default = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_assignment()?)
            } else {
                None
            };

            properties.push(PatternProperty {
                key,
                target,
                default,
            });

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(
            &Token::RBrace(self.current_location()),
            "Expected '}' after object pattern",
        )?;
        Ok(Pattern::Object { properties, rest })
    }

    /// Parse `[a, , b = 1, ...rest]` after the '['
    fn parse_array_pattern(&mut self) -> Result<Pattern, ParseError> {
        let mut elements = Vec::new();
        let mut rest = None;

        while !self.check(&Token::RBracket(self.current_location())) {
            if self.match_token(&Token::Comma(self.current_location())) {
                elements.push(None);
                continue;
            }

            if self.match_token(&Token::Ellipsis(self.current_location())) {
                rest = Some(self.expect_identifier()?);
                break;
            }

            let target = self.parse_binding_pattern()?;
            let default = if self.match_token(&Token::Eq(self.current_location())) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            elements.push(Some(PatternElement { target, default }));

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array pattern",
        )?;
        Ok(Pattern::Array { elements, rest })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_snippet;

    fn block_of(source: &str) -> Vec<Stmt> {
        match parse_snippet(source).unwrap() {
            Expr::Function(function) => match &function.body {
                FunctionBody::Block(stmts) => stmts.clone(),
                other => panic!("Expected block body, got {:?}", other),
            },
            other => panic!("Expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_deeply_nested_blocks_and_patterns_fail() {
        let blocks = format!("() => {}", "{ ".repeat(50_000));
        assert!(parse_snippet(&blocks).unwrap_err().message.contains("Nesting exceeds"));

        let ifs = format!("(x) => {{ {}return 1 }}", "if (x) ".repeat(50_000));
        assert!(parse_snippet(&ifs).unwrap_err().message.contains("Nesting exceeds"));

        let pattern = format!("({}) => 1", "[".repeat(50_000));
        assert!(parse_snippet(&pattern).unwrap_err().message.contains("Nesting exceeds"));
    }

    #[test]
    fn test_return_on_next_line_is_empty() {
        let stmts = block_of("() => { return\n 1 }");
        assert!(matches!(stmts[0], Stmt::Return { expr: None, .. }));
    }

    #[test]
    fn test_destructuring_declaration() {
        let stmts = block_of("(p) => { const { size: s = 'md', ...others } = p; return s }");
        match &stmts[0] {
            Stmt::Declare {
                kind: DeclKind::Const,
                pattern,
                ..
            } => assert_eq!(pattern.bound_names(), vec!["s", "others"]),
            other => panic!("Expected declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_array_pattern_with_hole() {
        let stmts = block_of("(xs) => { const [, second, ...tail] = xs; return second }");
        match &stmts[0] {
            Stmt::Declare {
                pattern: Pattern::Array { elements, rest },
                ..
            } => {
                assert_eq!(elements.len(), 2);
                assert!(elements[0].is_none());
                assert_eq!(rest.as_deref(), Some("tail"));
            }
            other => panic!("Expected array pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_const_requires_initializer() {
        assert!(parse_snippet("() => { const x; }").is_err());
    }

    #[test]
    fn test_if_else_chain() {
        let stmts = block_of("(v) => { if (v === 'a') { return 1 } else if (v) return 2; else return 3 }");
        match &stmts[0] {
            Stmt::If {
                else_branch: Some(else_branch),
                ..
            } => assert!(matches!(else_branch[0], Stmt::If { .. })),
            other => panic!("Expected if statement, got {:?}", other),
        }
    }
}
