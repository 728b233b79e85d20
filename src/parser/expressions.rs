//! Expression parsing implementation
//!
//! This module handles parsing of snippet expressions using precedence climbing
//! for binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: numbers, strings, template literals, `true`/`false`/`null`/`undefined`
//! - Object and array literals, including spread and computed keys
//! - Arrow functions and `function` expressions
//! - Binary operators: arithmetic, equality, relational, `in`
//! - Logical operators: `&&`, `||`, `??`
//! - Unary operators: `-`, `+`, `!`, `typeof`, `void`
//! - Postfix: `.`, `?.`, `[]`, `()`, and `new`
//! - Conditional: `? :`
//! - Assignment to identifiers: `=`, `+=`, `-=`
//!
//! # Precedence
//!
//! Lowest to highest: assignment/arrow, conditional, `??`, `||`, `&&`,
//! equality, relational, additive, multiplicative, unary, postfix.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use std::rc::Rc;

use crate::parser::ast::*;
use crate::parser::lexer::{TemplateChunk, Token};
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse arrow function, assignment, or conditional (right-associative)
    pub(crate) fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        self.descend()?;
        let expr = self.parse_assignment_inner();
        self.ascend(1);
        expr
    }

    fn parse_assignment_inner(&mut self) -> Result<Expr, ParseError> {
        if self.is_arrow_ahead() {
            return self.parse_arrow_function();
        }

        let expr = self.parse_conditional()?;

        let loc = self.current_location();
        let op = if self.match_token(&Token::Eq(loc)) {
            AssignOp::Assign
        } else if self.match_token(&Token::PlusEq(loc)) {
            AssignOp::AddAssign
        } else if self.match_token(&Token::MinusEq(loc)) {
            AssignOp::SubAssign
        } else {
            return Ok(expr);
        };

        let target = match expr {
            Expr::Ident(name, _) => name,
            Expr::Member { .. } | Expr::Index { .. } => {
                return Err(ParseError {
                    message: "Assignment to object properties is not supported".to_string(),
                    location: loc,
                });
            }
            _ => {
                return Err(ParseError {
                    message: "Invalid assignment target".to_string(),
                    location: loc,
                });
            }
        };

        let value = Box::new(self.parse_assignment()?);
        Ok(Expr::Assign {
            target,
            op,
            value,
            location: loc,
        })
    }

    /// Parse conditional: condition ? then_expr : else_expr
    fn parse_conditional(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_nullish()?;

        if self.match_token(&Token::Question(self.current_location())) {
            let loc = self.previous_location();
            let then_expr = Box::new(self.parse_assignment()?);
            self.expect_token(
                &Token::Colon(self.current_location()),
                "Expected ':' in conditional expression",
            )?;
            let else_expr = Box::new(self.parse_assignment()?);

            return Ok(Expr::Conditional {
                condition: Box::new(expr),
                then_expr,
                else_expr,
                location: loc,
            });
        }

        Ok(expr)
    }

    /// Parse nullish coalescing (??)
    fn parse_nullish(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_or()?;
        let mut links = 0;

        while self.match_token(&Token::QuestionQuestion(self.current_location())) {
            let loc = self.previous_location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_logical_or()?);
            left = Expr::Logical {
                op: LogicalOp::Nullish,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_logical_and()?;
        let mut links = 0;

        while self.match_token(&Token::OrOr(self.current_location())) {
            let loc = self.previous_location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_logical_and()?);
            left = Expr::Logical {
                op: LogicalOp::Or,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        let mut links = 0;

        while self.match_token(&Token::AndAnd(self.current_location())) {
            let loc = self.previous_location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_equality()?);
            left = Expr::Logical {
                op: LogicalOp::And,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse equality (==, !=, ===, !==)
    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        let mut links = 0;

        loop {
            let op = match self.peek() {
                Token::EqEq(_) => BinOp::Eq,
                Token::NotEq(_) => BinOp::Ne,
                Token::EqEqEq(_) => BinOp::StrictEq,
                Token::NotEqEq(_) => BinOp::StrictNe,
                _ => break,
            };
            let loc = self.advance().location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_relational()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse relational (<, <=, >, >=, in)
    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        let mut links = 0;

        loop {
            let op = match self.peek() {
                Token::Lt(_) => BinOp::Lt,
                Token::Le(_) => BinOp::Le,
                Token::Gt(_) => BinOp::Gt,
                Token::Ge(_) => BinOp::Ge,
                Token::In(_) => BinOp::In,
                _ => break,
            };
            let loc = self.advance().location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_additive()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse additive (+, -)
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        let mut links = 0;

        loop {
            let op = match self.peek() {
                Token::Plus(_) => BinOp::Add,
                Token::Minus(_) => BinOp::Sub,
                _ => break,
            };
            let loc = self.advance().location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_multiplicative()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse multiplicative (*, /, %)
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        let mut links = 0;

        loop {
            let op = match self.peek() {
                Token::Star(_) => BinOp::Mul,
                Token::Slash(_) => BinOp::Div,
                Token::Percent(_) => BinOp::Mod,
                _ => break,
            };
            let loc = self.advance().location();
            self.descend()?;
            links += 1;
            let right = Box::new(self.parse_unary()?);
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right,
                location: loc,
            };
        }

        self.ascend(links);
        Ok(left)
    }

    /// Parse unary operators
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            Token::Minus(_) => UnOp::Neg,
            Token::Plus(_) => UnOp::Plus,
            Token::Bang(_) => UnOp::Not,
            Token::Typeof(_) => UnOp::Typeof,
            Token::Void(_) => UnOp::Void,
            _ => return self.parse_postfix(),
        };

        let loc = self.advance().location();
        self.descend()?;
        let operand = Box::new(self.parse_unary()?);
        self.ascend(1);
        Ok(Expr::Unary {
            op,
            operand,
            location: loc,
        })
    }

    /// Parse postfix chains: member access, optional chaining, indexing, calls
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = if self.check(&Token::New(self.current_location())) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };

        let mut links = 0;
        loop {
            let loc = self.current_location();
            if matches!(
                self.peek(),
                Token::Dot(_) | Token::QuestionDot(_) | Token::LBracket(_) | Token::LParen(_)
            ) {
                self.descend()?;
                links += 1;
            }
            if self.match_token(&Token::Dot(loc)) {
                let property = self.expect_property_name()?;
                expr = Expr::Member {
                    object: Box::new(expr),
                    property,
                    optional: false,
                    location: loc,
                };
            } else if self.match_token(&Token::QuestionDot(loc)) {
                if self.match_token(&Token::LParen(self.current_location())) {
                    let args = self.parse_arguments()?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        optional: true,
                        location: loc,
                    };
                } else if self.match_token(&Token::LBracket(self.current_location())) {
                    let index = Box::new(self.parse_expression()?);
                    self.expect_token(
                        &Token::RBracket(self.current_location()),
                        "Expected ']' after index",
                    )?;
                    expr = Expr::Index {
                        object: Box::new(expr),
                        index,
                        optional: true,
                        location: loc,
                    };
                } else {
                    let property = self.expect_property_name()?;
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property,
                        optional: true,
                        location: loc,
                    };
                }
            } else if self.match_token(&Token::LBracket(loc)) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after index",
                )?;
                expr = Expr::Index {
                    object: Box::new(expr),
                    index,
                    optional: false,
                    location: loc,
                };
            } else if self.match_token(&Token::LParen(loc)) {
                let args = self.parse_arguments()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    optional: false,
                    location: loc,
                };
            } else {
                break;
            }
        }
        self.ascend(links);

        Ok(expr)
    }

    /// Parse `new Callee.path(args)`; the argument list is optional
    fn parse_new(&mut self) -> Result<Expr, ParseError> {
        let loc = self.advance().location(); // consume 'new'

        let mut callee = self.parse_primary()?;
        let mut links = 0;
        while self.match_token(&Token::Dot(self.current_location())) {
            self.descend()?;
            links += 1;
            let member_loc = self.previous_location();
            let property = self.expect_property_name()?;
            callee = Expr::Member {
                object: Box::new(callee),
                property,
                optional: false,
                location: member_loc,
            };
        }
        self.ascend(links);

        let args = if self.match_token(&Token::LParen(self.current_location())) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Expr::New {
            callee: Box::new(callee),
            args,
            location: loc,
        })
    }

    /// Parse call arguments after the opening '(' through the closing ')'
    fn parse_arguments(&mut self) -> Result<Vec<ListEntry>, ParseError> {
        let entries = self.parse_list_entries(|t| matches!(t, Token::RParen(_)), "arguments")?;
        self.expect_rparen("after arguments")?;
        Ok(entries)
    }

    /// Parse primary expressions
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.peek_token();
        let loc = token.location();

        match token {
            Token::Number(n, _) => {
                self.advance();
                Ok(Expr::Number(n, loc))
            }
            Token::Str(s, _) => {
                self.advance();
                Ok(Expr::Str(s, loc))
            }
            Token::Template(chunks, _) => {
                self.advance();
                self.parse_template(chunks, loc)
            }
            Token::True(_) => {
                self.advance();
                Ok(Expr::Bool(true, loc))
            }
            Token::False(_) => {
                self.advance();
                Ok(Expr::Bool(false, loc))
            }
            Token::Null(_) => {
                self.advance();
                Ok(Expr::Null(loc))
            }
            Token::Undefined(_) => {
                self.advance();
                Ok(Expr::Undefined(loc))
            }
            Token::Ident(name, _) => {
                self.advance();
                Ok(Expr::Ident(name, loc))
            }
            Token::LParen(_) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                Ok(expr)
            }
            Token::LBracket(_) => {
                self.advance();
                self.parse_array_literal(loc)
            }
            Token::LBrace(_) => {
                self.advance();
                self.parse_object_literal(loc)
            }
            Token::Function(_) => {
                self.advance();
                self.parse_function_expression(loc)
            }
            _ => Err(self.unexpected("in expression")),
        }
    }

    /// Parse template chunks, re-lexing each `${…}` hole in place
    fn parse_template(
        &mut self,
        chunks: Vec<TemplateChunk>,
        loc: SourceLocation,
    ) -> Result<Expr, ParseError> {
        let mut parts = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            match chunk {
                TemplateChunk::Text(text) => parts.push(TemplatePart::Text(text)),
                TemplateChunk::Expr { source, location } => {
                    let mut inner = Parser::with_origin(&source, location)?;
                    inner.depth = self.depth;
                    let expr = inner.parse_expression()?;
                    if !inner.is_at_end() {
                        return Err(inner.unexpected("in template expression"));
                    }
                    parts.push(TemplatePart::Expr(expr));
                }
            }
        }
        Ok(Expr::Template(parts, loc))
    }

    /// Parse array literal after the opening '['
    fn parse_array_literal(&mut self, loc: SourceLocation) -> Result<Expr, ParseError> {
        let entries =
            self.parse_list_entries(|t| matches!(t, Token::RBracket(_)), "array literal")?;
        self.expect_token(
            &Token::RBracket(self.current_location()),
            "Expected ']' after array elements",
        )?;
        Ok(Expr::Array(entries, loc))
    }

    /// Parse object literal after the opening '{'
    fn parse_object_literal(&mut self, loc: SourceLocation) -> Result<Expr, ParseError> {
        let mut members = Vec::new();

        while !self.check(&Token::RBrace(self.current_location())) && !self.is_at_end() {
            if self.match_token(&Token::Ellipsis(self.current_location())) {
                members.push(ObjectMember::Spread(self.parse_assignment()?));
            } else {
                let key_token = self.peek_token();
                let key = self.parse_property_key()?;

                let value = if self.match_token(&Token::Colon(self.current_location())) {
                    self.parse_assignment()?
                } else if self.check(&Token::LParen(self.current_location())) {
                    // method shorthand: `name(args) { ... }`
                    let name = match &key {
                        PropertyKey::Named(name) => Some(name.clone()),
                        PropertyKey::Computed(_) => None,
                    };
                    Expr::Function(Rc::new(self.parse_function_rest(name, key_token.location())?))
                } else if let Token::Ident(name, ident_loc) = key_token {
                    // shorthand: `{ size }`
                    Expr::Ident(name, ident_loc)
                } else {
                    return Err(ParseError {
                        message: format!("Expected ':' after property key, found {}", self.peek()),
                        location: self.current_location(),
                    });
                };

                members.push(ObjectMember::Property { key, value });
            }

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        self.expect_token(
            &Token::RBrace(self.current_location()),
            "Expected '}' after object members",
        )?;
        Ok(Expr::Object(members, loc))
    }

    /// Parse an object key: name, keyword, string, number or `[computed]`
    pub(crate) fn parse_property_key(&mut self) -> Result<PropertyKey, ParseError> {
        let token = self.peek_token();

        if let Some(name) = token.property_name() {
            self.advance();
            return Ok(PropertyKey::Named(name));
        }

        match token {
            Token::Str(s, _) => {
                self.advance();
                Ok(PropertyKey::Named(s))
            }
            Token::Number(n, _) => {
                self.advance();
                Ok(PropertyKey::Named(format_number(n)))
            }
            Token::LBracket(_) => {
                self.advance();
                let expr = self.parse_assignment()?;
                self.expect_token(
                    &Token::RBracket(self.current_location()),
                    "Expected ']' after computed key",
                )?;
                Ok(PropertyKey::Computed(Box::new(expr)))
            }
            _ => Err(self.unexpected("as property key")),
        }
    }

    fn expect_property_name(&mut self) -> Result<String, ParseError> {
        match self.peek().property_name() {
            Some(name) => {
                self.advance();
                Ok(name)
            }
            None => Err(ParseError {
                message: format!("Expected property name, found {}", self.peek()),
                location: self.current_location(),
            }),
        }
    }

    /// Parse `function [name](params) { body }` after the keyword
    fn parse_function_expression(&mut self, loc: SourceLocation) -> Result<Expr, ParseError> {
        let name = if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            Some(name)
        } else {
            None
        };
        Ok(Expr::Function(Rc::new(self.parse_function_rest(name, loc)?)))
    }

    /// Parse `(params) { body }`
    fn parse_function_rest(
        &mut self,
        name: Option<String>,
        loc: SourceLocation,
    ) -> Result<Function, ParseError> {
        self.expect_lparen("before function parameters")?;
        let (params, rest) = self.parse_parameters()?;
        self.expect_lbrace("before function body")?;
        let body = self.parse_block_body()?;

        Ok(Function {
            name,
            params,
            rest,
            body: FunctionBody::Block(body),
            location: loc,
        })
    }

    /// Whether the upcoming tokens start an arrow function
    fn is_arrow_ahead(&self) -> bool {
        match self.peek() {
            Token::Ident(_, _) => {
                matches!(self.peek_ahead(1), Some(Token::FatArrow(_)))
            }
            Token::LParen(_) => {
                let mut depth = 0usize;
                let mut offset = 0usize;
                while let Some(token) = self.peek_ahead(offset) {
                    match token {
                        Token::LParen(_) | Token::LBrace(_) | Token::LBracket(_) => depth += 1,
                        Token::RParen(_) | Token::RBrace(_) | Token::RBracket(_) => {
                            depth = depth.saturating_sub(1);
                            if depth == 0 {
                                return matches!(
                                    self.peek_ahead(offset + 1),
                                    Some(Token::FatArrow(_))
                                );
                            }
                        }
                        Token::Eof(_) => return false,
                        _ => {}
                    }
                    offset += 1;
                }
                false
            }
            _ => false,
        }
    }

    /// Parse `x => body` or `(params) => body`
    fn parse_arrow_function(&mut self) -> Result<Expr, ParseError> {
        let loc = self.current_location();

        let (params, rest) = if let Token::Ident(name, _) = self.peek_token() {
            self.advance();
            (
                vec![PatternElement {
                    target: Pattern::Ident(name),
                    default: None,
                }],
                None,
            )
        } else {
            self.expect_lparen("before arrow parameters")?;
            self.parse_parameters()?
        };

        self.expect_token(
            &Token::FatArrow(self.current_location()),
            "Expected '=>' after arrow parameters",
        )?;

        let body = if self.match_token(&Token::LBrace(self.current_location())) {
            FunctionBody::Block(self.parse_block_body()?)
        } else {
            FunctionBody::Expr(Box::new(self.parse_assignment()?))
        };

        Ok(Expr::Function(Rc::new(Function {
            name: None,
            params,
            rest,
            body,
            location: loc,
        })))
    }

    /// Parse comma-separated entries (with spread) until `is_end` matches.
    /// The closing token is left for the caller.
    fn parse_list_entries(
        &mut self,
        is_end: impl Fn(&Token) -> bool,
        ctx: &str,
    ) -> Result<Vec<ListEntry>, ParseError> {
        let mut entries = Vec::new();

        while !is_end(self.peek()) {
            if self.is_at_end() {
                return Err(self.unexpected(&format!("in {}", ctx)));
            }
            let entry = if self.match_token(&Token::Ellipsis(self.current_location())) {
                ListEntry::Spread(self.parse_assignment()?)
            } else {
                ListEntry::Item(self.parse_assignment()?)
            };
            entries.push(entry);

            if !self.match_token(&Token::Comma(self.current_location())) {
                break;
            }
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::parse::parse_snippet;

    #[test]
    fn test_precedence() {
        let expr = parse_snippet("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary {
                op: BinOp::Add,
                right,
                ..
            } => assert!(matches!(*right, Expr::Binary { op: BinOp::Mul, .. })),
            other => panic!("Expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_optional_chain() {
        let expr = parse_snippet("theme?.colors?.[name]").unwrap();
        assert!(matches!(expr, Expr::Index { optional: true, .. }));
    }

    #[test]
    fn test_new_expression() {
        let expr = parse_snippet("new Error('boom')").unwrap();
        match expr {
            Expr::New { callee, args, .. } => {
                assert!(matches!(*callee, Expr::Ident(ref n, _) if n == "Error"));
                assert_eq!(args.len(), 1);
            }
            other => panic!("Expected new expression, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_object_is_not_arrow() {
        let expr = parse_snippet("({ a: 1 })").unwrap();
        assert!(matches!(expr, Expr::Object(..)));
    }

    #[test]
    fn test_spread_and_shorthand() {
        let expr = parse_snippet("({ ...base, size, ['k' + 1]: 2, 'quoted': 3, 4: 'four', })").unwrap();
        match expr {
            Expr::Object(members, _) => {
                assert_eq!(members.len(), 5);
                assert!(matches!(members[0], ObjectMember::Spread(_)));
                assert!(matches!(
                    &members[1],
                    ObjectMember::Property { key: PropertyKey::Named(k), value: Expr::Ident(v, _) } if k == "size" && v == "size"
                ));
                assert!(matches!(
                    &members[2],
                    ObjectMember::Property { key: PropertyKey::Computed(_), .. }
                ));
                assert!(matches!(
                    &members[4],
                    ObjectMember::Property { key: PropertyKey::Named(k), .. } if k == "4"
                ));
            }
            other => panic!("Expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_template_literal() {
        let expr = parse_snippet("`${size}-${variant ?? 'solid'}`").unwrap();
        match expr {
            Expr::Template(parts, _) => {
                assert_eq!(parts.len(), 3);
                assert!(matches!(parts[2], TemplatePart::Expr(Expr::Logical { .. })));
            }
            other => panic!("Expected template literal, got {:?}", other),
        }
    }

    #[test]
    fn test_keyword_property_names() {
        assert!(parse_snippet("({ default: 1, in: 2 }).default").is_ok());
    }

    #[test]
    fn test_method_shorthand() {
        let expr = parse_snippet("({ render(p) { return p } })").unwrap();
        match expr {
            Expr::Object(members, _) => assert!(matches!(
                &members[0],
                ObjectMember::Property { value: Expr::Function(_), .. }
            )),
            other => panic!("Expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_object_is_an_error() {
        assert!(parse_snippet("({ a: 1").is_err());
    }
}
