//! Lexer (tokenizer) for snippet source
//!
//! Converts raw snippet text into a flat [`Token`] stream consumed by the parser.
//! Template literals are split here into text chunks and the raw source of each
//! `${…}` hole; the parser lexes the holes again with [`Lexer::with_origin`] so
//! their locations still point into the original snippet.

use super::ast::SourceLocation;
use std::fmt;

/// Raw piece of a template literal as seen by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateChunk {
    Text(String),
    Expr {
        source: String,
        location: SourceLocation,
    },
}

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column without a separate token→location table.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Number(f64, SourceLocation),
    Str(String, SourceLocation),
    Template(Vec<TemplateChunk>, SourceLocation),

    // Identifiers
    Ident(String, SourceLocation),

    // Keywords
    True(SourceLocation),
    False(SourceLocation),
    Null(SourceLocation),
    Undefined(SourceLocation),
    Const(SourceLocation),
    Let(SourceLocation),
    If(SourceLocation),
    Else(SourceLocation),
    Return(SourceLocation),
    Throw(SourceLocation),
    New(SourceLocation),
    Typeof(SourceLocation),
    Void(SourceLocation),
    Function(SourceLocation),
    In(SourceLocation),

    // Arithmetic
    Plus(SourceLocation),    // +
    Minus(SourceLocation),   // -
    Star(SourceLocation),    // *
    Slash(SourceLocation),   // /
    Percent(SourceLocation), // %

    // Comparison
    EqEq(SourceLocation),     // ==
    EqEqEq(SourceLocation),   // ===
    NotEq(SourceLocation),    // !=
    NotEqEq(SourceLocation),  // !==
    Lt(SourceLocation),       // <
    Le(SourceLocation),       // <=
    Gt(SourceLocation),       // >
    Ge(SourceLocation),       // >=

    // Logical
    AndAnd(SourceLocation),           // &&
    OrOr(SourceLocation),             // ||
    QuestionQuestion(SourceLocation), // ??
    Bang(SourceLocation),             // !

    // Assignment
    Eq(SourceLocation),      // =
    PlusEq(SourceLocation),  // +=
    MinusEq(SourceLocation), // -=

    // Functions and members
    FatArrow(SourceLocation),    // =>
    Dot(SourceLocation),         // .
    Ellipsis(SourceLocation),    // ...
    QuestionDot(SourceLocation), // ?.
    Question(SourceLocation),    // ?
    Colon(SourceLocation),       // :

    // Punctuation
    LParen(SourceLocation),    // (
    RParen(SourceLocation),    // )
    LBrace(SourceLocation),    // {
    RBrace(SourceLocation),    // }
    LBracket(SourceLocation),  // [
    RBracket(SourceLocation),  // ]
    Semicolon(SourceLocation), // ;
    Comma(SourceLocation),     // ,

    // End of file
    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Number(_, loc)
            | Token::Str(_, loc)
            | Token::Template(_, loc)
            | Token::Ident(_, loc)
            | Token::True(loc)
            | Token::False(loc)
            | Token::Null(loc)
            | Token::Undefined(loc)
            | Token::Const(loc)
            | Token::Let(loc)
            | Token::If(loc)
            | Token::Else(loc)
            | Token::Return(loc)
            | Token::Throw(loc)
            | Token::New(loc)
            | Token::Typeof(loc)
            | Token::Void(loc)
            | Token::Function(loc)
            | Token::In(loc)
            | Token::Plus(loc)
            | Token::Minus(loc)
            | Token::Star(loc)
            | Token::Slash(loc)
            | Token::Percent(loc)
            | Token::EqEq(loc)
            | Token::EqEqEq(loc)
            | Token::NotEq(loc)
            | Token::NotEqEq(loc)
            | Token::Lt(loc)
            | Token::Le(loc)
            | Token::Gt(loc)
            | Token::Ge(loc)
            | Token::AndAnd(loc)
            | Token::OrOr(loc)
            | Token::QuestionQuestion(loc)
            | Token::Bang(loc)
            | Token::Eq(loc)
            | Token::PlusEq(loc)
            | Token::MinusEq(loc)
            | Token::FatArrow(loc)
            | Token::Dot(loc)
            | Token::Ellipsis(loc)
            | Token::QuestionDot(loc)
            | Token::Question(loc)
            | Token::Colon(loc)
            | Token::LParen(loc)
            | Token::RParen(loc)
            | Token::LBrace(loc)
            | Token::RBrace(loc)
            | Token::LBracket(loc)
            | Token::RBracket(loc)
            | Token::Semicolon(loc)
            | Token::Comma(loc)
            | Token::Eof(loc) => *loc,
        }
    }

    /// Name usable as an object key after `.` or inside `{ }`.
    ///
    /// Keywords are valid property names (`theme.default`, `{ in: 1 }`).
    pub fn property_name(&self) -> Option<String> {
        let name = match self {
            Token::Ident(s, _) => return Some(s.clone()),
            Token::True(_) => "true",
            Token::False(_) => "false",
            Token::Null(_) => "null",
            Token::Undefined(_) => "undefined",
            Token::Const(_) => "const",
            Token::Let(_) => "let",
            Token::If(_) => "if",
            Token::Else(_) => "else",
            Token::Return(_) => "return",
            Token::Throw(_) => "throw",
            Token::New(_) => "new",
            Token::Typeof(_) => "typeof",
            Token::Void(_) => "void",
            Token::Function(_) => "function",
            Token::In(_) => "in",
            _ => return None,
        };
        Some(name.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n, _) => write!(f, "number {}", n),
            Token::Str(s, _) => write!(f, "string '{}'", s),
            Token::Template(_, _) => write!(f, "template literal"),
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::True(_) => write!(f, "'true'"),
            Token::False(_) => write!(f, "'false'"),
            Token::Null(_) => write!(f, "'null'"),
            Token::Undefined(_) => write!(f, "'undefined'"),
            Token::Const(_) => write!(f, "'const'"),
            Token::Let(_) => write!(f, "'let'"),
            Token::If(_) => write!(f, "'if'"),
            Token::Else(_) => write!(f, "'else'"),
            Token::Return(_) => write!(f, "'return'"),
            Token::Throw(_) => write!(f, "'throw'"),
            Token::New(_) => write!(f, "'new'"),
            Token::Typeof(_) => write!(f, "'typeof'"),
            Token::Void(_) => write!(f, "'void'"),
            Token::Function(_) => write!(f, "'function'"),
            Token::In(_) => write!(f, "'in'"),
            Token::Plus(_) => write!(f, "'+'"),
            Token::Minus(_) => write!(f, "'-'"),
            Token::Star(_) => write!(f, "'*'"),
            Token::Slash(_) => write!(f, "'/'"),
            Token::Percent(_) => write!(f, "'%'"),
            Token::EqEq(_) => write!(f, "'=='"),
            Token::EqEqEq(_) => write!(f, "'==='"),
            Token::NotEq(_) => write!(f, "'!='"),
            Token::NotEqEq(_) => write!(f, "'!=='"),
            Token::Lt(_) => write!(f, "'<'"),
            Token::Le(_) => write!(f, "'<='"),
            Token::Gt(_) => write!(f, "'>'"),
            Token::Ge(_) => write!(f, "'>='"),
            Token::AndAnd(_) => write!(f, "'&&'"),
            Token::OrOr(_) => write!(f, "'||'"),
            Token::QuestionQuestion(_) => write!(f, "'??'"),
            Token::Bang(_) => write!(f, "'!'"),
            Token::Eq(_) => write!(f, "'='"),
            Token::PlusEq(_) => write!(f, "'+='"),
            Token::MinusEq(_) => write!(f, "'-='"),
            Token::FatArrow(_) => write!(f, "'=>'"),
            Token::Dot(_) => write!(f, "'.'"),
            Token::Ellipsis(_) => write!(f, "'...'"),
            Token::QuestionDot(_) => write!(f, "'?.'"),
            Token::Question(_) => write!(f, "'?'"),
            Token::Colon(_) => write!(f, "':'"),
            Token::LParen(_) => write!(f, "'('"),
            Token::RParen(_) => write!(f, "')'"),
            Token::LBrace(_) => write!(f, "'{{'"),
            Token::RBrace(_) => write!(f, "'}}'"),
            Token::LBracket(_) => write!(f, "'['"),
            Token::RBracket(_) => write!(f, "']'"),
            Token::Semicolon(_) => write!(f, "';'"),
            Token::Comma(_) => write!(f, "','"),
            Token::Eof(_) => write!(f, "end of input"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Lexer for snippet source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self::with_origin(input, SourceLocation::new(1, 1))
    }

    /// Create a lexer whose first character sits at `origin`.
    pub fn with_origin(input: &str, origin: SourceLocation) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: origin.line,
            column: origin.column,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments()?;

            if self.is_at_end() {
                tokens.push(Token::Eof(self.current_location()));
                break;
            }

            tokens.push(self.next_token()?);
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input".to_string(),
            location: loc,
        })?;

        match ch {
            '"' | '\'' => self.string_literal(ch, loc),
            '`' => self.template_literal(loc),
            '0'..='9' => self.number_literal(ch, loc),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.number_literal(ch, loc)
            }
            'a'..='z' | 'A'..='Z' | '_' | '$' => {
                Ok(self.identifier_or_keyword(ch, loc))
            }

            '+' => Ok(if self.eat('=') {
                Token::PlusEq(loc)
            } else {
                Token::Plus(loc)
            }),
            '-' => Ok(if self.eat('=') {
                Token::MinusEq(loc)
            } else {
                Token::Minus(loc)
            }),
            '*' => Ok(Token::Star(loc)),
            '/' => Ok(Token::Slash(loc)),
            '%' => Ok(Token::Percent(loc)),
            '=' => Ok(if self.eat('=') {
                if self.eat('=') {
                    Token::EqEqEq(loc)
                } else {
                    Token::EqEq(loc)
                }
            } else if self.eat('>') {
                Token::FatArrow(loc)
            } else {
                Token::Eq(loc)
            }),
            '!' => Ok(if self.eat('=') {
                if self.eat('=') {
                    Token::NotEqEq(loc)
                } else {
                    Token::NotEq(loc)
                }
            } else {
                Token::Bang(loc)
            }),
            '<' => Ok(if self.eat('=') {
                Token::Le(loc)
            } else {
                Token::Lt(loc)
            }),
            '>' => Ok(if self.eat('=') {
                Token::Ge(loc)
            } else {
                Token::Gt(loc)
            }),
            '&' if self.eat('&') => Ok(Token::AndAnd(loc)),
            '|' if self.eat('|') => Ok(Token::OrOr(loc)),
            '?' => {
                if self.eat('?') {
                    Ok(Token::QuestionQuestion(loc))
                } else if self.peek() == Some('.')
                    && !self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit())
                {
                    // `a?.5:1` is a conditional, not an optional chain
                    self.advance();
                    Ok(Token::QuestionDot(loc))
                } else {
                    Ok(Token::Question(loc))
                }
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Ok(Token::Ellipsis(loc))
                } else {
                    Ok(Token::Dot(loc))
                }
            }
            ':' => Ok(Token::Colon(loc)),
            '(' => Ok(Token::LParen(loc)),
            ')' => Ok(Token::RParen(loc)),
            '{' => Ok(Token::LBrace(loc)),
            '}' => Ok(Token::RBrace(loc)),
            '[' => Ok(Token::LBracket(loc)),
            ']' => Ok(Token::RBracket(loc)),
            ';' => Ok(Token::Semicolon(loc)),
            ',' => Ok(Token::Comma(loc)),

            _ => Err(LexError {
                message: format!("Unexpected character: '{}'", ch),
                location: loc,
            }),
        }
    }

    /// Parse a quoted string literal (either quote style)
    fn string_literal(
        &mut self,
        quote: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == quote {
                self.advance(); // consume closing quote
                return Ok(Token::Str(string, loc));
            }
            if ch == '\n' {
                break;
            }

            self.advance();
            if ch == '\\' {
                string.push(self.escape_sequence()?);
            } else {
                string.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Decode the character after a backslash
    fn escape_sequence(&mut self) -> Result<char, LexError> {
        let escaped = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of input in escape sequence".to_string(),
            location: self.current_location(),
        })?;

        let ch = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' | '\'' | '"' | '`' | '$' => escaped,
            'u' => {
                let mut hex = String::new();
                for _ in 0..4 {
                    match self.advance() {
                        Some(c) if c.is_ascii_hexdigit() => hex.push(c),
                        _ => {
                            return Err(LexError {
                                message: "Invalid unicode escape sequence"
                                    .to_string(),
                                location: self.current_location(),
                            })
                        }
                    }
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| LexError {
                        message: format!("Invalid unicode escape: \\u{}", hex),
                        location: self.current_location(),
                    })?
            }
            _ => {
                return Err(LexError {
                    message: format!("Unknown escape sequence: \\{}", escaped),
                    location: self.current_location(),
                });
            }
        };
        Ok(ch)
    }

    /// Split a template literal into text and `${…}` hole sources
    fn template_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut chunks = Vec::new();
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            if ch == '`' {
                self.advance();
                if !text.is_empty() {
                    chunks.push(TemplateChunk::Text(text));
                }
                return Ok(Token::Template(chunks, loc));
            }

            if ch == '$' && self.peek_ahead(1) == Some('{') {
                self.advance();
                self.advance();
                if !text.is_empty() {
                    chunks.push(TemplateChunk::Text(std::mem::take(&mut text)));
                }
                let location = self.current_location();
                let source = self.template_hole()?;
                chunks.push(TemplateChunk::Expr { source, location });
                continue;
            }

            self.advance();
            if ch == '\\' {
                text.push(self.escape_sequence()?);
            } else {
                text.push(ch);
            }
        }

        Err(LexError {
            message: "Unterminated template literal".to_string(),
            location: loc,
        })
    }

    /// Collect raw source up to the `}` closing a template hole
    fn template_hole(&mut self) -> Result<String, LexError> {
        let start = self.current_location();
        let mut source = String::new();
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        while let Some(ch) = self.advance() {
            if let Some(q) = quote {
                source.push(ch);
                if ch == '\\' {
                    if let Some(next) = self.advance() {
                        source.push(next);
                    }
                } else if ch == q {
                    quote = None;
                }
                continue;
            }

            match ch {
                '\'' | '"' | '`' => quote = Some(ch),
                '{' => depth += 1,
                '}' if depth == 0 => return Ok(source),
                '}' => depth -= 1,
                _ => {}
            }
            source.push(ch);
        }

        Err(LexError {
            message: "Unterminated '${' in template literal".to_string(),
            location: start,
        })
    }

    /// Parse numeric literal (decimal, fraction, exponent or hex)
    fn number_literal(
        &mut self,
        first: char,
        loc: SourceLocation,
    ) -> Result<Token, LexError> {
        if first == '0' && matches!(self.peek(), Some('x') | Some('X')) {
            self.advance();
            // Wider than 64 bits still rounds to the nearest f64
            let mut value = 0.0f64;
            let mut digits = 0usize;
            while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value * 16.0 + f64::from(digit);
                digits += 1;
                self.advance();
            }
            if digits == 0 {
                return Err(LexError {
                    message: "Invalid hex literal: 0x".to_string(),
                    location: loc,
                });
            }
            return Ok(Token::Number(value, loc));
        }

        let mut num_str = String::new();
        num_str.push(first);
        let mut seen_dot = first == '.';

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() || ch == '_' {
                if ch != '_' {
                    num_str.push(ch);
                }
                self.advance();
            } else if ch == '.'
                && !seen_dot
                && self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit())
            {
                seen_dot = true;
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek(), Some('e') | Some('E')) {
            let sign = self.peek_ahead(1);
            let digit_at = if matches!(sign, Some('+') | Some('-')) { 2 } else { 1 };
            if self.peek_ahead(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digit_at {
                    if let Some(c) = self.advance() {
                        num_str.push(c);
                    }
                }
                while let Some(ch) = self.peek().filter(|c| c.is_ascii_digit()) {
                    num_str.push(ch);
                    self.advance();
                }
            }
        }

        num_str.parse::<f64>().map(|n| Token::Number(n, loc)).map_err(|_| {
            LexError {
                message: format!("Invalid number literal: {}", num_str),
                location: loc,
            }
        })
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::True(loc),
            "false" => Token::False(loc),
            "null" => Token::Null(loc),
            "undefined" => Token::Undefined(loc),
            "const" => Token::Const(loc),
            "let" => Token::Let(loc),
            "if" => Token::If(loc),
            "else" => Token::Else(loc),
            "return" => Token::Return(loc),
            "throw" => Token::Throw(loc),
            "new" => Token::New(loc),
            "typeof" => Token::Typeof(loc),
            "void" => Token::Void(loc),
            "function" => Token::Function(loc),
            "in" => Token::In(loc),
            _ => Token::Ident(ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    /// Consume `expected` if it is next
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
