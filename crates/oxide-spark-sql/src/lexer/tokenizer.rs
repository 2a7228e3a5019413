//! Spark SQL tokenizer implementation.

use super::{Keyword, Span, Token, TokenKind};

/// Returns true for characters that may continue an unquoted identifier.
const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A lexer that tokenizes Spark SQL input.
pub struct Lexer<'a> {
    /// The input source code.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
    /// True between `/*+` and the closing `*/` of an optimizer hint.
    in_hint: bool,
    /// Line bookkeeping: line number at `located`.
    line: usize,
    /// Byte offset of the first character of `line`.
    line_start: usize,
    /// Byte offset up to which newlines have been counted.
    located: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
            in_hint: false,
            line: 1,
            line_start: 0,
            located: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character `n` positions ahead without advancing.
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    /// Returns the next character without advancing.
    fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consumes `c` if it is the current character.
    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current character if it matches `c` case-insensitively.
    fn eat_ignore_case(&mut self, c: char) -> bool {
        if self.peek().is_some_and(|p| p.eq_ignore_ascii_case(&c)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_digits(&mut self) -> usize {
        let from = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.pos - from
    }

    /// Skips whitespace and comments.
    ///
    /// Returns the start offset of an unterminated bracketed comment.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), usize> {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            // -- single-line comment
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // /* bracketed comment */, but not a /*+ hint
            if self.peek() == Some('/')
                && self.peek_next() == Some('*')
                && self.peek_nth(2) != Some('+')
            {
                let comment_start = self.pos;
                self.advance();
                self.advance();
                let mut depth = 1usize;
                while depth > 0 {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            depth -= 1;
                        }
                        Some('/') if self.peek() == Some('*') => {
                            self.advance();
                            depth += 1;
                        }
                        Some(_) => {}
                        None => return Err(comment_start),
                    }
                }
                continue;
            }

            return Ok(());
        }
    }

    /// Returns the 1-based line and column of `offset`.
    fn locate(&mut self, offset: usize) -> (usize, usize) {
        if offset > self.located {
            for (i, c) in self.input[self.located..offset].char_indices() {
                if c == '\n' {
                    self.line += 1;
                    self.line_start = self.located + i + 1;
                }
            }
            self.located = offset;
        }
        let column = self.input[self.line_start..offset].chars().count() + 1;
        (self.line, column)
    }

    /// Creates a token spanning from the token start to the current position.
    fn make_token(&mut self, kind: TokenKind) -> Token {
        let (line, column) = self.locate(self.start);
        Token::new(
            kind,
            &self.input[self.start..self.pos],
            Span::new(self.start, self.pos),
            line,
            column,
        )
    }

    /// Scans an identifier or keyword.
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        if let Some(keyword) = Keyword::from_str(text) {
            self.make_token(TokenKind::Keyword(keyword))
        } else {
            let text = text.to_string();
            self.make_token(TokenKind::Identifier(text))
        }
    }

    /// Scans a backquoted identifier; a doubled backquote escapes itself.
    fn scan_backquoted_identifier(&mut self) -> Token {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('`') => {
                    if self.eat('`') {
                        value.push('`');
                    } else {
                        break;
                    }
                }
                Some(c) => value.push(c),
                None => {
                    return self.make_token(TokenKind::Error(String::from(
                        "Unterminated backquoted identifier",
                    )));
                }
            }
        }
        self.make_token(TokenKind::BackquotedIdentifier(value))
    }

    /// Scans a number, including type suffixes.
    ///
    /// A number running straight into identifier characters is an
    /// identifier (`1a`), unless it contains a decimal point, in which case
    /// only the integer part is taken.
    fn scan_number(&mut self) -> Token {
        let int_digits = self.eat_digits();
        let int_end = self.pos;

        let mut has_dot = false;
        if self.peek() == Some('.') {
            let next_is_digit = self.peek_next().is_some_and(|c| c.is_ascii_digit());
            if int_digits > 0 || next_is_digit {
                has_dot = true;
                self.advance();
                self.eat_digits();
            }
        }

        let mut has_exponent = false;
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            let signed = matches!(self.peek_next(), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                has_exponent = true;
                self.advance();
                if signed {
                    self.advance();
                }
                self.eat_digits();
            }
        }

        let digits_end = self.pos;
        let integral = !has_dot && !has_exponent;
        let make: fn(String) -> TokenKind = if integral && self.eat_ignore_case('l') {
            TokenKind::BigintLiteral
        } else if integral && self.eat_ignore_case('s') {
            TokenKind::SmallintLiteral
        } else if integral && self.eat_ignore_case('y') {
            TokenKind::TinyintLiteral
        } else if self.peek().is_some_and(|c| c.eq_ignore_ascii_case(&'b'))
            && self.peek_next().is_some_and(|c| c.eq_ignore_ascii_case(&'d'))
        {
            self.advance();
            self.advance();
            TokenKind::BigDecimalLiteral
        } else if self.eat_ignore_case('d') {
            TokenKind::DoubleLiteral
        } else if integral {
            TokenKind::IntegerValue
        } else {
            TokenKind::DecimalValue
        };

        if self.peek().is_some_and(is_identifier_char) {
            let text = &self.input[self.start..self.pos];
            if !has_dot && text.chars().all(is_identifier_char) {
                self.pos = self.start;
                return self.scan_identifier();
            }
            if has_dot {
                if int_digits == 0 {
                    self.pos = self.start + 1;
                    return self.make_token(TokenKind::Dot);
                }
                self.pos = int_end;
                let digits = self.input[self.start..int_end].to_string();
                return self.make_token(TokenKind::IntegerValue(digits));
            }
        }

        let digits = self.input[self.start..digits_end].to_string();
        self.make_token(make(digits))
    }

    /// Scans a string literal quoted with `quote`, resolving escapes.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance();
        let mut value = String::new();

        loop {
            match self.advance() {
                Some('\\') => {
                    if !self.scan_escape(&mut value) {
                        break;
                    }
                }
                Some(c) if c == quote => {
                    return self.make_token(TokenKind::String(value));
                }
                Some(c) => value.push(c),
                None => break,
            }
        }

        self.make_token(TokenKind::Error(String::from(
            "Unterminated string literal",
        )))
    }

    /// Appends the character escaped by a backslash. Returns false at end
    /// of input.
    fn scan_escape(&mut self, value: &mut String) -> bool {
        // \uXXXX
        if self.peek() == Some('u') {
            let hex: String = self.input[self.pos + 1..].chars().take(4).collect();
            if hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                if let Some(c) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    self.pos += 5;
                    value.push(c);
                    return true;
                }
            }
        }

        // \ooo, first digit 0 or 1
        let octal: String = self.input[self.pos..].chars().take(3).collect();
        if octal.len() == 3
            && octal.starts_with(['0', '1'])
            && octal.chars().all(|c| ('0'..='7').contains(&c))
        {
            if let Some(c) = u32::from_str_radix(&octal, 8).ok().and_then(char::from_u32) {
                self.pos += 3;
                value.push(c);
                return true;
            }
        }

        let Some(c) = self.advance() else {
            return false;
        };
        match c {
            '0' => value.push('\0'),
            'b' => value.push('\u{8}'),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            'Z' => value.push('\u{1A}'),
            '%' => value.push_str("\\%"),
            '_' => value.push_str("\\_"),
            other => value.push(other),
        }
        true
    }

    /// Scans an operator or delimiter.
    fn scan_operator(&mut self, c: char) -> Token {
        self.advance();
        let kind = match c {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '+' => TokenKind::Plus,
            '%' => TokenKind::Percent,
            '~' => TokenKind::Tilde,
            '&' => TokenKind::Ampersand,
            '^' => TokenKind::Caret,
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.in_hint && self.eat('/') {
                    self.in_hint = false;
                    TokenKind::HintEnd
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.peek() == Some('*') && self.peek_next() == Some('+') {
                    self.advance();
                    self.advance();
                    self.in_hint = true;
                    TokenKind::HintStart
                } else {
                    TokenKind::Slash
                }
            }
            '|' => {
                if self.eat('|') {
                    TokenKind::Concat
                } else {
                    TokenKind::Pipe
                }
            }
            '=' => {
                self.eat('=');
                TokenKind::Eq
            }
            '<' => {
                if self.eat('=') {
                    if self.eat('>') {
                        TokenKind::NullSafeEq
                    } else {
                        TokenKind::LtEq
                    }
                } else if self.eat('>') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else if self.eat('>') {
                    TokenKind::LtEq
                } else if self.eat('<') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Keyword(Keyword::Not)
                }
            }
            other => TokenKind::Error(format!("Unexpected character: {other}")),
        };
        self.make_token(kind)
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        if let Err(comment_start) = self.skip_whitespace_and_comments() {
            self.start = comment_start;
            return self.make_token(TokenKind::Error(String::from(
                "Unterminated bracketed comment",
            )));
        }
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '\'' | '"' => self.scan_string(c),
            '`' => self.scan_backquoted_identifier(),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),
            c => self.scan_operator(c),
        }
    }

    /// Tokenizes the entire input and returns all tokens, ending with `Eof`.
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

/// Tokenizes `input` with a fresh [`Lexer`].
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}
