//! Parser state, shared token helpers and entry points.

use tracing::trace;

use super::cursor::{Checkpoint, TokenCursor};
use super::error::{ParseError, Position};
use crate::ast::{
    ColumnDef, DataType, FunctionIdentifier, Ident, IdentKind, NamedExpr, QualifiedName,
    Statement, TableIdentifier,
};
use crate::config::ParserConfig;
use crate::lexer::{tokenize, Keyword, Span, Token, TokenKind};

/// Spark SQL parser.
///
/// One parser consumes one token stream and produces one result. It holds
/// no state that outlives the parse and shares nothing with other parsers.
pub struct Parser {
    cursor: TokenCursor,
    config: ParserConfig,
    /// Current nesting depth of expressions, queries and types.
    depth: usize,
    /// Alternatives probed at the current position, for diagnostics.
    expected: Vec<&'static str>,
}

impl Parser {
    /// Creates a parser for `sql` with the default configuration.
    #[must_use]
    pub fn new(sql: &str) -> Self {
        Self::with_config(sql, ParserConfig::default())
    }

    /// Creates a parser for `sql` with an explicit configuration.
    #[must_use]
    pub fn with_config(sql: &str, config: ParserConfig) -> Self {
        Self::from_tokens(tokenize(sql), config)
    }

    /// Creates a parser over an already tokenized input.
    #[must_use]
    pub fn from_tokens(tokens: Vec<Token>, config: ParserConfig) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            config,
            depth: 0,
            expected: Vec::new(),
        }
    }

    /// Returns the configuration of this parse.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parses one statement and requires the end of input.
    ///
    /// Trailing semicolons are accepted.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single valid statement,
    /// or `UnsupportedStatement` for recognized but unsupported commands.
    pub fn parse_single_statement(&mut self) -> Result<Statement, ParseError> {
        self.parse_statement()
    }

    /// Parses one named expression (`expr [AS alias]`) and requires the
    /// end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a single expression.
    pub fn parse_single_expression(&mut self) -> Result<NamedExpr, ParseError> {
        let expr = self.parse_named_expression()?;
        self.expect_end()?;
        Ok(expr)
    }

    /// Parses `[db.]table` and requires the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a table identifier.
    pub fn parse_single_table_identifier(&mut self) -> Result<TableIdentifier, ParseError> {
        let table = self.parse_table_identifier()?;
        self.expect_end()?;
        Ok(table)
    }

    /// Parses `[db.]function` and requires the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a function identifier.
    pub fn parse_single_function_identifier(&mut self) -> Result<FunctionIdentifier, ParseError> {
        let function = self.parse_function_identifier()?;
        self.expect_end()?;
        Ok(function)
    }

    /// Parses a dotted name and requires the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a qualified name.
    pub fn parse_single_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let name = self.parse_qualified_name()?;
        self.expect_end()?;
        Ok(name)
    }

    /// Parses a data type and requires the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a supported data type.
    pub fn parse_single_data_type(&mut self) -> Result<DataType, ParseError> {
        let data_type = self.parse_data_type()?;
        self.expect_end()?;
        Ok(data_type)
    }

    /// Parses a column list `name type [COMMENT 'c'], ...` and requires
    /// the end of input.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a column list.
    pub fn parse_single_table_schema(&mut self) -> Result<Vec<ColumnDef>, ParseError> {
        let columns = self.parse_column_list()?;
        self.expect_end()?;
        Ok(columns)
    }

    // ------------------------------------------------------------------
    // Cursor access
    // ------------------------------------------------------------------

    pub(super) fn peek(&self, k: usize) -> &Token {
        self.cursor.peek(k)
    }

    pub(super) fn current(&self) -> &Token {
        self.cursor.current()
    }

    /// Returns the keyword `k` tokens ahead, without recording a probe.
    pub(super) fn peek_keyword(&self, k: usize) -> Option<Keyword> {
        self.cursor.peek(k).as_keyword()
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    /// Consumes the current token. On the end marker nothing moves.
    pub(super) fn bump(&mut self) -> Token {
        self.expected.clear();
        match self.cursor.advance() {
            Ok(token) => token,
            Err(_) => self.cursor.current().clone(),
        }
    }

    pub(super) fn checkpoint(&self) -> Checkpoint {
        self.cursor.checkpoint()
    }

    /// Restores `checkpoint` and forgets the probes of the abandoned path.
    pub(super) fn rollback(&mut self, checkpoint: Checkpoint) {
        trace!(to = ?checkpoint, from = ?self.cursor.checkpoint(), "rolling back");
        self.cursor.rollback(checkpoint);
        self.expected.clear();
    }

    /// Runs `f` speculatively.
    ///
    /// On a recoverable failure the cursor is restored and `None` is
    /// returned; fatal errors propagate.
    pub(super) fn attempt<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Option<T>, ParseError> {
        let start = self.checkpoint();
        match f(self) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_fatal() => Err(err),
            Err(_) => {
                self.rollback(start);
                Ok(None)
            }
        }
    }

    /// Span of everything consumed since `checkpoint`.
    pub(super) fn span_since(&self, checkpoint: Checkpoint) -> Span {
        self.cursor.span_since(checkpoint)
    }

    /// Runs `f` one nesting level deeper.
    ///
    /// Fails with `RecursionLimitExceeded` instead of descending past the
    /// configured depth.
    pub(super) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if self.depth >= self.config.max_depth {
            return Err(ParseError::RecursionLimitExceeded {
                limit: self.config.max_depth,
                position: Position::of(self.current()),
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ------------------------------------------------------------------
    // Probes
    // ------------------------------------------------------------------

    /// Records `what` as an alternative accepted at the current position.
    pub(super) fn expecting(&mut self, what: &'static str) {
        self.expected.push(what);
    }

    pub(super) fn check(&mut self, kind: &TokenKind) -> bool {
        self.expected.push(kind.symbol());
        &self.current().kind == kind
    }

    pub(super) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.expected.push(keyword.as_str());
        self.current().as_keyword() == Some(keyword)
    }

    /// Consumes the current token if it is `kind`.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it is `keyword`.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes `keywords` if all of them come next; otherwise consumes
    /// nothing.
    pub(super) fn eat_keywords(&mut self, keywords: &[Keyword]) -> bool {
        let Some((first, rest)) = keywords.split_first() else {
            return true;
        };
        if !self.check_keyword(*first) {
            return false;
        }
        let all = rest
            .iter()
            .enumerate()
            .all(|(i, kw)| self.peek_keyword(i + 1) == Some(*kw));
        if all {
            for _ in keywords {
                self.bump();
            }
        }
        all
    }

    /// Consumes the first of `keywords` that comes next.
    pub(super) fn eat_one_of(&mut self, keywords: &[Keyword]) -> Option<Keyword> {
        keywords.iter().copied().find(|kw| self.eat_keyword(*kw))
    }

    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.error_here())
        }
    }

    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        if self.check_keyword(keyword) {
            Ok(self.bump())
        } else {
            Err(self.error_here())
        }
    }

    pub(super) fn expect_keywords(&mut self, keywords: &[Keyword]) -> Result<(), ParseError> {
        for keyword in keywords {
            self.expect_keyword(*keyword)?;
        }
        Ok(())
    }

    /// Accepts trailing semicolons and requires the end of input.
    pub(super) fn expect_end(&mut self) -> Result<(), ParseError> {
        while self.eat(&TokenKind::Semicolon) {}
        if self.is_at_end() {
            Ok(())
        } else {
            self.expecting("end of input");
            Err(self.error_here())
        }
    }

    /// Returns true if nothing but semicolons remains.
    pub(super) fn only_semicolons_remain(&self) -> bool {
        let mut k = 0;
        loop {
            match &self.peek(k).kind {
                TokenKind::Eof => return true,
                TokenKind::Semicolon => k += 1,
                _ => return false,
            }
        }
    }

    /// Consumes the rest of the statement and returns its source text,
    /// with whitespace between tokens collapsed to a single space.
    ///
    /// Trailing semicolons are left for the end-of-statement check. A
    /// lexer error token inside the remainder is reported as such.
    pub(super) fn take_remainder(&mut self) -> Result<String, ParseError> {
        let mut text = String::new();
        let mut last: Option<Span> = None;
        while !self.only_semicolons_remain() {
            if matches!(self.current().kind, TokenKind::Error(_)) {
                return Err(self.error_here());
            }
            let token = self.bump();
            if last.is_some_and(|span| !span.touches(&token.span)) {
                text.push(' ');
            }
            text.push_str(&token.lexeme);
            last = Some(token.span);
        }
        Ok(text)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    fn expected_descriptions(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for what in &self.expected {
            if what.is_empty() {
                continue;
            }
            let rendered = if what.starts_with(|c: char| c.is_ascii_alphabetic()) {
                (*what).to_string()
            } else {
                format!("'{what}'")
            };
            if !out.contains(&rendered) {
                out.push(rendered);
            }
        }
        out
    }

    /// Builds an error for the current token from the probes recorded at
    /// this position.
    pub(super) fn error_here(&self) -> ParseError {
        let token = self.current();
        let expected = self.expected_descriptions();
        match &token.kind {
            TokenKind::Eof => ParseError::unexpected_eof(expected, token),
            TokenKind::Error(message) => ParseError::InvalidToken {
                message: message.clone(),
                position: Position::of(token),
            },
            _ => ParseError::expected(expected, token),
        }
    }

    /// Builds a syntax error with a custom message at `token`.
    pub(super) fn syntax_error_at(&self, message: impl Into<String>, token: &Token) -> ParseError {
        match &token.kind {
            TokenKind::Error(lexer_message) => ParseError::InvalidToken {
                message: lexer_message.clone(),
                position: Position::of(token),
            },
            _ => ParseError::syntax(message, token),
        }
    }

    // ------------------------------------------------------------------
    // Identifiers and names
    // ------------------------------------------------------------------

    /// Returns true if `token` can be used as an identifier.
    ///
    /// With `strict` set, join and set-operation keywords are excluded, as
    /// required for table aliases.
    pub(super) fn is_identifier_token(token: &Token, strict: bool) -> bool {
        match &token.kind {
            TokenKind::Identifier(_) | TokenKind::BackquotedIdentifier(_) => true,
            TokenKind::Keyword(kw) if strict => kw.is_non_reserved(),
            TokenKind::Keyword(kw) => !kw.is_reserved(),
            _ => false,
        }
    }

    pub(super) fn check_identifier(&mut self) -> bool {
        self.expecting("identifier");
        Self::is_identifier_token(self.current(), false)
    }

    fn ident_from_token(token: &Token) -> Ident {
        match &token.kind {
            TokenKind::BackquotedIdentifier(value) => {
                Ident::new(value.as_str(), IdentKind::Quoted, token.span)
            }
            TokenKind::Keyword(_) => {
                Ident::new(token.lexeme.as_str(), IdentKind::NonReservedKeyword, token.span)
            }
            _ => Ident::new(token.lexeme.as_str(), IdentKind::Unquoted, token.span),
        }
    }

    /// `identifier`: a plain, quoted or non-reserved keyword identifier.
    pub(super) fn parse_identifier(&mut self) -> Result<Ident, ParseError> {
        if self.check_identifier() {
            Ok(Self::ident_from_token(&self.bump()))
        } else {
            Err(self.error_here())
        }
    }

    /// `strictIdentifier`: like [`Self::parse_identifier`] but rejecting
    /// join and set-operation keywords.
    pub(super) fn parse_strict_identifier(&mut self) -> Result<Ident, ParseError> {
        self.expecting("identifier");
        if Self::is_identifier_token(self.current(), true) {
            Ok(Self::ident_from_token(&self.bump()))
        } else {
            Err(self.error_here())
        }
    }

    /// `identifier (. identifier)*`
    pub(super) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let mut parts = vec![self.parse_identifier()?];
        while self.eat(&TokenKind::Dot) {
            parts.push(self.parse_identifier()?);
        }
        Ok(QualifiedName::new(parts))
    }

    /// `[db .] table`
    pub(super) fn parse_table_identifier(&mut self) -> Result<TableIdentifier, ParseError> {
        let first = self.parse_identifier()?;
        if self.eat(&TokenKind::Dot) {
            let table = self.parse_identifier()?;
            Ok(TableIdentifier {
                database: Some(first),
                table,
            })
        } else {
            Ok(TableIdentifier {
                database: None,
                table: first,
            })
        }
    }

    /// `[db .] function`
    pub(super) fn parse_function_identifier(&mut self) -> Result<FunctionIdentifier, ParseError> {
        let start = self.current().clone();
        let name = self.parse_qualified_name()?;
        Self::function_identifier_from(name)
            .map_err(|message| self.syntax_error_at(message, &start))
    }

    /// Splits a qualified name into database and function parts.
    pub(super) fn function_identifier_from(
        name: QualifiedName,
    ) -> Result<FunctionIdentifier, String> {
        let rendered = name.to_string();
        let mut parts = name.parts;
        match parts.len() {
            1 => Ok(FunctionIdentifier {
                database: None,
                function: parts.remove(0),
            }),
            2 => {
                let function = parts.remove(1);
                Ok(FunctionIdentifier {
                    database: Some(parts.remove(0)),
                    function,
                })
            }
            _ => Err(format!("Unsupported function name '{rendered}'")),
        }
    }

    /// `identifier (, identifier)*`
    pub(super) fn parse_identifier_seq(&mut self) -> Result<Vec<Ident>, ParseError> {
        self.parse_comma_separated(Self::parse_identifier)
    }

    /// `( identifier (, identifier)* )`
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<Ident>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let idents = self.parse_identifier_seq()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(idents)
    }

    // ------------------------------------------------------------------
    // Literals and lists
    // ------------------------------------------------------------------

    pub(super) fn check_string(&mut self) -> bool {
        self.expecting("string literal");
        matches!(self.current().kind, TokenKind::String(_))
    }

    /// A single string token.
    pub(super) fn parse_string(&mut self) -> Result<String, ParseError> {
        if self.check_string() {
            match self.bump().kind {
                TokenKind::String(value) => Ok(value),
                _ => Err(self.error_here()),
            }
        } else {
            Err(self.error_here())
        }
    }

    /// An optional single string token.
    pub(super) fn parse_optional_string(&mut self) -> Result<Option<String>, ParseError> {
        if self.check_string() {
            self.parse_string().map(Some)
        } else {
            Ok(None)
        }
    }

    /// An `INTEGER_VALUE` token as `u32`.
    pub(super) fn parse_u32(&mut self) -> Result<u32, ParseError> {
        self.expecting("integer");
        let token = self.current().clone();
        match &token.kind {
            TokenKind::IntegerValue(digits) => {
                let value = digits
                    .parse::<u32>()
                    .map_err(|_| self.syntax_error_at(format!("Integer {digits} is out of range"), &token))?;
                self.bump();
                Ok(value)
            }
            _ => Err(self.error_here()),
        }
    }

    /// `item (, item)*`
    pub(super) fn parse_comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        let mut items = vec![item(self)?];
        while self.eat(&TokenKind::Comma) {
            items.push(item(self)?);
        }
        Ok(items)
    }

    /// `( item (, item)* )`
    pub(super) fn parse_parenthesized_list<T>(
        &mut self,
        item: impl FnMut(&mut Self) -> Result<T, ParseError>,
    ) -> Result<Vec<T>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let items = self.parse_comma_separated(item)?;
        self.expect(&TokenKind::RightParen)?;
        Ok(items)
    }
}
