//! Token cursor with bounded lookahead and checkpoint/rollback.

use super::error::ParseError;
use crate::lexer::{Span, Token};

/// A saved cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Wraps a token sequence terminated by an end marker.
///
/// The cursor never mutates the tokens; it only moves an index over them.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    /// Creates a cursor over `tokens`, appending an end marker if the
    /// sequence does not already end with one.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let (offset, line, column) = tokens
                .last()
                .map_or((0, 1, 1), |t| (t.span.end, t.line, t.column + t.lexeme.chars().count()));
            tokens.push(Token::eof(offset, line, column));
        }
        Self { tokens, pos: 0 }
    }

    /// Returns the token `k` positions ahead without consuming anything.
    ///
    /// Looking past the end yields the end marker.
    #[must_use]
    pub fn peek(&self, k: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + k).min(last)]
    }

    /// Returns the current token.
    #[must_use]
    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the most recently consumed token, if any.
    #[must_use]
    pub fn previous(&self) -> Option<&Token> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// Consumes and returns the current token.
    ///
    /// # Errors
    ///
    /// Returns `UnexpectedEndOfInput` if the cursor is on the end marker.
    pub fn advance(&mut self) -> Result<Token, ParseError> {
        let token = self.current();
        if token.is_eof() {
            return Err(ParseError::unexpected_eof(Vec::new(), token));
        }
        let token = token.clone();
        self.pos += 1;
        Ok(token)
    }

    /// Returns true if the cursor is on the end marker.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.current().is_eof()
    }

    /// Saves the current position.
    #[must_use]
    pub const fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    /// Restores a saved position exactly.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Returns the tokens consumed since `checkpoint`.
    #[must_use]
    pub fn consumed_since(&self, checkpoint: Checkpoint) -> &[Token] {
        &self.tokens[checkpoint.0.min(self.pos)..self.pos]
    }

    /// Span covering everything consumed since `checkpoint`.
    #[must_use]
    pub fn span_since(&self, checkpoint: Checkpoint) -> Span {
        match self.consumed_since(checkpoint) {
            [] => Span::point(self.current().span.start),
            [first, .., last] => first.span.merge(last.span),
            [only] => only.span,
        }
    }
}
