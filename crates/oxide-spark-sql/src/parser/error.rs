//! Parser error types.

use std::fmt;

use serde::Serialize;

use crate::lexer::{Span, Token};

/// Where an error occurred in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Byte span of the offending token.
    pub span: Span,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

impl Position {
    /// Returns the position of `token`.
    #[must_use]
    pub const fn of(token: &Token) -> Self {
        Self {
            span: token.span,
            line: token.line,
            column: token.column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Renders an expected-token set as `A, B or C`.
fn describe_expected(expected: &[String]) -> String {
    match expected {
        [] => String::from("more input"),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

/// A parse error.
///
/// The first error aborts the parse; no partial tree is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ParseError {
    /// The current token matches none of the alternatives accepted here,
    /// or a recognized construct violates a grammar rule.
    #[error("{message} at {position}")]
    Syntax {
        /// Human-readable description.
        message: String,
        /// Tokens that would have been accepted, if known.
        expected: Vec<String>,
        /// Description of the token that was found.
        found: String,
        /// Location of the offending token.
        position: Position,
    },

    /// The input is a recognized statement shape that is intentionally
    /// not supported.
    #[error("Operation not allowed: {command} at {position}")]
    UnsupportedStatement {
        /// The command, as a keyword sequence (e.g. `START TRANSACTION`).
        command: String,
        /// Location of the first token of the statement.
        position: Position,
    },

    /// The token stream ended in the middle of a construct.
    #[error("unexpected end of input at {position}: expected {}", describe_expected(.expected))]
    UnexpectedEndOfInput {
        /// Tokens that would have been accepted, if known.
        expected: Vec<String>,
        /// Location of the end marker.
        position: Position,
    },

    /// Expressions or queries are nested deeper than the configured limit.
    #[error("nesting depth exceeds the limit of {limit} at {position}")]
    RecursionLimitExceeded {
        /// The configured limit.
        limit: usize,
        /// Location where the limit was hit.
        position: Position,
    },

    /// The lexer produced a token it could not classify.
    #[error("invalid token at {position}: {message}")]
    InvalidToken {
        /// Lexer diagnostic.
        message: String,
        /// Location of the token.
        position: Position,
    },
}

impl ParseError {
    /// Creates a syntax error listing the expected alternatives.
    #[must_use]
    pub fn expected(expected: Vec<String>, found: &Token) -> Self {
        Self::Syntax {
            message: format!(
                "Syntax error: expected {}, found {}",
                describe_expected(&expected),
                found.kind.describe()
            ),
            expected,
            found: found.kind.describe(),
            position: Position::of(found),
        }
    }

    /// Creates a syntax error with a custom message.
    #[must_use]
    pub fn syntax(message: impl Into<String>, at: &Token) -> Self {
        Self::Syntax {
            message: message.into(),
            expected: Vec::new(),
            found: at.kind.describe(),
            position: Position::of(at),
        }
    }

    /// Creates an "unsupported statement" error.
    #[must_use]
    pub fn unsupported(command: impl Into<String>, at: &Token) -> Self {
        Self::UnsupportedStatement {
            command: command.into(),
            position: Position::of(at),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub const fn unexpected_eof(expected: Vec<String>, at: &Token) -> Self {
        Self::UnexpectedEndOfInput {
            expected,
            position: Position::of(at),
        }
    }

    /// Returns the location of the error.
    #[must_use]
    pub const fn position(&self) -> &Position {
        match self {
            Self::Syntax { position, .. }
            | Self::UnsupportedStatement { position, .. }
            | Self::UnexpectedEndOfInput { position, .. }
            | Self::RecursionLimitExceeded { position, .. }
            | Self::InvalidToken { position, .. } => position,
        }
    }

    /// Returns the expected-token set, if this error carries one.
    #[must_use]
    pub fn expected_tokens(&self) -> &[String] {
        match self {
            Self::Syntax { expected, .. } | Self::UnexpectedEndOfInput { expected, .. } => {
                expected
            }
            _ => &[],
        }
    }

    /// Returns true for errors that must not trigger a fallback parse.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedStatement { .. } | Self::RecursionLimitExceeded { .. }
        )
    }
}
