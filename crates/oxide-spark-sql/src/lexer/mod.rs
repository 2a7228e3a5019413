//! Spark SQL lexer.
//!
//! A hand-written lexer producing the token vocabulary the parser consumes:
//! case-insensitive keywords, backquoted identifiers, suffixed numeric
//! literals, escaped strings and optimizer hint delimiters.

mod span;
mod token;
mod tokenizer;

pub use span::Span;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{tokenize, Lexer};
