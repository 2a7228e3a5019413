//! Binding powers for the value-expression Pratt loop and the
//! set-operation chain.

use crate::ast::{ArithmeticOp, ComparisonOp, SetOperator, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// A binary operator of the value layer.
///
/// Unary prefixes (`+ - ~`) are not in this table: they are folded onto
/// the primary operand before any infix operator is considered, so they
/// bind tighter than every binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixOp {
    Arithmetic(ArithmeticOp),
    Comparison(ComparisonOp),
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: left_bp < right_bp
///
/// Returns `None` if the token is not a value-layer infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        // Comparison (lowest)
        TokenKind::Eq
        | TokenKind::NullSafeEq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => Some((1, 2)),

        // Bitwise OR
        TokenKind::Pipe => Some((3, 4)),

        // Bitwise XOR
        TokenKind::Caret => Some((5, 6)),

        // Bitwise AND
        TokenKind::Ampersand => Some((7, 8)),

        // Additive (string concat has same precedence as addition)
        TokenKind::Plus | TokenKind::Minus | TokenKind::Concat => Some((9, 10)),

        // Multiplicative
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent | TokenKind::Keyword(Keyword::Div) => {
            Some((11, 12))
        }

        _ => None,
    }
}

/// Converts a token to a value-layer binary operator.
#[must_use]
pub const fn token_to_infix_op(kind: &TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::Eq => InfixOp::Comparison(ComparisonOp::Eq),
        TokenKind::NullSafeEq => InfixOp::Comparison(ComparisonOp::NullSafeEq),
        TokenKind::NotEq => InfixOp::Comparison(ComparisonOp::NotEq),
        TokenKind::Lt => InfixOp::Comparison(ComparisonOp::Lt),
        TokenKind::LtEq => InfixOp::Comparison(ComparisonOp::LtEq),
        TokenKind::Gt => InfixOp::Comparison(ComparisonOp::Gt),
        TokenKind::GtEq => InfixOp::Comparison(ComparisonOp::GtEq),
        TokenKind::Pipe => InfixOp::Arithmetic(ArithmeticOp::BitOr),
        TokenKind::Caret => InfixOp::Arithmetic(ArithmeticOp::BitXor),
        TokenKind::Ampersand => InfixOp::Arithmetic(ArithmeticOp::BitAnd),
        TokenKind::Plus => InfixOp::Arithmetic(ArithmeticOp::Add),
        TokenKind::Minus => InfixOp::Arithmetic(ArithmeticOp::Subtract),
        TokenKind::Concat => InfixOp::Arithmetic(ArithmeticOp::Concat),
        TokenKind::Star => InfixOp::Arithmetic(ArithmeticOp::Multiply),
        TokenKind::Slash => InfixOp::Arithmetic(ArithmeticOp::Divide),
        TokenKind::Percent => InfixOp::Arithmetic(ArithmeticOp::Modulo),
        TokenKind::Keyword(Keyword::Div) => InfixOp::Arithmetic(ArithmeticOp::IntDivide),
        _ => return None,
    };
    Some(op)
}

/// Converts a token to a unary prefix operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Minus),
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        _ => None,
    }
}

/// Converts a token to a set operator.
#[must_use]
pub const fn token_to_set_operator(kind: &TokenKind) -> Option<SetOperator> {
    match kind {
        TokenKind::Keyword(Keyword::Union) => Some(SetOperator::Union),
        TokenKind::Keyword(Keyword::Intersect) => Some(SetOperator::Intersect),
        TokenKind::Keyword(Keyword::Except) => Some(SetOperator::Except),
        TokenKind::Keyword(Keyword::Minus) => Some(SetOperator::Minus),
        _ => None,
    }
}
