//! Expression parsing.
//!
//! Four layers, loosest first:
//!
//! 1. boolean: `OR`, `AND`, `NOT` and `EXISTS`
//! 2. predicate: a value followed by `BETWEEN`, `IN`, `LIKE`, `RLIKE` or `IS`
//! 3. value: a Pratt loop over comparison, bitwise and arithmetic operators
//! 4. primary: literals, columns, calls and the special forms

use super::cursor::Checkpoint;
use super::error::ParseError;
use super::pratt::{
    infix_binding_power, token_to_infix_op, token_to_set_operator, token_to_unary_op, InfixOp,
};
use super::Parser;
use crate::ast::{
    Alias, Expr, ExprKind, FrameBound, FrameUnits, FunctionCall, Ident, IntervalField,
    IntervalValue, LikeKind, Literal, LogicalOp, NamedExpr, NullOrdering, NumericKind,
    OrderDirection, Predicate, QualifiedName, SetQuantifier, SortItem, TrimOption, WhenClause,
    WindowDefinition, WindowFrame, WindowSpec,
};
use crate::lexer::{Keyword, Token, TokenKind};

/// Keywords that end an expression and can never start an implicit alias.
const ALIAS_STOP_WORDS: &[Keyword] = &[
    Keyword::From,
    Keyword::Where,
    Keyword::Group,
    Keyword::Having,
    Keyword::Order,
    Keyword::Limit,
    Keyword::Offset,
    Keyword::Cluster,
    Keyword::Distribute,
    Keyword::Sort,
    Keyword::Window,
    Keyword::Lateral,
    Keyword::Pivot,
    Keyword::Insert,
    Keyword::Select,
    Keyword::Map,
    Keyword::Reduce,
    Keyword::Tablesample,
    Keyword::For,
    Keyword::Row,
    Keyword::Recordwriter,
    Keyword::Recordreader,
    Keyword::When,
    Keyword::Then,
    Keyword::Else,
    Keyword::End,
];

const fn is_numeric(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::IntegerValue(_)
            | TokenKind::DecimalValue(_)
            | TokenKind::BigintLiteral(_)
            | TokenKind::SmallintLiteral(_)
            | TokenKind::TinyintLiteral(_)
            | TokenKind::DoubleLiteral(_)
            | TokenKind::BigDecimalLiteral(_)
    )
}

impl Parser {
    /// Returns true if a query starts `k` tokens ahead.
    ///
    /// `TABLE`, `MAP` and `REDUCE` also name columns and functions, so they
    /// only count when an identifier follows.
    pub(super) fn query_starts_at(&self, k: usize) -> bool {
        match self.peek_keyword(k) {
            Some(Keyword::Select | Keyword::With | Keyword::Values | Keyword::From) => true,
            Some(Keyword::Table | Keyword::Map | Keyword::Reduce) => {
                Self::is_identifier_token(self.peek(k + 1), false)
            }
            _ => false,
        }
    }

    /// Returns true if the current token may begin an alias written
    /// without `AS`.
    pub(super) fn at_implicit_alias(&mut self) -> bool {
        self.expecting("alias");
        let token = self.current();
        match token.as_keyword() {
            Some(kw) => kw.is_non_reserved() && !ALIAS_STOP_WORDS.contains(&kw),
            None => Self::is_identifier_token(token, true),
        }
    }

    /// `expression [[AS] alias | AS (a, b, ...)]`
    pub(super) fn parse_named_expression(&mut self) -> Result<NamedExpr, ParseError> {
        let expr = self.parse_expression()?;
        let alias = if self.eat_keyword(Keyword::As) {
            if self.check(&TokenKind::LeftParen) {
                Some(Alias::Multi(self.parse_identifier_list()?))
            } else {
                Some(Alias::Single(self.parse_identifier()?))
            }
        } else if self.at_implicit_alias() {
            Some(Alias::Single(self.parse_identifier()?))
        } else {
            None
        };
        Ok(NamedExpr { expr, alias })
    }

    pub(super) fn parse_named_expression_seq(&mut self) -> Result<Vec<NamedExpr>, ParseError> {
        self.parse_comma_separated(Self::parse_named_expression)
    }

    /// A full boolean expression.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.nested(Self::parse_or)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = self.logical(LogicalOp::Or, left, right, start);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = self.logical(LogicalOp::And, left, right, start);
        }
        Ok(left)
    }

    fn logical(&self, op: LogicalOp, left: Expr, right: Expr, start: Checkpoint) -> Expr {
        Expr::new(
            ExprKind::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            self.span_since(start),
        )
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        let mut nots = Vec::new();
        while self.check_keyword(Keyword::Not) {
            nots.push(self.checkpoint());
            self.bump();
        }
        let mut expr = self.parse_boolean_primary()?;
        for start in nots.into_iter().rev() {
            expr = Expr::new(ExprKind::Not(Box::new(expr)), self.span_since(start));
        }
        Ok(expr)
    }

    fn parse_boolean_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        if self.peek_keyword(0) == Some(Keyword::Exists)
            && self.peek(1).kind == TokenKind::LeftParen
            && self.query_starts_at(2)
        {
            self.bump();
            self.bump();
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Exists(Box::new(query)),
                self.span_since(start),
            ));
        }
        let value = self.parse_value_expression(0)?;
        self.parse_predicate(value, start)
    }

    fn parse_predicate(&mut self, value: Expr, start: Checkpoint) -> Result<Expr, ParseError> {
        let negated = self.peek_keyword(0) == Some(Keyword::Not)
            && matches!(
                self.peek_keyword(1),
                Some(Keyword::Between | Keyword::In | Keyword::Like | Keyword::Rlike)
            );
        if negated {
            self.bump();
        }

        let predicate = if self.eat_keyword(Keyword::Between) {
            let low = self.parse_value_expression(0)?;
            self.expect_keyword(Keyword::And)?;
            let high = self.parse_value_expression(0)?;
            Predicate::Between {
                negated,
                low: Box::new(low),
                high: Box::new(high),
            }
        } else if self.eat_keyword(Keyword::In) {
            self.expect(&TokenKind::LeftParen)?;
            let predicate = if self.query_starts_at(0) {
                Predicate::InSubquery {
                    negated,
                    query: Box::new(self.parse_query()?),
                }
            } else {
                Predicate::InList {
                    negated,
                    list: self.parse_comma_separated(Self::parse_expression)?,
                }
            };
            self.expect(&TokenKind::RightParen)?;
            predicate
        } else if let Some(kw) = self.eat_one_of(&[Keyword::Like, Keyword::Rlike]) {
            let kind = if kw == Keyword::Like {
                LikeKind::Like
            } else {
                LikeKind::RLike
            };
            Predicate::Like {
                negated,
                kind,
                pattern: Box::new(self.parse_value_expression(0)?),
            }
        } else if self.eat_keyword(Keyword::Is) {
            let negated = self.eat_keyword(Keyword::Not);
            if self.eat_keyword(Keyword::Null) {
                Predicate::IsNull { negated }
            } else {
                self.expect_keywords(&[Keyword::Distinct, Keyword::From])?;
                Predicate::IsDistinctFrom {
                    negated,
                    other: Box::new(self.parse_value_expression(0)?),
                }
            }
        } else {
            return Ok(value);
        };

        Ok(Expr::new(
            ExprKind::Predicated {
                expr: Box::new(value),
                predicate,
            },
            self.span_since(start),
        ))
    }

    /// Pratt loop over the binary operators of the value layer.
    pub(super) fn parse_value_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let mut left = self.parse_unary()?;

        loop {
            let kind = &self.current().kind;
            let Some((left_bp, right_bp)) = infix_binding_power(kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            let Some(op) = token_to_infix_op(kind) else {
                break;
            };
            self.bump();

            let right = Box::new(self.parse_value_expression(right_bp)?);
            let left_box = Box::new(left);
            let kind = match op {
                InfixOp::Arithmetic(op) => ExprKind::Arithmetic {
                    op,
                    left: left_box,
                    right,
                },
                InfixOp::Comparison(op) => ExprKind::Comparison {
                    op,
                    left: left_box,
                    right,
                },
            };
            left = Expr::new(kind, self.span_since(start));
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let mut prefixes = Vec::new();
        loop {
            let token = self.current();
            // `-1` is a negative literal, not a negation.
            if token.kind == TokenKind::Minus && is_numeric(&self.peek(1).kind) {
                break;
            }
            let Some(op) = token_to_unary_op(&token.kind) else {
                break;
            };
            prefixes.push((op, self.checkpoint()));
            self.bump();
        }

        let mut expr = self.parse_primary()?;
        for (op, start) in prefixes.into_iter().rev() {
            expr = Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(expr),
                },
                self.span_since(start),
            );
        }
        Ok(expr)
    }

    pub(super) fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let mut expr = self.parse_primary_base()?;

        loop {
            if self.eat(&TokenKind::LeftBracket) {
                let index = self.nested(|p| p.parse_value_expression(0))?;
                self.expect(&TokenKind::RightBracket)?;
                expr = Expr::new(
                    ExprKind::Subscript {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    self.span_since(start),
                );
            } else if self.current().kind == TokenKind::Dot
                && Self::is_identifier_token(self.peek(1), false)
            {
                self.bump();
                let field = self.parse_identifier()?;
                expr = Expr::new(
                    ExprKind::Dereference {
                        base: Box::new(expr),
                        field,
                    },
                    self.span_since(start),
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_primary_base(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let next_is_paren = self.peek(1).kind == TokenKind::LeftParen;
        let kind = self.current().kind.clone();

        match &kind {
            kind if is_numeric(kind) => self.literal_expr(Self::parse_numeric_literal, start),
            TokenKind::Minus => self.literal_expr(Self::parse_numeric_literal, start),
            TokenKind::String(_) => {
                self.literal_expr(|p| p.parse_string_concat().map(Literal::String), start)
            }
            TokenKind::Star => {
                self.bump();
                Ok(Expr::new(
                    ExprKind::Star { qualifier: None },
                    self.span_since(start),
                ))
            }
            TokenKind::LeftParen => self.parse_parenthesized(),
            TokenKind::Keyword(kw) => match *kw {
                Keyword::Null => {
                    self.bump();
                    Ok(Expr::new(
                        ExprKind::Literal(Literal::Null),
                        self.span_since(start),
                    ))
                }
                Keyword::True | Keyword::False => {
                    let value = *kw == Keyword::True;
                    self.bump();
                    Ok(Expr::new(
                        ExprKind::Literal(Literal::Boolean(value)),
                        self.span_since(start),
                    ))
                }
                Keyword::Interval if self.interval_field_at(1) => {
                    self.literal_expr(Self::parse_interval_literal, start)
                }
                Keyword::Case => self.parse_case(),
                Keyword::Cast if next_is_paren => self.parse_cast(),
                Keyword::Struct if next_is_paren => self.parse_struct(),
                Keyword::First | Keyword::Last if next_is_paren && self.first_last_args_at(2) => {
                    self.parse_first_last(*kw)
                }
                Keyword::Position if next_is_paren && self.position_form_follows() => {
                    self.parse_special_call(Keyword::Position)
                }
                Keyword::Extract
                    if next_is_paren
                        && Self::is_identifier_token(self.peek(2), false)
                        && self.peek_keyword(3) == Some(Keyword::From) =>
                {
                    self.parse_special_call(Keyword::Extract)
                }
                _ => self.parse_name_primary(),
            },
            TokenKind::Identifier(_) | TokenKind::BackquotedIdentifier(_) => {
                self.parse_name_primary()
            }
            _ => {
                self.expecting("expression");
                Err(self.error_here())
            }
        }
    }

    fn literal_expr(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Literal, ParseError>,
        start: Checkpoint,
    ) -> Result<Expr, ParseError> {
        let literal = parse(self)?;
        Ok(Expr::new(ExprKind::Literal(literal), self.span_since(start)))
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    /// `[-] number`, range-checked for the suffixed integer kinds.
    pub(super) fn parse_numeric_literal(&mut self) -> Result<Literal, ParseError> {
        let negative = self.current().kind == TokenKind::Minus && is_numeric(&self.peek(1).kind);
        if negative {
            self.bump();
        }
        self.expecting("number");
        let token = self.current().clone();
        let (kind, text) = match &token.kind {
            TokenKind::IntegerValue(t) => (NumericKind::Integer, t),
            TokenKind::DecimalValue(t) => (NumericKind::Decimal, t),
            TokenKind::BigintLiteral(t) => (NumericKind::Bigint, t),
            TokenKind::SmallintLiteral(t) => (NumericKind::Smallint, t),
            TokenKind::TinyintLiteral(t) => (NumericKind::Tinyint, t),
            TokenKind::DoubleLiteral(t) => (NumericKind::Double, t),
            TokenKind::BigDecimalLiteral(t) => (NumericKind::BigDecimal, t),
            _ => return Err(self.error_here()),
        };

        let bounds: Option<(i128, i128, &str)> = match kind {
            NumericKind::Tinyint => Some((i8::MIN.into(), i8::MAX.into(), "tinyint")),
            NumericKind::Smallint => Some((i16::MIN.into(), i16::MAX.into(), "smallint")),
            NumericKind::Bigint => Some((i64::MIN.into(), i64::MAX.into(), "bigint")),
            _ => None,
        };
        if let Some((min, max, type_name)) = bounds {
            let value = text
                .parse::<i128>()
                .ok()
                .map(|v| if negative { -v } else { v });
            if !value.is_some_and(|v| (min..=max).contains(&v)) {
                let sign = if negative { "-" } else { "" };
                return Err(self.syntax_error_at(
                    format!(
                        "Numeric literal {sign}{text} does not fit in range [{min}, {max}] for type {type_name}"
                    ),
                    &token,
                ));
            }
        }

        let literal = Literal::Numeric {
            kind,
            text: text.clone(),
            negative,
        };
        self.bump();
        Ok(literal)
    }

    /// One or more adjacent string tokens, concatenated.
    pub(super) fn parse_string_concat(&mut self) -> Result<String, ParseError> {
        let mut value = self.parse_string()?;
        while let TokenKind::String(next) = &self.current().kind {
            value.push_str(next);
            self.bump();
        }
        Ok(value)
    }

    /// Returns true if an interval field (`value unit`) starts `k` tokens
    /// ahead.
    fn interval_field_at(&self, k: usize) -> bool {
        let unit_at = match &self.peek(k).kind {
            TokenKind::Plus | TokenKind::Minus if is_numeric(&self.peek(k + 1).kind) => k + 2,
            kind if is_numeric(kind) => k + 1,
            TokenKind::String(_) => k + 1,
            _ => return false,
        };
        Self::is_identifier_token(self.peek(unit_at), false)
    }

    /// `INTERVAL field+`
    pub(super) fn parse_interval_literal(&mut self) -> Result<Literal, ParseError> {
        let interval = self.expect_keyword(Keyword::Interval)?;
        let mut fields = Vec::new();
        while self.interval_field_at(0) {
            fields.push(self.parse_interval_field()?);
        }
        if fields.is_empty() {
            return Err(self.syntax_error_at(
                "at least one time unit should be given for interval literal",
                &interval,
            ));
        }
        Ok(Literal::Interval(fields))
    }

    fn parse_interval_field(&mut self) -> Result<IntervalField, ParseError> {
        let value = match self.current().kind.clone() {
            TokenKind::String(s) => {
                self.bump();
                IntervalValue::String(s)
            }
            _ => {
                let negative = self.eat(&TokenKind::Minus);
                if !negative {
                    self.eat(&TokenKind::Plus);
                }
                let text = self.bump().lexeme;
                IntervalValue::Number { negative, text }
            }
        };
        let unit = self.parse_identifier()?;
        let to = if self.check_keyword(Keyword::To) {
            let to_token = self.bump();
            let to = self.parse_identifier()?;
            let from_unit = unit.value().to_ascii_lowercase();
            let to_unit = to.value().to_ascii_lowercase();
            let supported = matches!(
                (from_unit.as_str(), to_unit.as_str()),
                ("year", "month")
                    | ("day", "hour")
                    | ("day", "minute")
                    | ("day", "second")
                    | ("hour", "minute")
                    | ("hour", "second")
                    | ("minute", "second")
            );
            if !supported {
                return Err(self.syntax_error_at(
                    format!("Intervals FROM {from_unit} TO {to_unit} are not supported."),
                    &to_token,
                ));
            }
            Some(to)
        } else {
            None
        };
        Ok(IntervalField { value, unit, to })
    }

    /// `type 'value'` for the supported typed constructors.
    fn typed_literal(&self, type_name: Ident, value: String, at: &Token) -> Result<Literal, ParseError> {
        let upper = type_name.value().to_ascii_uppercase();
        match upper.as_str() {
            "DATE" | "TIMESTAMP" | "X" => Ok(Literal::Typed { type_name, value }),
            other => Err(self.syntax_error_at(
                format!("Literals of type '{other}' are currently not supported."),
                at,
            )),
        }
    }

    /// A constant, as accepted in partition specs.
    pub(super) fn parse_constant(&mut self) -> Result<Literal, ParseError> {
        let kind = self.current().kind.clone();
        match &kind {
            TokenKind::Keyword(Keyword::Null) => {
                self.bump();
                Ok(Literal::Null)
            }
            TokenKind::Keyword(kw @ (Keyword::True | Keyword::False)) => {
                let value = *kw == Keyword::True;
                self.bump();
                Ok(Literal::Boolean(value))
            }
            TokenKind::Keyword(Keyword::Interval) => self.parse_interval_literal(),
            TokenKind::String(_) => self.parse_string_concat().map(Literal::String),
            kind if is_numeric(kind) || *kind == TokenKind::Minus => self.parse_numeric_literal(),
            _ if Self::is_identifier_token(self.current(), false)
                && matches!(self.peek(1).kind, TokenKind::String(_)) =>
            {
                let at = self.current().clone();
                let type_name = self.parse_identifier()?;
                let value = self.parse_string()?;
                self.typed_literal(type_name, value, &at)
            }
            _ => {
                self.expecting("constant");
                Err(self.error_here())
            }
        }
    }

    // ------------------------------------------------------------------
    // Special forms
    // ------------------------------------------------------------------

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        self.expect_keyword(Keyword::Case)?;
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        let mut branches = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression()?;
            branches.push(WhenClause { condition, result });
        }
        if branches.is_empty() {
            return Err(self.error_here());
        }

        let else_result = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expression()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;

        Ok(Expr::new(
            ExprKind::Case {
                operand,
                branches,
                else_result,
            },
            self.span_since(start),
        ))
    }

    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        self.expect_keyword(Keyword::Cast)?;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expression()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Cast {
                expr: Box::new(expr),
                data_type,
            },
            self.span_since(start),
        ))
    }

    fn parse_struct(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        self.expect_keyword(Keyword::Struct)?;
        self.expect(&TokenKind::LeftParen)?;
        let fields = if self.check(&TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_named_expression_seq()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(ExprKind::Struct(fields), self.span_since(start)))
    }

    /// Returns true if the argument list starting `k` tokens ahead begins
    /// with a plain expression, so `FIRST`/`LAST` may take their own form.
    fn first_last_args_at(&self, k: usize) -> bool {
        self.peek(k).kind != TokenKind::RightParen
            && !matches!(
                self.peek_keyword(k),
                Some(
                    Keyword::Distinct
                        | Keyword::All
                        | Keyword::Both
                        | Keyword::Leading
                        | Keyword::Trailing
                )
            )
    }

    /// Returns true if the argument list after `POSITION(` is a single
    /// argument with `IN` at its top level.
    fn position_form_follows(&self) -> bool {
        let mut depth = 0usize;
        let mut seen_in = false;
        let mut k = 2;
        loop {
            match &self.peek(k).kind {
                TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket if depth == 0 => return seen_in,
                TokenKind::RightParen | TokenKind::RightBracket => depth -= 1,
                TokenKind::Comma if depth == 0 => return false,
                TokenKind::Keyword(Keyword::In) if depth == 0 => seen_in = true,
                TokenKind::Eof => return false,
                _ => {}
            }
            k += 1;
        }
    }

    /// `FIRST(e [IGNORE NULLS])` and `LAST(...)`.
    ///
    /// Any other argument list is an ordinary call; the arguments already
    /// read are kept rather than parsed again.
    fn parse_first_last(&mut self, keyword: Keyword) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let name = self.parse_identifier()?;
        self.expect(&TokenKind::LeftParen)?;
        let first = self.parse_expression()?;
        if self.eat_keywords(&[Keyword::Ignore, Keyword::Nulls]) {
            self.expect(&TokenKind::RightParen)?;
            return Ok(self.first_last(keyword, first, true, start));
        }

        let mut args = vec![first];
        while self.eat(&TokenKind::Comma) {
            args.push(self.parse_expression()?);
        }
        self.expect(&TokenKind::RightParen)?;
        if args.len() == 1 && !self.check_keyword(Keyword::Over) {
            let expr = args.swap_remove(0);
            return Ok(self.first_last(keyword, expr, false, start));
        }

        let call = FunctionCall {
            name: QualifiedName::new(vec![name]),
            quantifier: None,
            args,
            trim: None,
            window: None,
        };
        self.finish_function_call(call, start)
    }

    fn first_last(
        &self,
        keyword: Keyword,
        expr: Expr,
        ignore_nulls: bool,
        start: Checkpoint,
    ) -> Expr {
        let expr = Box::new(expr);
        let kind = if keyword == Keyword::First {
            ExprKind::First { expr, ignore_nulls }
        } else {
            ExprKind::Last { expr, ignore_nulls }
        };
        Expr::new(kind, self.span_since(start))
    }

    /// `POSITION(a IN b)` and `EXTRACT(f FROM e)`.
    fn parse_special_call(&mut self, keyword: Keyword) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        self.bump();
        self.expect(&TokenKind::LeftParen)?;
        let kind = if keyword == Keyword::Position {
            let substr = self.nested(|p| p.parse_value_expression(0))?;
            self.expect_keyword(Keyword::In)?;
            let string = self.nested(|p| p.parse_value_expression(0))?;
            ExprKind::Position {
                substr: Box::new(substr),
                string: Box::new(string),
            }
        } else {
            let field = self.parse_identifier()?;
            self.expect_keyword(Keyword::From)?;
            let source = self.nested(|p| p.parse_value_expression(0))?;
            ExprKind::Extract {
                field,
                source: Box::new(source),
            }
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(kind, self.span_since(start)))
    }

    /// Returns true if `( ident , ident [, ident]* ) ->` starts at the
    /// current token.
    fn lambda_params_follow(&self) -> bool {
        let mut k = 1;
        loop {
            if !Self::is_identifier_token(self.peek(k), false) {
                return false;
            }
            match self.peek(k + 1).kind {
                TokenKind::Comma => k += 2,
                TokenKind::RightParen => {
                    return k > 1 && self.peek(k + 2).kind == TokenKind::Arrow;
                }
                _ => return false,
            }
        }
    }

    /// Returns true if the parenthesis at the current token encloses a
    /// query.
    ///
    /// A query may itself open with parenthesized operands, as in
    /// `((SELECT 1) UNION (SELECT 2))`. That form is told apart from an
    /// expression over a scalar subquery by what follows the first operand.
    fn parenthesized_query_follows(&self) -> bool {
        if self.query_starts_at(1) {
            return true;
        }
        let mut k = 1;
        while self.peek(k).kind == TokenKind::LeftParen {
            k += 1;
        }
        if k == 1 || !self.query_starts_at(k) {
            return false;
        }
        let Some(end) = self.group_end(1) else {
            return false;
        };
        token_to_set_operator(&self.peek(end).kind).is_some()
            || matches!(
                self.peek_keyword(end),
                Some(
                    Keyword::Order
                        | Keyword::Sort
                        | Keyword::Cluster
                        | Keyword::Distribute
                        | Keyword::Window
                        | Keyword::Limit
                        | Keyword::Offset
                )
            )
    }

    /// Offset of the token just past the parenthesized group opening `k`
    /// tokens ahead, or `None` if the group is never closed.
    fn group_end(&self, k: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = k;
        loop {
            match self.peek(i).kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen if depth <= 1 => return Some(i + 1),
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof => return None,
                _ => {}
            }
            i += 1;
        }
    }

    /// Subquery, lambda, row constructor or parenthesized expression.
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();

        if self.parenthesized_query_follows() {
            self.bump();
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::ScalarSubquery(Box::new(query)),
                self.span_since(start),
            ));
        }

        if self.lambda_params_follow() {
            let params = self.parse_identifier_list()?;
            self.expect(&TokenKind::Arrow)?;
            let body = self.parse_expression()?;
            return Ok(Expr::new(
                ExprKind::Lambda {
                    params,
                    body: Box::new(body),
                },
                self.span_since(start),
            ));
        }

        self.expect(&TokenKind::LeftParen)?;
        let first = self.parse_named_expression()?;
        if self.check(&TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(&TokenKind::Comma) {
                items.push(self.parse_named_expression()?);
            }
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(ExprKind::Row(items), self.span_since(start)));
        }
        if first.alias.is_some() {
            return Err(self.error_here());
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Paren(Box::new(first.expr)),
            self.span_since(start),
        ))
    }

    /// Expressions that start with an identifier: columns, dereference
    /// chains, qualified stars, function calls, typed literals and
    /// single-parameter lambdas.
    fn parse_name_primary(&mut self) -> Result<Expr, ParseError> {
        let start = self.checkpoint();
        let first_token = self.current().clone();
        let first = self.parse_identifier()?;

        if matches!(self.current().kind, TokenKind::String(_)) {
            let value = self.parse_string()?;
            let literal = self.typed_literal(first, value, &first_token)?;
            return Ok(Expr::new(ExprKind::Literal(literal), self.span_since(start)));
        }

        if self.current().kind == TokenKind::Arrow {
            self.bump();
            let body = self.parse_expression()?;
            return Ok(Expr::new(
                ExprKind::Lambda {
                    params: vec![first],
                    body: Box::new(body),
                },
                self.span_since(start),
            ));
        }

        let mut parts = vec![first];
        while self.current().kind == TokenKind::Dot
            && Self::is_identifier_token(self.peek(1), false)
        {
            self.bump();
            parts.push(self.parse_identifier()?);
        }

        if self.current().kind == TokenKind::Dot && self.peek(1).kind == TokenKind::Star {
            self.bump();
            self.bump();
            return Ok(Expr::new(
                ExprKind::Star {
                    qualifier: Some(QualifiedName::new(parts)),
                },
                self.span_since(start),
            ));
        }

        if self.current().kind == TokenKind::LeftParen {
            return self.parse_function_call(QualifiedName::new(parts), start);
        }

        let mut parts = parts.into_iter();
        let mut expr = match parts.next() {
            Some(first) => {
                let span = first.span();
                Expr::new(ExprKind::Column(first), span)
            }
            None => return Err(self.error_here()),
        };
        for field in parts {
            let span = expr.span.merge(field.span());
            expr = Expr::new(
                ExprKind::Dereference {
                    base: Box::new(expr),
                    field,
                },
                span,
            );
        }
        Ok(expr)
    }

    /// `DISTINCT` / `ALL`
    pub(super) fn parse_set_quantifier(&mut self) -> Option<SetQuantifier> {
        if self.eat_keyword(Keyword::Distinct) {
            Some(SetQuantifier::Distinct)
        } else if self.eat_keyword(Keyword::All) {
            Some(SetQuantifier::All)
        } else {
            None
        }
    }

    fn parse_trim_arguments(&mut self) -> Result<(TrimOption, Token, Vec<Expr>), ParseError> {
        let option_token = self.bump();
        let option = match option_token.as_keyword() {
            Some(Keyword::Both) => TrimOption::Both,
            Some(Keyword::Leading) => TrimOption::Leading,
            _ => TrimOption::Trailing,
        };
        let trim_chars = self.parse_expression()?;
        self.expect_keyword(Keyword::From)?;
        let source = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;
        Ok((option, option_token, vec![trim_chars, source]))
    }

    fn parse_function_call(
        &mut self,
        name: QualifiedName,
        start: Checkpoint,
    ) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let trim_form = if matches!(
            self.peek_keyword(0),
            Some(Keyword::Both | Keyword::Leading | Keyword::Trailing)
        ) {
            self.attempt(Self::parse_trim_arguments)?
        } else {
            None
        };

        let (quantifier, args, trim) = if let Some((option, option_token, args)) = trim_form {
            let is_trim = name.parts.len() == 1 && name.parts[0].eq_ignore_case("trim");
            if !is_trim {
                return Err(self.syntax_error_at(
                    format!(
                        "The specified function {name} doesn't support with option {}.",
                        option_token.lexeme.to_ascii_uppercase()
                    ),
                    &option_token,
                ));
            }
            (None, args, Some(option))
        } else {
            let quantifier = self.parse_set_quantifier();
            let args = if quantifier.is_none() && self.check(&TokenKind::RightParen) {
                Vec::new()
            } else {
                self.parse_comma_separated(Self::parse_expression)?
            };
            self.expect(&TokenKind::RightParen)?;
            (quantifier, args, None)
        };

        let call = FunctionCall {
            name,
            quantifier,
            args,
            trim,
            window: None,
        };
        self.finish_function_call(call, start)
    }

    /// Attaches the optional `OVER` window to a parsed call.
    fn finish_function_call(
        &mut self,
        mut call: FunctionCall,
        start: Checkpoint,
    ) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Over) {
            call.window = Some(self.parse_window_spec()?);
        }
        Ok(Expr::new(ExprKind::Function(call), self.span_since(start)))
    }

    // ------------------------------------------------------------------
    // Windows and sorting
    // ------------------------------------------------------------------

    /// `name`, `(name)` or an inline window definition.
    pub(super) fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        if !self.check(&TokenKind::LeftParen) {
            return Ok(WindowSpec::Named(self.parse_identifier()?));
        }
        if Self::is_identifier_token(self.peek(1), false)
            && self.peek(2).kind == TokenKind::RightParen
        {
            self.bump();
            let name = self.parse_identifier()?;
            self.bump();
            return Ok(WindowSpec::Named(name));
        }

        self.expect(&TokenKind::LeftParen)?;
        let mut definition = WindowDefinition::default();
        if self.eat_keywords(&[Keyword::Cluster, Keyword::By]) {
            definition.cluster_by = self.parse_comma_separated(Self::parse_expression)?;
        } else {
            if self.eat_keywords(&[Keyword::Partition, Keyword::By])
                || self.eat_keywords(&[Keyword::Distribute, Keyword::By])
            {
                definition.partition_by = self.parse_comma_separated(Self::parse_expression)?;
            }
            if self.eat_keywords(&[Keyword::Order, Keyword::By])
                || self.eat_keywords(&[Keyword::Sort, Keyword::By])
            {
                definition.order_by = self.parse_comma_separated(Self::parse_sort_item)?;
            }
        }

        let units = if self.eat_keyword(Keyword::Rows) {
            Some(FrameUnits::Rows)
        } else if self.eat_keyword(Keyword::Range) {
            Some(FrameUnits::Range)
        } else {
            None
        };
        if let Some(units) = units {
            definition.frame = Some(self.parse_window_frame(units)?);
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(WindowSpec::Inline(definition))
    }

    fn parse_window_frame(&mut self, units: FrameUnits) -> Result<WindowFrame, ParseError> {
        if self.eat_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = self.parse_frame_bound()?;
            Ok(WindowFrame {
                units,
                start,
                end: Some(end),
            })
        } else {
            Ok(WindowFrame {
                units,
                start: self.parse_frame_bound()?,
                end: None,
            })
        }
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.eat_keywords(&[Keyword::Current, Keyword::Row]) {
            return Ok(FrameBound::CurrentRow);
        }
        let expr = Box::new(self.parse_expression()?);
        if self.eat_keyword(Keyword::Preceding) {
            Ok(FrameBound::Preceding(expr))
        } else {
            self.expect_keyword(Keyword::Following)?;
            Ok(FrameBound::Following(expr))
        }
    }

    /// `expression [ASC|DESC] [NULLS FIRST|LAST]`
    pub(super) fn parse_sort_item(&mut self) -> Result<SortItem, ParseError> {
        let expr = self.parse_expression()?;
        let direction = if self.eat_keyword(Keyword::Asc) {
            Some(OrderDirection::Asc)
        } else if self.eat_keyword(Keyword::Desc) {
            Some(OrderDirection::Desc)
        } else {
            None
        };
        let nulls = if self.eat_keyword(Keyword::Nulls) {
            if self.eat_keyword(Keyword::First) {
                Some(NullOrdering::First)
            } else {
                self.expect_keyword(Keyword::Last)?;
                Some(NullOrdering::Last)
            }
        } else {
            None
        };
        Ok(SortItem {
            expr,
            direction,
            nulls,
        })
    }
}
