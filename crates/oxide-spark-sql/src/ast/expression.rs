//! Expression AST types.

use serde::Serialize;

use super::{DataType, Ident, QualifiedName, Query};
use crate::lexer::Span;

/// The lexical kind of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NumericKind {
    /// `42`
    Integer,
    /// `4.2`, `1E10`
    Decimal,
    /// `42L`
    Bigint,
    /// `42S`
    Smallint,
    /// `42Y`
    Tinyint,
    /// `4.2D`
    Double,
    /// `4.2BD`
    BigDecimal,
}

/// The value of one `INTERVAL` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IntervalValue {
    /// A signed number.
    Number {
        /// True if written with a leading `-`.
        negative: bool,
        /// The digits.
        text: String,
    },
    /// A quoted value such as `'1-2'`.
    String(String),
}

/// One `value unit [TO unit]` field of an interval literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntervalField {
    /// The value.
    pub value: IntervalValue,
    /// The unit (e.g. `day`).
    pub unit: Ident,
    /// The closing unit of a `TO` range.
    pub to: Option<Ident>,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Literal {
    /// `NULL`
    Null,
    /// `TRUE` / `FALSE`
    Boolean(bool),
    /// A numeric literal, kept as text.
    Numeric {
        /// The literal's lexical kind.
        kind: NumericKind,
        /// Digits without sign or type suffix.
        text: String,
        /// True if written with a leading `-`.
        negative: bool,
    },
    /// One or more adjacent string tokens, concatenated.
    String(String),
    /// `INTERVAL 1 day 2 hours`
    Interval(Vec<IntervalField>),
    /// A typed constructor: `DATE '2020-01-01'`, `X'0F'`.
    Typed {
        /// The type name.
        type_name: Ident,
        /// The quoted value.
        value: String,
    },
}

/// Unary prefix operators of the value layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `~`
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
        }
    }

    /// Unary operators bind tighter than every binary operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        7
    }
}

/// Arithmetic, concatenation and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArithmeticOp {
    Multiply,
    Divide,
    Modulo,
    /// `DIV`
    IntDivide,
    Add,
    Subtract,
    /// `||`
    Concat,
    BitAnd,
    BitXor,
    BitOr,
}

impl ArithmeticOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::IntDivide => "DIV",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
        }
    }

    /// Returns the precedence level (higher binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Multiply | Self::Divide | Self::Modulo | Self::IntDivide => 6,
            Self::Add | Self::Subtract | Self::Concat => 5,
            Self::BitAnd => 4,
            Self::BitXor => 3,
            Self::BitOr => 2,
        }
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonOp {
    /// `=` / `==`
    Eq,
    /// `<=>`
    NullSafeEq,
    /// `<>` / `!=`
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl ComparisonOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NullSafeEq => "<=>",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Comparisons are the loosest value-layer operators.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        1
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// `AND` binds tighter than `OR`.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::And => 2,
            Self::Or => 1,
        }
    }
}

/// `LIKE` or `RLIKE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LikeKind {
    Like,
    RLike,
}

/// A predicate attached to one value expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    /// `[NOT] BETWEEN low AND high`
    Between {
        negated: bool,
        low: Box<Expr>,
        high: Box<Expr>,
    },
    /// `[NOT] IN (expr, ...)`
    InList { negated: bool, list: Vec<Expr> },
    /// `[NOT] IN (query)`
    InSubquery { negated: bool, query: Box<Query> },
    /// `[NOT] LIKE pattern`, `[NOT] RLIKE pattern`
    Like {
        negated: bool,
        kind: LikeKind,
        pattern: Box<Expr>,
    },
    /// `IS [NOT] NULL`
    IsNull { negated: bool },
    /// `IS [NOT] DISTINCT FROM other`
    IsDistinctFrom { negated: bool, other: Box<Expr> },
}

/// `DISTINCT` or `ALL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetQuantifier {
    Distinct,
    All,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

/// `NULLS FIRST` / `NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullOrdering {
    First,
    Last,
}

/// `expr [ASC|DESC] [NULLS FIRST|LAST]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortItem {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullOrdering>,
}

/// `ROWS` or `RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameUnits {
    Rows,
    Range,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<Expr>),
    Following(Box<Expr>),
}

/// `ROWS|RANGE [BETWEEN] start [AND end]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

/// An inline window definition.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct WindowDefinition {
    /// `CLUSTER BY` expressions.
    pub cluster_by: Vec<Expr>,
    /// `PARTITION BY` / `DISTRIBUTE BY` expressions.
    pub partition_by: Vec<Expr>,
    /// `ORDER BY` / `SORT BY` items.
    pub order_by: Vec<SortItem>,
    pub frame: Option<WindowFrame>,
}

/// The window of an `OVER` clause or `WINDOW` definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WindowSpec {
    /// A reference to a named window: `OVER w` or `OVER (w)`.
    Named(Ident),
    /// An inline definition.
    Inline(WindowDefinition),
}

/// `name AS window-spec` in a `WINDOW` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedWindow {
    pub name: Ident,
    pub spec: WindowSpec,
}

/// `BOTH`, `LEADING` or `TRAILING` in a trim-style call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrimOption {
    Both,
    Leading,
    Trailing,
}

/// A function call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// Function name, possibly qualified.
    pub name: QualifiedName,
    /// `DISTINCT` / `ALL` before the arguments.
    pub quantifier: Option<SetQuantifier>,
    /// Arguments. For the trim form these are `[trim_chars, source]`.
    pub args: Vec<Expr>,
    /// `BOTH|LEADING|TRAILING` of `trim(BOTH x FROM y)`.
    pub trim: Option<TrimOption>,
    /// `OVER` clause.
    pub window: Option<WindowSpec>,
}

/// `WHEN condition THEN result`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

/// An alias after a named expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Alias {
    /// `AS name`
    Single(Ident),
    /// `AS (a, b)`
    Multi(Vec<Ident>),
}

/// An expression with an optional alias.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedExpr {
    pub expr: Expr,
    pub alias: Option<Alias>,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),
    /// A column reference.
    Column(Ident),
    /// `*` or `qualifier.*`
    Star { qualifier: Option<QualifiedName> },
    /// `base.field`
    Dereference { base: Box<Expr>, field: Ident },
    /// `base[index]`
    Subscript { base: Box<Expr>, index: Box<Expr> },
    /// `+x`, `-x`, `~x`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `left op right` for arithmetic, concat and bitwise operators.
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `left op right` for comparisons.
    Comparison {
        op: ComparisonOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `NOT expr`
    Not(Box<Expr>),
    /// `EXISTS (query)`
    Exists(Box<Query>),
    /// `left AND right`, `left OR right`
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A value expression with a predicate.
    Predicated {
        expr: Box<Expr>,
        predicate: Predicate,
    },
    /// Simple (`operand` set) or searched `CASE`.
    Case {
        operand: Option<Box<Expr>>,
        branches: Vec<WhenClause>,
        else_result: Option<Box<Expr>>,
    },
    /// `CAST(expr AS type)`
    Cast { expr: Box<Expr>, data_type: DataType },
    /// `STRUCT(expr [AS name], ...)`
    Struct(Vec<NamedExpr>),
    /// `FIRST(expr [IGNORE NULLS])`
    First { expr: Box<Expr>, ignore_nulls: bool },
    /// `LAST(expr [IGNORE NULLS])`
    Last { expr: Box<Expr>, ignore_nulls: bool },
    /// `POSITION(substr IN str)`
    Position { substr: Box<Expr>, string: Box<Expr> },
    /// `EXTRACT(field FROM source)`
    Extract { field: Ident, source: Box<Expr> },
    /// A function call.
    Function(FunctionCall),
    /// `x -> body`, `(x, y) -> body`
    Lambda { params: Vec<Ident>, body: Box<Expr> },
    /// `(a, b, ...)`
    Row(Vec<NamedExpr>),
    /// `(query)`
    ScalarSubquery(Box<Query>),
    /// `(expr)`
    Paren(Box<Expr>),
}

/// An expression with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    /// Creates an expression node.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the column identifier if this is a plain column reference.
    #[must_use]
    pub const fn as_column(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Column(ident) => Some(ident),
            _ => None,
        }
    }

    /// Returns the literal if this expression is one.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_precedence_levels() {
        assert!(ArithmeticOp::Multiply.precedence() > ArithmeticOp::Add.precedence());
        assert_eq!(ArithmeticOp::Concat.precedence(), ArithmeticOp::Add.precedence());
        assert!(ArithmeticOp::Add.precedence() > ArithmeticOp::BitAnd.precedence());
        assert!(ArithmeticOp::BitAnd.precedence() > ArithmeticOp::BitXor.precedence());
        assert!(ArithmeticOp::BitXor.precedence() > ArithmeticOp::BitOr.precedence());
        assert!(ArithmeticOp::BitOr.precedence() > ComparisonOp::Eq.precedence());
        assert!(UnaryOp::Minus.precedence() > ArithmeticOp::IntDivide.precedence());
        assert!(LogicalOp::And.precedence() > LogicalOp::Or.precedence());
    }

    #[test]
    fn test_operator_spelling() {
        assert_eq!(ArithmeticOp::IntDivide.as_str(), "DIV");
        assert_eq!(ComparisonOp::NullSafeEq.as_str(), "<=>");
        assert_eq!(UnaryOp::BitNot.as_str(), "~");
        assert_eq!(LogicalOp::Or.as_str(), "OR");
    }
}
