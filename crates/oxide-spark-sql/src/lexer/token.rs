//! Token types for the Spark SQL lexer.

use serde::Serialize;

use super::Span;

macro_rules! define_keywords {
    ($($variant:ident => $text:literal,)*) => {
        /// Spark SQL / HiveQL keywords.
        ///
        /// Every keyword except `USING` can double as an identifier; see
        /// [`Keyword::is_reserved`] and [`Keyword::is_strict_non_reserved`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Keyword {
            $($variant,)*
        }

        impl Keyword {
            /// All keywords, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            fn from_canonical(s: &str) -> Option<Self> {
                match s {
                    $($text => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Returns the canonical upper-case spelling of the keyword.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }
    };
}

define_keywords! {
    Add => "ADD",
    After => "AFTER",
    All => "ALL",
    Alter => "ALTER",
    Analyze => "ANALYZE",
    And => "AND",
    Anti => "ANTI",
    Any => "ANY",
    Archive => "ARCHIVE",
    Array => "ARRAY",
    As => "AS",
    Asc => "ASC",
    Between => "BETWEEN",
    Both => "BOTH",
    Bucket => "BUCKET",
    Buckets => "BUCKETS",
    By => "BY",
    Cache => "CACHE",
    Cascade => "CASCADE",
    Case => "CASE",
    Cast => "CAST",
    Change => "CHANGE",
    Clear => "CLEAR",
    Cluster => "CLUSTER",
    Clustered => "CLUSTERED",
    Codegen => "CODEGEN",
    Collection => "COLLECTION",
    Column => "COLUMN",
    Columns => "COLUMNS",
    Comment => "COMMENT",
    Commit => "COMMIT",
    Compact => "COMPACT",
    Compactions => "COMPACTIONS",
    Compute => "COMPUTE",
    Concatenate => "CONCATENATE",
    Cost => "COST",
    Create => "CREATE",
    Cross => "CROSS",
    Cube => "CUBE",
    Current => "CURRENT",
    Data => "DATA",
    Database => "DATABASE",
    Databases => "DATABASES",
    Dbproperties => "DBPROPERTIES",
    Defined => "DEFINED",
    Delete => "DELETE",
    Delimited => "DELIMITED",
    Desc => "DESC",
    Describe => "DESCRIBE",
    Dfs => "DFS",
    Directories => "DIRECTORIES",
    Directory => "DIRECTORY",
    Distinct => "DISTINCT",
    Distribute => "DISTRIBUTE",
    Div => "DIV",
    Drop => "DROP",
    Else => "ELSE",
    End => "END",
    Escaped => "ESCAPED",
    Except => "EXCEPT",
    Exchange => "EXCHANGE",
    Exists => "EXISTS",
    Explain => "EXPLAIN",
    Export => "EXPORT",
    Extended => "EXTENDED",
    External => "EXTERNAL",
    Extract => "EXTRACT",
    False => "FALSE",
    Fields => "FIELDS",
    Fileformat => "FILEFORMAT",
    First => "FIRST",
    Following => "FOLLOWING",
    For => "FOR",
    Format => "FORMAT",
    Formatted => "FORMATTED",
    From => "FROM",
    Full => "FULL",
    Function => "FUNCTION",
    Functions => "FUNCTIONS",
    Global => "GLOBAL",
    Grant => "GRANT",
    Group => "GROUP",
    Grouping => "GROUPING",
    Having => "HAVING",
    If => "IF",
    Ignore => "IGNORE",
    Import => "IMPORT",
    In => "IN",
    Index => "INDEX",
    Indexes => "INDEXES",
    Inner => "INNER",
    Inpath => "INPATH",
    Inputformat => "INPUTFORMAT",
    Insert => "INSERT",
    Intersect => "INTERSECT",
    Interval => "INTERVAL",
    Into => "INTO",
    Is => "IS",
    Items => "ITEMS",
    Join => "JOIN",
    Keys => "KEYS",
    Last => "LAST",
    Lateral => "LATERAL",
    Lazy => "LAZY",
    Leading => "LEADING",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Lines => "LINES",
    List => "LIST",
    Load => "LOAD",
    Local => "LOCAL",
    Location => "LOCATION",
    Lock => "LOCK",
    Locks => "LOCKS",
    Logical => "LOGICAL",
    Macro => "MACRO",
    Map => "MAP",
    Minus => "MINUS",
    Msck => "MSCK",
    Natural => "NATURAL",
    No => "NO",
    Not => "NOT",
    Null => "NULL",
    Nulls => "NULLS",
    Of => "OF",
    Offset => "OFFSET",
    On => "ON",
    Options => "OPTIONS",
    Or => "OR",
    Order => "ORDER",
    Out => "OUT",
    Outer => "OUTER",
    Outputformat => "OUTPUTFORMAT",
    Over => "OVER",
    Overwrite => "OVERWRITE",
    Partition => "PARTITION",
    Partitioned => "PARTITIONED",
    Partitions => "PARTITIONS",
    Percent => "PERCENT",
    Pivot => "PIVOT",
    Position => "POSITION",
    Preceding => "PRECEDING",
    Principals => "PRINCIPALS",
    Purge => "PURGE",
    Range => "RANGE",
    Recordreader => "RECORDREADER",
    Recordwriter => "RECORDWRITER",
    Recover => "RECOVER",
    Reduce => "REDUCE",
    Refresh => "REFRESH",
    Rename => "RENAME",
    Repair => "REPAIR",
    Replace => "REPLACE",
    Reset => "RESET",
    Restrict => "RESTRICT",
    Revoke => "REVOKE",
    Right => "RIGHT",
    Rlike => "RLIKE",
    Role => "ROLE",
    Roles => "ROLES",
    Rollback => "ROLLBACK",
    Rollup => "ROLLUP",
    Row => "ROW",
    Rows => "ROWS",
    Select => "SELECT",
    Semi => "SEMI",
    Serde => "SERDE",
    Serdeproperties => "SERDEPROPERTIES",
    Set => "SET",
    Sets => "SETS",
    Show => "SHOW",
    Skewed => "SKEWED",
    Sort => "SORT",
    Sorted => "SORTED",
    Start => "START",
    Statistics => "STATISTICS",
    Stored => "STORED",
    Struct => "STRUCT",
    Table => "TABLE",
    Tables => "TABLES",
    Tablesample => "TABLESAMPLE",
    Tblproperties => "TBLPROPERTIES",
    Temporary => "TEMPORARY",
    Terminated => "TERMINATED",
    Then => "THEN",
    To => "TO",
    Touch => "TOUCH",
    Trailing => "TRAILING",
    Transaction => "TRANSACTION",
    Transactions => "TRANSACTIONS",
    Transform => "TRANSFORM",
    True => "TRUE",
    Truncate => "TRUNCATE",
    Unarchive => "UNARCHIVE",
    Unbounded => "UNBOUNDED",
    Uncache => "UNCACHE",
    Union => "UNION",
    Unlock => "UNLOCK",
    Unset => "UNSET",
    Use => "USE",
    Using => "USING",
    Values => "VALUES",
    View => "VIEW",
    When => "WHEN",
    Where => "WHERE",
    Window => "WINDOW",
    With => "WITH",
}

impl Keyword {
    /// Attempts to parse a keyword from a string (case-insensitive).
    ///
    /// Spelling synonyms map onto a single keyword: `SCHEMA` is
    /// `DATABASE`, `SCHEMAS` is `DATABASES`, `TEMP` is `TEMPORARY` and
    /// `REGEXP` is `RLIKE`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "SCHEMA" => Some(Self::Database),
            "SCHEMAS" => Some(Self::Databases),
            "TEMP" => Some(Self::Temporary),
            "REGEXP" => Some(Self::Rlike),
            other => Self::from_canonical(other),
        }
    }

    /// Returns true if the keyword can never be used as an identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self, Self::Using)
    }

    /// Join and set-operation keywords.
    ///
    /// These are accepted as identifiers where the grammar asks for a plain
    /// identifier (column names, qualified names) but never as table aliases.
    #[must_use]
    pub const fn is_strict_non_reserved(&self) -> bool {
        matches!(
            self,
            Self::Anti
                | Self::Full
                | Self::Inner
                | Self::Left
                | Self::Semi
                | Self::Right
                | Self::Natural
                | Self::Join
                | Self::Cross
                | Self::On
                | Self::Union
                | Self::Intersect
                | Self::Except
                | Self::Minus
        )
    }

    /// Returns true if the keyword may be used as a strict identifier
    /// (for example a table alias).
    #[must_use]
    pub const fn is_non_reserved(&self) -> bool {
        !self.is_reserved() && !self.is_strict_non_reserved()
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
///
/// Numeric kinds carry their digits with any type suffix (`L`, `S`, `Y`,
/// `D`, `BD`) removed; the raw text stays available as the token lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // Literals
    /// String literal with quotes stripped and escapes resolved.
    String(String),
    /// Integer literal (e.g., 42)
    IntegerValue(String),
    /// Decimal literal (e.g., 4.2, 1E10)
    DecimalValue(String),
    /// Integer with `L` suffix.
    BigintLiteral(String),
    /// Integer with `S` suffix.
    SmallintLiteral(String),
    /// Integer with `Y` suffix.
    TinyintLiteral(String),
    /// Number with `D` suffix.
    DoubleLiteral(String),
    /// Number with `BD` suffix.
    BigDecimalLiteral(String),

    // Identifiers and keywords
    /// Unquoted identifier (e.g., column_name, 1a)
    Identifier(String),
    /// Backquoted identifier with doubled backquotes resolved.
    BackquotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Comparison
    /// = or ==
    Eq,
    /// <=>
    NullSafeEq,
    /// <> or !=
    NotEq,
    /// <
    Lt,
    /// <= or !>
    LtEq,
    /// >
    Gt,
    /// >= or !<
    GtEq,

    // Arithmetic and bitwise
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ~
    Tilde,
    /// &
    Ampersand,
    /// |
    Pipe,
    /// ||
    Concat,
    /// ^
    Caret,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// .
    Dot,
    /// :
    Colon,
    /// ;
    Semicolon,
    /// ->
    Arrow,
    /// /*+
    HintStart,
    /// */ closing a hint
    HintEnd,

    // Special
    /// End of input
    Eof,
    /// Invalid/unknown token
    Error(String),
}

impl TokenKind {
    /// A short human-readable description, used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String(s) => format!("string '{s}'"),
            Self::IntegerValue(n)
            | Self::DecimalValue(n)
            | Self::BigintLiteral(n)
            | Self::SmallintLiteral(n)
            | Self::TinyintLiteral(n)
            | Self::DoubleLiteral(n)
            | Self::BigDecimalLiteral(n) => format!("number {n}"),
            Self::Identifier(s) => format!("identifier {s}"),
            Self::BackquotedIdentifier(s) => format!("identifier `{s}`"),
            Self::Keyword(kw) => kw.as_str().to_string(),
            Self::Eof => String::from("end of input"),
            Self::Error(msg) => format!("invalid token ({msg})"),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// The source spelling of an operator or delimiter.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NullSafeEq => "<=>",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Tilde => "~",
            Self::Ampersand => "&",
            Self::Pipe => "|",
            Self::Concat => "||",
            Self::Caret => "^",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::LeftBracket => "[",
            Self::RightBracket => "]",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Arrow => "->",
            Self::HintStart => "/*+",
            Self::HintEnd => "*/",
            _ => "",
        }
    }
}

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The source text of the token.
    pub lexeme: String,
    /// The location in the source code.
    pub span: Span,
    /// 1-based line of the first character.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        span: Span,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
            line,
            column,
        }
    }

    /// Creates an end-of-input token at the given position.
    #[must_use]
    pub const fn eof(offset: usize, line: usize, column: usize) -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::point(offset),
            line,
            column,
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}
