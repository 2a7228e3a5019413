//! Query AST types: CTEs, set operations, specifications, relations.

use serde::Serialize;

use super::{
    ColumnDef, Expr, Ident, Literal, NamedExpr, NamedWindow, QualifiedName, SetQuantifier,
    SortItem, TableIdentifier,
};
use crate::lexer::Span;

/// Set operators combining two query terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
    /// `MINUS`, a synonym of `EXCEPT`.
    Minus,
}

impl SetOperator {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
            Self::Minus => "MINUS",
        }
    }

    /// Returns the binding level of the operator.
    ///
    /// With `legacy` set, every operator shares one level and the chain is
    /// purely left-associative. Otherwise `INTERSECT` binds tighter.
    #[must_use]
    pub const fn precedence(&self, legacy: bool) -> u8 {
        match (self, legacy) {
            (Self::Intersect, false) => 2,
            _ => 1,
        }
    }
}

/// A complete query: optional CTEs and a body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub ctes: Vec<NamedQuery>,
    pub body: QueryBody,
    pub span: Span,
}

/// `name [AS] (query)` in a `WITH` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedQuery {
    pub name: Ident,
    pub query: Query,
}

/// The part of a query after its CTE block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryBody {
    /// `[INSERT ...] query-term organization`
    Single {
        insert: Option<InsertInto>,
        term: QueryTerm,
        organization: QueryOrganization,
    },
    /// `FROM relations (INSERT ... SELECT ...)+`
    MultiInsert {
        from: FromClause,
        bodies: Vec<MultiInsertBody>,
    },
}

/// One body of a multi-insert query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiInsertBody {
    pub insert: Option<InsertInto>,
    pub specification: QuerySpecification,
    pub organization: QueryOrganization,
}

/// A set-operation chain over query primaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryTerm {
    Primary(Box<QueryPrimary>),
    SetOperation {
        op: SetOperator,
        quantifier: Option<SetQuantifier>,
        left: Box<QueryTerm>,
        right: Box<QueryTerm>,
    },
}

/// A leaf of the set-operation chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QueryPrimary {
    /// `SELECT ...` or a Hive transform.
    Specification(QuerySpecification),
    /// `TABLE name`
    Table(TableIdentifier),
    /// `VALUES ...`
    InlineTable(InlineTable),
    /// `(query)`
    Subquery(Box<Query>),
}

/// `VALUES expr, ... [[AS] alias [(cols)]]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineTable {
    pub rows: Vec<Expr>,
    pub alias: Option<TableAlias>,
}

/// A query specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum QuerySpecification {
    Select(Box<SelectSpec>),
    Transform(Box<TransformSpec>),
}

/// `/*+ NAME(params) */`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hint {
    pub name: Ident,
    pub parameters: Vec<Expr>,
}

/// `SELECT ... [FROM ...] [WHERE ...] ...`
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SelectSpec {
    pub hints: Vec<Hint>,
    pub quantifier: Option<SetQuantifier>,
    /// `None` for a bare `FROM t WHERE ...` body.
    pub projection: Option<Vec<NamedExpr>>,
    pub from: Option<FromClause>,
    /// True if written as `FROM t SELECT ...`.
    pub from_first: bool,
    pub lateral_views: Vec<LateralView>,
    pub selection: Option<Expr>,
    pub aggregation: Option<Aggregation>,
    pub having: Option<Expr>,
    pub windows: Vec<NamedWindow>,
}

/// Which Hive script form introduced a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransformKind {
    /// `SELECT TRANSFORM(...)`
    Transform,
    /// `MAP ...`
    Map,
    /// `REDUCE ...`
    Reduce,
}

/// The `AS ...` schema after a transform script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TransformOutput {
    /// `AS a, b` / `AS (a, b)`
    Names(Vec<Ident>),
    /// `AS (a INT, b STRING)`
    Columns(Vec<ColumnDef>),
}

/// `SELECT TRANSFORM(...) USING 'script' ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformSpec {
    pub kind: TransformKind,
    pub expressions: Vec<NamedExpr>,
    pub input_row_format: Option<RowFormat>,
    pub record_writer: Option<String>,
    pub script: String,
    pub output: Option<TransformOutput>,
    pub output_row_format: Option<RowFormat>,
    pub record_reader: Option<String>,
    pub from: Option<FromClause>,
    pub selection: Option<Expr>,
}

/// A Hive `ROW FORMAT` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RowFormat {
    /// `ROW FORMAT SERDE 'class' [WITH SERDEPROPERTIES (...)]`
    Serde {
        class: String,
        properties: Vec<TableProperty>,
    },
    /// `ROW FORMAT DELIMITED ...`
    Delimited {
        fields_terminated_by: Option<String>,
        escaped_by: Option<String>,
        collection_items_terminated_by: Option<String>,
        map_keys_terminated_by: Option<String>,
        lines_terminated_by: Option<String>,
        null_defined_as: Option<String>,
    },
}

/// The value of a table property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PropertyValue {
    Integer(String),
    Decimal(String),
    Boolean(bool),
    String(String),
}

/// `key [=] value` in a property or option list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableProperty {
    /// The key: dotted identifiers joined by `.`, or a string.
    pub key: String,
    pub value: Option<PropertyValue>,
}

/// `FROM relation, ... [LATERAL VIEW ...] [PIVOT ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FromClause {
    pub relations: Vec<Relation>,
    pub lateral_views: Vec<LateralView>,
    pub pivot: Option<Pivot>,
}

/// A relation primary with its chain of joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub primary: RelationPrimary,
    pub joins: Vec<Join>,
}

/// Join types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    Inner,
    Cross,
    LeftOuter,
    LeftSemi,
    RightOuter,
    FullOuter,
    LeftAnti,
}

/// `ON expr` or `USING (cols)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinCriteria {
    On(Expr),
    Using(Vec<Ident>),
}

/// One join in a relation chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub natural: bool,
    pub join_type: JoinType,
    pub relation: RelationPrimary,
    /// Always `None` for natural and cross joins.
    pub criteria: Option<JoinCriteria>,
}

/// `[AS] name [(col, ...)]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAlias {
    pub name: Ident,
    pub columns: Vec<Ident>,
}

/// A leaf of the FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RelationPrimary {
    Table {
        name: TableIdentifier,
        sample: Option<Sample>,
        alias: Option<TableAlias>,
    },
    AliasedQuery {
        query: Box<Query>,
        sample: Option<Sample>,
        alias: Option<TableAlias>,
    },
    AliasedRelation {
        relation: Box<Relation>,
        sample: Option<Sample>,
        alias: Option<TableAlias>,
    },
    InlineTable(InlineTable),
    TableValuedFunction {
        name: Ident,
        args: Vec<Expr>,
        alias: Option<TableAlias>,
    },
}

/// `ON` target of a bucket sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BucketOn {
    Column(Ident),
    Function(QualifiedName),
}

/// `TABLESAMPLE (...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Sample {
    /// `n PERCENT`
    Percent { negative: bool, value: String },
    /// `expr ROWS`
    Rows(Expr),
    /// `BUCKET x OUT OF y [ON ...]`
    Bucket {
        numerator: String,
        denominator: String,
        on: Option<BucketOn>,
    },
    /// `100M`, `1k`: a byte-length literal.
    Bytes(Expr),
}

/// `LATERAL VIEW [OUTER] fn(args) table [AS] col, ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LateralView {
    pub outer: bool,
    pub function: QualifiedName,
    pub args: Vec<Expr>,
    pub table: Ident,
    pub columns: Vec<Ident>,
}

/// `PIVOT (aggs FOR cols IN (values))`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pivot {
    pub aggregates: Vec<NamedExpr>,
    pub columns: Vec<Ident>,
    pub values: Vec<NamedExpr>,
}

/// Modifier after a plain `GROUP BY` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GroupByModifier {
    WithRollup,
    WithCube,
    GroupingSets(Vec<Vec<Expr>>),
}

/// The aggregation clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Aggregation {
    /// `GROUP BY exprs [WITH ROLLUP | WITH CUBE | GROUPING SETS (...)]`
    GroupBy {
        expressions: Vec<Expr>,
        modifier: Option<GroupByModifier>,
    },
    /// `GROUP BY CUBE (exprs)`
    Cube(Vec<Expr>),
    /// `GROUP BY ROLLUP (exprs)`
    Rollup(Vec<Expr>),
}

/// `LIMIT` / `OFFSET` operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowLimit {
    All,
    Count(Expr),
}

/// The trailing clauses shared by all query forms.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct QueryOrganization {
    pub order_by: Vec<SortItem>,
    pub cluster_by: Vec<Expr>,
    pub distribute_by: Vec<Expr>,
    pub sort_by: Vec<SortItem>,
    pub windows: Vec<NamedWindow>,
    pub limit: Option<RowLimit>,
    pub offset: Option<RowLimit>,
}

impl QueryOrganization {
    /// Returns true if no clause is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `col [= value]` inside `PARTITION (...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionValue {
    pub column: Ident,
    /// `None` for a dynamic partition column.
    pub value: Option<Literal>,
}

/// `PARTITION (col = value, ...)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionSpec {
    pub values: Vec<PartitionValue>,
}

impl PartitionSpec {
    /// Returns true if any column has no value.
    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.values.iter().any(|v| v.value.is_none())
    }
}

/// A Hive storage format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileFormat {
    /// `STORED AS name`
    Named(Ident),
    /// `STORED AS INPUTFORMAT 'in' OUTPUTFORMAT 'out'`
    InputOutput { input: String, output: String },
}

/// The target of an `INSERT` clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertInto {
    /// `INSERT OVERWRITE TABLE t ...` / `INSERT INTO [TABLE] t ...`
    Table {
        overwrite: bool,
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
        if_not_exists: bool,
    },
    /// `INSERT OVERWRITE [LOCAL] DIRECTORY 'path' [ROW FORMAT ..] [STORED AS ..]`
    HiveDirectory {
        local: bool,
        path: String,
        row_format: Option<RowFormat>,
        file_format: Option<FileFormat>,
    },
    /// `INSERT OVERWRITE DIRECTORY ['path'] USING provider [OPTIONS (...)]`
    Directory {
        path: Option<String>,
        provider: QualifiedName,
        options: Vec<TableProperty>,
    },
}

impl Query {
    /// Returns the single query term, if this is not a multi-insert.
    #[must_use]
    pub const fn term(&self) -> Option<&QueryTerm> {
        match &self.body {
            QueryBody::Single { term, .. } => Some(term),
            QueryBody::MultiInsert { .. } => None,
        }
    }

    /// Returns the organization of a single-body query.
    #[must_use]
    pub const fn organization(&self) -> Option<&QueryOrganization> {
        match &self.body {
            QueryBody::Single { organization, .. } => Some(organization),
            QueryBody::MultiInsert { .. } => None,
        }
    }
}

impl QueryTerm {
    /// Returns the `SELECT` specification if this term is a plain select.
    #[must_use]
    pub fn as_select(&self) -> Option<&SelectSpec> {
        match self {
            Self::Primary(primary) => match primary.as_ref() {
                QueryPrimary::Specification(QuerySpecification::Select(select)) => Some(select),
                _ => None,
            },
            Self::SetOperation { .. } => None,
        }
    }
}
