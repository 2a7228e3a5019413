//! Abstract Syntax Tree (AST) types for Spark SQL statements.
//!
//! Nodes own their children and are immutable once built. Operator
//! precedence is a property of the operator enums, never stored in a node.

mod expression;
mod ident;
mod query;
mod statement;
mod types;

pub use expression::{
    Alias, ArithmeticOp, ComparisonOp, Expr, ExprKind, FrameBound, FrameUnits, FunctionCall,
    IntervalField, IntervalValue, LikeKind, Literal, LogicalOp, NamedExpr, NamedWindow,
    NullOrdering, NumericKind, OrderDirection, Predicate, SetQuantifier, SortItem, TrimOption,
    UnaryOp, WhenClause, WindowDefinition, WindowFrame, WindowSpec,
};
pub use ident::{FunctionIdentifier, Ident, IdentKind, QualifiedName, TableIdentifier};
pub use query::{
    Aggregation, BucketOn, FileFormat, FromClause, GroupByModifier, Hint, InlineTable,
    InsertInto, Join, JoinCriteria, JoinType, LateralView, MultiInsertBody, NamedQuery,
    PartitionSpec, PartitionValue, Pivot, PropertyValue, Query, QueryBody, QueryOrganization,
    QueryPrimary, QuerySpecification, QueryTerm, Relation, RelationPrimary, RowFormat, RowLimit,
    Sample, SelectSpec, SetOperator, TableAlias, TableProperty, TransformKind, TransformOutput,
    TransformSpec,
};
pub use statement::{
    AnalyzeMode, BucketSpec, CreateHiveTable, CreateTable, CreateTableHeader, CreateView,
    DescribeFunctionName, DescribeOption, ExplainMode, FunctionPattern, FunctionResource,
    FunctionResourceType, FunctionScope, HivePartitionColumns, PartitionLocation, ResourceOp,
    ResourceType, SetCommand, Statement, StatementKind, ViewColumn,
};
pub use types::{ColumnDef, DataType, StructField};
