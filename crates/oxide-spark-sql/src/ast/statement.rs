//! Statement AST types.

use serde::Serialize;

use super::{
    ColumnDef, FileFormat, FunctionIdentifier, Ident, PartitionSpec, QualifiedName, Query,
    RowFormat, TableIdentifier, TableProperty,
};
use crate::lexer::Span;

/// A parsed statement with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

/// `CLUSTERED BY (cols) [SORTED BY (...)] INTO n BUCKETS`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSpec {
    pub columns: Vec<Ident>,
    /// `SORTED BY` columns; only ascending order is accepted.
    pub sorted_by: Vec<Ident>,
    pub num_buckets: u32,
}

/// The `CREATE [TEMPORARY] [EXTERNAL] TABLE [IF NOT EXISTS] name` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTableHeader {
    pub temporary: bool,
    pub external: bool,
    pub if_not_exists: bool,
    pub table: TableIdentifier,
}

/// `CREATE TABLE ... USING provider ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTable {
    pub header: CreateTableHeader,
    pub columns: Vec<ColumnDef>,
    pub provider: QualifiedName,
    pub options: Vec<TableProperty>,
    pub partition_columns: Vec<Ident>,
    pub bucket: Option<BucketSpec>,
    pub location: Option<String>,
    pub comment: Option<String>,
    pub properties: Vec<TableProperty>,
    pub query: Option<Box<Query>>,
}

/// A Hive `PARTITIONED BY` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum HivePartitionColumns {
    /// `PARTITIONED BY (a INT, b STRING)`
    Typed(Vec<ColumnDef>),
    /// `PARTITIONED BY (a, b)`, only valid with `AS query`.
    Names(Vec<Ident>),
}

/// Hive `CREATE TABLE ... [ROW FORMAT ..] [STORED AS ..]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateHiveTable {
    pub header: CreateTableHeader,
    pub columns: Vec<ColumnDef>,
    pub comment: Option<String>,
    pub partition_columns: Option<HivePartitionColumns>,
    pub bucket: Option<BucketSpec>,
    pub row_format: Option<RowFormat>,
    pub file_format: Option<FileFormat>,
    pub location: Option<String>,
    pub properties: Vec<TableProperty>,
    pub query: Option<Box<Query>>,
}

/// What `ANALYZE TABLE` computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnalyzeMode {
    /// `COMPUTE STATISTICS`
    Full,
    /// `COMPUTE STATISTICS NOSCAN`
    NoScan,
    /// `COMPUTE STATISTICS FOR COLUMNS a, b`
    Columns(Vec<Ident>),
}

/// A column entry of `CREATE VIEW name (col [COMMENT 'c'], ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewColumn {
    pub name: Ident,
    pub comment: Option<String>,
}

/// `CREATE [OR REPLACE] [[GLOBAL] TEMPORARY] VIEW ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateView {
    pub replace: bool,
    pub temporary: bool,
    pub global: bool,
    pub if_not_exists: bool,
    pub name: TableIdentifier,
    pub columns: Vec<ViewColumn>,
    pub comment: Option<String>,
    pub properties: Vec<TableProperty>,
    pub query: Box<Query>,
}

/// Resource kinds of `CREATE FUNCTION ... USING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionResourceType {
    Jar,
    File,
    Archive,
}

/// `JAR 'path'`, `FILE 'path'`, `ARCHIVE 'path'`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionResource {
    pub resource_type: FunctionResourceType,
    pub uri: String,
}

/// `EXPLAIN` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExplainMode {
    Simple,
    Extended,
    Codegen,
    Cost,
}

/// The target of `DESCRIBE FUNCTION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DescribeFunctionName {
    Qualified(QualifiedName),
    String(String),
    /// An operator spelled as a token, e.g. `DESCRIBE FUNCTION +`.
    Operator(String),
}

/// `DESCRIBE TABLE` detail level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DescribeOption {
    Extended,
    Formatted,
}

/// The pattern of `SHOW FUNCTIONS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FunctionPattern {
    Name(QualifiedName),
    String(String),
}

/// `SHOW [scope] FUNCTIONS` scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionScope {
    All,
    User,
    System,
}

/// `ADD` or `LIST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceOp {
    Add,
    List,
}

/// `FILE` / `JAR` resources of `ADD` / `LIST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResourceType {
    File,
    Jar,
}

/// A `SET` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SetCommand {
    /// `SET`
    ListAll,
    /// `SET -v`
    ListAllVerbose,
    /// `SET key`
    Get(String),
    /// `SET key=value`
    Set { key: String, value: String },
}

/// A partition spec with its optional location, as in `ADD PARTITION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionLocation {
    pub spec: PartitionSpec,
    pub location: Option<String>,
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StatementKind {
    /// A query, possibly with `INSERT` targets.
    Query(Box<Query>),
    /// `USE db`
    Use { database: Ident },
    /// `CREATE DATABASE [IF NOT EXISTS] db ...`
    CreateDatabase {
        if_not_exists: bool,
        name: Ident,
        comment: Option<String>,
        location: Option<String>,
        properties: Vec<TableProperty>,
    },
    /// `ALTER DATABASE db SET DBPROPERTIES (...)`
    SetDatabaseProperties {
        database: Ident,
        properties: Vec<TableProperty>,
    },
    /// `DROP DATABASE [IF EXISTS] db [RESTRICT|CASCADE]`
    DropDatabase {
        if_exists: bool,
        database: Ident,
        cascade: bool,
    },
    /// Data source `CREATE TABLE`.
    CreateTable(Box<CreateTable>),
    /// Hive `CREATE TABLE`.
    CreateHiveTable(Box<CreateHiveTable>),
    /// `CREATE TABLE [IF NOT EXISTS] t LIKE s [LOCATION 'p']`
    CreateTableLike {
        if_not_exists: bool,
        target: TableIdentifier,
        source: TableIdentifier,
        location: Option<String>,
    },
    /// `ANALYZE TABLE t [PARTITION (...)] COMPUTE STATISTICS ...`
    Analyze {
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
        mode: AnalyzeMode,
    },
    /// `ALTER TABLE t ADD COLUMNS (...)`
    AddTableColumns {
        table: TableIdentifier,
        columns: Vec<ColumnDef>,
    },
    /// `ALTER TABLE|VIEW a RENAME TO b`
    RenameTable {
        from: TableIdentifier,
        to: TableIdentifier,
        is_view: bool,
    },
    /// `ALTER TABLE|VIEW t SET TBLPROPERTIES (...)`
    SetTableProperties {
        table: TableIdentifier,
        properties: Vec<TableProperty>,
        is_view: bool,
    },
    /// `ALTER TABLE|VIEW t UNSET TBLPROPERTIES [IF EXISTS] (...)`
    UnsetTableProperties {
        table: TableIdentifier,
        keys: Vec<String>,
        if_exists: bool,
        is_view: bool,
    },
    /// `ALTER TABLE t CHANGE [COLUMN] a a_new TYPE [COMMENT 'c']`
    ChangeColumn {
        table: TableIdentifier,
        column: Ident,
        new_column: ColumnDef,
    },
    /// `ALTER TABLE t [PARTITION (...)] SET SERDE ... / SET SERDEPROPERTIES ...`
    SetTableSerDe {
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
        serde: Option<String>,
        properties: Vec<TableProperty>,
    },
    /// `ALTER TABLE t ADD [IF NOT EXISTS] PARTITION (...) [LOCATION 'p'] ...`
    AddTablePartition {
        table: TableIdentifier,
        if_not_exists: bool,
        partitions: Vec<PartitionLocation>,
    },
    /// `ALTER TABLE t PARTITION (...) RENAME TO PARTITION (...)`
    RenameTablePartition {
        table: TableIdentifier,
        from: PartitionSpec,
        to: PartitionSpec,
    },
    /// `ALTER TABLE t DROP [IF EXISTS] PARTITION (...), ... [PURGE]`
    DropTablePartitions {
        table: TableIdentifier,
        if_exists: bool,
        partitions: Vec<PartitionSpec>,
        purge: bool,
    },
    /// `ALTER TABLE t [PARTITION (...)] SET LOCATION 'p'`
    SetTableLocation {
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
        location: String,
    },
    /// `ALTER TABLE t RECOVER PARTITIONS`
    RecoverPartitions { table: TableIdentifier },
    /// `DROP TABLE|VIEW [IF EXISTS] t [PURGE]`
    DropTable {
        table: TableIdentifier,
        if_exists: bool,
        is_view: bool,
        purge: bool,
    },
    /// `CREATE VIEW ... AS query`
    CreateView(Box<CreateView>),
    /// `CREATE [OR REPLACE] [GLOBAL] TEMPORARY VIEW v [(cols)] USING p [OPTIONS ..]`
    CreateTempViewUsing {
        replace: bool,
        global: bool,
        name: TableIdentifier,
        columns: Vec<ColumnDef>,
        provider: QualifiedName,
        options: Vec<TableProperty>,
    },
    /// `ALTER VIEW v [AS] query`
    AlterViewQuery {
        name: TableIdentifier,
        query: Box<Query>,
    },
    /// `CREATE [OR REPLACE] [TEMPORARY] FUNCTION ...`
    CreateFunction {
        replace: bool,
        temporary: bool,
        if_not_exists: bool,
        name: FunctionIdentifier,
        class_name: String,
        resources: Vec<FunctionResource>,
    },
    /// `DROP [TEMPORARY] FUNCTION [IF EXISTS] f`
    DropFunction {
        temporary: bool,
        if_exists: bool,
        name: FunctionIdentifier,
    },
    /// `EXPLAIN [EXTENDED|CODEGEN|COST] statement`
    Explain {
        mode: ExplainMode,
        statement: Box<Statement>,
    },
    /// `SHOW TABLES [FROM|IN db] [[LIKE] 'pattern']`
    ShowTables {
        database: Option<Ident>,
        pattern: Option<String>,
    },
    /// `SHOW TABLE EXTENDED [FROM|IN db] LIKE 'pattern' [PARTITION (...)]`
    ShowTableExtended {
        database: Option<Ident>,
        pattern: String,
        partition: Option<PartitionSpec>,
    },
    /// `SHOW DATABASES [[LIKE] 'pattern']`
    ShowDatabases { pattern: Option<String> },
    /// `SHOW TBLPROPERTIES t [(key)]`
    ShowTblProperties {
        table: TableIdentifier,
        key: Option<String>,
    },
    /// `SHOW COLUMNS (FROM|IN) t [(FROM|IN) db]`
    ShowColumns {
        table: TableIdentifier,
        database: Option<Ident>,
    },
    /// `SHOW PARTITIONS t [PARTITION (...)]`
    ShowPartitions {
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
    },
    /// `SHOW [scope] FUNCTIONS [[LIKE] pattern]`
    ShowFunctions {
        scope: Option<FunctionScope>,
        pattern: Option<FunctionPattern>,
    },
    /// `SHOW CREATE TABLE t`
    ShowCreateTable { table: TableIdentifier },
    /// `DESC FUNCTION [EXTENDED] f`
    DescribeFunction {
        extended: bool,
        function: DescribeFunctionName,
    },
    /// `DESC DATABASE [EXTENDED] db`
    DescribeDatabase { extended: bool, database: Ident },
    /// `DESC [TABLE] [EXTENDED|FORMATTED] t [PARTITION (...)] [col]`
    DescribeTable {
        option: Option<DescribeOption>,
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
        column: Option<QualifiedName>,
    },
    /// `REFRESH TABLE t`
    RefreshTable { table: TableIdentifier },
    /// `REFRESH path`
    RefreshResource { path: String },
    /// `CACHE [LAZY] TABLE t [OPTIONS (...)] [[AS] query]`
    CacheTable {
        lazy: bool,
        table: TableIdentifier,
        options: Vec<TableProperty>,
        query: Option<Box<Query>>,
    },
    /// `UNCACHE TABLE [IF EXISTS] t`
    UncacheTable {
        if_exists: bool,
        table: TableIdentifier,
    },
    /// `CLEAR CACHE`
    ClearCache,
    /// `LOAD DATA [LOCAL] INPATH 'p' [OVERWRITE] INTO TABLE t [PARTITION (...)]`
    LoadData {
        local: bool,
        path: String,
        overwrite: bool,
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
    },
    /// `TRUNCATE TABLE t [PARTITION (...)]`
    TruncateTable {
        table: TableIdentifier,
        partition: Option<PartitionSpec>,
    },
    /// `MSCK REPAIR TABLE t`
    RepairTable { table: TableIdentifier },
    /// `ADD FILE|JAR paths`, `LIST FILE|JAR [paths]`
    ManageResource {
        op: ResourceOp,
        resource_type: ResourceType,
        paths: Vec<String>,
    },
    /// `SET ...`
    SetConfiguration(SetCommand),
    /// `RESET`
    ResetConfiguration,
}

impl Statement {
    /// Returns the query if this statement is one.
    #[must_use]
    pub fn as_query(&self) -> Option<&Query> {
        match &self.kind {
            StatementKind::Query(query) => Some(query),
            _ => None,
        }
    }
}
