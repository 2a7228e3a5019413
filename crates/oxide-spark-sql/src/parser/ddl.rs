//! DDL statement builders: databases, tables, views and functions.

use super::error::ParseError;
use super::Parser;
use crate::ast::{
    BucketSpec, ColumnDef, CreateHiveTable, CreateTable, CreateTableHeader, CreateView,
    FileFormat, FunctionResource, FunctionResourceType, HivePartitionColumns, Ident,
    PartitionLocation, Query, RowFormat, StatementKind, TableIdentifier, ViewColumn,
};
use crate::lexer::{Keyword, Token, TokenKind};

/// Optional clauses seen so far in a clause loop.
#[derive(Default)]
struct ClauseSet {
    seen: Vec<&'static str>,
}

impl ClauseSet {
    fn record(&mut self, parser: &Parser, clause: &'static str, at: &Token) -> Result<(), ParseError> {
        if self.seen.contains(&clause) {
            return Err(parser.syntax_error_at(format!("Found duplicate clauses: {clause}"), at));
        }
        self.seen.push(clause);
        Ok(())
    }
}

/// A `PARTITIONED BY` entry, typed or bare.
enum PartitionColumn {
    Typed(ColumnDef),
    Name(Ident),
}

impl Parser {
    // ------------------------------------------------------------------
    // Databases
    // ------------------------------------------------------------------

    /// `CREATE DATABASE [IF NOT EXISTS] db [COMMENT ..] [LOCATION ..]
    /// [WITH DBPROPERTIES (..)]`
    pub(super) fn parse_create_database(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Create, Keyword::Database])?;
        let if_not_exists = self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        let name = self.parse_identifier()?;

        let mut clauses = ClauseSet::default();
        let mut comment = None;
        let mut location = None;
        let mut properties = Vec::new();
        loop {
            let at = self.current().clone();
            if self.eat_keyword(Keyword::Comment) {
                clauses.record(self, "COMMENT", &at)?;
                comment = Some(self.parse_string()?);
            } else if self.eat_keyword(Keyword::Location) {
                clauses.record(self, "LOCATION", &at)?;
                location = Some(self.parse_string()?);
            } else if self.eat_keywords(&[Keyword::With, Keyword::Dbproperties]) {
                clauses.record(self, "WITH DBPROPERTIES", &at)?;
                properties = self.parse_property_list_with_values()?;
            } else {
                break;
            }
        }

        Ok(StatementKind::CreateDatabase {
            if_not_exists,
            name,
            comment,
            location,
            properties,
        })
    }

    /// `ALTER DATABASE db SET DBPROPERTIES (..)`
    pub(super) fn parse_alter_database(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Alter, Keyword::Database])?;
        let database = self.parse_identifier()?;
        self.expect_keywords(&[Keyword::Set, Keyword::Dbproperties])?;
        let properties = self.parse_property_list_with_values()?;
        Ok(StatementKind::SetDatabaseProperties {
            database,
            properties,
        })
    }

    /// `DROP DATABASE [IF EXISTS] db [RESTRICT | CASCADE]`
    pub(super) fn parse_drop_database(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Drop, Keyword::Database])?;
        let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
        let database = self.parse_identifier()?;
        let cascade = self.eat_one_of(&[Keyword::Restrict, Keyword::Cascade]) == Some(Keyword::Cascade);
        Ok(StatementKind::DropDatabase {
            if_exists,
            database,
            cascade,
        })
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    /// `CREATE [TEMPORARY] [EXTERNAL] TABLE [IF NOT EXISTS] t ...`
    ///
    /// Dispatches on what follows the table name: `LIKE` for a copy of an
    /// existing table, `USING` for a data source table, anything else for
    /// a Hive table.
    pub(super) fn parse_create_table(&mut self) -> Result<StatementKind, ParseError> {
        let create = self.expect_keyword(Keyword::Create)?;
        let temporary = self.eat_keyword(Keyword::Temporary);
        let external = self.eat_keyword(Keyword::External);
        self.expect_keyword(Keyword::Table)?;
        let if_not_exists = self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        let table = self.parse_table_identifier()?;
        let header = CreateTableHeader {
            temporary,
            external,
            if_not_exists,
            table,
        };

        if self.check_keyword(Keyword::Like) {
            return self.parse_create_table_like(header, &create);
        }

        let columns = if self.check(&TokenKind::LeftParen) && !self.query_starts_at(1) {
            self.parse_parenthesized_columns()?
        } else {
            Vec::new()
        };

        if self.check_keyword(Keyword::Using) {
            self.parse_create_data_source_table(header, columns, &create)
        } else {
            self.parse_create_hive_table(header, columns, &create)
        }
    }

    fn parse_create_table_like(
        &mut self,
        header: CreateTableHeader,
        create: &Token,
    ) -> Result<StatementKind, ParseError> {
        if header.temporary || header.external {
            let modifier = if header.temporary { "TEMPORARY" } else { "EXTERNAL" };
            return Err(self.syntax_error_at(
                format!("CREATE {modifier} TABLE ... LIKE is not supported"),
                create,
            ));
        }
        self.expect_keyword(Keyword::Like)?;
        let source = self.parse_table_identifier()?;
        let location = if self.eat_keyword(Keyword::Location) {
            Some(self.parse_string()?)
        } else {
            None
        };
        Ok(StatementKind::CreateTableLike {
            if_not_exists: header.if_not_exists,
            target: header.table,
            source,
            location,
        })
    }

    /// `[AS] query`, if present.
    pub(super) fn parse_optional_as_query(&mut self) -> Result<Option<Box<Query>>, ParseError> {
        let starts = self.eat_keyword(Keyword::As)
            || self.query_starts_at(0)
            || (self.current().kind == TokenKind::LeftParen && self.query_starts_at(1));
        if starts {
            Ok(Some(Box::new(self.parse_query()?)))
        } else {
            Ok(None)
        }
    }

    fn parse_create_data_source_table(
        &mut self,
        header: CreateTableHeader,
        columns: Vec<ColumnDef>,
        create: &Token,
    ) -> Result<StatementKind, ParseError> {
        if header.external {
            return Err(ParseError::unsupported("CREATE EXTERNAL TABLE ... USING", create));
        }
        self.expect_keyword(Keyword::Using)?;
        let provider = self.parse_qualified_name()?;

        let mut clauses = ClauseSet::default();
        let mut options = Vec::new();
        let mut partition_columns = Vec::new();
        let mut bucket = None;
        let mut location = None;
        let mut comment = None;
        let mut properties = Vec::new();
        loop {
            let at = self.current().clone();
            if self.eat_keyword(Keyword::Options) {
                clauses.record(self, "OPTIONS", &at)?;
                options = self.parse_property_list_with_values()?;
            } else if self.eat_keywords(&[Keyword::Partitioned, Keyword::By]) {
                clauses.record(self, "PARTITIONED BY", &at)?;
                partition_columns = self.parse_identifier_list()?;
            } else if self.check_keyword(Keyword::Clustered) {
                clauses.record(self, "CLUSTERED BY", &at)?;
                bucket = Some(self.parse_bucket_spec()?);
            } else if self.eat_keyword(Keyword::Location) {
                clauses.record(self, "LOCATION", &at)?;
                location = Some(self.parse_string()?);
            } else if self.eat_keyword(Keyword::Comment) {
                clauses.record(self, "COMMENT", &at)?;
                comment = Some(self.parse_string()?);
            } else if self.eat_keyword(Keyword::Tblproperties) {
                clauses.record(self, "TBLPROPERTIES", &at)?;
                properties = self.parse_property_list_with_values()?;
            } else {
                break;
            }
        }
        let query = self.parse_optional_as_query()?;

        if header.temporary {
            if query.is_some() {
                return Err(ParseError::unsupported(
                    "CREATE TEMPORARY TABLE ... USING ... AS query",
                    create,
                ));
            }
            if header.if_not_exists {
                return Err(ParseError::unsupported(
                    "CREATE TEMPORARY TABLE IF NOT EXISTS",
                    create,
                ));
            }
            // Deprecated spelling of a temporary view.
            return Ok(StatementKind::CreateTempViewUsing {
                replace: false,
                global: false,
                name: header.table,
                columns,
                provider,
                options,
            });
        }
        if query.is_some() && !columns.is_empty() {
            return Err(ParseError::unsupported(
                "Schema may not be specified in a Create Table As Select (CTAS) statement",
                create,
            ));
        }

        Ok(StatementKind::CreateTable(Box::new(CreateTable {
            header,
            columns,
            provider,
            options,
            partition_columns,
            bucket,
            location,
            comment,
            properties,
            query,
        })))
    }

    fn parse_create_hive_table(
        &mut self,
        header: CreateTableHeader,
        columns: Vec<ColumnDef>,
        create: &Token,
    ) -> Result<StatementKind, ParseError> {
        let mut clauses = ClauseSet::default();
        let mut comment = None;
        let mut partition_columns = None;
        let mut bucket = None;
        let mut skewed = false;
        let mut row_format = None;
        let mut file_format = None;
        let mut location = None;
        let mut properties = Vec::new();
        loop {
            let at = self.current().clone();
            if self.eat_keyword(Keyword::Comment) {
                clauses.record(self, "COMMENT", &at)?;
                comment = Some(self.parse_string()?);
            } else if self.eat_keywords(&[Keyword::Partitioned, Keyword::By]) {
                clauses.record(self, "PARTITIONED BY", &at)?;
                partition_columns = Some(self.parse_hive_partition_columns(&at)?);
            } else if self.check_keyword(Keyword::Clustered) {
                clauses.record(self, "CLUSTERED BY", &at)?;
                bucket = Some(self.parse_bucket_spec()?);
            } else if self.check_keyword(Keyword::Skewed) {
                self.parse_skew_spec()?;
                skewed = true;
            } else if self.peek_keyword(0) == Some(Keyword::Row)
                && self.peek_keyword(1) == Some(Keyword::Format)
            {
                clauses.record(self, "ROW FORMAT", &at)?;
                row_format = self.parse_optional_row_format()?;
            } else if self.check_keyword(Keyword::Stored) {
                clauses.record(self, "STORED AS/BY", &at)?;
                file_format = self.parse_optional_file_format()?;
            } else if self.eat_keyword(Keyword::Location) {
                clauses.record(self, "LOCATION", &at)?;
                location = Some(self.parse_string()?);
            } else if self.eat_keyword(Keyword::Tblproperties) {
                clauses.record(self, "TBLPROPERTIES", &at)?;
                properties = self.parse_property_list_with_values()?;
            } else {
                break;
            }
        }
        let query = self.parse_optional_as_query()?;

        if header.temporary {
            return Err(self.syntax_error_at(
                "CREATE TEMPORARY TABLE is not supported yet. Please use CREATE TEMPORARY VIEW as an alternative.",
                create,
            ));
        }
        if skewed {
            return Err(ParseError::unsupported("CREATE TABLE ... SKEWED BY", create));
        }
        Self::validate_row_format_file_format(row_format.as_ref(), file_format.as_ref(), create)?;
        if header.external && location.is_none() {
            return Err(ParseError::unsupported(
                "CREATE EXTERNAL TABLE must be accompanied by LOCATION",
                create,
            ));
        }
        match (&query, &partition_columns) {
            (Some(_), Some(HivePartitionColumns::Typed(_))) => {
                return Err(ParseError::unsupported(
                    "A Create Table As Select (CTAS) statement is not allowed to create a partitioned table using Hive's file formats. Please use the syntax of \"CREATE TABLE tableName USING dataSource OPTIONS (...) PARTITIONED BY ...\" to create a partitioned table through a CTAS statement.",
                    create,
                ));
            }
            (None, Some(HivePartitionColumns::Names(_))) => {
                return Err(self.syntax_error_at(
                    "Must specify a data type for each partition column while creating Hive partitioned table.",
                    create,
                ));
            }
            _ => {}
        }
        if query.is_some() && !columns.is_empty() {
            return Err(ParseError::unsupported(
                "Schema may not be specified in a Create Table As Select (CTAS) statement",
                create,
            ));
        }

        Ok(StatementKind::CreateHiveTable(Box::new(CreateHiveTable {
            header,
            columns,
            comment,
            partition_columns,
            bucket,
            row_format,
            file_format,
            location,
            properties,
            query,
        })))
    }

    /// `( col [type [COMMENT 'c']], ... )`: all typed or all bare.
    fn parse_hive_partition_columns(
        &mut self,
        at: &Token,
    ) -> Result<HivePartitionColumns, ParseError> {
        let entries = self.parse_parenthesized_list(|p| {
            if matches!(p.peek(1).kind, TokenKind::Comma | TokenKind::RightParen) {
                Ok(PartitionColumn::Name(p.parse_identifier()?))
            } else {
                Ok(PartitionColumn::Typed(p.parse_column_def()?))
            }
        })?;

        let mut typed = Vec::new();
        let mut names = Vec::new();
        for entry in entries {
            match entry {
                PartitionColumn::Typed(column) => typed.push(column),
                PartitionColumn::Name(name) => names.push(name),
            }
        }
        match (typed.is_empty(), names.is_empty()) {
            (false, true) => Ok(HivePartitionColumns::Typed(typed)),
            (true, false) => Ok(HivePartitionColumns::Names(names)),
            _ => Err(self.syntax_error_at(
                "PARTITIONED BY columns must either all have a data type or none",
                at,
            )),
        }
    }

    /// Checks that a `ROW FORMAT` clause fits the `STORED AS` format.
    fn validate_row_format_file_format(
        row_format: Option<&RowFormat>,
        file_format: Option<&FileFormat>,
        at: &Token,
    ) -> Result<(), ParseError> {
        let (Some(row_format), Some(FileFormat::Named(name))) = (row_format, file_format) else {
            return Ok(());
        };
        let format = name.value().to_ascii_lowercase();
        match row_format {
            RowFormat::Serde { .. }
                if !matches!(format.as_str(), "sequencefile" | "textfile" | "rcfile") =>
            {
                Err(ParseError::unsupported(
                    format!(
                        "ROW FORMAT SERDE is incompatible with format '{format}', which also specifies a serde"
                    ),
                    at,
                ))
            }
            RowFormat::Delimited { .. } if format != "textfile" => Err(ParseError::unsupported(
                format!("ROW FORMAT DELIMITED is only compatible with 'textfile', not '{format}'"),
                at,
            )),
            _ => Ok(()),
        }
    }

    /// `CLUSTERED BY (cols) [SORTED BY (col [ASC], ...)] INTO n BUCKETS`
    fn parse_bucket_spec(&mut self) -> Result<BucketSpec, ParseError> {
        self.expect_keywords(&[Keyword::Clustered, Keyword::By])?;
        let columns = self.parse_identifier_list()?;
        let sorted_by = if self.eat_keywords(&[Keyword::Sorted, Keyword::By]) {
            self.parse_parenthesized_list(|p| {
                let name = p.parse_identifier()?;
                let at = p.current().clone();
                if p.eat_keyword(Keyword::Desc) {
                    return Err(ParseError::unsupported(
                        "Column ordering must be ASC, was 'DESC'",
                        &at,
                    ));
                }
                p.eat_keyword(Keyword::Asc);
                Ok(name)
            })?
        } else {
            Vec::new()
        };
        self.expect_keyword(Keyword::Into)?;
        let num_buckets = self.parse_u32()?;
        self.expect_keyword(Keyword::Buckets)?;
        Ok(BucketSpec {
            columns,
            sorted_by,
            num_buckets,
        })
    }

    /// `SKEWED BY (cols) ON (consts) | ((consts), ...) [STORED AS DIRECTORIES]`
    ///
    /// Parsed for validation only; skewed tables are rejected by the caller.
    fn parse_skew_spec(&mut self) -> Result<(), ParseError> {
        self.expect_keywords(&[Keyword::Skewed, Keyword::By])?;
        self.parse_identifier_list()?;
        self.expect_keyword(Keyword::On)?;
        self.parse_parenthesized_list(|p| {
            if p.check(&TokenKind::LeftParen) {
                p.parse_parenthesized_list(Self::parse_constant)?;
            } else {
                p.parse_constant()?;
            }
            Ok(())
        })?;
        self.eat_keywords(&[Keyword::Stored, Keyword::As, Keyword::Directories]);
        Ok(())
    }

    /// `ALTER TABLE|VIEW name ...`
    pub(super) fn parse_alter_table(&mut self) -> Result<StatementKind, ParseError> {
        let alter = self.expect_keyword(Keyword::Alter)?;
        let is_view = match self.eat_one_of(&[Keyword::Table, Keyword::View]) {
            Some(kw) => kw == Keyword::View,
            None => return Err(self.error_here()),
        };
        let table = self.parse_table_identifier()?;

        if self.eat_keywords(&[Keyword::Rename, Keyword::To]) {
            let to = self.parse_table_identifier()?;
            return Ok(StatementKind::RenameTable {
                from: table,
                to,
                is_view,
            });
        }
        if self.eat_keywords(&[Keyword::Set, Keyword::Tblproperties]) {
            let properties = self.parse_property_list_with_values()?;
            return Ok(StatementKind::SetTableProperties {
                table,
                properties,
                is_view,
            });
        }
        if self.eat_keywords(&[Keyword::Unset, Keyword::Tblproperties]) {
            let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
            let keys = self.parse_property_keys()?;
            return Ok(StatementKind::UnsetTableProperties {
                table,
                keys,
                if_exists,
                is_view,
            });
        }

        if is_view {
            self.parse_alter_view_tail(table, &alter)
        } else {
            self.parse_alter_table_tail(table, &alter)
        }
    }

    /// View-only forms: partition changes are recognized and rejected, and
    /// anything else is `[AS] query`.
    fn parse_alter_view_tail(
        &mut self,
        name: TableIdentifier,
        alter: &Token,
    ) -> Result<StatementKind, ParseError> {
        if self.eat_keyword(Keyword::Add) {
            self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
            self.parse_partition_spec()?;
            while self.check_keyword(Keyword::Partition) {
                self.parse_partition_spec()?;
            }
            return Err(ParseError::unsupported("ALTER VIEW ... ADD PARTITION", alter));
        }
        if self.eat_keyword(Keyword::Drop) {
            self.eat_keywords(&[Keyword::If, Keyword::Exists]);
            self.parse_comma_separated(Self::parse_partition_spec)?;
            return Err(ParseError::unsupported("ALTER VIEW ... DROP PARTITION", alter));
        }

        self.eat_keyword(Keyword::As);
        let query = self.parse_query()?;
        Ok(StatementKind::AlterViewQuery {
            name,
            query: Box::new(query),
        })
    }

    fn parse_alter_table_tail(
        &mut self,
        table: TableIdentifier,
        alter: &Token,
    ) -> Result<StatementKind, ParseError> {
        if self.eat_keywords(&[Keyword::Add, Keyword::Columns]) {
            let columns = self.parse_parenthesized_columns()?;
            return Ok(StatementKind::AddTableColumns { table, columns });
        }
        if self.eat_keyword(Keyword::Add) {
            let if_not_exists = self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
            let mut partitions = vec![self.parse_partition_location()?];
            while self.check_keyword(Keyword::Partition) {
                partitions.push(self.parse_partition_location()?);
            }
            return Ok(StatementKind::AddTablePartition {
                table,
                if_not_exists,
                partitions,
            });
        }
        if self.eat_keyword(Keyword::Drop) {
            let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
            let partitions = self.parse_comma_separated(Self::parse_non_optional_partition_spec)?;
            let purge = self.eat_keyword(Keyword::Purge);
            return Ok(StatementKind::DropTablePartitions {
                table,
                if_exists,
                partitions,
                purge,
            });
        }
        if self.eat_keywords(&[Keyword::Recover, Keyword::Partitions]) {
            return Ok(StatementKind::RecoverPartitions { table });
        }

        let partition_at = self.current().clone();
        let partition = self.parse_optional_partition_spec()?;

        if let Some(from) = &partition {
            if self.eat_keywords(&[Keyword::Rename, Keyword::To]) {
                let from = Self::require_partition_values(from.clone(), &partition_at)?;
                let to = self.parse_non_optional_partition_spec()?;
                return Ok(StatementKind::RenameTablePartition { table, from, to });
            }
        }

        if self.eat_keyword(Keyword::Change) {
            self.eat_keyword(Keyword::Column);
            let column = self.parse_identifier()?;
            let new_column = self.parse_column_def()?;
            let has_position = if self.eat_keyword(Keyword::First) {
                true
            } else if self.eat_keyword(Keyword::After) {
                self.parse_identifier()?;
                true
            } else {
                false
            };
            if partition.is_some() {
                return Err(ParseError::unsupported(
                    "ALTER TABLE table PARTITION partition_spec CHANGE COLUMN",
                    alter,
                ));
            }
            if has_position {
                return Err(ParseError::unsupported(
                    "ALTER TABLE table [PARTITION partition_spec] CHANGE COLUMN ... FIRST | AFTER otherCol",
                    alter,
                ));
            }
            return Ok(StatementKind::ChangeColumn {
                table,
                column,
                new_column,
            });
        }

        if self.check_keyword(Keyword::Set)
            && matches!(
                self.peek_keyword(1),
                Some(Keyword::Serde | Keyword::Serdeproperties | Keyword::Location)
            )
        {
            self.bump();
            let partition = partition
                .map(|spec| Self::require_partition_values(spec, &partition_at))
                .transpose()?;
            if self.eat_keyword(Keyword::Location) {
                let location = self.parse_string()?;
                return Ok(StatementKind::SetTableLocation {
                    table,
                    partition,
                    location,
                });
            }
            let (serde, properties) = if self.eat_keyword(Keyword::Serde) {
                let class = self.parse_string()?;
                let properties = if self.eat_keywords(&[Keyword::With, Keyword::Serdeproperties]) {
                    self.parse_property_list_with_values()?
                } else {
                    Vec::new()
                };
                (Some(class), properties)
            } else {
                self.expect_keyword(Keyword::Serdeproperties)?;
                (None, self.parse_property_list_with_values()?)
            };
            return Ok(StatementKind::SetTableSerDe {
                table,
                partition,
                serde,
                properties,
            });
        }

        Err(self.error_here())
    }

    /// `PARTITION (...) [LOCATION 'path']`
    fn parse_partition_location(&mut self) -> Result<PartitionLocation, ParseError> {
        let spec = self.parse_non_optional_partition_spec()?;
        let location = if self.eat_keyword(Keyword::Location) {
            Some(self.parse_string()?)
        } else {
            None
        };
        Ok(PartitionLocation { spec, location })
    }

    /// `DROP TABLE [IF EXISTS] t [PURGE]` / `DROP VIEW [IF EXISTS] v`
    pub(super) fn parse_drop_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Drop)?;
        let is_view = match self.eat_one_of(&[Keyword::Table, Keyword::View]) {
            Some(kw) => kw == Keyword::View,
            None => return Err(self.error_here()),
        };
        let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
        let table = self.parse_table_identifier()?;
        let purge = !is_view && self.eat_keyword(Keyword::Purge);
        Ok(StatementKind::DropTable {
            table,
            if_exists,
            is_view,
            purge,
        })
    }

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    /// `CREATE [OR REPLACE] [[GLOBAL] TEMPORARY] VIEW ...`
    ///
    /// Temporary views may instead be backed by a data source with
    /// `USING provider`.
    pub(super) fn parse_create_view(&mut self) -> Result<StatementKind, ParseError> {
        let create = self.expect_keyword(Keyword::Create)?;
        let replace = self.eat_keywords(&[Keyword::Or, Keyword::Replace]);
        let global = self.eat_keyword(Keyword::Global);
        let temporary = if global {
            self.expect_keyword(Keyword::Temporary)?;
            true
        } else {
            self.eat_keyword(Keyword::Temporary)
        };
        self.expect_keyword(Keyword::View)?;
        let if_not_exists = self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        let name = self.parse_table_identifier()?;

        if temporary && !if_not_exists {
            let using = self.attempt(|p| {
                let columns = if p.check(&TokenKind::LeftParen) {
                    p.parse_parenthesized_columns()?
                } else {
                    Vec::new()
                };
                p.expect_keyword(Keyword::Using)?;
                let provider = p.parse_qualified_name()?;
                let options = if p.eat_keyword(Keyword::Options) {
                    p.parse_property_list_with_values()?
                } else {
                    Vec::new()
                };
                Ok((columns, provider, options))
            })?;
            if let Some((columns, provider, options)) = using {
                return Ok(StatementKind::CreateTempViewUsing {
                    replace,
                    global,
                    name,
                    columns,
                    provider,
                    options,
                });
            }
        }

        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_parenthesized_list(|p| {
                let name = p.parse_identifier()?;
                let comment = if p.eat_keyword(Keyword::Comment) {
                    Some(p.parse_string()?)
                } else {
                    None
                };
                Ok(ViewColumn { name, comment })
            })?
        } else {
            Vec::new()
        };

        let mut clauses = ClauseSet::default();
        let mut comment = None;
        let mut partitioned_on = false;
        let mut properties = Vec::new();
        loop {
            let at = self.current().clone();
            if self.eat_keyword(Keyword::Comment) {
                clauses.record(self, "COMMENT", &at)?;
                comment = Some(self.parse_string()?);
            } else if self.eat_keywords(&[Keyword::Partitioned, Keyword::On]) {
                clauses.record(self, "PARTITIONED ON", &at)?;
                self.parse_identifier_list()?;
                partitioned_on = true;
            } else if self.eat_keyword(Keyword::Tblproperties) {
                clauses.record(self, "TBLPROPERTIES", &at)?;
                properties = self.parse_property_list_with_values()?;
            } else {
                break;
            }
        }
        self.expect_keyword(Keyword::As)?;
        let query = self.parse_query()?;

        if partitioned_on {
            return Err(ParseError::unsupported("CREATE VIEW ... PARTITIONED ON", &create));
        }

        Ok(StatementKind::CreateView(Box::new(CreateView {
            replace,
            temporary,
            global,
            if_not_exists,
            name,
            columns,
            comment,
            properties,
            query: Box::new(query),
        })))
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    /// `CREATE [OR REPLACE] [TEMPORARY] FUNCTION [IF NOT EXISTS] name
    /// AS 'class' [USING JAR|FILE|ARCHIVE 'uri', ...]`
    pub(super) fn parse_create_function(&mut self) -> Result<StatementKind, ParseError> {
        let create = self.expect_keyword(Keyword::Create)?;
        let replace = self.eat_keywords(&[Keyword::Or, Keyword::Replace]);
        let temporary = self.eat_keyword(Keyword::Temporary);
        self.expect_keyword(Keyword::Function)?;
        let if_not_exists = self.eat_keywords(&[Keyword::If, Keyword::Not, Keyword::Exists]);
        let name = self.parse_function_identifier()?;
        self.expect_keyword(Keyword::As)?;
        let class_name = self.parse_string()?;
        let resources = if self.eat_keyword(Keyword::Using) {
            self.parse_comma_separated(Self::parse_function_resource)?
        } else {
            Vec::new()
        };

        if replace && if_not_exists {
            return Err(self.syntax_error_at(
                "CREATE FUNCTION with both IF NOT EXISTS and REPLACE is not allowed.",
                &create,
            ));
        }
        if temporary && if_not_exists {
            return Err(self.syntax_error_at(
                "It is not allowed to define a TEMPORARY function with IF NOT EXISTS.",
                &create,
            ));
        }
        if let (true, Some(database)) = (temporary, &name.database) {
            return Err(self.syntax_error_at(
                format!(
                    "Specifying a database in CREATE TEMPORARY FUNCTION is not allowed: '{}'",
                    database.value()
                ),
                &create,
            ));
        }

        Ok(StatementKind::CreateFunction {
            replace,
            temporary,
            if_not_exists,
            name,
            class_name,
            resources,
        })
    }

    /// `JAR|FILE|ARCHIVE 'uri'`
    fn parse_function_resource(&mut self) -> Result<FunctionResource, ParseError> {
        let at = self.current().clone();
        let kind = self.parse_identifier()?;
        let resource_type = match kind.value().to_ascii_lowercase().as_str() {
            "jar" => FunctionResourceType::Jar,
            "file" => FunctionResourceType::File,
            "archive" => FunctionResourceType::Archive,
            other => {
                return Err(ParseError::unsupported(
                    format!("CREATE FUNCTION with resource type '{other}'"),
                    &at,
                ));
            }
        };
        let uri = self.parse_string()?;
        Ok(FunctionResource { resource_type, uri })
    }

    /// `DROP [TEMPORARY] FUNCTION [IF EXISTS] name`
    pub(super) fn parse_drop_function(&mut self) -> Result<StatementKind, ParseError> {
        let drop = self.expect_keyword(Keyword::Drop)?;
        let temporary = self.eat_keyword(Keyword::Temporary);
        self.expect_keyword(Keyword::Function)?;
        let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
        let name = self.parse_function_identifier()?;
        if let (true, Some(database)) = (temporary, &name.database) {
            return Err(self.syntax_error_at(
                format!(
                    "Specifying a database in DROP TEMPORARY FUNCTION is not allowed: '{}'",
                    database.value()
                ),
                &drop,
            ));
        }
        Ok(StatementKind::DropFunction {
            temporary,
            if_exists,
            name,
        })
    }
}
