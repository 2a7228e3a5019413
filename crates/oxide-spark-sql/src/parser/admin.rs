//! Catalog, cache, resource and session statement builders.

use super::error::ParseError;
use super::Parser;
use crate::ast::{
    AnalyzeMode, DescribeFunctionName, DescribeOption, FunctionPattern, FunctionScope, Ident,
    ResourceOp, ResourceType, SetCommand, StatementKind,
};
use crate::lexer::{Keyword, Token, TokenKind};

/// Characters not allowed in an unquoted `REFRESH` path.
const FORBIDDEN_PATH_CHARS: [char; 4] = [' ', '\n', '\r', '\t'];

impl Parser {
    /// `USE db`
    pub(super) fn parse_use(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Use)?;
        let database = self.parse_identifier()?;
        Ok(StatementKind::Use { database })
    }

    /// `ANALYZE TABLE t [PARTITION (...)] COMPUTE STATISTICS
    /// [NOSCAN | FOR COLUMNS a, b]`
    pub(super) fn parse_analyze(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Analyze, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        let partition = self.parse_optional_partition_spec()?;
        self.expect_keywords(&[Keyword::Compute, Keyword::Statistics])?;

        let mode = if self.eat_keywords(&[Keyword::For, Keyword::Columns]) {
            AnalyzeMode::Columns(self.parse_identifier_seq()?)
        } else if self.check_identifier() {
            let at = self.current().clone();
            let option = self.parse_identifier()?;
            if !option.value().eq_ignore_ascii_case("noscan") {
                return Err(self.syntax_error_at(
                    format!("Expected `NOSCAN` instead of `{}`", option.value()),
                    &at,
                ));
            }
            AnalyzeMode::NoScan
        } else {
            AnalyzeMode::Full
        };

        Ok(StatementKind::Analyze {
            table,
            partition,
            mode,
        })
    }

    // ------------------------------------------------------------------
    // SHOW
    // ------------------------------------------------------------------

    fn parse_optional_database_qualifier(&mut self) -> Result<Option<Ident>, ParseError> {
        if self.eat_one_of(&[Keyword::From, Keyword::In]).is_some() {
            self.parse_identifier().map(Some)
        } else {
            Ok(None)
        }
    }

    /// `[LIKE] 'pattern'`, if present.
    fn parse_optional_like_pattern(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::Like) {
            self.parse_string().map(Some)
        } else {
            self.parse_optional_string()
        }
    }

    /// `SHOW TABLES [FROM|IN db] [[LIKE] 'pattern']`
    pub(super) fn parse_show_tables(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Tables])?;
        let database = self.parse_optional_database_qualifier()?;
        let pattern = self.parse_optional_like_pattern()?;
        Ok(StatementKind::ShowTables { database, pattern })
    }

    /// `SHOW TABLE EXTENDED [FROM|IN db] LIKE 'pattern' [PARTITION (...)]`
    pub(super) fn parse_show_table_extended(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Table, Keyword::Extended])?;
        let database = self.parse_optional_database_qualifier()?;
        self.expect_keyword(Keyword::Like)?;
        let pattern = self.parse_string()?;
        let partition = self.parse_optional_complete_partition_spec()?;
        Ok(StatementKind::ShowTableExtended {
            database,
            pattern,
            partition,
        })
    }

    /// `SHOW DATABASES [[LIKE] 'pattern']`
    pub(super) fn parse_show_databases(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Databases])?;
        let pattern = self.parse_optional_like_pattern()?;
        Ok(StatementKind::ShowDatabases { pattern })
    }

    /// `SHOW TBLPROPERTIES t [(key)]`
    pub(super) fn parse_show_tblproperties(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Tblproperties])?;
        let table = self.parse_table_identifier()?;
        let key = if self.eat(&TokenKind::LeftParen) {
            let key = self.parse_property_key()?;
            self.expect(&TokenKind::RightParen)?;
            Some(key)
        } else {
            None
        };
        Ok(StatementKind::ShowTblProperties { table, key })
    }

    /// `SHOW COLUMNS (FROM|IN) t [(FROM|IN) db]`
    ///
    /// A database given both ways must name the same database.
    pub(super) fn parse_show_columns(&mut self) -> Result<StatementKind, ParseError> {
        let show = self.expect_keyword(Keyword::Show)?;
        self.expect_keyword(Keyword::Columns)?;
        if self.eat_one_of(&[Keyword::From, Keyword::In]).is_none() {
            return Err(self.error_here());
        }
        let table = self.parse_table_identifier()?;
        let database = self.parse_optional_database_qualifier()?;

        if let (Some(db), Some(table_db)) = (&database, &table.database) {
            if !db.eq_ignore_case(table_db.value()) {
                return Err(self.syntax_error_at(
                    format!(
                        "SHOW COLUMNS with conflicting databases: '{}' != '{}'",
                        db.value(),
                        table_db.value()
                    ),
                    &show,
                ));
            }
        }
        Ok(StatementKind::ShowColumns { table, database })
    }

    /// `SHOW PARTITIONS t [PARTITION (...)]`
    pub(super) fn parse_show_partitions(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Partitions])?;
        let table = self.parse_table_identifier()?;
        let partition = self.parse_optional_complete_partition_spec()?;
        Ok(StatementKind::ShowPartitions { table, partition })
    }

    /// `SHOW CREATE TABLE t`
    pub(super) fn parse_show_create_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Show, Keyword::Create, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        Ok(StatementKind::ShowCreateTable { table })
    }

    /// `SHOW [ALL|USER|SYSTEM] FUNCTIONS [[LIKE] name | 'pattern']`
    pub(super) fn parse_show_functions(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Show)?;
        let scope = if self.check_keyword(Keyword::Functions) {
            None
        } else {
            let at = self.current().clone();
            let name = self.parse_identifier()?;
            let scope = match name.value().to_ascii_lowercase().as_str() {
                "all" => FunctionScope::All,
                "user" => FunctionScope::User,
                "system" => FunctionScope::System,
                _ => {
                    return Err(self.syntax_error_at(
                        format!("SHOW {} FUNCTIONS not supported", name.value()),
                        &at,
                    ));
                }
            };
            Some(scope)
        };
        self.expect_keyword(Keyword::Functions)?;

        let like = self.eat_keyword(Keyword::Like);
        let pattern = if self.check_string() {
            Some(FunctionPattern::String(self.parse_string()?))
        } else if like || self.check_identifier() {
            Some(FunctionPattern::Name(self.parse_qualified_name()?))
        } else {
            None
        };
        Ok(StatementKind::ShowFunctions { scope, pattern })
    }

    // ------------------------------------------------------------------
    // DESCRIBE
    // ------------------------------------------------------------------

    fn expect_describe(&mut self) -> Result<Token, ParseError> {
        if self.check_keyword(Keyword::Desc) || self.check_keyword(Keyword::Describe) {
            Ok(self.bump())
        } else {
            Err(self.error_here())
        }
    }

    /// Consumes `keyword` when an identifier follows it, so that the
    /// keyword can still be the name itself.
    fn eat_keyword_before_identifier(&mut self, keyword: Keyword) -> bool {
        if self.peek_keyword(0) == Some(keyword) && Self::is_identifier_token(self.peek(1), false) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// `DESC FUNCTION [EXTENDED] (name | 'name' | operator)`
    pub(super) fn parse_describe_function(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_describe()?;
        self.expect_keyword(Keyword::Function)?;
        let extended = self.peek_keyword(0) == Some(Keyword::Extended)
            && !matches!(self.peek(1).kind, TokenKind::Eof | TokenKind::Semicolon);
        if extended {
            self.bump();
        }

        let function = if self.check_string() {
            DescribeFunctionName::String(self.parse_string()?)
        } else if self.check_identifier() {
            DescribeFunctionName::Qualified(self.parse_qualified_name()?)
        } else if is_operator(&self.current().kind) {
            DescribeFunctionName::Operator(self.bump().lexeme)
        } else {
            self.expecting("operator");
            return Err(self.error_here());
        };
        Ok(StatementKind::DescribeFunction { extended, function })
    }

    /// `DESC DATABASE [EXTENDED] db`
    pub(super) fn parse_describe_database(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_describe()?;
        self.expect_keyword(Keyword::Database)?;
        let extended = self.eat_keyword_before_identifier(Keyword::Extended);
        let database = self.parse_identifier()?;
        Ok(StatementKind::DescribeDatabase { extended, database })
    }

    /// `DESC [TABLE] [EXTENDED|FORMATTED] t [PARTITION (...)] [col]`
    pub(super) fn parse_describe_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_describe()?;
        self.eat_keyword_before_identifier(Keyword::Table);
        let option = if self.eat_keyword_before_identifier(Keyword::Extended) {
            Some(DescribeOption::Extended)
        } else if self.eat_keyword_before_identifier(Keyword::Formatted) {
            Some(DescribeOption::Formatted)
        } else {
            None
        };
        let table = self.parse_table_identifier()?;

        let partition_at = self.current().clone();
        let partition = self.parse_optional_partition_spec()?;
        if let Some(spec) = &partition {
            if let Some(missing) = spec.values.iter().find(|v| v.value.is_none()) {
                return Err(self.syntax_error_at(
                    format!(
                        "PARTITION specification is incomplete: `{}`",
                        missing.column.value()
                    ),
                    &partition_at,
                ));
            }
        }

        let column_at = self.current().clone();
        let column = if self.check_identifier() {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        if partition.is_some() && column.is_some() {
            return Err(self.syntax_error_at(
                "DESC TABLE COLUMN for a specific partition is not supported",
                &column_at,
            ));
        }

        Ok(StatementKind::DescribeTable {
            option,
            table,
            partition,
            column,
        })
    }

    // ------------------------------------------------------------------
    // REFRESH and cache
    // ------------------------------------------------------------------

    /// `REFRESH TABLE t`
    pub(super) fn parse_refresh_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Refresh, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        Ok(StatementKind::RefreshTable { table })
    }

    /// `REFRESH 'path'` or `REFRESH unquoted/path`
    pub(super) fn parse_refresh_resource(&mut self) -> Result<StatementKind, ParseError> {
        let refresh = self.expect_keyword(Keyword::Refresh)?;
        if matches!(self.current().kind, TokenKind::String(_))
            && matches!(self.peek(1).kind, TokenKind::Eof | TokenKind::Semicolon)
        {
            let path = self.parse_string()?;
            return Ok(StatementKind::RefreshResource { path });
        }

        let path = self.take_remainder()?;
        if path.is_empty() {
            return Err(self.syntax_error_at(
                "Resource paths cannot be empty in REFRESH statements. Use / to match everything",
                &refresh,
            ));
        }
        if path.contains(FORBIDDEN_PATH_CHARS) {
            return Err(self.syntax_error_at(
                "REFRESH statements cannot contain ' ', '\\n', '\\r', '\\t' inside unquoted resource paths",
                &refresh,
            ));
        }
        Ok(StatementKind::RefreshResource { path })
    }

    /// `CACHE [LAZY] TABLE t [OPTIONS (...)] [[AS] query]`
    pub(super) fn parse_cache_table(&mut self) -> Result<StatementKind, ParseError> {
        let cache = self.expect_keyword(Keyword::Cache)?;
        let lazy = self.eat_keyword(Keyword::Lazy);
        self.expect_keyword(Keyword::Table)?;
        let table = self.parse_table_identifier()?;
        let options = if self.eat_keyword(Keyword::Options) {
            self.parse_property_list_with_values()?
        } else {
            Vec::new()
        };
        let query = self.parse_optional_as_query()?;

        if let (Some(_), Some(database)) = (&query, &table.database) {
            return Err(self.syntax_error_at(
                format!(
                    "It is not allowed to add database prefix `{}` to the table name in CACHE TABLE AS SELECT",
                    database.value()
                ),
                &cache,
            ));
        }
        Ok(StatementKind::CacheTable {
            lazy,
            table,
            options,
            query,
        })
    }

    /// `UNCACHE TABLE [IF EXISTS] t`
    pub(super) fn parse_uncache_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Uncache, Keyword::Table])?;
        let if_exists = self.eat_keywords(&[Keyword::If, Keyword::Exists]);
        let table = self.parse_table_identifier()?;
        Ok(StatementKind::UncacheTable { if_exists, table })
    }

    pub(super) fn parse_clear_cache(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Clear, Keyword::Cache])?;
        Ok(StatementKind::ClearCache)
    }

    // ------------------------------------------------------------------
    // Table maintenance
    // ------------------------------------------------------------------

    /// `LOAD DATA [LOCAL] INPATH 'path' [OVERWRITE] INTO TABLE t [PARTITION (...)]`
    pub(super) fn parse_load_data(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Load, Keyword::Data])?;
        let local = self.eat_keyword(Keyword::Local);
        self.expect_keyword(Keyword::Inpath)?;
        let path = self.parse_string()?;
        let overwrite = self.eat_keyword(Keyword::Overwrite);
        self.expect_keywords(&[Keyword::Into, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        let partition = self.parse_optional_complete_partition_spec()?;
        Ok(StatementKind::LoadData {
            local,
            path,
            overwrite,
            table,
            partition,
        })
    }

    /// `TRUNCATE TABLE t [PARTITION (...)]`
    pub(super) fn parse_truncate_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Truncate, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        let partition = self.parse_optional_complete_partition_spec()?;
        Ok(StatementKind::TruncateTable { table, partition })
    }

    /// `MSCK REPAIR TABLE t`
    pub(super) fn parse_repair_table(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keywords(&[Keyword::Msck, Keyword::Repair, Keyword::Table])?;
        let table = self.parse_table_identifier()?;
        Ok(StatementKind::RepairTable { table })
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// `ADD FILE|JAR path...` / `LIST FILE[S]|JAR[S] [path...]`
    ///
    /// Paths are taken verbatim from the rest of the statement.
    pub(super) fn parse_manage_resource(&mut self) -> Result<StatementKind, ParseError> {
        let first = self.current().clone();
        let op = match self.eat_one_of(&[Keyword::Add, Keyword::List]) {
            Some(Keyword::Add) => ResourceOp::Add,
            Some(_) => ResourceOp::List,
            None => return Err(self.error_here()),
        };
        let kind = self.parse_identifier()?;
        let kind = kind.value().to_ascii_lowercase();
        let resource_type = match (op, kind.as_str()) {
            (ResourceOp::Add, "file") | (ResourceOp::List, "file" | "files") => ResourceType::File,
            (ResourceOp::Add, "jar") | (ResourceOp::List, "jar" | "jars") => ResourceType::Jar,
            (ResourceOp::Add, other) => {
                return Err(ParseError::unsupported(
                    format!("ADD with resource type '{other}'"),
                    &first,
                ));
            }
            (ResourceOp::List, other) => {
                return Err(ParseError::unsupported(
                    format!("LIST with resource type '{other}'"),
                    &first,
                ));
            }
        };

        let remainder = self.take_remainder()?;
        let paths = match op {
            ResourceOp::Add if remainder.is_empty() => Vec::new(),
            ResourceOp::Add => vec![remainder],
            ResourceOp::List => remainder.split_whitespace().map(str::to_string).collect(),
        };
        Ok(StatementKind::ManageResource {
            op,
            resource_type,
            paths,
        })
    }

    /// `SET`, `SET -v`, `SET key`, `SET key=value`
    pub(super) fn parse_set_configuration(&mut self) -> Result<StatementKind, ParseError> {
        let set = self.expect_keyword(Keyword::Set)?;
        let remainder = self.take_remainder()?;
        let command = match remainder.as_str() {
            "" => SetCommand::ListAll,
            "-v" => SetCommand::ListAllVerbose,
            text => match text.split_once('=') {
                Some((key, value)) => {
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(self.syntax_error_at(
                            "Expected format is 'SET', 'SET key', or 'SET key=value'. If you want to include special characters in key, please use quotes, e.g., SET `ke y`=value.",
                            &set,
                        ));
                    }
                    SetCommand::Set {
                        key: key.to_string(),
                        value: value.trim().to_string(),
                    }
                }
                None => SetCommand::Get(text.to_string()),
            },
        };
        Ok(StatementKind::SetConfiguration(command))
    }

    /// `RESET`
    pub(super) fn parse_reset_configuration(&mut self) -> Result<StatementKind, ParseError> {
        self.expect_keyword(Keyword::Reset)?;
        Ok(StatementKind::ResetConfiguration)
    }
}

/// Operator tokens accepted as a `DESCRIBE FUNCTION` target.
const fn is_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Eq
            | TokenKind::NullSafeEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Tilde
            | TokenKind::Ampersand
            | TokenKind::Pipe
            | TokenKind::Concat
            | TokenKind::Caret
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql).parse_single_statement()
    }

    fn kind(sql: &str) -> StatementKind {
        parse(sql).unwrap().kind
    }

    #[test]
    fn test_analyze_noscan() {
        assert!(matches!(
            kind("ANALYZE TABLE t COMPUTE STATISTICS noscan"),
            StatementKind::Analyze { mode: AnalyzeMode::NoScan, .. }
        ));
        let err = parse("ANALYZE TABLE t COMPUTE STATISTICS fast").unwrap_err();
        assert!(err.to_string().contains("Expected `NOSCAN` instead of `fast`"));
    }

    #[test]
    fn test_show_functions_scope() {
        assert!(matches!(
            kind("SHOW USER FUNCTIONS LIKE 'f*'"),
            StatementKind::ShowFunctions {
                scope: Some(FunctionScope::User),
                pattern: Some(FunctionPattern::String(_)),
            }
        ));
        let err = parse("SHOW OTHER FUNCTIONS").unwrap_err();
        assert!(err.to_string().contains("SHOW OTHER FUNCTIONS not supported"));
    }

    #[test]
    fn test_show_columns_conflicting_database() {
        let err = parse("SHOW COLUMNS FROM a.t IN b").unwrap_err();
        assert!(err
            .to_string()
            .contains("SHOW COLUMNS with conflicting databases: 'b' != 'a'"));
        assert!(parse("SHOW COLUMNS IN a.t FROM A").is_ok());
    }

    #[test]
    fn test_describe_keyword_names() {
        assert!(matches!(
            kind("DESC extended"),
            StatementKind::DescribeTable { option: None, .. }
        ));
        assert!(matches!(
            kind("DESCRIBE TABLE FORMATTED t"),
            StatementKind::DescribeTable { option: Some(DescribeOption::Formatted), .. }
        ));
        assert!(matches!(
            kind("DESC FUNCTION +"),
            StatementKind::DescribeFunction { function: DescribeFunctionName::Operator(ref op), .. }
                if op == "+"
        ));
    }

    #[test]
    fn test_describe_partition_rules() {
        let err = parse("DESC t PARTITION (ds)").unwrap_err();
        assert!(err
            .to_string()
            .contains("PARTITION specification is incomplete: `ds`"));
        let err = parse("DESC t PARTITION (ds = 1) c").unwrap_err();
        assert!(err
            .to_string()
            .contains("DESC TABLE COLUMN for a specific partition is not supported"));
    }

    #[test]
    fn test_refresh_paths() {
        assert!(matches!(
            kind("REFRESH /data/part-1"),
            StatementKind::RefreshResource { ref path } if path == "/data/part-1"
        ));
        assert!(parse("REFRESH").is_err());
        let err = parse("REFRESH /a b").unwrap_err();
        assert!(err.to_string().contains("cannot contain"));
    }

    #[test]
    fn test_cache_as_select_rejects_database_prefix() {
        let err = parse("CACHE TABLE db.t AS SELECT 1").unwrap_err();
        assert!(err.to_string().contains("database prefix `db`"));
        assert!(matches!(
            kind("CACHE LAZY TABLE t SELECT 1"),
            StatementKind::CacheTable { lazy: true, query: Some(_), .. }
        ));
    }

    #[test]
    fn test_manage_resource() {
        assert!(matches!(
            kind("LIST JARS a.jar b.jar"),
            StatementKind::ManageResource { op: ResourceOp::List, resource_type: ResourceType::Jar, ref paths }
                if paths.len() == 2
        ));
        let err = parse("ADD ARCHIVE x.zip").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedStatement { ref command, .. }
                if command == "ADD with resource type 'archive'"
        ));
    }

    #[test]
    fn test_set_configuration_forms() {
        assert_eq!(kind("SET"), StatementKind::SetConfiguration(SetCommand::ListAll));
        assert_eq!(
            kind("SET -v"),
            StatementKind::SetConfiguration(SetCommand::ListAllVerbose)
        );
        assert_eq!(
            kind("SET spark.sql.x = 1"),
            StatementKind::SetConfiguration(SetCommand::Set {
                key: "spark.sql.x".into(),
                value: "1".into(),
            })
        );
        assert_eq!(
            kind("SET spark.sql.x"),
            StatementKind::SetConfiguration(SetCommand::Get("spark.sql.x".into()))
        );
        assert!(parse("SET =1").is_err());
    }
}
