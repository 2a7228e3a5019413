//! Spark SQL parser.
//!
//! A hand-written recursive descent parser. Values are parsed with a Pratt
//! loop, set operations by precedence climbing, and statements through a
//! route table keyed on their leading keywords. Recognized Hive commands
//! that are deliberately unsupported are reported as
//! [`ParseError::UnsupportedStatement`].
//!
//! Each entry point parses exactly one construct and requires the end of
//! input; trailing semicolons are accepted after a statement.
//!
//! ```
//! use oxide_spark_sql::parser::parse_statement;
//!
//! let statement = parse_statement("SELECT a FROM t WHERE b > 1").unwrap();
//! assert!(statement.as_query().is_some());
//! ```

mod admin;
mod clauses;
mod cursor;
mod ddl;
mod error;
mod expression;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod query;
mod route;
mod statement;
mod types;
mod unsupported;

pub use cursor::{Checkpoint, TokenCursor};
pub use error::{ParseError, Position};
pub use parser::Parser;

use crate::ast::{
    ColumnDef, DataType, FunctionIdentifier, NamedExpr, QualifiedName, Statement, TableIdentifier,
};
use crate::config::ParserConfig;

/// Parses one statement with the default configuration.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a single valid statement.
pub fn parse_statement(sql: &str) -> Result<Statement, ParseError> {
    parse_statement_with(sql, ParserConfig::default())
}

/// Parses one statement with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a single valid statement.
pub fn parse_statement_with(sql: &str, config: ParserConfig) -> Result<Statement, ParseError> {
    Parser::with_config(sql, config).parse_single_statement()
}

/// Parses one named expression with the default configuration.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a single expression.
pub fn parse_expression(sql: &str) -> Result<NamedExpr, ParseError> {
    parse_expression_with(sql, ParserConfig::default())
}

/// Parses one named expression with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a single expression.
pub fn parse_expression_with(sql: &str, config: ParserConfig) -> Result<NamedExpr, ParseError> {
    Parser::with_config(sql, config).parse_single_expression()
}

/// Parses `[db.]table`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a table identifier.
pub fn parse_table_identifier(sql: &str) -> Result<TableIdentifier, ParseError> {
    parse_table_identifier_with(sql, ParserConfig::default())
}

/// Parses `[db.]table` with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a table identifier.
pub fn parse_table_identifier_with(
    sql: &str,
    config: ParserConfig,
) -> Result<TableIdentifier, ParseError> {
    Parser::with_config(sql, config).parse_single_table_identifier()
}

/// Parses `[db.]function`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a function identifier.
pub fn parse_function_identifier(sql: &str) -> Result<FunctionIdentifier, ParseError> {
    parse_function_identifier_with(sql, ParserConfig::default())
}

/// Parses `[db.]function` with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a function identifier.
pub fn parse_function_identifier_with(
    sql: &str,
    config: ParserConfig,
) -> Result<FunctionIdentifier, ParseError> {
    Parser::with_config(sql, config).parse_single_function_identifier()
}

/// Parses a dotted name such as `a.b.c`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a qualified name.
pub fn parse_qualified_name(sql: &str) -> Result<QualifiedName, ParseError> {
    parse_qualified_name_with(sql, ParserConfig::default())
}

/// Parses a dotted name with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a qualified name.
pub fn parse_qualified_name_with(
    sql: &str,
    config: ParserConfig,
) -> Result<QualifiedName, ParseError> {
    Parser::with_config(sql, config).parse_single_qualified_name()
}

/// Parses a data type such as `map<string, array<int>>`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a supported data type.
pub fn parse_data_type(sql: &str) -> Result<DataType, ParseError> {
    parse_data_type_with(sql, ParserConfig::default())
}

/// Parses a data type with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a supported data type.
pub fn parse_data_type_with(sql: &str, config: ParserConfig) -> Result<DataType, ParseError> {
    Parser::with_config(sql, config).parse_single_data_type()
}

/// Parses a column list such as `a INT, b STRING COMMENT 'x'`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a column list.
pub fn parse_table_schema(sql: &str) -> Result<Vec<ColumnDef>, ParseError> {
    parse_table_schema_with(sql, ParserConfig::default())
}

/// Parses a column list with `config`.
///
/// # Errors
///
/// Returns a `ParseError` if `sql` is not a column list.
pub fn parse_table_schema_with(
    sql: &str,
    config: ParserConfig,
) -> Result<Vec<ColumnDef>, ParseError> {
    Parser::with_config(sql, config).parse_single_table_schema()
}
