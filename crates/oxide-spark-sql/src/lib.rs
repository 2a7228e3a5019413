//! # oxide-spark-sql
//!
//! A parser for the Spark SQL dialect with Hive extensions.
//!
//! This crate provides:
//! - A lexer for the dialect's token vocabulary
//! - A recursive descent parser with Pratt expression parsing
//! - A typed AST for queries, DDL and session commands
//! - Recognition of legacy Hive commands that are valid but unsupported
//!
//! ## Parsing
//!
//! ```rust
//! use oxide_spark_sql::{parse_statement, StatementKind};
//!
//! let statement = parse_statement("CREATE TABLE t (a INT) USING parquet").unwrap();
//! assert!(matches!(statement.kind, StatementKind::CreateTable(_)));
//! ```
//!
//! ## Unsupported commands
//!
//! Commands the dialect knows but does not support are distinguished from
//! malformed input:
//!
//! ```rust
//! use oxide_spark_sql::{parse_statement, ParseError};
//!
//! let err = parse_statement("START TRANSACTION").unwrap_err();
//! assert!(matches!(
//!     err,
//!     ParseError::UnsupportedStatement { ref command, .. } if command == "START TRANSACTION"
//! ));
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use oxide_spark_sql::{parse_statement_with, ParserConfig};
//!
//! let config = ParserConfig::new().with_legacy_setops_precedence(true);
//! let sql = "SELECT 1 UNION SELECT 2 INTERSECT SELECT 3";
//! let statement = parse_statement_with(sql, config).unwrap();
//! assert!(statement.as_query().is_some());
//! ```

pub mod ast;
pub mod config;
pub mod lexer;
pub mod parser;

pub use ast::{Expr, Query, Statement, StatementKind};
pub use config::ParserConfig;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::{
    parse_data_type, parse_data_type_with, parse_expression, parse_expression_with,
    parse_function_identifier, parse_function_identifier_with, parse_qualified_name,
    parse_qualified_name_with, parse_statement, parse_statement_with, parse_table_identifier,
    parse_table_identifier_with, parse_table_schema, parse_table_schema_with, ParseError,
    Parser, Position,
};
