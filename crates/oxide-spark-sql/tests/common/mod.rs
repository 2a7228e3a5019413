#![allow(dead_code)]

use oxide_spark_sql::ast::{
    Expr, ExprKind, Query, QueryBody, QueryPrimary, QuerySpecification, QueryTerm, SelectSpec,
    StatementKind,
};
use oxide_spark_sql::{parse_expression, parse_statement, parse_statement_with, ParseError};
use oxide_spark_sql::{ParserConfig, Statement};

pub fn parse(sql: &str) -> Statement {
    parse_statement(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_with(sql: &str, config: ParserConfig) -> Statement {
    parse_statement_with(sql, config)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_statement(sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_kind(sql: &str) -> StatementKind {
    parse(sql).kind
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql).kind {
        StatementKind::Query(query) => *query,
        other => panic!("Expected query, got {other:?}"),
    }
}

pub fn parse_expr(sql: &str) -> Expr {
    let named =
        parse_expression(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    assert!(named.alias.is_none(), "unexpected alias in {sql}");
    named.expr
}

/// Returns the `SELECT` of a query made of a single specification.
pub fn select_of(query: &Query) -> &SelectSpec {
    let QueryBody::Single { term, .. } = &query.body else {
        panic!("Expected single-insert body, got {:?}", query.body);
    };
    let QueryTerm::Primary(primary) = term else {
        panic!("Expected query primary, got {term:?}");
    };
    match primary.as_ref() {
        QueryPrimary::Specification(QuerySpecification::Select(spec)) => spec,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> SelectSpec {
    select_of(&parse_query(sql)).clone()
}

/// Returns the projected expressions of a simple `SELECT`.
pub fn projection(sql: &str) -> Vec<Expr> {
    parse_select(sql)
        .projection
        .unwrap_or_default()
        .into_iter()
        .map(|named| named.expr)
        .collect()
}

/// Returns the syntax-error message, panicking on any other error kind.
pub fn syntax_message(sql: &str) -> String {
    match parse_err(sql) {
        ParseError::Syntax { message, .. } => message,
        other => panic!("Expected syntax error for: {sql}\nGot: {other:?}"),
    }
}

/// Returns the unsupported command text, panicking on any other error kind.
pub fn unsupported_command(sql: &str) -> String {
    match parse_err(sql) {
        ParseError::UnsupportedStatement { command, .. } => command,
        other => panic!("Expected unsupported statement for: {sql}\nGot: {other:?}"),
    }
}

pub fn column_name(expr: &Expr) -> &str {
    match &expr.kind {
        ExprKind::Column(ident) => ident.value(),
        other => panic!("Expected column, got {other:?}"),
    }
}
