//! Tests for the nesting depth limit.
//!
//! Deep inputs run on a thread with a generous stack so that the limit,
//! not the host stack, decides the outcome.

use std::thread;
use std::time::{Duration, Instant};

use oxide_spark_sql::config::DEFAULT_MAX_DEPTH;
use oxide_spark_sql::{
    parse_data_type, parse_data_type_with, parse_expression, parse_statement,
    parse_statement_with, ParseError, ParserConfig,
};

const STACK_SIZE: usize = 256 * 1024 * 1024;

fn with_large_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    thread::Builder::new()
        .stack_size(STACK_SIZE)
        .spawn(f)
        .expect("spawn parser thread")
        .join()
        .expect("parser thread panicked")
}

fn nested_parens(depth: usize) -> String {
    format!("SELECT {}1{}", "(".repeat(depth), ")".repeat(depth))
}

fn nested_subqueries(depth: usize) -> String {
    format!(
        "SELECT * FROM {}t{}",
        "(SELECT * FROM ".repeat(depth),
        ")".repeat(depth)
    )
}

#[test]
fn moderate_nesting_parses() {
    let result = with_large_stack(|| parse_statement(&nested_parens(20)));
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn deep_parentheses_hit_the_limit() {
    let err = with_large_stack(|| parse_statement(&nested_parens(200))).unwrap_err();
    let ParseError::RecursionLimitExceeded { limit, position } = err else {
        panic!("Expected recursion limit, got {err:?}");
    };
    assert_eq!(limit, DEFAULT_MAX_DEPTH);
    assert_eq!(position.line, 1);
}

#[test]
fn deep_subqueries_hit_the_limit() {
    let err = with_large_stack(|| parse_statement(&nested_subqueries(100))).unwrap_err();
    assert!(
        matches!(err, ParseError::RecursionLimitExceeded { .. }),
        "{err:?}"
    );
}

#[test]
fn deep_data_types_hit_the_limit() {
    let sql = format!("{}int{}", "array<".repeat(100), ">".repeat(100));
    let err = with_large_stack(move || parse_data_type(&sql)).unwrap_err();
    assert!(matches!(err, ParseError::RecursionLimitExceeded { .. }));

    let shallow = parse_data_type_with("array<array<int>>", ParserConfig::new().with_max_depth(3));
    assert!(shallow.is_ok());
}

#[test]
fn lower_limit_is_honored() {
    let config = ParserConfig::new().with_max_depth(8);
    assert!(parse_statement_with("SELECT (1)", config).is_ok());
    let err = parse_statement_with(&nested_parens(10), config).unwrap_err();
    assert!(matches!(
        err,
        ParseError::RecursionLimitExceeded { limit: 8, .. }
    ));
}

#[test]
fn raised_limit_accepts_deeper_input() {
    let config = ParserConfig::new().with_max_depth(500);
    let result = with_large_stack(move || parse_statement_with(&nested_parens(200), config));
    assert!(result.is_ok(), "{result:?}");
}

#[test]
fn limit_error_is_not_retried_as_legacy_command() {
    let sql = format!("EXPLAIN {}", nested_parens(200));
    let err = with_large_stack(move || parse_statement(&sql)).unwrap_err();
    assert!(err.is_fatal());
    assert!(matches!(err, ParseError::RecursionLimitExceeded { .. }));
}

fn assert_limit_hit(sql: String) {
    let result = with_large_stack(move || parse_expression(&sql));
    assert!(
        matches!(result, Err(ParseError::RecursionLimitExceeded { .. })),
        "{result:?}"
    );
}

fn wrap(open: &str, inner: &str, close: &str, depth: usize) -> String {
    format!("{}{inner}{}", open.repeat(depth), close.repeat(depth))
}

#[test]
fn deep_subscripts_hit_the_limit() {
    assert!(parse_expression(&wrap("a[", "0", "]", 3)).is_ok());
    assert_limit_hit(wrap("a[", "0", "]", 200));
}

#[test]
fn deep_position_and_extract_hit_the_limit() {
    assert!(parse_expression(&wrap("position(", "a", " IN b)", 3)).is_ok());
    assert_limit_hit(wrap("position(", "a", " IN b)", 200));
    assert_limit_hit(wrap("extract(YEAR FROM ", "d", ")", 200));
}

#[test]
fn deep_first_last_case_and_calls_hit_the_limit() {
    assert_limit_hit(wrap("first(", "x", ", 1)", 200));
    assert_limit_hit(wrap("last(", "x", " IGNORE NULLS)", 200));
    assert_limit_hit(wrap("CASE WHEN ", "x", " THEN 1 END", 200));
    assert_limit_hit(wrap("f(", "1", ")", 200));
    assert_limit_hit(wrap("x -> ", "x", "", 200));
}

#[test]
fn very_deep_subscripts_stop_at_the_limit() {
    let sql = wrap("a[", "0", "]", 20_000);
    let result = thread::Builder::new()
        .stack_size(32 * 1024 * 1024)
        .spawn(move || parse_expression(&sql).is_err())
        .expect("spawn parser thread")
        .join()
        .expect("parser thread panicked");
    assert!(result);
}

#[test]
fn nested_first_calls_parse_in_one_pass() {
    let sql = wrap("first(", "x", ", 1)", 30);
    let started = Instant::now();
    let result = with_large_stack(move || parse_expression(&sql));
    assert!(result.is_ok(), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn nested_position_calls_parse_in_one_pass() {
    let sql = wrap("position(", "a", ", 1)", 30);
    let started = Instant::now();
    let result = with_large_stack(move || parse_expression(&sql));
    assert!(result.is_ok(), "{result:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}
