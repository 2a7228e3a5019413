//! Tests for diagnostics: expected sets, positions and rendering.

mod common;

use common::*;
use oxide_spark_sql::{parse_expression, parse_statement, ParseError};

#[test]
fn syntax_error_reports_found_token_and_position() {
    let err = parse_err("SELECT a,\n  b\nFROM t\nWHERE )");
    let ParseError::Syntax {
        found, position, ..
    } = &err
    else {
        panic!("Expected syntax error, got {err:?}");
    };
    assert_eq!(found, "')'");
    assert_eq!(position.line, 4);
    assert_eq!(position.column, 7);
    assert!(err.to_string().ends_with("at line 4, column 7"));
}

#[test]
fn expected_set_lists_alternatives() {
    let err = parse_err("SELECT (1 2");
    let expected = err.expected_tokens();
    assert!(expected.contains(&String::from("')'")), "{expected:?}");
    assert!(expected.contains(&String::from("','")), "{expected:?}");
    let message = err.to_string();
    assert!(message.starts_with("Syntax error: expected "), "{message}");
    assert!(message.contains("found number 2"), "{message}");
}

#[test]
fn expected_set_has_no_duplicates() {
    let err = parse_err("SELECT (1 2");
    let expected = err.expected_tokens();
    for (i, item) in expected.iter().enumerate() {
        assert!(!expected[i + 1..].contains(item), "duplicate {item} in {expected:?}");
    }
}

#[test]
fn trailing_input_expects_end() {
    let err = parse_err("SELECT 1 2");
    assert!(err
        .expected_tokens()
        .contains(&String::from("end of input")));
    assert_eq!(err.position().column, 10);
}

#[test]
fn end_of_input_inside_construct() {
    let err = parse_err("SELECT a FROM");
    assert!(
        matches!(err, ParseError::UnexpectedEndOfInput { .. }),
        "{err:?}"
    );
    assert!(!err.expected_tokens().is_empty());
    assert!(err.to_string().starts_with("unexpected end of input at line 1"));
}

#[test]
fn unclosed_parenthesis_expects_close() {
    let err = parse_statement("SELECT (1").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    assert!(err.expected_tokens().contains(&String::from("')'")));
}

#[test]
fn empty_input_expects_statement() {
    let err = parse_err("");
    assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    assert!(err.expected_tokens().contains(&String::from("statement")));
}

#[test]
fn lexer_errors_surface_as_invalid_tokens() {
    let err = parse_err("SELECT 'abc");
    let ParseError::InvalidToken { message, position } = &err else {
        panic!("Expected invalid token, got {err:?}");
    };
    assert_eq!(message, "Unterminated string literal");
    assert_eq!(position.column, 8);
    assert!(!err.is_fatal());

    assert!(matches!(
        parse_err("SELECT a FROM t WHERE a = #"),
        ParseError::InvalidToken { .. }
    ));
    assert!(matches!(
        parse_err("SELECT 1 /* open comment"),
        ParseError::InvalidToken { .. }
    ));
}

#[test]
fn custom_message_keeps_position() {
    let err = parse_err("SELECT a FROM t TABLESAMPLE ()");
    let ParseError::Syntax { position, .. } = &err else {
        panic!("Expected syntax error, got {err:?}");
    };
    assert_eq!(position.line, 1);
}

#[test]
fn expression_entry_point_errors() {
    let err = parse_expression("a +").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    let err = parse_expression("a b c").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn errors_serialize_to_json() {
    let err = parse_err("COMMIT");
    let json = serde_json::to_value(&err).expect("serialize");
    let command = &json["UnsupportedStatement"]["command"];
    assert_eq!(command, "COMMIT");
    assert_eq!(json["UnsupportedStatement"]["position"]["line"], 1);
}
