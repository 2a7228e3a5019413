//! Tests for set-operation chains under standard and legacy precedence.

mod common;

use common::*;
use oxide_spark_sql::ast::{Query, QueryBody, QueryPrimary, QueryTerm, SetOperator, SetQuantifier};
use oxide_spark_sql::ParserConfig;

fn term_of(query: &Query) -> &QueryTerm {
    match &query.body {
        QueryBody::Single { term, .. } => term,
        other => panic!("Expected single body, got {other:?}"),
    }
}

/// Renders a term as a parenthesized operator tree, e.g. `(a UNION (b INTERSECT c))`.
fn shape(term: &QueryTerm) -> String {
    match term {
        QueryTerm::Primary(primary) => match primary.as_ref() {
            QueryPrimary::Specification(_) => String::from("S"),
            QueryPrimary::Subquery(_) => String::from("Q"),
            QueryPrimary::Table(table) => table.table.value().to_string(),
            QueryPrimary::InlineTable(_) => String::from("V"),
        },
        QueryTerm::SetOperation {
            op, left, right, ..
        } => format!("({} {} {})", shape(left), op.as_str(), shape(right)),
    }
}

fn shape_of(sql: &str) -> String {
    shape(term_of(&parse_query(sql)))
}

fn legacy_shape_of(sql: &str) -> String {
    let config = ParserConfig::new().with_legacy_setops_precedence(true);
    let statement = parse_with(sql, config);
    shape(term_of(statement.as_query().expect("query")))
}

#[test]
fn union_is_left_associative() {
    assert_eq!(
        shape_of("TABLE a UNION TABLE b UNION TABLE c"),
        "((a UNION b) UNION c)"
    );
}

#[test]
fn intersect_binds_tighter_than_union() {
    assert_eq!(
        shape_of("TABLE a UNION TABLE b INTERSECT TABLE c"),
        "(a UNION (b INTERSECT c))"
    );
    assert_eq!(
        shape_of("TABLE a INTERSECT TABLE b UNION TABLE c"),
        "((a INTERSECT b) UNION c)"
    );
}

#[test]
fn except_and_minus_share_union_level() {
    assert_eq!(
        shape_of("TABLE a EXCEPT TABLE b UNION TABLE c MINUS TABLE d"),
        "(((a EXCEPT b) UNION c) MINUS d)"
    );
    assert_eq!(
        shape_of("TABLE a EXCEPT TABLE b INTERSECT TABLE c INTERSECT TABLE d"),
        "(a EXCEPT ((b INTERSECT c) INTERSECT d))"
    );
}

#[test]
fn legacy_precedence_is_flat() {
    assert_eq!(
        legacy_shape_of("TABLE a UNION TABLE b INTERSECT TABLE c"),
        "((a UNION b) INTERSECT c)"
    );
    assert_eq!(
        legacy_shape_of("TABLE a INTERSECT TABLE b UNION TABLE c EXCEPT TABLE d"),
        "(((a INTERSECT b) UNION c) EXCEPT d)"
    );
}

#[test]
fn legacy_flag_does_not_leak_between_parses() {
    let sql = "TABLE a UNION TABLE b INTERSECT TABLE c";
    assert_eq!(legacy_shape_of(sql), "((a UNION b) INTERSECT c)");
    assert_eq!(shape_of(sql), "(a UNION (b INTERSECT c))");
}

#[test]
fn parentheses_override_precedence() {
    assert_eq!(
        shape_of("(TABLE a UNION TABLE b) INTERSECT TABLE c"),
        "(Q INTERSECT c)"
    );
}

#[test]
fn quantifiers() {
    let query = parse_query("SELECT 1 UNION ALL SELECT 2 EXCEPT DISTINCT SELECT 3");
    let QueryTerm::SetOperation {
        op,
        quantifier,
        left,
        ..
    } = term_of(&query)
    else {
        panic!("Expected set operation");
    };
    assert_eq!(*op, SetOperator::Except);
    assert_eq!(*quantifier, Some(SetQuantifier::Distinct));
    assert!(matches!(
        left.as_ref(),
        QueryTerm::SetOperation {
            op: SetOperator::Union,
            quantifier: Some(SetQuantifier::All),
            ..
        }
    ));
}

#[test]
fn organization_applies_to_whole_chain() {
    let query = parse_query("SELECT a FROM t UNION SELECT a FROM u ORDER BY a LIMIT 3");
    let QueryBody::Single {
        term, organization, ..
    } = &query.body
    else {
        panic!("Expected single body");
    };
    assert!(matches!(term, QueryTerm::SetOperation { .. }));
    assert_eq!(organization.order_by.len(), 1);
    assert!(organization.limit.is_some());
}

#[test]
fn set_operation_with_values_and_selects() {
    assert_eq!(shape_of("SELECT 1 UNION VALUES 2"), "(S UNION V)");
}
