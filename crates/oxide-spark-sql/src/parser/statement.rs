//! Statement dispatch.

use tracing::debug;

use super::error::ParseError;
use super::Parser;
use crate::ast::{ExplainMode, Statement, StatementKind};
use crate::lexer::Keyword;

impl Parser {
    /// Parses one statement and requires the end of input.
    ///
    /// The route table picks a builder from the leading tokens. If the
    /// builder fails with a recoverable error, the legacy command table
    /// gets a chance to report the input as a known but unsupported
    /// command; otherwise the builder's error stands.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let start = self.checkpoint();
        let first = self.current().clone();

        if self.peek_keyword(0) == Some(Keyword::Set) && self.peek_keyword(1) == Some(Keyword::Role)
        {
            debug!("recognized unsupported command SET ROLE");
            return Err(ParseError::unsupported("SET ROLE", &first));
        }

        let Some(route) = self.find_route() else {
            if let Some(unsupported) = self.match_legacy_command(&first) {
                return Err(unsupported);
            }
            self.expecting("statement");
            return Err(self.error_here());
        };
        debug!(route = route.name, "dispatching statement");

        let built = (route.build)(self).and_then(|kind| {
            let span = self.span_since(start);
            self.expect_end()?;
            Ok(Statement { kind, span })
        });
        match built {
            Ok(statement) => Ok(statement),
            Err(err) if err.is_fatal() => Err(err),
            Err(err) => {
                self.rollback(start);
                match self.match_legacy_command(&first) {
                    Some(unsupported) => Err(unsupported),
                    None => Err(err),
                }
            }
        }
    }

    /// `query`
    pub(super) fn parse_query_statement(&mut self) -> Result<StatementKind, ParseError> {
        Ok(StatementKind::Query(Box::new(self.parse_query()?)))
    }

    /// `EXPLAIN [LOGICAL | FORMATTED | EXTENDED | CODEGEN | COST] statement`
    pub(super) fn parse_explain(&mut self) -> Result<StatementKind, ParseError> {
        let explain = self.expect_keyword(Keyword::Explain)?;
        let mode = match self.peek_keyword(0) {
            Some(kw @ (Keyword::Logical | Keyword::Formatted)) => {
                return Err(ParseError::unsupported(format!("EXPLAIN {kw}"), &explain));
            }
            Some(Keyword::Extended) => ExplainMode::Extended,
            Some(Keyword::Codegen) => ExplainMode::Codegen,
            Some(Keyword::Cost) => ExplainMode::Cost,
            _ => ExplainMode::Simple,
        };
        if mode != ExplainMode::Simple {
            self.bump();
        }
        let statement = self.nested(Self::parse_statement)?;
        Ok(StatementKind::Explain {
            mode,
            statement: Box::new(statement),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        Parser::new(sql).parse_single_statement()
    }

    #[test]
    fn test_trailing_semicolons() {
        assert!(parse("SELECT 1;;").is_ok());
        assert!(parse("SELECT 1; SELECT 2").is_err());
    }

    #[test]
    fn test_set_role_is_unsupported() {
        let err = parse("SET ROLE admin").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedStatement { ref command, .. } if command == "SET ROLE"
        ));
    }

    #[test]
    fn test_explain_wraps_statement() {
        let statement = parse("EXPLAIN EXTENDED SELECT 1").unwrap();
        let StatementKind::Explain { mode, statement } = statement.kind else {
            panic!("expected explain");
        };
        assert_eq!(mode, ExplainMode::Extended);
        assert!(statement.as_query().is_some());
    }

    #[test]
    fn test_explain_formatted_is_unsupported() {
        let err = parse("EXPLAIN FORMATTED SELECT 1").unwrap_err();
        assert!(err.to_string().starts_with("Operation not allowed: EXPLAIN FORMATTED"));
    }

    #[test]
    fn test_unknown_statement() {
        let err = parse("FROBNICATE x").unwrap_err();
        assert!(err.expected_tokens().contains(&"statement".to_string()));
    }
}
