//! Statement route table.
//!
//! Each route pairs a leading token pattern with the builder that parses
//! the statement. Routes are probed in order and the first match wins, so
//! more specific prefixes come first. Probing never consumes input; the
//! builder always starts from the first token of the statement.

use super::error::ParseError;
use super::Parser;
use crate::ast::StatementKind;
use crate::lexer::{Keyword, TokenKind};

/// One slot of a leading token pattern.
#[derive(Debug, Clone, Copy)]
pub(super) enum Pat {
    /// The keyword.
    Kw(Keyword),
    /// The keyword, if present.
    Opt(Keyword),
    /// The whole keyword sequence, if present.
    OptSeq(&'static [Keyword]),
    /// Any one of the keywords.
    OneOf(&'static [Keyword]),
    /// An identifier.
    Ident,
    /// Any token other than the end of input.
    Any,
    /// A `[db.]table` identifier.
    Table,
    /// An optional `PARTITION (...)` spec.
    OptPartition,
    /// The start of a query, or a leading `INSERT`.
    Query,
}

/// Builds one statement kind from the statement start.
pub(super) type Builder = fn(&mut Parser) -> Result<StatementKind, ParseError>;

pub(super) struct Route {
    pub name: &'static str,
    pub pattern: &'static [Pat],
    pub build: Builder,
}

const DESC: Pat = Pat::OneOf(&[Keyword::Desc, Keyword::Describe]);
const OR_REPLACE: Pat = Pat::OptSeq(&[Keyword::Or, Keyword::Replace]);

pub(super) const ROUTES: &[Route] = &[
    Route {
        name: "query",
        pattern: &[Pat::Query],
        build: Parser::parse_query_statement,
    },
    Route {
        name: "use",
        pattern: &[Pat::Kw(Keyword::Use), Pat::Ident],
        build: Parser::parse_use,
    },
    Route {
        name: "create database",
        pattern: &[Pat::Kw(Keyword::Create), Pat::Kw(Keyword::Database)],
        build: Parser::parse_create_database,
    },
    Route {
        name: "alter database",
        pattern: &[
            Pat::Kw(Keyword::Alter),
            Pat::Kw(Keyword::Database),
            Pat::Ident,
            Pat::Kw(Keyword::Set),
        ],
        build: Parser::parse_alter_database,
    },
    Route {
        name: "drop database",
        pattern: &[Pat::Kw(Keyword::Drop), Pat::Kw(Keyword::Database)],
        build: Parser::parse_drop_database,
    },
    Route {
        name: "create table",
        pattern: &[
            Pat::Kw(Keyword::Create),
            Pat::Opt(Keyword::Temporary),
            Pat::Opt(Keyword::External),
            Pat::Kw(Keyword::Table),
        ],
        build: Parser::parse_create_table,
    },
    Route {
        name: "analyze",
        pattern: &[Pat::Kw(Keyword::Analyze), Pat::Kw(Keyword::Table)],
        build: Parser::parse_analyze,
    },
    Route {
        name: "alter table",
        pattern: &[
            Pat::Kw(Keyword::Alter),
            Pat::OneOf(&[Keyword::Table, Keyword::View]),
            Pat::Table,
        ],
        build: Parser::parse_alter_table,
    },
    Route {
        name: "drop table",
        pattern: &[
            Pat::Kw(Keyword::Drop),
            Pat::OneOf(&[Keyword::Table, Keyword::View]),
        ],
        build: Parser::parse_drop_table,
    },
    Route {
        name: "create view",
        pattern: &[
            Pat::Kw(Keyword::Create),
            OR_REPLACE,
            Pat::Opt(Keyword::Global),
            Pat::Opt(Keyword::Temporary),
            Pat::Kw(Keyword::View),
        ],
        build: Parser::parse_create_view,
    },
    Route {
        name: "create function",
        pattern: &[
            Pat::Kw(Keyword::Create),
            OR_REPLACE,
            Pat::Opt(Keyword::Temporary),
            Pat::Kw(Keyword::Function),
        ],
        build: Parser::parse_create_function,
    },
    Route {
        name: "drop function",
        pattern: &[
            Pat::Kw(Keyword::Drop),
            Pat::Opt(Keyword::Temporary),
            Pat::Kw(Keyword::Function),
        ],
        build: Parser::parse_drop_function,
    },
    Route {
        name: "explain",
        pattern: &[Pat::Kw(Keyword::Explain)],
        build: Parser::parse_explain,
    },
    Route {
        name: "show tables",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Tables)],
        build: Parser::parse_show_tables,
    },
    Route {
        name: "show table extended",
        pattern: &[
            Pat::Kw(Keyword::Show),
            Pat::Kw(Keyword::Table),
            Pat::Kw(Keyword::Extended),
        ],
        build: Parser::parse_show_table_extended,
    },
    Route {
        name: "show databases",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Databases)],
        build: Parser::parse_show_databases,
    },
    Route {
        name: "show tblproperties",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Tblproperties)],
        build: Parser::parse_show_tblproperties,
    },
    Route {
        name: "show columns",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Columns)],
        build: Parser::parse_show_columns,
    },
    Route {
        name: "show partitions",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Partitions)],
        build: Parser::parse_show_partitions,
    },
    Route {
        name: "show create table",
        pattern: &[
            Pat::Kw(Keyword::Show),
            Pat::Kw(Keyword::Create),
            Pat::Kw(Keyword::Table),
        ],
        build: Parser::parse_show_create_table,
    },
    Route {
        name: "show functions",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Kw(Keyword::Functions)],
        build: Parser::parse_show_functions,
    },
    Route {
        name: "show scoped functions",
        pattern: &[Pat::Kw(Keyword::Show), Pat::Ident, Pat::Kw(Keyword::Functions)],
        build: Parser::parse_show_functions,
    },
    Route {
        name: "describe function",
        pattern: &[DESC, Pat::Kw(Keyword::Function), Pat::Any],
        build: Parser::parse_describe_function,
    },
    Route {
        name: "describe database",
        pattern: &[DESC, Pat::Kw(Keyword::Database), Pat::Ident],
        build: Parser::parse_describe_database,
    },
    Route {
        name: "describe table",
        pattern: &[DESC],
        build: Parser::parse_describe_table,
    },
    Route {
        name: "refresh table",
        pattern: &[Pat::Kw(Keyword::Refresh), Pat::Kw(Keyword::Table), Pat::Table],
        build: Parser::parse_refresh_table,
    },
    Route {
        name: "refresh resource",
        pattern: &[Pat::Kw(Keyword::Refresh)],
        build: Parser::parse_refresh_resource,
    },
    Route {
        name: "cache table",
        pattern: &[Pat::Kw(Keyword::Cache)],
        build: Parser::parse_cache_table,
    },
    Route {
        name: "uncache table",
        pattern: &[Pat::Kw(Keyword::Uncache), Pat::Kw(Keyword::Table)],
        build: Parser::parse_uncache_table,
    },
    Route {
        name: "clear cache",
        pattern: &[Pat::Kw(Keyword::Clear), Pat::Kw(Keyword::Cache)],
        build: Parser::parse_clear_cache,
    },
    Route {
        name: "load data",
        pattern: &[Pat::Kw(Keyword::Load), Pat::Kw(Keyword::Data)],
        build: Parser::parse_load_data,
    },
    Route {
        name: "truncate table",
        pattern: &[Pat::Kw(Keyword::Truncate), Pat::Kw(Keyword::Table)],
        build: Parser::parse_truncate_table,
    },
    Route {
        name: "repair table",
        pattern: &[
            Pat::Kw(Keyword::Msck),
            Pat::Kw(Keyword::Repair),
            Pat::Kw(Keyword::Table),
        ],
        build: Parser::parse_repair_table,
    },
    Route {
        name: "manage resource",
        pattern: &[Pat::OneOf(&[Keyword::Add, Keyword::List]), Pat::Ident],
        build: Parser::parse_manage_resource,
    },
    Route {
        name: "set",
        pattern: &[Pat::Kw(Keyword::Set)],
        build: Parser::parse_set_configuration,
    },
    Route {
        name: "reset",
        pattern: &[Pat::Kw(Keyword::Reset)],
        build: Parser::parse_reset_configuration,
    },
];

impl Parser {
    /// Matches `pattern` at the current position without consuming input.
    ///
    /// Returns the keywords matched by keyword slots, in order, or `None`
    /// if the pattern does not match.
    pub(super) fn match_pattern(&mut self, pattern: &[Pat]) -> Option<Vec<Keyword>> {
        let start = self.checkpoint();
        let matched = self.match_slots(pattern);
        self.rollback(start);
        matched
    }

    fn match_slots(&mut self, pattern: &[Pat]) -> Option<Vec<Keyword>> {
        let mut keywords = Vec::new();
        for slot in pattern {
            match *slot {
                Pat::Kw(kw) => {
                    if self.peek_keyword(0) != Some(kw) {
                        return None;
                    }
                    self.bump();
                    keywords.push(kw);
                }
                Pat::Opt(kw) => {
                    if self.peek_keyword(0) == Some(kw) {
                        self.bump();
                        keywords.push(kw);
                    }
                }
                Pat::OptSeq(seq) => {
                    let present = seq
                        .iter()
                        .enumerate()
                        .all(|(i, kw)| self.peek_keyword(i) == Some(*kw));
                    if present {
                        for kw in seq {
                            self.bump();
                            keywords.push(*kw);
                        }
                    }
                }
                Pat::OneOf(choices) => {
                    let kw = self.peek_keyword(0).filter(|kw| choices.contains(kw))?;
                    self.bump();
                    keywords.push(kw);
                }
                Pat::Ident => {
                    if !Self::is_identifier_token(self.current(), false) {
                        return None;
                    }
                    self.bump();
                }
                Pat::Any => {
                    if self.is_at_end() {
                        return None;
                    }
                    self.bump();
                }
                Pat::Table => {
                    self.parse_table_identifier().ok()?;
                }
                Pat::OptPartition => {
                    if self.peek_keyword(0) == Some(Keyword::Partition)
                        && self.peek(1).kind == TokenKind::LeftParen
                    {
                        self.parse_partition_spec().ok()?;
                    }
                }
                Pat::Query => {
                    let starts = self.query_starts_at(0)
                        || self.current().kind == TokenKind::LeftParen
                        || self.peek_keyword(0) == Some(Keyword::Insert);
                    if !starts {
                        return None;
                    }
                }
            }
        }
        Some(keywords)
    }

    /// Returns the first route whose pattern matches here.
    pub(super) fn find_route(&mut self) -> Option<&'static Route> {
        ROUTES
            .iter()
            .find(|route| self.match_pattern(route.pattern).is_some())
    }
}
