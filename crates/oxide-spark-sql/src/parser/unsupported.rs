//! Recognizer for legacy Hive commands that are valid in the dialect but
//! deliberately not supported.
//!
//! A match is reported as [`ParseError::UnsupportedStatement`] carrying the
//! matched keywords, so callers can tell these apart from malformed input.

use tracing::debug;

use super::error::ParseError;
use super::route::Pat;
use super::Parser;
use crate::lexer::{Keyword, Token};

use Keyword::{
    Alter, Archive, As, By, Clustered, Columns, Commit, Compact, Compactions, Concatenate,
    Create, Current, Database, Delete, Dfs, Directories, Drop, Exchange, Export, Fileformat, From,
    Grant, Import, Index, Indexes, Location, Lock, Locks, Macro, Not, Partition, Principals,
    Replace, Revoke, Role, Roles, Rollback, Set, Show, Skewed, Sorted, Start, Stored, Table,
    Temporary, Touch, Transaction, Transactions, Unarchive, Unlock,
};
use Pat::{Kw, Opt, OptPartition};

/// Legacy command patterns, probed in order.
const LEGACY_COMMANDS: &[&[Pat]] = &[
    &[Kw(Create), Kw(Role)],
    &[Kw(Drop), Kw(Role)],
    &[Kw(Grant), Opt(Role)],
    &[Kw(Revoke), Opt(Role)],
    &[Kw(Show), Kw(Grant)],
    &[Kw(Show), Kw(Role), Opt(Grant)],
    &[Kw(Show), Kw(Principals)],
    &[Kw(Show), Kw(Roles)],
    &[Kw(Show), Kw(Current), Kw(Roles)],
    &[Kw(Export), Kw(Table)],
    &[Kw(Import), Kw(Table)],
    &[Kw(Show), Kw(Compactions)],
    &[Kw(Show), Kw(Create), Kw(Table)],
    &[Kw(Show), Kw(Transactions)],
    &[Kw(Show), Kw(Indexes)],
    &[Kw(Show), Kw(Locks)],
    &[Kw(Create), Kw(Index)],
    &[Kw(Drop), Kw(Index)],
    &[Kw(Alter), Kw(Index)],
    &[Kw(Lock), Kw(Table)],
    &[Kw(Lock), Kw(Database)],
    &[Kw(Unlock), Kw(Table)],
    &[Kw(Unlock), Kw(Database)],
    &[Kw(Create), Kw(Temporary), Kw(Macro)],
    &[Kw(Drop), Kw(Temporary), Kw(Macro)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Not), Kw(Clustered)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Clustered), Kw(By)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Not), Kw(Sorted)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Skewed), Kw(By)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Not), Kw(Skewed)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Not), Kw(Stored), Kw(As), Kw(Directories)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Set), Kw(Skewed), Kw(Location)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Exchange), Kw(Partition)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Archive), Kw(Partition)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Unarchive), Kw(Partition)],
    &[Kw(Alter), Kw(Table), Pat::Table, Kw(Touch)],
    &[Kw(Alter), Kw(Table), Pat::Table, OptPartition, Kw(Compact)],
    &[Kw(Alter), Kw(Table), Pat::Table, OptPartition, Kw(Concatenate)],
    &[Kw(Alter), Kw(Table), Pat::Table, OptPartition, Kw(Set), Kw(Fileformat)],
    &[Kw(Alter), Kw(Table), Pat::Table, OptPartition, Kw(Replace), Kw(Columns)],
    &[Kw(Start), Kw(Transaction)],
    &[Kw(Commit)],
    &[Kw(Rollback)],
    &[Kw(Dfs)],
    &[Kw(Delete), Kw(From)],
];

impl Parser {
    /// Matches the legacy command table at the current position.
    ///
    /// Returns the unsupported-statement error for the first matching
    /// pattern, positioned at `first`. Input is never consumed.
    pub(super) fn match_legacy_command(&mut self, first: &Token) -> Option<ParseError> {
        let keywords = LEGACY_COMMANDS
            .iter()
            .find_map(|pattern| self.match_pattern(pattern))?;
        let command = keywords
            .iter()
            .map(Keyword::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        debug!(command = %command, "recognized unsupported command");
        Some(ParseError::unsupported(command, first))
    }
}
