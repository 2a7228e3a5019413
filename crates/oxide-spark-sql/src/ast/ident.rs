//! Identifiers and dotted names.

use std::fmt;

use serde::Serialize;

use crate::lexer::Span;

/// How an identifier was written in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IdentKind {
    /// Backquoted: `` `my col` ``.
    Quoted,
    /// A plain unquoted identifier.
    Unquoted,
    /// A non-reserved keyword used as an identifier (e.g. `table`, `data`).
    NonReservedKeyword,
}

/// An identifier.
///
/// The classification is fixed when the identifier is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Ident {
    value: String,
    kind: IdentKind,
    span: Span,
}

impl Ident {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(value: impl Into<String>, kind: IdentKind, span: Span) -> Self {
        Self {
            value: value.into(),
            kind,
            span,
        }
    }

    /// The identifier text as written, without quotes.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// How the identifier was written.
    #[must_use]
    pub const fn kind(&self) -> IdentKind {
        self.kind
    }

    /// The source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        self.span
    }

    /// Returns true if the identifier was backquoted.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        matches!(self.kind, IdentKind::Quoted)
    }

    /// Case-insensitive comparison against `other`.
    #[must_use]
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.value.eq_ignore_ascii_case(other)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_quoted() {
            write!(f, "`{}`", self.value.replace('`', "``"))
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A dotted name: `a.b.c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualifiedName {
    /// The name parts, outermost first.
    pub parts: Vec<Ident>,
}

impl QualifiedName {
    /// Creates a qualified name from its parts.
    #[must_use]
    pub const fn new(parts: Vec<Ident>) -> Self {
        Self { parts }
    }

    /// The last part of the name.
    #[must_use]
    pub fn last(&self) -> Option<&Ident> {
        self.parts.last()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

/// A table name with an optional database: `db.table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableIdentifier {
    /// The database, if qualified.
    pub database: Option<Ident>,
    /// The table name.
    pub table: Ident,
}

impl fmt::Display for TableIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db) = &self.database {
            write!(f, "{db}.")?;
        }
        write!(f, "{}", self.table)
    }
}

/// A function name with an optional database: `db.func`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionIdentifier {
    /// The database, if qualified.
    pub database: Option<Ident>,
    /// The function name.
    pub function: Ident,
}

impl fmt::Display for FunctionIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(db) = &self.database {
            write!(f, "{db}.")?;
        }
        write!(f, "{}", self.function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(value: &str, kind: IdentKind) -> Ident {
        Ident::new(value, kind, Span::default())
    }

    #[test]
    fn test_display_quotes_only_quoted() {
        assert_eq!(ident("a b", IdentKind::Quoted).to_string(), "`a b`");
        assert_eq!(ident("a`b", IdentKind::Quoted).to_string(), "`a``b`");
        assert_eq!(ident("col", IdentKind::Unquoted).to_string(), "col");
    }

    #[test]
    fn test_qualified_display() {
        let name = QualifiedName::new(vec![
            ident("db", IdentKind::Unquoted),
            ident("t", IdentKind::NonReservedKeyword),
        ]);
        assert_eq!(name.to_string(), "db.t");
        assert_eq!(name.last().map(Ident::value), Some("t"));

        let table = TableIdentifier {
            database: None,
            table: ident("t", IdentKind::Unquoted),
        };
        assert_eq!(table.to_string(), "t");
    }
}
