//! Byte ranges into the SQL text.

use serde::Serialize;

/// A half-open byte range `start..end` of the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// An empty span at `offset`, as used by the end-of-input marker.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Returns true if `next` starts exactly where `self` ends, with no
    /// whitespace or comment between them.
    #[must_use]
    pub const fn touches(&self, next: &Self) -> bool {
        self.end == next.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_is_empty() {
        let span = Span::point(7);
        assert!(span.is_empty());
        assert_eq!(span.len(), 0);
        assert_eq!(Span::default(), Span::point(0));
    }

    #[test]
    fn test_merge_covers_both() {
        let select = Span::new(0, 6);
        let table = Span::new(14, 19);
        assert_eq!(select.merge(table), Span::new(0, 19));
        assert_eq!(table.merge(select), Span::new(0, 19));
        assert_eq!(select.merge(table).len(), 19);
    }

    #[test]
    fn test_touches() {
        let a = Span::new(0, 3);
        assert!(a.touches(&Span::new(3, 4)));
        assert!(!a.touches(&Span::new(4, 5)));
    }
}
