//! Per-parse configuration.

use serde::{Deserialize, Serialize};

/// Default ceiling on nested expressions and queries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Options that change how input is parsed.
///
/// A value of this type is handed to each [`Parser`](crate::Parser); it is
/// never stored globally, so concurrent parses may use different settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// When set, `UNION`, `EXCEPT`, `MINUS` and `INTERSECT` share one
    /// precedence level. Otherwise `INTERSECT` binds tighter.
    pub legacy_setops_precedence: bool,
    /// Maximum nesting depth of parenthesized expressions and subqueries.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            legacy_setops_precedence: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the legacy set-operation precedence flag.
    #[must_use]
    pub const fn with_legacy_setops_precedence(mut self, legacy: bool) -> Self {
        self.legacy_setops_precedence = legacy;
        self
    }

    /// Sets the nesting depth ceiling.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::new();
        assert!(!config.legacy_setops_precedence);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::new()
            .with_legacy_setops_precedence(true)
            .with_max_depth(8);
        assert!(config.legacy_setops_precedence);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ParserConfig =
            serde_json::from_str(r#"{"legacy_setops_precedence": true}"#).unwrap();
        assert!(config.legacy_setops_precedence);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }
}
