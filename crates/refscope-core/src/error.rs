//! Error types for SQL parsing and lint configuration.
//!
//! Two kinds of failure stop work on a statement or a run:
//!
//! - [`ParseError`]: the SQL could not be parsed. The linter reports it as a
//!   `PARSE_ERROR` issue for the affected source and moves on.
//! - [`ConfigError`]: a rule option holds a value the rule does not accept.
//!   Raised once when the [`crate::Linter`] is built, never while linting.
//!
//! Lint findings themselves are [`crate::Issue`]s, not errors.

use crate::types::Dialect;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
#[cfg(feature = "tracing")]
use tracing::trace;

/// Error encountered during SQL parsing.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Line/column where the error occurred, if the parser reported one.
    pub position: Option<Position>,
    /// The SQL dialect being parsed when the error occurred.
    pub dialect: Option<Dialect>,
}

/// Position information for a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            dialect: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Extracts `Line: X, Column: Y` from a sqlparser error message.
    fn parse_position_from_message(message: &str) -> Option<Position> {
        static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = POSITION_REGEX.get_or_init(|| {
            Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("Invalid regex pattern")
        });

        let result = re.captures(message).and_then(|caps| {
            let line: usize = caps.get(1)?.as_str().parse().ok()?;
            let column: usize = caps.get(2)?.as_str().parse().ok()?;
            Some(Position { line, column })
        });

        #[cfg(feature = "tracing")]
        if result.is_none() && message.contains("Line") {
            trace!("no position found in parser message: {}", message);
        }

        result
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;

        if let Some(dialect) = self.dialect {
            write!(f, " ({dialect:?})")?;
        }

        if let Some(pos) = self.position {
            write!(f, " at line {}, column {}", pos.line, pos.column)?;
        }

        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let position = Self::parse_position_from_message(&message);

        Self {
            message,
            position,
            dialect: None,
        }
    }
}

/// Invalid lint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A string option holds a literal the rule does not recognise.
    #[error("invalid value '{value}' for option '{option}' of rule {rule}; expected one of: {expected}")]
    InvalidOption {
        rule: &'static str,
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An option was given as a non-string JSON value.
    #[error("option '{option}' of rule {rule} must be a string, found {found}")]
    InvalidType {
        rule: &'static str,
        option: &'static str,
        found: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position_from_message() {
        let msg = "Expected SELECT, found 'INSERT' at Line: 1, Column: 5";
        let pos = ParseError::parse_position_from_message(msg);
        assert_eq!(pos, Some(Position { line: 1, column: 5 }));
    }

    #[test]
    fn test_parse_position_no_position() {
        assert_eq!(ParseError::parse_position_from_message("Unexpected token"), None);
    }

    #[test]
    fn test_display_with_dialect_and_position() {
        let mut err = ParseError::new("boom").with_dialect(Dialect::Postgres);
        err.position = Some(Position { line: 3, column: 7 });
        assert_eq!(
            err.to_string(),
            "Parse error (Postgres) at line 3, column 7: boom"
        );
    }

    #[test]
    fn test_config_error_message_names_rule_and_choices() {
        let err = ConfigError::InvalidOption {
            rule: "LINT_RF_003",
            option: "single_table_references",
            value: "sometimes".to_string(),
            expected: "consistent, qualified, unqualified",
        };
        let text = err.to_string();
        assert!(text.contains("'sometimes'"));
        assert!(text.contains("LINT_RF_003"));
        assert!(text.contains("consistent, qualified, unqualified"));
    }
}
