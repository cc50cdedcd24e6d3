//! Lint rule trait and context for SQL linting.

use super::config::sqlfluff_name_for_code;
use crate::types::{Dialect, Issue};
use sqlparser::ast::Statement;
use std::ops::Range;

/// Context provided to lint rules during analysis.
pub struct LintContext<'a> {
    /// The full SQL source text.
    pub sql: &'a str,
    /// Byte range of the current statement within the SQL source.
    pub statement_range: Range<usize>,
    /// Zero-based index of the current statement.
    pub statement_index: usize,
    /// Dialect the statement was parsed with.
    pub dialect: Dialect,
}

/// A single lint rule that checks a parsed SQL statement.
pub trait LintRule: Send + Sync {
    /// Machine-readable rule code (e.g., "LINT_RF_003").
    fn code(&self) -> &'static str;

    /// Short human-readable name (e.g., "References consistent").
    fn name(&self) -> &'static str;

    /// Longer description of what this rule checks.
    fn description(&self) -> &'static str;

    /// SQLFluff dotted identifier (e.g., `references.consistent`).
    fn sqlfluff_name(&self) -> &'static str {
        sqlfluff_name_for_code(self.code()).unwrap_or("")
    }

    /// Check a single parsed statement and return any issues found.
    fn check(&self, stmt: &Statement, ctx: &LintContext) -> Vec<Issue>;
}
