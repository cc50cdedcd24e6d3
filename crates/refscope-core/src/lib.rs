//! Column reference qualification linting for SQL.
//!
//! The crate parses SQL with `sqlparser`, extracts the table aliases and
//! column references of every `SELECT`, and checks that selects reading from a
//! single table qualify their column references consistently (SQLFluff rule
//! `references.consistent`, `RF03`, formerly `L028`).
//!
//! ```
//! use refscope_core::{lint, Dialect, LintRequest};
//!
//! let result = lint(&LintRequest::new("SELECT a, foo.b FROM foo", Dialect::Generic)).unwrap();
//! assert_eq!(result.issues.len(), 1);
//! assert_eq!(
//!     result.issues[0].message,
//!     "Qualified reference 'foo.b' found in single table select which is inconsistent with previous references."
//! );
//! ```

pub mod error;
pub mod linter;
pub mod parser;
pub mod types;

pub use error::{ConfigError, ParseError};
pub use linter::config::LintConfig;
pub use linter::extract::{ColumnReference, Qualification, SelectScope, TableAlias};
pub use linter::rules::rf_003::{check_single_table_references, SingleTableReferences, Violation};
pub use linter::Linter;
pub use parser::{parse_sql, parse_sql_with_dialect};

pub use types::{
    issue_codes, Dialect, Issue, IssueCount, LintRequest, LintResult, LintSummary, Severity, Span,
};

/// Lints the SQL of a request with its configuration (or the defaults).
///
/// Only an invalid rule option is an `Err`; SQL that fails to parse yields a
/// result holding a `PARSE_ERROR` issue.
pub fn lint(request: &LintRequest) -> Result<LintResult, ConfigError> {
    let config = request.lint.clone().unwrap_or_default();
    let linter = Linter::new(config)?;
    let mut result = linter.lint_sql(&request.sql, request.dialect);

    if let Some(source_name) = &request.source_name {
        result.issues = result
            .issues
            .into_iter()
            .map(|issue| issue.with_source_name(source_name.clone()))
            .collect();
    }

    Ok(result)
}
