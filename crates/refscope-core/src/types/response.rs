//! Response types for the SQL reference lint API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::{Issue, IssueCount};

/// The result of linting a SQL source.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    /// All issues, sorted by statement then source position
    pub issues: Vec<Issue>,

    /// Summary statistics
    pub summary: LintSummary,
}

impl LintResult {
    pub fn from_issues(statement_count: usize, issues: Vec<Issue>) -> Self {
        let issue_count = IssueCount::from_issues(&issues);
        Self {
            summary: LintSummary {
                statement_count,
                has_errors: issue_count.errors > 0,
                issue_count,
            },
            issues,
        }
    }

    /// Create an error result with a single issue.
    pub fn from_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::from_issues(0, vec![Issue::error(code, message)])
    }
}

/// Summary statistics for a lint run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    /// Number of statements parsed
    pub statement_count: usize,

    /// Issue counts by severity
    pub issue_count: IssueCount,

    /// True if any error-level issue was produced
    pub has_errors: bool,
}
