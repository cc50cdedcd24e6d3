//! Types for the SQL reference lint API.
//!
//! Requests carry SQL text plus dialect; results carry the issues produced by
//! the linter and summary counts.

mod common;
mod request;
mod response;

pub use common::{issue_codes, Issue, IssueCount, Severity, Span};
pub use request::{Dialect, LintRequest};
pub use response::{LintResult, LintSummary};
