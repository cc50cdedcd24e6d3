//! SQL linter module.
//!
//! Statements are parsed once per source, column references are extracted per
//! `SELECT` scope, and each enabled rule checks every statement. Issues on
//! lines carrying a `-- noqa` comment are dropped before results are sorted.

pub mod config;
pub mod document;
pub mod extract;
pub mod helpers;
pub mod rule;
pub mod rules;

use config::LintConfig;
use document::{LintDocument, LintStatement};
use helpers::{line_col_to_offset, token_span_to_offsets};
use rule::{LintContext, LintRule};
use sqlparser::ast::{Spanned, Statement};
#[cfg(feature = "tracing")]
use tracing::{debug, trace};

use crate::error::{ConfigError, ParseError};
use crate::parser::parse_sql_with_dialect;
use crate::types::{issue_codes, Dialect, Issue, LintResult, Severity, Span};

/// The SQL linter, holding a set of rules and configuration.
pub struct Linter {
    rules: Vec<Box<dyn LintRule>>,
    config: LintConfig,
}

impl Linter {
    /// Creates a new linter, validating every rule option up front.
    pub fn new(config: LintConfig) -> Result<Self, ConfigError> {
        let rules = rules::all_rules(&config)?;
        #[cfg(feature = "tracing")]
        debug!(rules = rules.len(), enabled = config.enabled, "linter ready");
        Ok(Self { rules, config })
    }

    /// Returns true if linting is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Rules that will run under the current configuration.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules
            .iter()
            .filter(|rule| self.config.is_rule_enabled(rule.code()))
            .map(|rule| rule.as_ref())
    }

    /// Parses and lints `sql`.
    ///
    /// A parse failure is reported as a single `PARSE_ERROR` issue rather than
    /// an `Err`, so callers linting many sources can carry on.
    pub fn lint_sql(&self, sql: &str, dialect: Dialect) -> LintResult {
        let statements = match parse_sql_with_dialect(sql, dialect) {
            Ok(statements) => statements,
            Err(error) => {
                #[cfg(feature = "tracing")]
                debug!(%error, "parse failed");
                return LintResult::from_issues(0, vec![parse_error_issue(sql, &error)]);
            }
        };

        let lint_statements = statements
            .iter()
            .enumerate()
            .map(|(statement_index, statement)| LintStatement {
                statement,
                statement_index,
                statement_range: statement_range(sql, statement),
            })
            .collect();

        let document = LintDocument::new(sql, dialect, lint_statements);
        LintResult::from_issues(statements.len(), self.check_document(&document))
    }

    /// Checks every statement of a document against all enabled rules.
    pub fn check_document(&self, document: &LintDocument<'_>) -> Vec<Issue> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut issues = Vec::new();
        for rule in self.enabled_rules() {
            for statement in &document.statements {
                let ctx = LintContext {
                    sql: document.sql,
                    statement_range: statement.statement_range.clone(),
                    statement_index: statement.statement_index,
                    dialect: document.dialect,
                };
                issues.extend(rule.check(statement.statement, &ctx));
            }
        }

        let issues = suppress_noqa_issues(issues, document);
        normalize_issues(issues)
    }

    /// Checks a single statement against all enabled lint rules.
    ///
    /// Used by tests and rule-level callers; `lint_sql` is the normal entry point.
    pub fn check_statement(&self, stmt: &Statement, ctx: &LintContext) -> Vec<Issue> {
        let document = LintDocument::new(
            ctx.sql,
            ctx.dialect,
            vec![LintStatement {
                statement: stmt,
                statement_index: ctx.statement_index,
                statement_range: ctx.statement_range.clone(),
            }],
        );
        self.check_document(&document)
    }
}

/// Byte range of a statement, falling back to the whole source when the
/// parser did not record a usable span.
fn statement_range(sql: &str, statement: &Statement) -> std::ops::Range<usize> {
    match token_span_to_offsets(sql, &statement.span()) {
        Some(span) if span.start < span.end => span.start..span.end,
        _ => 0..sql.len(),
    }
}

fn parse_error_issue(sql: &str, error: &ParseError) -> Issue {
    let issue = Issue::error(issue_codes::PARSE_ERROR, error.to_string());
    match error
        .position
        .and_then(|pos| line_col_to_offset(sql, pos.line, pos.column))
    {
        Some(offset) => issue.with_span(Span::new(offset, offset)),
        None => issue,
    }
}

fn normalize_issues(mut issues: Vec<Issue>) -> Vec<Issue> {
    issues.sort_by(|left, right| issue_sort_key(left).cmp(&issue_sort_key(right)));
    issues.dedup_by(|left, right| {
        left.span.is_some()
            && right.span.is_some()
            && left.statement_index == right.statement_index
            && left.span == right.span
            && left.severity == right.severity
            && left.code == right.code
            && left.message == right.message
    });
    issues
}

fn issue_sort_key(issue: &Issue) -> (usize, usize, usize, u8, &str, &str) {
    (
        issue.statement_index.unwrap_or(usize::MAX),
        issue.span.map_or(usize::MAX, |span| span.start),
        issue.span.map_or(usize::MAX, |span| span.end),
        severity_rank(issue.severity),
        issue.code.as_str(),
        issue.message.as_str(),
    )
}

const fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    }
}

fn suppress_noqa_issues(issues: Vec<Issue>, document: &LintDocument<'_>) -> Vec<Issue> {
    if document.noqa.is_empty() {
        return issues;
    }

    issues
        .into_iter()
        .filter(|issue| {
            let Some(line) = issue_line(issue, document) else {
                return true;
            };
            let suppressed = document.noqa.is_suppressed(line, &issue.code);
            #[cfg(feature = "tracing")]
            if suppressed {
                trace!(line, code = %issue.code, "issue suppressed by noqa");
            }
            !suppressed
        })
        .collect()
}

fn issue_line(issue: &Issue, document: &LintDocument<'_>) -> Option<usize> {
    if let Some(span) = issue.span {
        return Some(document.line_of(span.start));
    }

    let statement_index = issue.statement_index?;
    let statement = document
        .statements
        .iter()
        .find(|statement| statement.statement_index == statement_index)?;
    Some(document.line_of(statement.statement_range.start))
}
