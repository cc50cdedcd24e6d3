//! LINT_RF_003: References consistent.
//!
//! In a select that reads from exactly one table, column references should
//! either all carry the table prefix or all omit it. The policy can instead
//! pin one style (`qualified` or `unqualified`) for every reference.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::linter::config::LintConfig;
use crate::linter::extract::{visit_select_scopes, ColumnReference, Qualification, TableAlias};
use crate::linter::rule::{LintContext, LintRule};
use crate::types::{issue_codes, Issue};
use sqlparser::ast::{Select, Statement};
#[cfg(feature = "tracing")]
use tracing::trace;

/// Name of the rule option holding the policy.
pub const SINGLE_TABLE_REFERENCES: &str = "single_table_references";

const EXPECTED_POLICIES: &str = "consistent, qualified, unqualified";

/// Qualification policy for references in single-table selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SingleTableReferences {
    /// Whichever style is used first must be kept.
    #[default]
    Consistent,
    Qualified,
    Unqualified,
}

impl SingleTableReferences {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consistent => "consistent",
            Self::Qualified => "qualified",
            Self::Unqualified => "unqualified",
        }
    }

    /// The required kind, or `None` when only consistency is checked.
    pub const fn required(self) -> Option<Qualification> {
        match self {
            Self::Consistent => None,
            Self::Qualified => Some(Qualification::Qualified),
            Self::Unqualified => Some(Qualification::Unqualified),
        }
    }

    /// Reads the policy from the rule's option object, defaulting to `Consistent`.
    pub fn from_rule_config(config: &LintConfig) -> Result<Self, ConfigError> {
        let Some(value) = config.rule_option(issue_codes::LINT_RF_003, SINGLE_TABLE_REFERENCES)
        else {
            return Ok(Self::default());
        };

        match value {
            serde_json::Value::String(raw) => raw.parse(),
            other => Err(ConfigError::InvalidType {
                rule: issue_codes::LINT_RF_003,
                option: SINGLE_TABLE_REFERENCES,
                found: json_type_name(other).to_string(),
            }),
        }
    }
}

impl FromStr for SingleTableReferences {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "consistent" => Ok(Self::Consistent),
            "qualified" => Ok(Self::Qualified),
            "unqualified" => Ok(Self::Unqualified),
            _ => Err(ConfigError::InvalidOption {
                rule: issue_codes::LINT_RF_003,
                option: SINGLE_TABLE_REFERENCES,
                value: raw.to_string(),
                expected: EXPECTED_POLICIES,
            }),
        }
    }
}

impl fmt::Display for SingleTableReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// A reference that breaks the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation<'r> {
    pub anchor: &'r ColumnReference,
    pub message: String,
}

/// Decides which references in one select break `policy`.
///
/// Returns `None` when the select has more than one table alias, or when
/// nothing breaks the policy. Unqualified wildcards are ignored. In
/// consistent mode the kinds seen so far are tracked as a set, so only the
/// first switch of style is reported.
///
/// `col_aliases`, `using_cols` and `parent_select` are not consulted; they
/// are accepted so every per-select reference check shares one signature.
pub fn check_single_table_references<'r>(
    aliases: &[TableAlias],
    references: &'r [ColumnReference],
    _col_aliases: &[String],
    _using_cols: &[String],
    _parent_select: Option<&Select>,
    policy: SingleTableReferences,
) -> Option<Vec<Violation<'r>>> {
    if aliases.len() > 1 {
        return None;
    }

    let mut seen_kinds = BTreeSet::new();
    let mut violations = Vec::new();

    for reference in references {
        if !reference.is_qualified && reference.is_wildcard {
            continue;
        }

        let kind = reference.qualification();
        match policy.required() {
            None => {
                if !seen_kinds.is_empty() && !seen_kinds.contains(&kind) {
                    violations.push(Violation {
                        anchor: reference,
                        message: format!(
                            "{} reference {} found in single table select which is inconsistent with previous references.",
                            kind.capitalized(),
                            quote_raw(&reference.raw_text)
                        ),
                    });
                }
            }
            Some(required) => {
                if kind != required {
                    violations.push(Violation {
                        anchor: reference,
                        message: format!(
                            "{} reference {} found in single table select.",
                            kind.capitalized(),
                            quote_raw(&reference.raw_text)
                        ),
                    });
                }
            }
        }
        seen_kinds.insert(kind);
    }

    (!violations.is_empty()).then_some(violations)
}

/// Quotes reference text for messages the way SQLFluff renders it.
///
/// Single quotes are used unless the text contains a single quote and no
/// double quote. The chosen quote, backslashes and control characters are
/// escaped.
fn quote_raw(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            ch if ch == quote => {
                quoted.push('\\');
                quoted.push(ch);
            }
            ch if ch.is_ascii_control() => quoted.push_str(&format!("\\x{:02x}", ch as u32)),
            ch => quoted.push(ch),
        }
    }
    quoted.push(quote);
    quoted
}

#[derive(Debug, Default)]
pub struct ReferencesConsistent {
    policy: SingleTableReferences,
}

impl ReferencesConsistent {
    pub fn new(policy: SingleTableReferences) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &LintConfig) -> Result<Self, ConfigError> {
        let policy = SingleTableReferences::from_rule_config(config)?;
        #[cfg(feature = "tracing")]
        trace!(%policy, "configured references.consistent");
        Ok(Self { policy })
    }

    pub fn policy(&self) -> SingleTableReferences {
        self.policy
    }
}

impl LintRule for ReferencesConsistent {
    fn code(&self) -> &'static str {
        issue_codes::LINT_RF_003
    }

    fn name(&self) -> &'static str {
        "References consistent"
    }

    fn description(&self) -> &'static str {
        "Column references in a single-table select should be qualified consistently."
    }

    fn check(&self, statement: &Statement, ctx: &LintContext) -> Vec<Issue> {
        let mut issues = Vec::new();

        visit_select_scopes(statement, ctx.sql, &mut |scope| {
            // Only selects reading from a table are in scope.
            if scope.aliases.is_empty() {
                #[cfg(feature = "tracing")]
                trace!("skipping select without FROM");
                return;
            }

            let Some(violations) = check_single_table_references(
                &scope.aliases,
                &scope.references,
                &scope.col_aliases,
                &scope.using_cols,
                scope.parent_select,
                self.policy,
            ) else {
                return;
            };

            for violation in violations {
                let mut issue = Issue::info(issue_codes::LINT_RF_003, violation.message)
                    .with_statement(ctx.statement_index);
                if let Some(span) = violation.anchor.span {
                    issue = issue.with_span(span);
                }
                issues.push(issue);
            }
        });

        issues
    }
}
