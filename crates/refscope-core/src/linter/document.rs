//! Per-source lint input.
//!
//! A `LintDocument` is built once per SQL source and shared by every rule. It
//! carries the source text, the dialect, the parsed statements with their
//! byte ranges, and the `-- noqa` directives found in comments.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use sqlparser::tokenizer::{Token, Tokenizer, Whitespace};
#[cfg(feature = "tracing")]
use tracing::debug;

use super::config::canonicalize_rule_code;
use super::helpers::{offset_to_line, token_span_to_offsets};
use crate::types::Dialect;

/// A parsed statement entry within a lint document.
pub struct LintStatement<'a> {
    /// Parsed statement AST.
    pub statement: &'a sqlparser::ast::Statement,
    /// Zero-based statement index within the source.
    pub statement_index: usize,
    /// Byte range of the statement within the source SQL.
    pub statement_range: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NoqaDirective {
    All,
    Rules(HashSet<String>),
}

/// `-- noqa` suppression directives indexed by 1-based line number.
#[derive(Debug, Clone, Default)]
pub struct NoqaMap {
    directives: HashMap<usize, NoqaDirective>,
}

impl NoqaMap {
    /// Returns true if `code` is suppressed on `line`.
    pub fn is_suppressed(&self, line: usize, code: &str) -> bool {
        let Some(directive) = self.directives.get(&line) else {
            return false;
        };

        match directive {
            NoqaDirective::All => true,
            NoqaDirective::Rules(rules) => {
                let canonical = canonicalize_rule_code(code)
                    .unwrap_or_else(|| code.trim().to_ascii_uppercase());
                rules.contains(&canonical)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    fn suppress_all(&mut self, line: usize) {
        self.directives.insert(line, NoqaDirective::All);
    }

    fn suppress_rules(&mut self, line: usize, codes: HashSet<String>) {
        match self.directives.get_mut(&line) {
            Some(NoqaDirective::All) => {}
            Some(NoqaDirective::Rules(existing)) => existing.extend(codes),
            None => {
                self.directives.insert(line, NoqaDirective::Rules(codes));
            }
        }
    }
}

/// Normalized lint input for a single SQL source.
pub struct LintDocument<'a> {
    pub sql: &'a str,
    pub dialect: Dialect,
    pub statements: Vec<LintStatement<'a>>,
    pub noqa: NoqaMap,
}

impl<'a> LintDocument<'a> {
    #[must_use]
    pub fn new(sql: &'a str, dialect: Dialect, statements: Vec<LintStatement<'a>>) -> Self {
        Self {
            sql,
            dialect,
            statements,
            noqa: extract_noqa(sql, dialect),
        }
    }

    /// Returns the 1-based line an issue should be suppressed on.
    pub fn line_of(&self, offset: usize) -> usize {
        offset_to_line(self.sql, offset)
    }
}

fn extract_noqa(sql: &str, dialect: Dialect) -> NoqaMap {
    let mut directives = NoqaMap::default();

    let sqlparser_dialect = dialect.to_sqlparser_dialect();
    let tokens = match Tokenizer::new(sqlparser_dialect.as_ref(), sql).tokenize_with_location() {
        Ok(tokens) => tokens,
        Err(_error) => {
            #[cfg(feature = "tracing")]
            debug!(error = %_error, "tokenizer failed; noqa comments ignored");
            return directives;
        }
    };

    for token in tokens {
        let comment = match &token.token {
            Token::Whitespace(Whitespace::SingleLineComment { comment, .. })
            | Token::Whitespace(Whitespace::MultiLineComment(comment)) => comment,
            _ => continue,
        };

        let Some(parsed) = parse_noqa_comment(comment) else {
            continue;
        };
        let Some(span) = token_span_to_offsets(sql, &token.span) else {
            continue;
        };

        let line = offset_to_line(sql, span.start);
        match parsed {
            NoqaDirective::All => directives.suppress_all(line),
            NoqaDirective::Rules(rules) => directives.suppress_rules(line, rules),
        }
    }

    directives
}

fn parse_noqa_comment(comment_text: &str) -> Option<NoqaDirective> {
    let trimmed = comment_text.trim();
    let prefix = trimmed.get(..4)?;
    if !prefix.eq_ignore_ascii_case("noqa") {
        return None;
    }

    let suffix = trimmed[4..].trim();
    if suffix.is_empty() {
        return Some(NoqaDirective::All);
    }

    let rule_list = suffix.strip_prefix(':')?.trim();
    if rule_list.is_empty() {
        return Some(NoqaDirective::All);
    }

    let rules: HashSet<String> = rule_list
        .split(',')
        .map(|item| {
            item.trim()
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | ';'))
        })
        .filter(|item| !item.is_empty())
        .filter_map(canonicalize_rule_code)
        .collect();

    (!rules.is_empty()).then_some(NoqaDirective::Rules(rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_noqa_directives() {
        let sql = "SELECT a, foo.b FROM foo -- noqa: RF03, other.rule\nSELECT 1 -- noqa";
        let document = LintDocument::new(sql, Dialect::Generic, Vec::new());

        assert!(document.noqa.is_suppressed(1, "LINT_RF_003"));
        assert!(document.noqa.is_suppressed(1, "references.consistent"));
        assert!(document.noqa.is_suppressed(2, "LINT_RF_003"));
        assert!(!document.noqa.is_suppressed(3, "LINT_RF_003"));
    }

    #[test]
    fn unknown_rule_list_is_not_a_directive() {
        let sql = "SELECT a FROM foo -- noqa: XX99";
        let document = LintDocument::new(sql, Dialect::Generic, Vec::new());
        assert!(document.noqa.is_empty());
    }

    #[test]
    fn block_comments_are_recognised() {
        let sql = "SELECT a, foo.b /* noqa: L028 */ FROM foo";
        let document = LintDocument::new(sql, Dialect::Generic, Vec::new());
        assert!(document.noqa.is_suppressed(1, "RF03"));
    }

    #[test]
    fn ordinary_comments_are_ignored() {
        let sql = "SELECT a FROM foo -- mentions noqa later";
        let document = LintDocument::new(sql, Dialect::Generic, Vec::new());
        assert!(document.noqa.is_empty());
    }

    #[test]
    fn parse_noqa_comment_variants() {
        assert_eq!(parse_noqa_comment(" noqa"), Some(NoqaDirective::All));
        assert_eq!(parse_noqa_comment("NOQA:"), Some(NoqaDirective::All));
        assert_eq!(parse_noqa_comment("noqa-ish"), None);
        assert_eq!(
            parse_noqa_comment("noqa: 'RF03'"),
            Some(NoqaDirective::Rules(HashSet::from(["LINT_RF_003".to_string()])))
        );
    }
}
