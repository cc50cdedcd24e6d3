//! Configuration for the SQL linter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::issue_codes;

/// Configuration for the SQL linter.
///
/// Controls which lint rules are enabled and carries per-rule options. By
/// default, all rules are enabled with their default options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    /// Master toggle for linting (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// List of rule codes to disable (e.g., ["LINT_RF_003"] or ["RF03"]).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disabled_rules: Vec<String>,

    /// Per-rule option objects keyed by any accepted rule reference
    /// (e.g., `{"references.consistent": {"single_table_references": "qualified"}}`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rule_configs: BTreeMap<String, serde_json::Value>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled_rules: Vec::new(),
            rule_configs: BTreeMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl LintConfig {
    /// Returns true if a specific rule is enabled.
    pub fn is_rule_enabled(&self, code: &str) -> bool {
        if !self.enabled {
            return false;
        }
        let canonical = canonicalize_rule_code(code).unwrap_or_else(|| code.to_string());
        !self
            .disabled_rules
            .iter()
            .filter_map(|rule| canonicalize_rule_code(rule))
            .any(|rule| rule == canonical)
    }

    /// Returns the option objects configured for `code` under any of its names.
    ///
    /// Objects come in priority order: the canonical code, then the SQLFluff
    /// dotted name, then short and legacy codes.
    pub fn rule_config_objects<'c>(
        &'c self,
        code: &str,
    ) -> impl Iterator<Item = &'c serde_json::Map<String, serde_json::Value>> + 'c {
        rule_names(code)
            .into_iter()
            .flat_map(|names| [names.code, names.sqlfluff, names.short, names.legacy])
            .filter_map(|key| self.lookup_rule_config(key))
    }

    /// Returns the raw JSON value of one rule option.
    ///
    /// The first object that sets `key`, in priority order, wins. Objects
    /// that leave it out do not hide lower-priority ones.
    pub fn rule_option(&self, code: &str, key: &str) -> Option<&serde_json::Value> {
        self.rule_config_objects(code)
            .find_map(|options| options.get(key))
    }

    /// Returns a string rule option, if present and a string.
    pub fn rule_option_str(&self, code: &str, key: &str) -> Option<&str> {
        self.rule_option(code, key)?.as_str()
    }

    fn lookup_rule_config(
        &self,
        key: &str,
    ) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.rule_configs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .and_then(|(_, value)| value.as_object())
    }
}

/// The names a rule can be referred to by in configuration and `noqa` comments.
#[derive(Debug, Clone, Copy)]
pub struct RuleNames {
    /// Canonical code, e.g. `LINT_RF_003`.
    pub code: &'static str,
    /// SQLFluff dotted name, e.g. `references.consistent`.
    pub sqlfluff: &'static str,
    /// SQLFluff short code, e.g. `RF03`.
    pub short: &'static str,
    /// Pre-2.0 SQLFluff code, e.g. `L028`.
    pub legacy: &'static str,
}

const RULE_NAMES: &[RuleNames] = &[RuleNames {
    code: issue_codes::LINT_RF_003,
    sqlfluff: "references.consistent",
    short: "RF03",
    legacy: "L028",
}];

fn rule_names(code: &str) -> Option<&'static RuleNames> {
    let canonical = canonicalize_rule_code(code)?;
    RULE_NAMES.iter().find(|names| names.code == canonical)
}

/// Maps any accepted rule reference to its canonical `LINT_*` code.
///
/// Accepts `LINT_RF_003`, `RF03`, `RF003`, `RF_003`, `L028` and
/// `references.consistent`, case-insensitively.
pub fn canonicalize_rule_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_ascii_uppercase();

    for names in RULE_NAMES {
        if upper == names.code
            || upper == names.short
            || upper == names.legacy
            || trimmed.eq_ignore_ascii_case(names.sqlfluff)
        {
            return Some(names.code.to_string());
        }
    }

    // RF003 / RF_003 style: family letters followed by a number.
    let compact: String = upper.chars().filter(|ch| *ch != '_').collect();
    let compact = compact.strip_prefix("LINT").unwrap_or(&compact);
    let split = compact.find(|ch: char| ch.is_ascii_digit())?;
    let (family, number) = compact.split_at(split);
    if family.len() != 2 || !family.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return None;
    }
    let number: u32 = number.parse().ok()?;
    let candidate = format!("LINT_{family}_{number:03}");
    RULE_NAMES
        .iter()
        .find(|names| names.code == candidate)
        .map(|names| names.code.to_string())
}

/// Returns the SQLFluff dotted name for a canonical rule code.
pub fn sqlfluff_name_for_code(code: &str) -> Option<&'static str> {
    rule_names(code).map(|names| names.sqlfluff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_enables_all() {
        let config = LintConfig::default();
        assert!(config.enabled);
        assert!(config.is_rule_enabled("LINT_RF_003"));
    }

    #[test]
    fn test_disabled_rule_by_any_name() {
        for name in ["LINT_RF_003", "RF03", "rf03", "L028", "references.consistent"] {
            let config = LintConfig {
                disabled_rules: vec![name.to_string()],
                ..LintConfig::default()
            };
            assert!(!config.is_rule_enabled("LINT_RF_003"), "{name} should disable");
        }
    }

    #[test]
    fn test_master_toggle_off() {
        let config = LintConfig {
            enabled: false,
            ..LintConfig::default()
        };
        assert!(!config.is_rule_enabled("LINT_RF_003"));
    }

    #[test]
    fn test_deserialization_defaults() {
        let config: LintConfig = serde_json::from_str("{}").unwrap();
        assert!(config.enabled);
        assert!(config.disabled_rules.is_empty());
        assert!(config.rule_configs.is_empty());
    }

    #[test]
    fn test_canonicalize_rule_code_variants() {
        for raw in ["LINT_RF_003", "RF03", "RF003", "rf_003", "L028", " references.consistent "] {
            assert_eq!(
                canonicalize_rule_code(raw).as_deref(),
                Some("LINT_RF_003"),
                "{raw}"
            );
        }
        assert_eq!(canonicalize_rule_code("AL01"), None);
        assert_eq!(canonicalize_rule_code(""), None);
    }

    #[test]
    fn test_rule_option_lookup_by_sqlfluff_name() {
        let config = LintConfig {
            rule_configs: BTreeMap::from([(
                "references.consistent".to_string(),
                serde_json::json!({"single_table_references": "qualified"}),
            )]),
            ..LintConfig::default()
        };
        assert_eq!(
            config.rule_option_str("LINT_RF_003", "single_table_references"),
            Some("qualified")
        );
        assert_eq!(config.rule_option_str("LINT_RF_003", "missing"), None);
    }

    #[test]
    fn test_canonical_code_key_wins_over_aliases() {
        let config = LintConfig {
            rule_configs: BTreeMap::from([
                (
                    "L028".to_string(),
                    serde_json::json!({"single_table_references": "unqualified"}),
                ),
                (
                    "LINT_RF_003".to_string(),
                    serde_json::json!({"single_table_references": "qualified"}),
                ),
            ]),
            ..LintConfig::default()
        };
        assert_eq!(
            config.rule_option_str("RF03", "single_table_references"),
            Some("qualified")
        );
    }

    #[test]
    fn test_option_found_behind_empty_higher_priority_object() {
        let config = LintConfig {
            rule_configs: BTreeMap::from([
                ("LINT_RF_003".to_string(), serde_json::json!({})),
                (
                    "RF03".to_string(),
                    serde_json::json!({"single_table_references": "qualified"}),
                ),
            ]),
            ..LintConfig::default()
        };
        assert_eq!(
            config.rule_option_str("LINT_RF_003", "single_table_references"),
            Some("qualified")
        );
        assert_eq!(config.rule_config_objects("LINT_RF_003").count(), 2);
    }

    #[test]
    fn test_sqlfluff_name_for_code() {
        assert_eq!(
            sqlfluff_name_for_code("LINT_RF_003"),
            Some("references.consistent")
        );
        assert_eq!(sqlfluff_name_for_code("LINT_XX_001"), None);
    }
}
