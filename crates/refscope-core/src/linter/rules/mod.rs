//! Lint rule implementations and registry.

use super::config::LintConfig;
use super::rule::LintRule;
use crate::error::ConfigError;

pub mod rf_003;

/// Builds every available rule from `config`.
///
/// Fails when a rule option holds a value the rule cannot accept.
pub fn all_rules(config: &LintConfig) -> Result<Vec<Box<dyn LintRule>>, ConfigError> {
    Ok(vec![Box::new(rf_003::ReferencesConsistent::from_config(
        config,
    )?)])
}
