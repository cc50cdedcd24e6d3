//! Fuzz target for the linter.
//!
//! `Linter::lint_sql()` must not panic on arbitrary SQL, in any dialect or
//! policy. Invalid SQL comes back as a `PARSE_ERROR` issue.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use refscope_core::{Dialect, LintConfig, Linter, SingleTableReferences};
use std::collections::BTreeMap;

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    sql: String,
    dialect_idx: u8,
    policy_idx: u8,
}

impl FuzzInput {
    fn dialect(&self) -> Dialect {
        match self.dialect_idx % 5 {
            0 => Dialect::Generic,
            1 => Dialect::Postgres,
            2 => Dialect::Snowflake,
            3 => Dialect::Bigquery,
            _ => Dialect::Duckdb,
        }
    }

    fn policy(&self) -> SingleTableReferences {
        match self.policy_idx % 3 {
            0 => SingleTableReferences::Consistent,
            1 => SingleTableReferences::Qualified,
            _ => SingleTableReferences::Unqualified,
        }
    }
}

fuzz_target!(|input: FuzzInput| {
    let config = LintConfig {
        rule_configs: BTreeMap::from([(
            "references.consistent".to_string(),
            serde_json::json!({ "single_table_references": input.policy().as_str() }),
        )]),
        ..LintConfig::default()
    };
    let Ok(linter) = Linter::new(config) else {
        return;
    };

    let result = linter.lint_sql(&input.sql, input.dialect());
    for issue in &result.issues {
        if let Some(span) = issue.span {
            assert!(span.start <= span.end && span.end <= input.sql.len());
        }
    }
});
