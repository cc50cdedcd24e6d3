//! CLI argument parsing using clap.

use clap::{Parser, ValueEnum};
use refscope_core::SingleTableReferences;
use std::path::PathBuf;

/// refscope - consistent column qualification for single-table SQL selects
#[derive(Parser, Debug)]
#[command(name = "refscope")]
#[command(
    about = "Lint SQL for inconsistent column qualification in single-table selects",
    long_about = None
)]
#[command(version)]
pub struct Args {
    /// SQL files or directories to lint (reads from stdin if none provided)
    #[arg(value_name = "PATHS")]
    pub files: Vec<PathBuf>,

    /// SQL dialect
    #[arg(short, long, default_value = "generic", value_enum)]
    pub dialect: DialectArg,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Qualification policy for references in single-table selects
    #[arg(long, value_enum, value_name = "POLICY")]
    pub single_table_references: Option<PolicyArg>,

    /// Per-rule options as a JSON object keyed by rule reference
    /// (e.g., '{"references.consistent":{"single_table_references":"qualified"}}')
    #[arg(long, value_name = "JSON")]
    pub rule_configs: Option<String>,

    /// Comma-separated list of lint rule codes to exclude (e.g., RF03,L028)
    #[arg(long, value_delimiter = ',')]
    pub exclude_rules: Vec<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long)]
    pub compact: bool,

    /// Suppress warnings and progress on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug diagnostics to stderr (overrides RUST_LOG)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

/// SQL dialect options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl From<DialectArg> for refscope_core::Dialect {
    fn from(d: DialectArg) -> Self {
        match d {
            DialectArg::Generic => refscope_core::Dialect::Generic,
            DialectArg::Ansi => refscope_core::Dialect::Ansi,
            DialectArg::Bigquery => refscope_core::Dialect::Bigquery,
            DialectArg::Clickhouse => refscope_core::Dialect::Clickhouse,
            DialectArg::Databricks => refscope_core::Dialect::Databricks,
            DialectArg::Duckdb => refscope_core::Dialect::Duckdb,
            DialectArg::Hive => refscope_core::Dialect::Hive,
            DialectArg::Mssql => refscope_core::Dialect::Mssql,
            DialectArg::Mysql => refscope_core::Dialect::Mysql,
            DialectArg::Postgres => refscope_core::Dialect::Postgres,
            DialectArg::Redshift => refscope_core::Dialect::Redshift,
            DialectArg::Snowflake => refscope_core::Dialect::Snowflake,
            DialectArg::Sqlite => refscope_core::Dialect::Sqlite,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable sqlfluff-style report
    Table,
    /// JSON output
    Json,
}

/// Qualification policy options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Keep whichever style the select starts with
    Consistent,
    /// Require `table.column`
    Qualified,
    /// Require bare `column`
    Unqualified,
}

impl From<PolicyArg> for SingleTableReferences {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Consistent => SingleTableReferences::Consistent,
            PolicyArg::Qualified => SingleTableReferences::Qualified,
            PolicyArg::Unqualified => SingleTableReferences::Unqualified,
        }
    }
}
