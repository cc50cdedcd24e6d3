//! refscope CLI - column reference qualification linter

use refscope_cli::cli;
use refscope_cli::input;
use refscope_cli::output;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use refscope_core::linter::rules::rf_003::SINGLE_TABLE_REFERENCES;
use refscope_core::{issue_codes, Dialect, LintConfig, Linter, SingleTableReferences};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Args, OutputFormat};
use output::{format_lint_json, format_lint_results, FileLintResult, LintIssue};

/// Lint violations or parse errors found.
const EXIT_FAILURE: u8 = 1;
/// Configuration error (e.g. invalid rule option or unreadable input).
const EXIT_CONFIG_ERROR: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run_lint(args) {
        Ok(has_violations) => {
            if has_violations {
                ExitCode::from(EXIT_FAILURE)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("refscope: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Logs go to stderr so they never mix with the report on stdout.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn run_lint(args: Args) -> Result<bool> {
    let started_at = Instant::now();

    let lint_config = build_lint_config(&args)?;
    let linter = Linter::new(lint_config).context("Invalid lint configuration")?;
    let sources = input::read_input(&args.files)?;
    let dialect: Dialect = args.dialect.into();
    info!(files = sources.len(), ?dialect, "linting");

    let mut file_results = Vec::with_capacity(sources.len());
    let mut progress = LintProgressBar::new(sources.len(), args.quiet);

    for source in &sources {
        let result = linter.lint_sql(&source.content, dialect);
        debug!(
            file = %source.name,
            statements = result.summary.statement_count,
            issues = result.issues.len(),
            "linted"
        );

        if !args.quiet {
            if let Some(parse_error) = result
                .issues
                .iter()
                .find(|issue| issue.code == issue_codes::PARSE_ERROR)
            {
                progress.suspend(|| {
                    eprintln!(
                        "refscope: warning: {}: {}",
                        source.name, parse_error.message
                    )
                });
            }
        }

        file_results.push(FileLintResult {
            name: source.name.clone(),
            issues: result
                .issues
                .iter()
                .map(|issue| LintIssue::from_issue(issue, &source.content))
                .collect(),
        });
        progress.tick();
    }
    progress.finish();

    let has_violations = file_results.iter().any(|f| !f.issues.is_empty());
    let colored = args.output.is_none() && io::stdout().is_terminal();

    let output_str = match args.format {
        OutputFormat::Json => format_lint_json(&file_results, args.compact),
        OutputFormat::Table => format_lint_results(&file_results, colored, started_at.elapsed()),
    };

    write_output(&args.output, &output_str)?;

    Ok(has_violations)
}

/// Combines `--exclude-rules`, `--rule-configs` and `--single-table-references`.
///
/// The dedicated policy flag wins over a policy given in `--rule-configs`.
fn build_lint_config(args: &Args) -> Result<LintConfig> {
    let mut rule_configs = parse_rule_configs_json(args.rule_configs.as_deref())?;

    if let Some(policy) = args.single_table_references {
        let policy = SingleTableReferences::from(policy);
        let entry = rule_configs
            .entry(issue_codes::LINT_RF_003.to_string())
            .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if let serde_json::Value::Object(options) = entry {
            options.insert(
                SINGLE_TABLE_REFERENCES.to_string(),
                serde_json::Value::String(policy.as_str().to_string()),
            );
        }
    }

    Ok(LintConfig {
        enabled: true,
        disabled_rules: args.exclude_rules.clone(),
        rule_configs,
    })
}

fn parse_rule_configs_json(raw: Option<&str>) -> Result<BTreeMap<String, serde_json::Value>> {
    let Some(raw) = raw else {
        return Ok(BTreeMap::new());
    };

    let value: serde_json::Value =
        serde_json::from_str(raw).context("Failed to parse --rule-configs JSON")?;
    let object = value
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("--rule-configs must be a JSON object"))?;

    let mut rule_configs = BTreeMap::new();
    for (rule_ref, options) in object {
        if !options.is_object() {
            anyhow::bail!("--rule-configs entry for '{rule_ref}' must be a JSON object");
        }
        rule_configs.insert(rule_ref.clone(), options.clone());
    }

    Ok(rule_configs)
}

struct LintProgressBar {
    enabled: bool,
    total: usize,
    current: usize,
}

impl LintProgressBar {
    const WIDTH: usize = 30;

    fn new(total: usize, quiet: bool) -> Self {
        let enabled = !quiet && total > 1 && io::stderr().is_terminal();
        let progress = Self {
            enabled,
            total,
            current: 0,
        };

        if progress.enabled {
            progress.render();
        }

        progress
    }

    fn tick(&mut self) {
        if !self.enabled {
            return;
        }

        self.current = self.current.saturating_add(1).min(self.total);
        self.render();
    }

    /// Clears the bar while `print` writes to stderr, then redraws it.
    fn suspend(&self, print: impl FnOnce()) {
        if self.enabled {
            eprint!("\r{:width$}\r", "", width = Self::WIDTH + 24);
        }
        print();
        if self.enabled {
            self.render();
        }
    }

    fn finish(&self) {
        if self.enabled {
            eprintln!();
        }
    }

    fn render(&self) {
        let filled = if self.total == 0 {
            0
        } else {
            self.current * Self::WIDTH / self.total
        };
        let empty = Self::WIDTH - filled;

        eprint!(
            "\rLinting [{:=>filled$}{:empty$}] {}/{}",
            "", "", self.current, self.total
        );
        let _ = io::stderr().flush();
    }
}

fn write_output(path: &Option<std::path::PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}
