//! Lint output formatting (sqlfluff-style).

use owo_colors::OwoColorize;
use refscope_core::linter::config::sqlfluff_name_for_code;
use refscope_core::{Issue, Severity};
use std::fmt::Write;
use std::time::Duration;

/// Per-file lint result used by the formatter.
pub struct FileLintResult {
    pub name: String,
    pub issues: Vec<LintIssue>,
}

/// A lint issue resolved to line:col.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub line: usize,
    pub col: usize,
    pub code: String,
    pub message: String,
    pub severity: Severity,
}

impl LintIssue {
    /// Resolves an issue's byte span against the SQL it was reported for.
    ///
    /// Issues without a span are placed at the start of the file.
    pub fn from_issue(issue: &Issue, sql: &str) -> Self {
        let (line, col) = issue
            .span
            .map(|span| offset_to_line_col(sql, span.start))
            .unwrap_or((1, 1));

        Self {
            line,
            col,
            code: issue.code.clone(),
            message: issue.message.clone(),
            severity: issue.severity,
        }
    }
}

/// Convert a byte offset into a 1-based (line, col) pair.
pub fn offset_to_line_col(sql: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(sql.len());
    let mut line = 1usize;
    let mut col = 1usize;

    for (i, ch) in sql.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Format lint results as human-readable sqlfluff-style text.
pub fn format_lint_results(results: &[FileLintResult], colored: bool, elapsed: Duration) -> String {
    let mut out = String::new();

    let failed = results.iter().filter(|file| !file.issues.is_empty()).count();
    let violations: usize = results.iter().map(|file| file.issues.len()).sum();

    for file in results {
        write_file_section(&mut out, file, colored);
    }

    writeln!(out, "All Finished in {}!", format_elapsed(elapsed)).unwrap();
    writeln!(
        out,
        "  {} passed. {} failed. {} violations found.",
        paint(&files_str(results.len() - failed), colored, Status::Pass),
        paint(&files_str(failed), colored, Status::Fail),
        violations
    )
    .unwrap();

    out
}

#[derive(Clone, Copy)]
enum Status {
    Pass,
    Fail,
}

fn paint(text: &str, colored: bool, status: Status) -> String {
    match (colored, status) {
        (false, _) => text.to_string(),
        (true, Status::Pass) => text.green().to_string(),
        (true, Status::Fail) => text.red().to_string(),
    }
}

fn files_str(count: usize) -> String {
    format!("{count} file{}", if count == 1 { "" } else { "s" })
}

fn write_file_section(out: &mut String, file: &FileLintResult, colored: bool) {
    let status = if file.issues.is_empty() {
        paint("PASS", colored, Status::Pass)
    } else {
        paint("FAIL", colored, Status::Fail)
    };

    writeln!(out, "== [{}] {}", file.name, status).unwrap();

    let mut sorted: Vec<&LintIssue> = file.issues.iter().collect();
    sorted.sort_by_key(|i| (i.line, i.col));

    for issue in sorted {
        let code_str = if colored {
            match issue.severity {
                Severity::Error => issue.code.red().to_string(),
                Severity::Warning => issue.code.yellow().to_string(),
                Severity::Info => issue.code.blue().to_string(),
            }
        } else {
            issue.code.clone()
        };

        writeln!(
            out,
            "L:{:>4} | P:{:>4} | {} | {}",
            issue.line, issue.col, code_str, issue.message
        )
        .unwrap();
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else if elapsed.as_millis() >= 1 {
        format!("{}ms", elapsed.as_millis())
    } else {
        format!("{}us", elapsed.as_micros())
    }
}

/// Format lint results as JSON.
pub fn format_lint_json(results: &[FileLintResult], compact: bool) -> String {
    let json_results: Vec<serde_json::Value> = results
        .iter()
        .map(|file| {
            let violations: Vec<serde_json::Value> = file
                .issues
                .iter()
                .map(|issue| {
                    serde_json::json!({
                        "line": issue.line,
                        "column": issue.col,
                        "code": issue.code,
                        "name": sqlfluff_name_for_code(&issue.code),
                        "message": issue.message,
                        "severity": issue.severity.as_str(),
                    })
                })
                .collect();

            serde_json::json!({
                "file": file.name,
                "violations": violations
            })
        })
        .collect();

    if compact {
        serde_json::to_string(&json_results).unwrap_or_default()
    } else {
        serde_json::to_string_pretty(&json_results).unwrap_or_default()
    }
}
