use std::process::Command;

use tempfile::tempdir;

/// SQL that mixes unqualified and qualified references in a single-table select.
const SQL_WITH_VIOLATIONS: &str = "SELECT a, foo.b FROM foo";

/// Consistently unqualified SQL.
const SQL_CLEAN: &str = "SELECT a, b FROM foo";
/// Invalid SQL used to verify parse errors fail the run.
const SQL_INVALID: &str = "SELECT a FROM";

fn refscope() -> Command {
    Command::new(env!("CARGO_BIN_EXE_refscope"))
}

#[test]
fn test_lint_clean_file() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("clean.sql");
    std::fs::write(&sql_path, SQL_CLEAN).expect("write sql");

    let output = refscope()
        .arg(sql_path.to_str().expect("sql path"))
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Expected exit 0, got: {stdout}");
    assert!(stdout.contains("PASS"), "Expected PASS in output: {stdout}");
    assert!(
        stdout.contains("0 violations"),
        "Expected 0 violations: {stdout}"
    );
}

#[test]
fn test_lint_file_with_violations() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bad.sql");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = refscope()
        .arg(sql_path.to_str().expect("sql path"))
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit 1, got: {stdout}"
    );
    assert!(stdout.contains("FAIL"), "Expected FAIL in output: {stdout}");
    assert!(
        stdout.contains("L:   1 | P:  11 | LINT_RF_003 | Qualified reference 'foo.b' found in single table select which is inconsistent with previous references."),
        "Expected RF03 line: {stdout}"
    );
    assert!(
        stdout.contains("1 violations"),
        "Expected 1 violation: {stdout}"
    );
}

#[test]
fn test_lint_invalid_sql_fails() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("invalid.sql");
    std::fs::write(&sql_path, SQL_INVALID).expect("write sql");

    let output = refscope()
        .args(["--quiet", sql_path.to_str().expect("sql path")])
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(1),
        "Expected exit 1 for invalid SQL, got: {stdout}"
    );
    assert!(stdout.contains("PARSE_ERROR"), "Expected PARSE_ERROR: {stdout}");
    assert!(
        stdout.contains("1 file failed"),
        "Expected failed summary for invalid SQL: {stdout}"
    );
}

#[test]
fn test_lint_exclude_rules() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("excluded.sql");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = refscope()
        .args([
            "--exclude-rules",
            "RF03",
            sql_path.to_str().expect("sql path"),
        ])
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Expected exit 0 when rule excluded, got: {stdout}"
    );
    assert!(
        stdout.contains("PASS"),
        "Expected PASS when rule excluded: {stdout}"
    );
}

#[test]
fn test_lint_qualified_policy_flag() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bare.sql");
    std::fs::write(&sql_path, SQL_CLEAN).expect("write sql");

    let output = refscope()
        .args([
            "--single-table-references",
            "qualified",
            sql_path.to_str().expect("sql path"),
        ])
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("Unqualified reference 'a' found in single table select."));
    assert!(stdout.contains("Unqualified reference 'b' found in single table select."));
    assert!(stdout.contains("2 violations"), "{stdout}");
}

#[test]
fn test_lint_invalid_rule_config_exits_with_config_error() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("any.sql");
    std::fs::write(&sql_path, SQL_CLEAN).expect("write sql");

    let output = refscope()
        .args([
            "--rule-configs",
            r#"{"references.consistent":{"single_table_references":"sometimes"}}"#,
            sql_path.to_str().expect("sql path"),
        ])
        .output()
        .expect("run CLI");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(66), "{stderr}");
    assert!(stderr.contains("refscope: error:"), "{stderr}");
    assert!(stderr.contains("'sometimes'"), "{stderr}");
}

#[test]
fn test_lint_json_output() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bad.sql");
    std::fs::write(&sql_path, "SELECT foo.a,\n       b\nFROM foo").expect("write sql");

    let output = refscope()
        .args(["--format", "json", sql_path.to_str().expect("sql path")])
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let violation = &parsed[0]["violations"][0];
    assert_eq!(violation["code"], "LINT_RF_003");
    assert_eq!(violation["line"], 2);
    assert_eq!(violation["column"], 8);
    assert_eq!(
        violation["message"],
        "Unqualified reference 'b' found in single table select which is inconsistent with previous references."
    );
}

#[test]
fn test_lint_directory_input() {
    let dir = tempdir().expect("temp dir");
    std::fs::create_dir(dir.path().join("models")).expect("mkdir");
    std::fs::write(dir.path().join("models/bad.sql"), SQL_WITH_VIOLATIONS).expect("write sql");
    std::fs::write(dir.path().join("clean.sql"), SQL_CLEAN).expect("write sql");
    std::fs::write(dir.path().join("readme.md"), "SELECT a, foo.b FROM foo").expect("write md");

    let output = refscope()
        .arg(dir.path().to_str().expect("dir path"))
        .output()
        .expect("run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(
        stdout.contains("1 file passed. 1 file failed. 1 violations found."),
        "{stdout}"
    );
}

#[test]
fn test_lint_noqa_comment() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("noqa.sql");
    std::fs::write(&sql_path, "SELECT a, foo.b FROM foo -- noqa: L028").expect("write sql");

    let output = refscope()
        .arg(sql_path.to_str().expect("sql path"))
        .output()
        .expect("run CLI");

    assert!(output.status.success());
}

#[test]
fn test_lint_output_file_has_no_ansi_sequences() {
    let dir = tempdir().expect("temp dir");
    let sql_path = dir.path().join("bad.sql");
    let report_path = dir.path().join("lint.txt");
    std::fs::write(&sql_path, SQL_WITH_VIOLATIONS).expect("write sql");

    let output = refscope()
        .args([
            "--output",
            report_path.to_str().expect("report path"),
            sql_path.to_str().expect("sql path"),
        ])
        .output()
        .expect("run CLI");

    assert_eq!(output.status.code(), Some(1));
    let report = std::fs::read_to_string(&report_path).expect("read report");
    assert!(report.contains("LINT_RF_003"));
    assert!(!report.contains('\u{1b}'), "report should be plain text");
}

#[test]
fn test_lint_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = refscope()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn CLI");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(SQL_WITH_VIOLATIONS.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("== [<stdin>] FAIL"), "{stdout}");
}
