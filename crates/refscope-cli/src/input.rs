//! Input handling for files, directories and stdin.

use anyhow::{Context, Result};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One SQL source to lint.
#[derive(Debug, Clone)]
pub struct SqlSource {
    /// Display name (the path as given, or `<stdin>`).
    pub name: String,
    pub content: String,
}

/// Read SQL input from paths or stdin.
///
/// If no paths are provided, reads from stdin. Directories are walked
/// recursively for `*.sql` files, in sorted order.
pub fn read_input(paths: &[PathBuf]) -> Result<Vec<SqlSource>> {
    if paths.is_empty() {
        read_from_stdin()
    } else {
        read_from_paths(paths)
    }
}

/// Read SQL from stdin
fn read_from_stdin() -> Result<Vec<SqlSource>> {
    let mut content = String::new();
    io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;

    Ok(vec![SqlSource {
        name: "<stdin>".to_string(),
        content,
    }])
}

fn read_from_paths(paths: &[PathBuf]) -> Result<Vec<SqlSource>> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_dir() {
            for file in sql_files_in(path)? {
                sources.push(read_file(&file)?);
            }
        } else {
            sources.push(read_file(path)?);
        }
    }

    Ok(sources)
}

fn read_file(path: &Path) -> Result<SqlSource> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    Ok(SqlSource {
        name: path.display().to_string(),
        content,
    })
}

/// Lists `*.sql` files below `dir`, without following symlinks.
fn sql_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in walkdir::WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path.to_path_buf());
        }
    }

    debug!(dir = %dir.display(), count = files.len(), "collected sql files");
    Ok(files)
}
