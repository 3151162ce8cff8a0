//! Source file discovery from command-line patterns
//!
//! A pattern is a file, a directory (its files, not recursing), or a
//! directory followed by `/...` (recursing into subdirectories except
//! `testdata`, `vendor` and hidden or `_`-prefixed ones).

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::common::{LintError, LintResult};

/// Resolve `patterns` to a sorted, duplicate-free list of source files
/// with one of the given extensions (e.g. `".go"`)
pub fn discover(patterns: &[String], extensions: &[&str]) -> LintResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let (root, recursive) = match pattern.strip_suffix("...") {
            Some("") => (PathBuf::from("."), true),
            Some(prefix) => (PathBuf::from(prefix.trim_end_matches('/')), true),
            None => (PathBuf::from(pattern), false),
        };
        let root = if root.as_os_str().is_empty() { PathBuf::from("/") } else { root };

        let metadata = fs::metadata(&root).map_err(|e| LintError::read(&root, e))?;
        if metadata.is_dir() {
            collect_dir(&root, recursive, extensions, &mut files)?;
        } else {
            files.push(root);
        }
    }

    files.sort();
    files.dedup();
    debug!("{} source files matched {}", files.len(), patterns.join(" "));
    Ok(files)
}

fn collect_dir(dir: &Path, recursive: bool, extensions: &[&str], files: &mut Vec<PathBuf>) -> LintResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| LintError::read(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| LintError::read(dir, e))?;
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let file_type = entry.file_type().map_err(|e| LintError::read(&path, e))?;

        if file_type.is_dir() {
            if recursive && !is_ignored_dir(&name) {
                collect_dir(&path, recursive, extensions, files)?;
            }
        } else if is_source_file(&name, extensions) {
            files.push(path);
        }
    }

    Ok(())
}

fn is_ignored_dir(name: &str) -> bool {
    name == "testdata" || name == "vendor" || name.starts_with('.') || name.starts_with('_')
}

/// Files starting with `.` or `_` are ignored by the Go tool as well
fn is_source_file(name: &str, extensions: &[&str]) -> bool {
    !name.starts_with('.') && !name.starts_with('_') && extensions.iter().any(|ext| name.ends_with(ext))
}
