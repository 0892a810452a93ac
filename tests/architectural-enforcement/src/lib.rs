//! Architectural Enforcement Integration Tests
//!
//! Source scans that keep the workspace honest:
//! - `reviewer-core` never depends on the terminal stack
//! - No sleeping in production code
//! - No blocking stdin reads inside the runtime
//!
//! The helpers here load production sources with their `#[cfg(test)]`
//! modules cut off, so test code may do what production code must not.

use std::fs;
use std::path::{Path, PathBuf};

/// Headless core crate
pub const CORE_CRATE: &str = "reviewer/core";

/// Terminal front end crate
pub const TUI_CRATE: &str = "tui";

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A production source file
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Lines up to the first `#[cfg(test)]`
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Lines with their 1-based numbers, comments stripped
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().filter_map(|(idx, line)| {
            let code = line.split("//").next().unwrap_or(line).trim();
            (!code.is_empty()).then_some((idx + 1, code))
        })
    }
}

/// Every `.rs` file under `<crate_dir>/src`
///
/// # Panics
///
/// If the directory is missing, so a moved crate cannot pass silently.
#[must_use]
pub fn production_sources(crate_dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let src = root.join(crate_dir).join("src");
    assert!(src.is_dir(), "missing source directory {}", src.display());

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(&src)
        .into_iter()
        .filter_map(Result::ok)
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };
        let lines = content
            .lines()
            .take_while(|line| line.trim() != "#[cfg(test)]")
            .map(str::to_string)
            .collect();
        let path = entry
            .path()
            .strip_prefix(&root)
            .unwrap_or(entry.path())
            .to_path_buf();
        files.push(SourceFile { path, lines });
    }
    files
}

/// `file:line - what: code` for every line containing one of `needles`
#[must_use]
pub fn find_violations(files: &[SourceFile], needles: &[&str], what: &str) -> Vec<String> {
    let mut violations = Vec::new();
    for file in files {
        for (line_number, code) in file.code_lines() {
            if needles.iter().any(|needle| code.contains(needle)) {
                violations.push(format!(
                    "{}:{line_number} - {what}: {code}",
                    file.path.display()
                ));
            }
        }
    }
    violations
}
