//! Integration Test: Core Isolation
//!
//! **Policy**: `reviewer-core` is headless. Everything terminal-specific
//! lives in the `tui` crate behind the runner's `Surface` trait.

use std::fs;

use architectural_enforcement::{find_violations, production_sources, workspace_root, CORE_CRATE};

const TERMINAL_CRATES: [&str; 2] = ["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_terminal_dependencies() {
    let manifest = workspace_root().join(CORE_CRATE).join("Cargo.toml");
    let content = fs::read_to_string(&manifest).unwrap();

    for line in content.lines().map(str::trim) {
        if line.starts_with('#') {
            continue;
        }
        for krate in TERMINAL_CRATES {
            assert!(
                !line.starts_with(krate),
                "{} depends on {krate}: {line}",
                manifest.display()
            );
        }
    }
}

#[test]
fn test_core_sources_do_not_use_terminal_crates() {
    let files = production_sources(CORE_CRATE);
    assert!(!files.is_empty());

    let needles: Vec<String> = TERMINAL_CRATES
        .iter()
        .map(|krate| format!("{krate}::"))
        .collect();
    let needles: Vec<&str> = needles.iter().map(String::as_str).collect();

    let violations = find_violations(&files, &needles, "Terminal crate in core");
    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        panic!(
            "\nFound {} terminal reference(s) in reviewer-core.\nMove them behind the Surface trait.",
            violations.len()
        );
    }
}
