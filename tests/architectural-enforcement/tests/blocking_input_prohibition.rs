//! Integration Test: Blocking Input Prohibition
//!
//! **Policy**: Interactive prompts run inside the tokio runtime, so they read
//! the terminal through `tokio::io::stdin()` and `AsyncBufReadExt`. A
//! `std::io::stdin()` lock or `read_line` stalls a runtime worker for as long
//! as the user takes to answer.
//!
//! **Acceptable**: `stdin().is_terminal()`, which never reads.

use architectural_enforcement::{find_violations, production_sources, CORE_CRATE, TUI_CRATE};

const FORBIDDEN: [&str; 4] = [
    "stdin().lock()",
    "stdin().read_line",
    "StdinLock",
    "std::io::BufRead",
];

#[test]
fn test_no_blocking_stdin_in_production_code() {
    let mut violations = Vec::new();
    for krate in [CORE_CRATE, TUI_CRATE] {
        let files = production_sources(krate);
        violations.extend(find_violations(&files, &FORBIDDEN, "Blocking stdin read"));
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking stdin reads found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Use tokio::io::BufReader::new(tokio::io::stdin()) with AsyncBufReadExt::read_line.");
        panic!("\nFound {} blocking stdin read(s).", violations.len());
    }
}
