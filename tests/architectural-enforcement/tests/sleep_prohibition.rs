//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code never sleeps to wait for something. The
//! animation is driven by the runner's clock and the operation's completion
//! event, so a sleep is always a bug or a hidden latency.
//!
//! **Acceptable**: `tokio::time::sleep` inside the clock, which is the one
//! place that owns the tick interval.

use architectural_enforcement::{find_violations, production_sources, CORE_CRATE, TUI_CRATE};

const FORBIDDEN: [&str; 2] = ["thread::sleep", "time::sleep"];

/// Files allowed to sleep, relative to the crate's `src`
const ALLOWED: [&str; 1] = ["runner/clock.rs"];

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for krate in [CORE_CRATE, TUI_CRATE] {
        let files: Vec<_> = production_sources(krate)
            .into_iter()
            .filter(|file| !ALLOWED.iter().any(|allowed| file.path.ends_with(allowed)))
            .collect();
        violations.extend(find_violations(&files, &FORBIDDEN, "Sleep call"));
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Sleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Drive waiting with events: the clock's Tick, TaskFinished or a CancellationToken.");
        panic!("\nFound {} sleep call(s) in production code.", violations.len());
    }
}
