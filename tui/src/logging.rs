//! Logging setup.
//!
//! Logs go to stderr so they never mix with a report on stdout.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor `-v` is given
pub const DEFAULT_FILTER: &str = "code_reviewer=warn,reviewer_core=warn";

/// Filter directive for a `-v` count
#[must_use]
pub fn directive(verbose: u8) -> String {
    let level = match verbose {
        0 => return DEFAULT_FILTER.to_string(),
        1 => "info",
        _ => "debug",
    };
    format!("code_reviewer={level},reviewer_core={level}")
}

/// Install the global subscriber.
///
/// `-v` flags take precedence over `RUST_LOG`.
pub fn init(verbose: u8) {
    let filter = if verbose > 0 {
        EnvFilter::new(directive(verbose))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
