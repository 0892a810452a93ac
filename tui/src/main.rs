//! code-reviewer - AI code review for the current git repository
//!
//! Run `code-reviewer --help` for the subcommands.

use std::io::{self, IsTerminal};
use std::panic;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{cursor::Show, execute, terminal::disable_raw_mode};

use code_reviewer::{commands, logging, theme, Cli};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Restore the terminal before the panic message is printed
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), Show);
        original_hook(panic_info);
    }));

    match commands::run(cli).await {
        Ok(status) => status.exit_code(),
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!(
                "{}",
                theme::paint(
                    &format!("{err:#}"),
                    theme::ERROR_INDEX,
                    io::stderr().is_terminal()
                )
            );
            ExitCode::FAILURE
        }
    }
}
