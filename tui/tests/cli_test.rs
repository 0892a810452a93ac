//! End-to-end tests for the `code-reviewer` binary
//!
//! These run the real executable in a temporary directory with an isolated
//! config file. Nothing here reaches the network: every scenario stops
//! before a model would be called.

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

const OVERRIDE_VARS: [&str; 6] = [
    "GOOGLE_AI_API_KEY",
    "GEMINI_API_KEY",
    "CODE_REVIEWER_MODEL",
    "CODE_REVIEWER_LANGUAGE",
    "CODE_REVIEWER_API_BASE",
    "CODE_REVIEWER_CONFIG",
];

fn code_reviewer(dir: &Path, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_code-reviewer"));
    command
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(args);
    for var in OVERRIDE_VARS {
        command.env_remove(var);
    }
    command.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

// ============================================================================
// Repository check
// ============================================================================

#[test]
fn test_generation_outside_repository_fails() {
    let dir = TempDir::new().unwrap();

    for command in ["review", "report", "fix", "document"] {
        let output = code_reviewer(dir.path(), &[command]);
        assert_eq!(output.status.code(), Some(1), "{command}");
        assert_eq!(
            stderr(&output).trim(),
            "Error: Current directory is not a git repository.",
            "{command}"
        );
    }
}

#[test]
fn test_empty_diff_reports_no_changes() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let dir = TempDir::new().unwrap();
    let init = Command::new("git")
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(init.status.success());

    let output = code_reviewer(dir.path(), &["review"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "No changes found.\n");

    let output = code_reviewer(dir.path(), &["fix"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "No changes to fix.\n");

    // Nothing was generated, so onboarding never ran
    assert!(!dir.path().join("config.toml").exists());
}

// ============================================================================
// Config subcommand
// ============================================================================

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();

    let output = code_reviewer(dir.path(), &["config", "set", "output_language", "English"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Successfully set 'output_language' to 'English'\n"
    );

    let output = code_reviewer(dir.path(), &["config", "get", "output_language"]);
    assert_eq!(stdout(&output), "English\n");
}

#[test]
fn test_config_list_masks_api_key() {
    let dir = TempDir::new().unwrap();
    code_reviewer(
        dir.path(),
        &["config", "set", "google_ai_api_key", "AIzaSyExample1234"],
    );

    let output = code_reviewer(dir.path(), &["config", "list"]);
    let listing = stdout(&output);
    assert!(listing.contains("google_ai_api_key: *************1234"));
    assert!(listing.contains("ai_model: \n"));
    assert!(!listing.contains("AIzaSyExample1234"));
}

#[test]
fn test_config_unknown_key() {
    let dir = TempDir::new().unwrap();

    let output = code_reviewer(dir.path(), &["config", "get", "model"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim(), "Error: Config key 'model' not found.");
}

#[test]
fn test_config_file_is_private() {
    let dir = TempDir::new().unwrap();
    code_reviewer(dir.path(), &["config", "set", "google_ai_api_key", "secret-value"]);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(dir.path().join("config.toml"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
