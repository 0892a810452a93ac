//! `config list|get|set`

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use reviewer_core::config::mask_secret;
use reviewer_core::{ConfigKey, ConfigSource, ReviewerConfig};

use super::load_config;
use crate::cli::ConfigAction;

/// Run a `config` action against the file at `path` (or the default one).
///
/// # Errors
///
/// Load, key lookup, validation or save failures.
pub fn run(action: ConfigAction, path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = load_config(path).context("Error loading config")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match action {
        ConfigAction::List => list(&config, &mut out)?,
        ConfigAction::Get { key } => get(&config, &key, &mut out)?,
        ConfigAction::Set { key, value } => set(&mut config, &key, &value, &mut out)?,
    }
    Ok(())
}

/// Print every key as `key: value`; secrets are masked, unset keys blank
///
/// # Errors
///
/// Fails if `out` cannot be written.
pub fn list(config: &ReviewerConfig, out: &mut impl Write) -> io::Result<()> {
    for (key, value) in config.entries() {
        writeln!(out, "{key}: {}", display_value(key, value))?;
    }
    Ok(())
}

/// Print the raw value of one key; empty when unset
///
/// # Errors
///
/// Unknown key, or `out` cannot be written.
pub fn get(config: &ReviewerConfig, key: &str, out: &mut impl Write) -> anyhow::Result<()> {
    let key: ConfigKey = key.parse().context("Error")?;
    writeln!(out, "{}", config.get(key).unwrap_or_default())?;
    Ok(())
}

/// Store one value and save the file
///
/// # Errors
///
/// Unknown key, invalid value, or the file cannot be saved.
pub fn set(
    config: &mut ReviewerConfig,
    key: &str,
    value: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let key: ConfigKey = key.parse().context("Error")?;
    config.set(key, value).context("Error")?;
    config.save().context("Error saving config")?;

    writeln!(
        out,
        "Successfully set '{key}' to '{}'",
        display_value(key, Some(value.trim()))
    )?;

    if config.source(key) == ConfigSource::Env {
        writeln!(
            out,
            "Note: {} is set in the environment and takes precedence.",
            key.env_vars().join(" / ")
        )?;
    }
    Ok(())
}

fn display_value(key: ConfigKey, value: Option<&str>) -> String {
    match value {
        Some(value) if key.is_secret() => mask_secret(value),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir, env: &'static [(&'static str, &'static str)]) -> ReviewerConfig {
        ReviewerConfig::load_with(Some(dir.path().join("config.toml")), |name| {
            env.iter()
                .find(|(var, _)| *var == name)
                .map(|(_, value)| (*value).to_string())
        })
        .unwrap()
    }

    fn output(run: impl FnOnce(&mut Vec<u8>)) -> String {
        let mut out = Vec::new();
        run(&mut out);
        String::from_utf8(out).unwrap()
    }

    fn saved(dir: &TempDir) -> String {
        std::fs::read_to_string(Path::new(dir.path()).join("config.toml")).unwrap()
    }

    #[test]
    fn test_list_masks_key_and_blanks_unset() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[]);
        config.set(ConfigKey::GoogleAiApiKey, "AIzaSyExample1234").unwrap();
        config.set(ConfigKey::AiModel, "gemini-2.5-pro").unwrap();

        let text = output(|out| list(&config, out).unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "google_ai_api_key: *************1234");
        assert_eq!(lines[1], "ai_model: gemini-2.5-pro");
        assert_eq!(lines[2], "output_language: ");
        assert!(lines[3].starts_with("api_base_url: https://"));
    }

    #[test]
    fn test_get_prints_raw_value() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[]);
        config.set(ConfigKey::OutputLanguage, "English").unwrap();

        let text = output(|out| get(&config, "output_language", out).unwrap());
        assert_eq!(text, "English\n");

        let text = output(|out| get(&config, "ai_model", out).unwrap());
        assert_eq!(text, "\n");
    }

    #[test]
    fn test_unknown_key_message() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir, &[]);

        let err = get(&config, "model", &mut Vec::new()).unwrap_err();
        assert_eq!(format!("{err:#}"), "Error: Config key 'model' not found.");
    }

    #[test]
    fn test_set_saves_and_confirms() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[]);

        let text = output(|out| set(&mut config, "ai_model", "gemini-2.5-pro", out).unwrap());
        assert_eq!(text, "Successfully set 'ai_model' to 'gemini-2.5-pro'\n");
        assert!(saved(&dir).contains("ai_model = \"gemini-2.5-pro\""));
    }

    #[test]
    fn test_set_masks_secret_in_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[]);

        let text =
            output(|out| set(&mut config, "google_ai_api_key", "AIzaSyExample1234", out).unwrap());
        assert!(!text.contains("AIzaSyExample1234"));
        assert!(text.ends_with("1234'\n"));
        assert!(saved(&dir).contains("AIzaSyExample1234"));
    }

    #[test]
    fn test_set_rejects_bad_base_url() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[]);

        let err = set(&mut config, "api_base_url", "ftp://example.com", &mut Vec::new());
        assert!(err.is_err());
        assert!(!dir.path().join("config.toml").exists());
    }

    #[test]
    fn test_set_notes_environment_override() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir, &[("GOOGLE_AI_API_KEY", "env-key-000000")]);

        let text = output(|out| set(&mut config, "google_ai_api_key", "file-key-111111", out).unwrap());
        assert!(text.contains("takes precedence"));
        assert!(saved(&dir).contains("file-key-111111"));
    }
}
