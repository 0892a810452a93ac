//! TOML Configuration File Support
//!
//! User settings live in `~/.config/code-reviewer/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. Environment variables
//! 2. TOML configuration file
//! 3. Default values
//!
//! Only the file layer is ever written back, so an API key exported in the
//! shell never ends up on disk through `config set`.
//!
//! # Example Configuration
//!
//! ```toml
//! google_ai_api_key = "AIza..."
//! ai_model = "gemini-2.5-flash"
//! output_language = "Korean"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backend::DEFAULT_API_BASE;

/// Directory name under the platform config dir
const APP_DIR: &str = "code-reviewer";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to write config file
    #[error("Failed to write config file at {path}: {source}")]
    WriteError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Key is not one of [`ConfigKey::ALL`]
    #[error("Config key '{0}' not found.")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The platform has no config directory
    #[error("Could not determine the configuration directory")]
    NoConfigDir,
}

// =============================================================================
// Keys and Sources
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value (or unset)
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A user-settable configuration key
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Google AI Studio API key
    GoogleAiApiKey,
    /// Gemini model identifier
    AiModel,
    /// Natural language the reports are written in
    OutputLanguage,
    /// API endpoint, overridable for proxies and tests
    ApiBaseUrl,
}

impl ConfigKey {
    /// Every key, in display order
    pub const ALL: [ConfigKey; 4] = [
        Self::GoogleAiApiKey,
        Self::AiModel,
        Self::OutputLanguage,
        Self::ApiBaseUrl,
    ];

    /// Name as written in the TOML file and on the command line
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GoogleAiApiKey => "google_ai_api_key",
            Self::AiModel => "ai_model",
            Self::OutputLanguage => "output_language",
            Self::ApiBaseUrl => "api_base_url",
        }
    }

    /// Environment variables that override this key, checked in order
    #[must_use]
    pub fn env_vars(self) -> &'static [&'static str] {
        match self {
            Self::GoogleAiApiKey => &["GOOGLE_AI_API_KEY", "GEMINI_API_KEY"],
            Self::AiModel => &["CODE_REVIEWER_MODEL"],
            Self::OutputLanguage => &["CODE_REVIEWER_LANGUAGE"],
            Self::ApiBaseUrl => &["CODE_REVIEWER_API_BASE"],
        }
    }

    /// Whether the value must be masked when listed
    #[must_use]
    pub fn is_secret(self) -> bool {
        matches!(self, Self::GoogleAiApiKey)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// Hide all but the last four characters of a secret
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}

// =============================================================================
// TOML Configuration Structure
// =============================================================================

/// The persisted file layer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ConfigToml {
    /// Google AI Studio API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_ai_api_key: Option<String>,

    /// Gemini model identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,

    /// Report language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_language: Option<String>,

    /// API endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl ConfigToml {
    fn value(&self, key: ConfigKey) -> Option<&String> {
        match key {
            ConfigKey::GoogleAiApiKey => self.google_ai_api_key.as_ref(),
            ConfigKey::AiModel => self.ai_model.as_ref(),
            ConfigKey::OutputLanguage => self.output_language.as_ref(),
            ConfigKey::ApiBaseUrl => self.api_base_url.as_ref(),
        }
    }

    fn slot(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::GoogleAiApiKey => &mut self.google_ai_api_key,
            ConfigKey::AiModel => &mut self.ai_model,
            ConfigKey::OutputLanguage => &mut self.output_language,
            ConfigKey::ApiBaseUrl => &mut self.api_base_url,
        }
    }
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration for code-reviewer
///
/// Public fields hold the effective values. Use [`set`](Self::set) rather
/// than assigning fields directly when the change should be persisted.
#[derive(Clone, Debug)]
pub struct ReviewerConfig {
    /// Google AI Studio API key
    pub google_ai_api_key: Option<String>,

    /// Gemini model identifier
    pub ai_model: Option<String>,

    /// Report language
    pub output_language: Option<String>,

    /// API endpoint without trailing slash
    pub api_base_url: String,

    /// Path to the config file that was loaded or will be saved to
    pub config_file_path: Option<PathBuf>,

    /// What is on disk (plus pending `set` calls)
    file: ConfigToml,

    /// Keys whose effective value came from the environment
    env_overrides: Vec<ConfigKey>,
}

impl Default for ReviewerConfig {
    fn default() -> Self {
        Self {
            google_ai_api_key: None,
            ai_model: None,
            output_language: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            config_file_path: None,
            file: ConfigToml::default(),
            env_overrides: Vec::new(),
        }
    }
}

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/code-reviewer/config.toml` or the platform
/// equivalent.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

impl ReviewerConfig {
    /// Load from the default path and the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed. A missing config file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(default_config_path(), |name| std::env::var(name).ok())
    }

    /// Load from a specific file and the process environment
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_from_path(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Self::load_with(Some(path.into()), |name| std::env::var(name).ok())
    }

    /// Load with an explicit environment lookup
    ///
    /// `path = None` uses only defaults and the environment.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn load_with<F>(path: Option<PathBuf>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ref config_path) = path {
            if config_path.exists() {
                let toml_content =
                    std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                        path: config_path.clone(),
                        source: e,
                    })?;

                config.file = toml::from_str(&toml_content)?;
                config.apply_file_layer();

                tracing::info!(
                    path = %config_path.display(),
                    "Loaded configuration from file"
                );
            } else {
                tracing::debug!(
                    path = %config_path.display(),
                    "Config file not found, using defaults"
                );
            }
        }
        config.config_file_path = path;

        config.apply_env_config(env);

        Ok(config)
    }

    /// Write the file layer to [`config_file_path`](Self::config_file_path),
    /// falling back to the default path
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoConfigDir`] if no path is known, otherwise see
    /// [`save_to_path`](Self::save_to_path).
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = self
            .config_file_path
            .clone()
            .or_else(default_config_path)
            .ok_or(ConfigError::NoConfigDir)?;
        self.save_to_path(&path)
    }

    /// Write the file layer to `path`, creating parent directories.
    ///
    /// On Unix the file is readable by the owner only.
    ///
    /// # Errors
    ///
    /// [`ConfigError::WriteError`] on I/O failure.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = toml::to_string_pretty(&self.file)?;
        write_private(path, content.as_bytes()).map_err(write_error)?;

        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Effective value of `key`
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::GoogleAiApiKey => self.google_ai_api_key.as_deref(),
            ConfigKey::AiModel => self.ai_model.as_deref(),
            ConfigKey::OutputLanguage => self.output_language.as_deref(),
            ConfigKey::ApiBaseUrl => Some(&self.api_base_url),
        }
    }

    /// Set `key` in the file layer. An empty value unsets it.
    ///
    /// The effective value changes too unless the environment overrides it.
    /// Nothing is written until [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// [`ConfigError::ValidationError`] for an API base URL that is not
    /// http(s).
    pub fn set(&mut self, key: ConfigKey, value: impl Into<String>) -> Result<(), ConfigError> {
        let value = value.into();
        let value = value.trim();

        if key == ConfigKey::ApiBaseUrl
            && !value.is_empty()
            && !(value.starts_with("http://") || value.starts_with("https://"))
        {
            return Err(ConfigError::ValidationError(format!(
                "{key} must start with http:// or https://, got '{value}'"
            )));
        }

        let stored = (!value.is_empty()).then(|| value.to_string());
        self.file.slot(key).clone_from(&stored);

        if !self.env_overrides.contains(&key) {
            self.assign(key, stored);
        }
        Ok(())
    }

    /// Every key with its effective value
    #[must_use]
    pub fn entries(&self) -> Vec<(ConfigKey, Option<&str>)> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .collect()
    }

    /// Where the effective value of `key` came from
    #[must_use]
    pub fn source(&self, key: ConfigKey) -> ConfigSource {
        if self.env_overrides.contains(&key) {
            ConfigSource::Env
        } else if self.file.value(key).is_some() {
            ConfigSource::File
        } else {
            ConfigSource::Default
        }
    }

    fn assign(&mut self, key: ConfigKey, value: Option<String>) {
        match key {
            ConfigKey::GoogleAiApiKey => self.google_ai_api_key = value,
            ConfigKey::AiModel => self.ai_model = value,
            ConfigKey::OutputLanguage => self.output_language = value,
            ConfigKey::ApiBaseUrl => {
                self.api_base_url = value
                    .map_or_else(|| DEFAULT_API_BASE.to_string(), |url| {
                        url.trim_end_matches('/').to_string()
                    });
            }
        }
    }

    /// Apply TOML values over the defaults
    fn apply_file_layer(&mut self) {
        for key in ConfigKey::ALL {
            let value = self.file.value(key).filter(|v| !v.is_empty()).cloned();
            if value.is_some() {
                self.assign(key, value);
            }
        }
    }

    /// Apply environment variable overrides (overrides file values)
    fn apply_env_config<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for key in ConfigKey::ALL {
            let value = key
                .env_vars()
                .iter()
                .find_map(|name| env(name).filter(|v| !v.trim().is_empty()));

            if let Some(value) = value {
                tracing::debug!(key = %key, "Configuration overridden from environment");
                self.assign(key, Some(value.trim().to_string()));
                self.env_overrides.push(key);
            }
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}
