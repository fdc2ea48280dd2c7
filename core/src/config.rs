//! Client configuration from `~/.config/todo/config.toml`.
//!
//! The file is optional; a missing or empty file yields
//! `ClientConfig::default()`. `TODO_API_URL` overrides `base_url`.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const BASE_URL_ENV: &str = "TODO_API_URL";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Root URL of the todo API, without a trailing `/todos`.
    pub base_url: String,

    /// Where to keep the session token. `None` keeps it in memory only.
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    const MAX_FILE_SIZE: u64 = 1_048_576;
    const KNOWN_KEYS: [&'static str; 2] = ["base_url", "session_file"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(ClientConfig::default())`
    /// - Empty file → `Ok(ClientConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: ClientConfig = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Apply an override value, typically read from [`BASE_URL_ENV`].
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(base_url = %url, "Overriding base_url");
            self.base_url = url;
        }
        self
    }

    /// `TODO_API_URL` from the environment, if set.
    pub fn env_base_url() -> Option<String> {
        std::env::var(BASE_URL_ENV).ok()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("todo_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert!(config.session_file.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/todo_test_nonexistent_config.toml");
        assert_eq!(ClientConfig::load(path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let path = write_config("empty", "  \n");
        assert_eq!(ClientConfig::load(&path).unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let path = write_config("partial", r#"session_file = "/tmp/todo-session""#);
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.session_file, Some(PathBuf::from("/tmp/todo-session")));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let path = write_config(
            "unknown",
            "base_url = \"https://todo.example.com\"\ndark_mode = true\n",
        );
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://todo.example.com");
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_oversized_file_is_rejected() {
        let path = write_config("large", &"#".repeat(1_048_577));
        assert!(matches!(
            ClientConfig::load(&path).unwrap_err(),
            ConfigError::TooLarge(_)
        ));
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::default()
            .with_base_url_override(Some("http://10.0.0.2:8080".to_string()));
        assert_eq!(config.base_url, "http://10.0.0.2:8080");

        let untouched = ClientConfig::default().with_base_url_override(Some("  ".to_string()));
        assert_eq!(untouched.base_url, "http://127.0.0.1:3000");
    }
}
