//! Configuration file parser for ~/.config/newsstand/config.toml.
//!
//! The config file is optional — a missing or empty file yields
//! `Config::default()` (fixture mode, default endpoint and page size).
//! Unknown keys are accepted but logged as potential typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::remote::{DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("base_url is not a valid URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified. The `NEWSSTAND_API_KEY` environment variable takes precedence
/// over the file's `api_key`. Custom Debug masks the key.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote endpoint base URL (NewsAPI-compatible).
    pub base_url: String,

    /// Articles per remote page.
    pub page_size: u32,

    /// Database filename inside the config directory.
    pub database: String,

    /// API key (the NEWSSTAND_API_KEY env var takes precedence).
    /// Absent key means fixture mode.
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            database: "news.db".to_string(),
            api_key: None,
        }
    }
}

/// Mask api_key in Debug output to keep it out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .field("database", &self.database)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Detect unknown keys before deserializing so typos get surfaced
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = ["base_url", "page_size", "database", "api_key"];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;

        // A malformed endpoint would otherwise only surface as a confusing
        // network error on the first fetch
        url::Url::parse(&config.base_url)?;

        tracing::info!(path = %path.display(), base_url = %config.base_url, "Loaded configuration");
        Ok(config)
    }

    /// Page size with a floor of 1 — a zero page size would make every
    /// online load look like the end of the result set.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.max(1)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.database, "news.db");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsstand_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("newsstand_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "   \n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = std::env::temp_dir().join("newsstand_config_test_partial");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "page_size = 25\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.base_url, DEFAULT_BASE_URL); // default

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("newsstand_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
base_url = "https://news.internal/v2"
page_size = 50
database = "alt.db"
api_key = "secret-key-123"
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "https://news.internal/v2");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.database, "alt.db");
        assert_eq!(config.api_key.as_deref(), Some("secret-key-123"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = std::env::temp_dir().join("newsstand_config_test_invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let dir = std::env::temp_dir().join("newsstand_config_test_unknown");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "page_size = 5\ntotally_fake_key = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.page_size, 5);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let dir = std::env::temp_dir().join("newsstand_config_test_badurl");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "base_url = \"not a url\"\n").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_effective_page_size_floors_at_one() {
        let mut config = Config::default();
        config.page_size = 0;
        assert_eq!(config.effective_page_size(), 1);
    }

    #[test]
    fn test_debug_masks_api_key() {
        let mut config = Config::default();
        config.api_key = Some("super-secret-key".to_string());

        let output = format!("{:?}", config);
        assert!(!output.contains("super-secret-key"));
        assert!(output.contains("[REDACTED]"));
    }
}
