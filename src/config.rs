//! Runtime configuration and its on-disk store.
//!
//! [`Config`] is built once at startup and handed to the client. The API key
//! may come from the command line, the environment, or `~/.rustplos.json`.

use crate::error::{PlosError, Result};
use crate::journals::JournalDirectory;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

/// PLOS Search API endpoint
pub const DEFAULT_SEARCH_URL: &str = "http://api.plos.org/search";

/// HTTP request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default config file path: `~/.rustplos.json`
fn default_config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".rustplos.json"))
        .ok_or_else(|| PlosError::Config("Cannot determine home directory".to_string()))
}

/// Immutable settings shared by the query builder, transport and URL formatter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Search endpoint, without query string
    pub search_url: String,
    /// Credential sent as `api_key` on every request
    pub api_key: String,
    /// Journal name -> web site table
    pub journals: JournalDirectory,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Create a config for the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(PlosError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            api_key,
            journals: JournalDirectory::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// Point the client at a different search endpoint (mirror, test server).
    pub fn with_search_url(mut self, search_url: &str) -> Result<Self> {
        let parsed = Url::parse(search_url)
            .map_err(|e| PlosError::Config(format!("Invalid search URL '{}': {}", search_url, e)))?;
        if parsed.query().is_some() {
            return Err(PlosError::Config(format!(
                "Search URL must not carry a query string: {}",
                search_url
            )));
        }
        self.search_url = search_url.trim_end_matches('?').to_string();
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Resolve settings: explicit values win over the stored file.
    pub fn resolve(
        api_key: Option<String>,
        search_url: Option<String>,
        stored: StoredConfig,
    ) -> Result<Self> {
        let api_key = api_key.or(stored.api_key).ok_or_else(|| {
            PlosError::Config(
                "No API key configured. Pass --api-key, set PLOS_API_KEY, or run 'rustplos config set-key'"
                    .to_string(),
            )
        })?;
        let config = Self::new(api_key)?;
        match search_url.or(stored.search_url) {
            Some(url) => config.with_search_url(&url),
            None => Ok(config),
        }
    }
}

/// Persisted subset of [`Config`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_url: Option<String>,
}

/// Loads and saves [`StoredConfig`] as JSON
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store at the default path
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: default_config_path()?,
        })
    }

    /// Create a store at a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the stored config
    ///
    /// Returns defaults if the file doesn't exist or is invalid
    pub fn load(&self) -> StoredConfig {
        if !self.path.exists() {
            debug!("Config file not found: {:?}", self.path);
            return StoredConfig::default();
        }

        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<StoredConfig>(&content) {
                Ok(stored) => {
                    debug!("Loaded config from {:?}", self.path);
                    stored
                }
                Err(e) => {
                    warn!("Failed to parse config file: {}", e);
                    StoredConfig::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                StoredConfig::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self, stored: &StoredConfig) -> Result<()> {
        let content = serde_json::to_string_pretty(stored)?;
        std::fs::write(&self.path, content)?;
        info!("Saved config to {:?}", self.path);
        Ok(())
    }

    /// Remove the stored config
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Cleared config at {:?}", self.path);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(Config::new("  "), Err(PlosError::Config(_))));
    }

    #[test]
    fn test_search_url_validation() -> Result<()> {
        let config = Config::new("k")?.with_search_url("http://localhost:8983/solr/search")?;
        assert_eq!(config.search_url, "http://localhost:8983/solr/search");
        assert!(Config::new("k")?.with_search_url("not a url").is_err());
        assert!(Config::new("k")?
            .with_search_url("http://api.plos.org/search?q=x")
            .is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_precedence() -> Result<()> {
        let stored = StoredConfig {
            api_key: Some("stored".to_string()),
            search_url: Some("http://mirror.example/search".to_string()),
        };
        let config = Config::resolve(Some("flag".to_string()), None, stored.clone())?;
        assert_eq!(config.api_key, "flag");
        assert_eq!(config.search_url, "http://mirror.example/search");

        let config = Config::resolve(None, None, stored)?;
        assert_eq!(config.api_key, "stored");

        assert!(matches!(
            Config::resolve(None, None, StoredConfig::default()),
            Err(PlosError::Config(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_missing() {
        let store = ConfigStore::with_path(PathBuf::from("/nonexistent/rustplos.json"));
        assert_eq!(store.load(), StoredConfig::default());
    }

    #[test]
    fn test_save_load_clear() -> Result<()> {
        let dir = TempDir::new()?;
        let store = ConfigStore::with_path(dir.path().join("rustplos.json"));

        let stored = StoredConfig {
            api_key: Some("abc123".to_string()),
            search_url: None,
        };
        store.save(&stored)?;
        assert_eq!(store.load(), stored);

        store.clear()?;
        assert!(!store.path().exists());
        assert_eq!(store.load(), StoredConfig::default());
        Ok(())
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("rustplos.json");
        std::fs::write(&path, "{not json")?;
        assert_eq!(ConfigStore::with_path(path).load(), StoredConfig::default());
        Ok(())
    }
}
