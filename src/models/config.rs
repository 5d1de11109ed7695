//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Webshare search configuration.
    pub webshare: WebshareConfig,
    /// TMDB configuration.
    pub tmdb: TmdbConfig,
    /// Query aggregation tuning.
    pub search: SearchConfig,
    /// Root directory holding both stores.
    pub data_dir: PathBuf,
}

/// Webshare configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebshareConfig {
    /// API base URL, with trailing slash.
    pub api_url: String,
    /// Session token (`wst`).
    pub token: Option<String>,
    /// Result category passed with every query.
    pub category: String,
    /// Sort order passed with every query.
    pub sort: String,
    /// Maximum results per query.
    pub limit: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    /// API key or Bearer token.
    pub api_key: Option<String>,
    /// Language for responses.
    pub language: String,
}

/// Search aggregation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Lexical hints accepted when no episode pattern matches a filename.
    pub episode_keywords: Vec<String>,
    /// Queries in flight at once. 1 keeps the search strictly sequential.
    pub max_concurrent_queries: usize,
    /// Upper bound for a whole search/refresh, in seconds.
    pub refresh_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webshare: WebshareConfig::default(),
            tmdb: TmdbConfig::default(),
            search: SearchConfig::default(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for WebshareConfig {
    fn default() -> Self {
        Self {
            api_url: "https://webshare.cz/api/".to_string(),
            token: std::env::var("WEBSHARE_TOKEN").ok(),
            category: "video".to_string(),
            sort: "recent".to_string(),
            limit: 1000,
            timeout_secs: 30,
        }
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("TMDB_API_KEY").ok(),
            language: "cs-CZ".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            episode_keywords: ["episode", "season", "series", "ep", "complete", "serie", "disk"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            max_concurrent_queries: 1,
            refresh_timeout_secs: 300,
        }
    }
}

impl Config {
    /// Directory of the filename-derived series trees.
    pub fn series_dir(&self) -> PathBuf {
        self.data_dir.join("series_db")
    }

    /// Directory of the TMDB-derived canonical structures.
    pub fn metadata_dir(&self) -> PathBuf {
        self.data_dir.join("series_db_tmdb")
    }

    /// Check values that would make the pipeline misbehave.
    pub fn validate(&self) -> crate::Result<()> {
        if self.search.max_concurrent_queries == 0 {
            return Err(crate::Error::InvalidConfig(
                "search.max_concurrent_queries must be at least 1".to_string(),
            ));
        }
        if self.search.refresh_timeout_secs == 0 {
            return Err(crate::Error::InvalidConfig(
                "search.refresh_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.webshare.limit == 0 {
            return Err(crate::Error::InvalidConfig(
                "webshare.limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Get the configuration directory path.
fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("series_catalog")
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("series_catalog")
}

/// Default location of `config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_config_path().join("config.toml")
}

/// Load configuration from file.
///
/// A missing file yields the defaults; a present but unparsable file is an error.
pub fn load_config(path: Option<&Path>) -> crate::Result<Config> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        tracing::debug!("No config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&config_path)?;
    let mut config: Config = toml::from_str(&content).map_err(|e| {
        crate::Error::InvalidConfig(format!("{}: {}", config_path.display(), e))
    })?;

    // Secrets not in the file still come from the environment
    if config.webshare.token.is_none() {
        config.webshare.token = std::env::var("WEBSHARE_TOKEN").ok();
    }
    if config.tmdb.api_key.is_none() {
        config.tmdb.api_key = std::env::var("TMDB_API_KEY").ok();
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_default() {
        let config = SearchConfig::default();
        assert_eq!(config.max_concurrent_queries, 1);
        assert_eq!(config.episode_keywords.len(), 7);
        assert!(config.episode_keywords.contains(&"disk".to_string()));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "/tmp/catalog"

            [search]
            max_concurrent_queries = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.search.max_concurrent_queries, 4);
        assert_eq!(config.search.refresh_timeout_secs, 300);
        assert_eq!(config.webshare.category, "video");
        assert_eq!(config.series_dir(), PathBuf::from("/tmp/catalog/series_db"));
        assert_eq!(
            config.metadata_dir(),
            PathBuf::from("/tmp/catalog/series_db_tmdb")
        );
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.search.max_concurrent_queries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.search.refresh_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(crate::Error::InvalidConfig(msg)) if msg.contains("refresh_timeout_secs")
        ));
    }

    #[test]
    fn test_load_missing_config_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.webshare.limit, 1000);
    }
}
