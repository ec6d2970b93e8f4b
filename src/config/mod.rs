use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::i18n::Language;

/// Default backend the app talks to when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the health backend
    pub base_url: String,

    /// Display language at startup
    pub language: Language,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Close success notifications on form screens after this many seconds.
    /// `None` keeps them open until the user acknowledges.
    pub auto_dismiss_secs: Option<u64>,

    /// Directory for log files
    pub data_dir: PathBuf,

    /// Enable mouse capture in the terminal
    pub mouse_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            language: Language::English,
            timeout_secs: 15,
            auto_dismiss_secs: None,
            data_dir: default_data_dir(),
            mouse_enabled: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("carelog"))
        .unwrap_or_else(|| PathBuf::from("./.carelog"))
}

impl Config {
    /// Initialize configuration from env, config files and defaults
    pub async fn init() -> Result<Self> {
        debug!("Initializing configuration");

        let mut config = match Self::load_from_file().await {
            Ok(file_config) => file_config,
            Err(e) => {
                debug!("Using default configuration: {}", e);
                Self::default()
            }
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(&mut self) {
        if let Ok(base_url) = std::env::var("CARELOG_BASE_URL") {
            self.base_url = base_url;
        }

        if let Ok(lang) = std::env::var("CARELOG_LANG") {
            match lang.parse() {
                Ok(language) => self.language = language,
                Err(e) => debug!("Ignoring CARELOG_LANG: {}", e),
            }
        }

        if let Ok(timeout_str) = std::env::var("CARELOG_TIMEOUT_SECS") {
            if let Ok(timeout) = timeout_str.parse() {
                self.timeout_secs = timeout;
            }
        }

        if let Ok(secs_str) = std::env::var("CARELOG_AUTO_DISMISS_SECS") {
            self.auto_dismiss_secs = secs_str.parse().ok().filter(|secs| *secs > 0);
        }

        if let Ok(data_dir) = std::env::var("CARELOG_DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(mouse) = std::env::var("CARELOG_MOUSE") {
            self.mouse_enabled = mouse.to_lowercase() == "true";
        }
    }

    /// Candidate configuration files in priority order
    pub fn config_paths() -> Vec<PathBuf> {
        let mut config_paths = vec![
            PathBuf::from("./.carelog.json"),
            PathBuf::from("./carelog.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            config_paths.push(config_dir.join("carelog").join("carelog.json"));
        }

        config_paths
    }

    /// Load configuration from the first carelog.json found
    pub async fn load_from_file() -> Result<Self> {
        for path in Self::config_paths() {
            if path.exists() {
                return Self::load_from_path(&path).await;
            }
        }

        Err(anyhow::anyhow!("No configuration file found"))
    }

    /// Load configuration from a specific file
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid configuration in {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Base URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            ));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow::anyhow!("timeout_secs must be greater than 0"));
        }

        if self.auto_dismiss_secs == Some(0) {
            return Err(anyhow::anyhow!("auto_dismiss_secs must be greater than 0 when set"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.language, Language::English);
        assert_eq!(config.auto_dismiss_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auto_dismiss_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_base_trims_slash() {
        let mut config = Config::default();
        config.base_url = "https://health.example.org/api/".to_string();
        assert_eq!(config.api_base(), "https://health.example.org/api");
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("carelog.json");
        std::fs::write(
            &path,
            r#"{"base_url": "https://health.example.org/api", "language": "ta"}"#,
        )
        .unwrap();

        let config = Config::load_from_path(&path).await.unwrap();
        assert_eq!(config.base_url, "https://health.example.org/api");
        assert_eq!(config.language, Language::Tamil);
        assert_eq!(config.timeout_secs, 15);
    }

    #[tokio::test]
    async fn test_load_invalid_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("carelog.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(Config::load_from_path(&path).await.is_err());
    }
}
