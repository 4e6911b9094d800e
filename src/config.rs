use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ai::{DEFAULT_COMPLETION_API_URL, DEFAULT_COMPLETION_MODEL};
use crate::error::{AppError, Result};
use crate::models::SortMode;
use crate::search::DEFAULT_SEARCH_API_URL;

const APP_DIR: &str = "review-lens";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub openai_api_key: Option<String>,

    #[serde(default = "default_search_api_url")]
    pub search_api_url: String,

    #[serde(default = "default_completion_api_url")]
    pub completion_api_url: String,

    #[serde(default = "default_completion_model")]
    pub completion_model: String,

    #[serde(default = "default_count")]
    pub default_count: u32,

    #[serde(default)]
    pub default_sort: SortMode,
}

/// Client id and secret for the blog search API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

fn default_db_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("reviews.db")
        .to_string_lossy()
        .to_string()
}

fn default_search_api_url() -> String {
    DEFAULT_SEARCH_API_URL.to_string()
}

fn default_completion_api_url() -> String {
    DEFAULT_COMPLETION_API_URL.to_string()
}

fn default_completion_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn default_count() -> u32 {
    50
}

/// Treat blank strings from the file or the environment as unset.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            naver_client_id: None,
            naver_client_secret: None,
            openai_api_key: None,
            search_api_url: default_search_api_url(),
            completion_api_url: default_completion_api_url(),
            completion_model: default_completion_model(),
            default_count: default_count(),
            default_sort: SortMode::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    pub fn search_credentials(&self) -> Result<SearchCredentials> {
        let client_id = non_empty(&self.naver_client_id)
            .ok_or(AppError::MissingCredential("Naver client id"))?;
        let client_secret = non_empty(&self.naver_client_secret)
            .ok_or(AppError::MissingCredential("Naver client secret"))?;

        Ok(SearchCredentials {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }

    pub fn completion_api_key(&self) -> Option<&str> {
        non_empty(&self.openai_api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
db_path = "/tmp/reviews.db"
naver_client_id = "id"
default_sort = "relevance"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.db_path, "/tmp/reviews.db");
        assert_eq!(config.default_sort, SortMode::Relevance);
        assert_eq!(config.default_count, 50);
        assert_eq!(config.completion_model, DEFAULT_COMPLETION_MODEL);
        assert_eq!(config.search_api_url, DEFAULT_SEARCH_API_URL);
    }

    #[test]
    fn search_credentials_require_both_values() {
        let mut config = Config {
            naver_client_id: Some("id".into()),
            ..Config::default()
        };
        assert!(matches!(
            config.search_credentials(),
            Err(AppError::MissingCredential("Naver client secret"))
        ));

        config.naver_client_secret = Some("   ".into());
        assert!(config.search_credentials().is_err());

        config.naver_client_secret = Some("secret".into());
        let creds = config.search_credentials().unwrap();
        assert_eq!(creds.client_id, "id");
        assert_eq!(creds.client_secret, "secret");
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        assert_eq!(config.completion_api_key(), None);
        config.openai_api_key = Some(String::new());
        assert_eq!(config.completion_api_key(), None);
        config.openai_api_key = Some("sk-test".into());
        assert_eq!(config.completion_api_key(), Some("sk-test"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_count = \"many\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AppError::ConfigParse(_))
        ));
    }
}
