use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::links::DEFAULT_PLAYER_BASE_URL;
use crate::errors::AppError;
use crate::tmdb::{
    TmdbConfig, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_LANGUAGE,
    LISTING_PAGE_CAP, REQUEST_TIMEOUT_SECONDS,
};

pub const APP_DIR_NAME: &str = "cinelist";
pub const TOKEN_ENV: &str = "TMDB_API_TOKEN";
pub const DATA_DIR_ENV: &str = "CINELIST_DATA_DIR";

pub fn get_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn get_config_file_path() -> PathBuf {
    get_config_dir().join("config.json")
}

pub fn get_default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub image_base_url: String,
    pub player_base_url: String,
    pub language: String,
    pub request_timeout_secs: u64,
    pub page_cap: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            player_base_url: DEFAULT_PLAYER_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            request_timeout_secs: REQUEST_TIMEOUT_SECONDS,
            page_cap: LISTING_PAGE_CAP,
            data_dir: None,
            api_token: None,
        }
    }
}

impl AppConfig {
    /// Reads `path` (or the default config file) and applies environment
    /// overrides. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(get_config_file_path);

        let mut config = if path.exists() {
            log::debug!("Reading config from {:?}", path);
            Self::from_file(&path)?
        } else {
            log::debug!("No config at {:?}, using defaults", path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.api_token = Some(token);
        }
        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(get_default_data_dir)
    }

    pub fn tmdb(&self) -> TmdbConfig {
        TmdbConfig {
            base_url: self.api_base_url.clone(),
            language: self.language.clone(),
            timeout_secs: self.request_timeout_secs,
            token: self.api_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"language": "de-DE", "page_cap": 20}"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.page_cap, 20);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.player_base_url, DEFAULT_PLAYER_BASE_URL);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config.page_cap, LISTING_PAGE_CAP);
    }

    #[test]
    fn test_overrides_token_and_data_dir() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            TOKEN_ENV => Some("secret".to_string()),
            DATA_DIR_ENV => Some("/tmp/cinelist".to_string()),
            _ => None,
        });

        assert_eq!(config.data_dir(), PathBuf::from("/tmp/cinelist"));
        let tmdb = config.tmdb();
        assert_eq!(tmdb.token.as_deref(), Some("secret"));
        assert_eq!(tmdb.timeout_secs, REQUEST_TIMEOUT_SECONDS);
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = AppConfig {
            api_token: Some("from-file".to_string()),
            ..AppConfig::default()
        };
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.api_token.as_deref(), Some("from-file"));
    }
}
