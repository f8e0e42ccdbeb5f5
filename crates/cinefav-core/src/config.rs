use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CinefavError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub images: ImageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Remote catalog (TMDB) connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub language: String,
    /// v4 read access token, sent as a bearer header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Legacy v3 key, sent as the `api_key` query parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Poster URL resolution used by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    pub base_url: String,
    pub placeholder_url: String,
}

impl AppConfig {
    /// Load config: the user file if it exists, otherwise the built-in defaults.
    pub fn load() -> Result<Self, CinefavError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            let defaults: AppConfig =
                toml::from_str(DEFAULT_CONFIG).map_err(|e| CinefavError::Config(e.to_string()))?;
            defaults.validate()?;
            Ok(defaults)
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, CinefavError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CinefavError::Config(e.to_string()))?;
        let config: AppConfig =
            toml::from_str(&content).map_err(|e| CinefavError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CinefavError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CinefavError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CinefavError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "cinefav")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn validate(&self) -> Result<(), CinefavError> {
        for (key, value) in [
            ("api.base_url", &self.api.base_url),
            ("images.base_url", &self.images.base_url),
            ("images.placeholder_url", &self.images.placeholder_url),
        ] {
            Url::parse(value).map_err(|e| CinefavError::Config(format!("{key}: {e}")))?;
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.images.base_url, "https://image.tmdb.org/t/p/w154");
        assert!(config.api.access_token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.api.access_token = Some("secret".into());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api.access_token.as_deref(), Some("secret"));
        assert_eq!(loaded.images.placeholder_url, config.images.placeholder_url);
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.api.base_url = "not a url".into();
        config.save_to(&path).unwrap();

        match AppConfig::load_from(&path) {
            Err(CinefavError::Config(msg)) => assert!(msg.starts_with("api.base_url")),
            other => panic!("Expected config error, got {other:?}"),
        }
    }
}
