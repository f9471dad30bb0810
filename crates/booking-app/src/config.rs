//! Application configuration, read from TOML.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3001"
//! timeout_seconds = 10
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3001
//! db = "db.json"
//! ```

use crate::api::parse_base_url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Seed database loaded by `serve`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            db: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/bookings/config.toml`, falling back to the current directory.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("bookings").join("config.toml")
    }

    /// Loads `path` if given, otherwise the default file.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Self::config_path();
                if !path.exists() {
                    return Ok(Self::default());
                }
                Self::from_file(&path)
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Applies command-line and environment overrides on top of the file values.
    pub fn with_api_url(mut self, base_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
            self.validate()?;
        }
        Ok(self)
    }

    /// Checks:
    /// - `api.base_url` parses as an http(s) base URL
    /// - `api.timeout_seconds` is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = parse_base_url(&self.api.base_url).map_err(|e| ConfigError::ValidationError {
            message: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError {
                message: format!("api.base_url must be http or https, got '{}'", url.scheme()),
            });
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "api.timeout_seconds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3001");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.server.port, 3001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[server]\nport = 4000\ndb = \"seed.json\"\n");
        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.db, Some(PathBuf::from("seed.json")));
        assert_eq!(config.api, ApiSettings::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = write_config("[api]\ntimeout_seconds = 0\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::ValidationError { .. })
        ));

        let file = write_config("[api]\nbase_url = \"ftp://example.com\"\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::ValidationError { .. })
        ));

        let file = write_config("[api\n");
        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load(Some(&missing)),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_api_url_override() {
        let config = AppConfig::default()
            .with_api_url(Some("http://bookings.internal:8080".into()))
            .unwrap();
        assert_eq!(config.api.base_url, "http://bookings.internal:8080");

        assert!(AppConfig::default()
            .with_api_url(Some("no scheme".into()))
            .is_err());
        assert_eq!(
            AppConfig::default().with_api_url(None).unwrap(),
            AppConfig::default()
        );
    }
}
