/// Client configuration: where the backend lives and how to talk to it
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Default API root of a locally running backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api/";

/// Environment variable overriding `api_url`.
pub const API_URL_ENV: &str = "QUICKSHED_API_URL";

/// Environment variable overriding `session_file`.
pub const SESSION_FILE_ENV: &str = "QUICKSHED_SESSION_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Settings shared by every backend call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API; every endpoint path is joined onto it
    pub api_url: String,
    /// File holding the access and refresh tokens between runs
    pub session_file: PathBuf,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Delay before the print document opens the print dialog
    pub print_delay_ms: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(".quickshed/session.json"),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            print_delay_ms: 500,
            user_agent: format!("quickshed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Loads a config file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads `path` then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.base_url()?;
        Ok(config)
    }

    /// Applies overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|s| !s.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(file) = lookup(SESSION_FILE_ENV).filter(|s| !s.trim().is_empty()) {
            self.session_file = PathBuf::from(file);
        }
    }

    /// The API root as a URL, always ending in `/` so endpoint paths join under it.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            source,
        })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn print_delay(&self) -> Duration {
        Duration::from_millis(self.print_delay_ms)
    }

    /// Config pointing at `api_url` with defaults elsewhere.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}
