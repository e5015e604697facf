//! Runtime configuration.
//!
//! The reader has a single recognized option, the backend base URL. It is
//! resolved from (highest priority first):
//!
//! 1. `--backend-url` / `NEWS_BACKEND_URL`
//! 2. `backend_base_url` in the YAML file passed with `--config`
//! 3. [`DEFAULT_BACKEND_URL`]
//!
//! ```yaml
//! backend_base_url: http://localhost:8000
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, instrument};
use url::Url;

/// Backend address used when nothing else is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid backend URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend URL {0:?} must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    backend_base_url: Option<String>,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    backend_base_url: Url,
}

impl Config {
    /// Build a config from a base URL string.
    pub fn new(backend_base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            backend_base_url: parse_base_url(backend_base_url)?,
        })
    }

    /// Resolve the configuration from an optional CLI override and an optional
    /// YAML file.
    #[instrument(level = "debug", skip_all)]
    pub async fn load(
        cli_override: Option<&str>,
        config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = cli_override {
            debug!(%url, "Using backend URL from command line");
            return Self::new(url);
        }

        if let Some(path) = config_path {
            let raw = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            let file = Self::parse_file(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(url) = file.backend_base_url {
                info!(path = %path.display(), %url, "Loaded backend URL from config file");
                return Self::new(&url);
            }
        }

        Self::new(DEFAULT_BACKEND_URL)
    }

    fn parse_file(raw: &str) -> Result<ConfigFile, serde_yaml::Error> {
        // An empty document deserializes to unit, not a map.
        if raw.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Resolve an endpoint path (such as `news`) against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.backend_base_url.join(path.trim_start_matches('/'))
    }

    /// The base URL without the trailing slash, as shown to the reader.
    pub fn display_base_url(&self) -> &str {
        self.backend_base_url.as_str().trim_end_matches('/')
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(value.to_string()));
    }
    // Url::join replaces the last path segment unless the path ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
