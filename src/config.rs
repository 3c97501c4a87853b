//! # Configuration
//!
//! Settings are resolved from built-in defaults, then an optional JSON file,
//! then environment variables. The file is `$REPOCAST_CONFIG` when set,
//! otherwise `<config dir>/repocast/config.json` if it exists.
//!
//! ```json
//! { "backend_url": "https://analytics.example.com", "timeout_secs": 20 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::api::{Gateway, GatewayError};

pub const CONFIG_ENV: &str = "REPOCAST_CONFIG";
pub const BACKEND_URL_ENV: &str = "REPOCAST_BACKEND_URL";
pub const API_PREFIX_ENV: &str = "REPOCAST_API_PREFIX";
pub const ENDPOINT_ENV: &str = "REPOCAST_ENDPOINT";
pub const TIMEOUT_ENV: &str = "REPOCAST_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid backend url {value:?}: {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidNumber { key: &'static str, value: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Resolved dashboard settings.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Origin the gateway forwards API requests to
    pub backend_url: Url,
    /// Path prefix handled by the gateway
    pub api_prefix: String,
    /// Analytics endpoint, under `api_prefix`
    pub endpoint: String,
    /// Upper bound for one analytics request
    pub timeout: Duration,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Number of chart textures kept around
    pub chart_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: Url::parse("http://127.0.0.1:5000").expect("static url parses"),
            api_prefix: "/api".to_string(),
            endpoint: "/api/github".to_string(),
            timeout: Duration::from_secs(30),
            chart_width: 960,
            chart_height: 420,
            chart_cache_capacity: 32,
        }
    }
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    backend_url: Option<String>,
    api_prefix: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
    chart_width: Option<u32>,
    chart_height: Option<u32>,
    chart_cache_capacity: Option<usize>,
}

impl Config {
    /// Load from the process environment and the default file locations.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Some(PathBuf::from(path)),
            None => default_config_path().filter(|path| path.exists()),
        };
        Self::from_sources(file.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve settings from an optional file and an environment lookup.
    pub fn from_sources<F>(file: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = file {
            let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let parsed: ConfigFile =
                serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            config.apply_file(parsed)?;
        }

        if let Some(value) = env(BACKEND_URL_ENV) {
            config.backend_url = parse_url(&value)?;
        }
        if let Some(value) = env(API_PREFIX_ENV) {
            config.api_prefix = value;
        }
        if let Some(value) = env(ENDPOINT_ENV) {
            config.endpoint = value;
        }
        if let Some(value) = env(TIMEOUT_ENV) {
            let secs = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: TIMEOUT_ENV,
                    value,
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        // Fail early on an endpoint the gateway would not forward.
        config.endpoint_url()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(url) = file.backend_url {
            self.backend_url = parse_url(&url)?;
        }
        if let Some(prefix) = file.api_prefix {
            self.api_prefix = prefix;
        }
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(secs) = file.timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidNumber {
                    key: "timeout_secs",
                    value: secs.to_string(),
                });
            }
            self.timeout = Duration::from_secs(secs);
        }
        if let Some(width) = file.chart_width {
            self.chart_width = width.max(1);
        }
        if let Some(height) = file.chart_height {
            self.chart_height = height.max(1);
        }
        if let Some(capacity) = file.chart_cache_capacity {
            self.chart_cache_capacity = capacity.max(1);
        }
        Ok(())
    }

    pub fn gateway(&self) -> Gateway {
        Gateway::new(self.backend_url.clone(), &self.api_prefix)
    }

    /// The analytics endpoint as the gateway forwards it.
    pub fn endpoint_url(&self) -> Result<Url, GatewayError> {
        self.gateway().route(&self.endpoint)
    }
}

/// `<config dir>/repocast/config.json`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repocast").join("config.json"))
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(None, no_env).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.endpoint_url().unwrap().as_str(),
            "http://127.0.0.1:5000/api/github"
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = write_config(
            r#"{"backend_url": "https://analytics.example.com", "timeout_secs": 5, "chart_width": 640}"#,
        );
        let config = Config::from_sources(Some(file.path()), no_env).unwrap();
        assert_eq!(config.backend_url.as_str(), "https://analytics.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.chart_width, 640);
        assert_eq!(config.chart_height, 420);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config(r#"{"backend_url": "https://file.example.com"}"#);
        let env: HashMap<&str, &str> = [
            (BACKEND_URL_ENV, "https://env.example.com"),
            (TIMEOUT_ENV, "12"),
        ]
        .into_iter()
        .collect();
        let config =
            Config::from_sources(Some(file.path()), |key| env.get(key).map(|v| v.to_string()))
                .unwrap();
        assert_eq!(config.backend_url.as_str(), "https://env.example.com/");
        assert_eq!(config.timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let bad_timeout = Config::from_sources(None, |key| {
            (key == TIMEOUT_ENV).then(|| "soon".to_string())
        });
        assert!(matches!(bad_timeout, Err(ConfigError::InvalidNumber { .. })));

        let bad_url = Config::from_sources(None, |key| {
            (key == BACKEND_URL_ENV).then(|| "not a url".to_string())
        });
        assert!(matches!(bad_url, Err(ConfigError::InvalidUrl { .. })));

        let unknown_key = write_config(r#"{"backend": "http://x"}"#);
        assert!(matches!(
            Config::from_sources(Some(unknown_key.path()), no_env),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_endpoint_must_be_under_prefix() {
        let result = Config::from_sources(None, |key| {
            (key == ENDPOINT_ENV).then(|| "/github".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Gateway(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::from_sources(Some(Path::new("/nonexistent/repocast.json")), no_env);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
