//! Configuration loading from moncap.toml.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Defaults applied to `check` queries.
    #[serde(default)]
    pub query: QueryDefaults,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. `"moncap=debug"`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}

/// Defaults for query fields left off the command line.
#[derive(Debug, Default, Deserialize)]
pub struct QueryDefaults {
    /// Service name used when `--service` is not given.
    pub service: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> std::result::Result<Self, String> {
        toml::from_str(toml).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
[log]
filter = "moncap=trace"

[query]
service = "mon"
"#,
        )
        .unwrap();
        assert_eq!(config.log.filter, "moncap=trace");
        assert_eq!(config.query.service.as_deref(), Some("mon"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.log.filter, "warn");
        assert!(config.query.service.is_none());
    }

    #[test]
    fn test_malformed_config() {
        assert!(Config::parse("[log\nfilter = 1").is_err());
        assert!(Config::parse("[log]\nfilter = 1").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load("/nonexistent/moncap.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }
}
