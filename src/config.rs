// src/config.rs
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_LOG_FILTER: &str = "qbay=info,actix_web=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// JSON-lines command log. Without one, state lives only as long as the process.
    pub command_log: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid QBAY_PORT {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            command_log: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let host = lookup("QBAY_HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = match lookup("QBAY_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let command_log = lookup("QBAY_COMMAND_LOG")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            host,
            port,
            command_log,
        })
    }
}
