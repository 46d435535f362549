/// Application configuration
///
/// Built once at startup and handed to the API client by reference.
/// Values are layered: built-in defaults, then the optional JSON file in the
/// user's config directory, then environment variables.
///
/// - Linux: ~/.config/dir-uploader/config.json
/// - macOS: ~/Library/Application Support/dir-uploader/config.json
/// - Windows: %APPDATA%\dir-uploader\config.json

use reqwest::Url;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_BASE_URL: &str = "UPLOADER_API_BASE_URL";
pub const ENV_TOKEN: &str = "UPLOADER_API_TOKEN";
pub const ENV_MAX_UPLOAD_BYTES: &str = "UPLOADER_MAX_UPLOAD_BYTES";
pub const ENV_TIMEOUT_SECS: &str = "UPLOADER_REQUEST_TIMEOUT_SECS";

/// 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0} (set it in the environment or config.json)")]
    Missing(&'static str),
    #[error("{key} is not a valid http(s) URL: {value}")]
    InvalidUrl { key: &'static str, value: String },
    #[error("{key} must be a whole number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// On-disk shape of config.json. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    api_token: Option<String>,
    max_upload_bytes: Option<u64>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub struct Config {
    /// Backend base URL, e.g. `https://host/api`
    pub api_base_url: Url,
    /// Bearer credential for every request
    pub api_token: SecretString,
    /// Largest file accepted by the picker, in bytes
    pub max_upload_bytes: u64,
    /// Per-request timeout; `None` waits forever
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the config file (if present) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match Self::config_file_path() {
            Some(path) if path.exists() => Some(read_file_config(&path)?),
            _ => None,
        };
        Self::resolve(file.unwrap_or_default(), |key| std::env::var(key).ok())
    }

    /// Location of the optional config.json
    pub fn config_file_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push("dir-uploader");
        path.push("config.json");
        Some(path)
    }

    /// Merge file values with an environment lookup. Environment wins.
    fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let base_url = env(ENV_BASE_URL)
            .or(file.api_base_url)
            .ok_or(ConfigError::Missing(ENV_BASE_URL))?;
        let api_base_url = parse_base_url(&base_url)?;

        let api_token = env(ENV_TOKEN)
            .or(file.api_token)
            .map(SecretString::new)
            .ok_or(ConfigError::Missing(ENV_TOKEN))?;

        let max_upload_bytes = match env(ENV_MAX_UPLOAD_BYTES) {
            Some(raw) => parse_number(ENV_MAX_UPLOAD_BYTES, &raw)?,
            None => file.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let timeout_secs = match env(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_number(ENV_TIMEOUT_SECS, &raw)?,
            None => file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        // 0 disables the timeout
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Ok(Config {
            api_base_url,
            api_token,
            max_upload_bytes,
            request_timeout,
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key: ENV_BASE_URL,
        value: raw.to_string(),
    };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}
