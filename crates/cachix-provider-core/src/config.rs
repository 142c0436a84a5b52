use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryPolicy;

/// Name used for the XDG config/state directories and the User-Agent product.
pub const APP_NAME: &str = "cachix-provider";
/// Default API base URL.
pub const DEFAULT_API_HOST: &str = "https://app.cachix.org/api/v1";
/// Environment variable consulted when no token is configured explicitly.
pub const TOKEN_ENV: &str = "CACHIX_AUTH_TOKEN";
/// Default whole-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "missing Cachix API token: set auth_token in the config, pass --token, or export CACHIX_AUTH_TOKEN (the value must not be empty)"
    )]
    MissingToken,
    #[error("invalid api_host {host:?}")]
    InvalidApiHost {
        host: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api_host {0:?} must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid retry settings: {0}")]
    InvalidRetry(String),
    #[error("timeout_secs must be at least 1 (0 would disable the request timeout)")]
    ZeroTimeout,
}

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub retry_max: u32,
    /// Wait before the first retry, in seconds (e.g. 0.25 = 250ms).
    pub min_wait_secs: f64,
    /// Upper bound on any single wait, in seconds.
    pub max_wait_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            retry_max: policy.retry_max,
            min_wait_secs: policy.min_wait.as_secs_f64(),
            max_wait_secs: policy.max_wait.as_secs_f64(),
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> Result<RetryPolicy, ConfigError> {
        let secs = |name: &str, v: f64| {
            Duration::try_from_secs_f64(v)
                .map_err(|_| ConfigError::InvalidRetry(format!("{name} must be a non-negative number of seconds, got {v}")))
        };
        let min_wait = secs("min_wait_secs", self.min_wait_secs)?;
        let max_wait = secs("max_wait_secs", self.max_wait_secs)?;
        if max_wait < min_wait {
            return Err(ConfigError::InvalidRetry(format!(
                "max_wait_secs ({}) is below min_wait_secs ({})",
                self.max_wait_secs, self.min_wait_secs
            )));
        }
        Ok(RetryPolicy {
            retry_max: self.retry_max,
            min_wait,
            max_wait,
        })
    }
}

/// Settings loaded from `~/.config/cachix-provider/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// API base URL.
    pub api_host: String,
    /// Explicit token; takes precedence over the environment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            auth_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FileConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(&default_cfg)?)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

pub fn load_from(path: &Path) -> Result<FileConfig> {
    let data = fs::read_to_string(path)?;
    Ok(toml::from_str(&data)?)
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub api_host: Option<String>,
}

/// Everything a client needs; immutable once built.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    /// Product version embedded in the User-Agent.
    pub version: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("version", &self.version)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ClientConfig {
    /// Config with default timeout and retry policy. The token must be non-empty
    /// and the base URL an absolute http(s) URL.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        version: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        Ok(Self {
            base_url: normalize_base_url(&base_url.into())?,
            token,
            version: version.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Combine CLI overrides, the config file and the environment token.
    ///
    /// Token precedence: `--token`, then `auth_token`, then `env_token`. An
    /// explicitly configured token wins even when empty, which is then an error.
    pub fn resolve(
        file: &FileConfig,
        overrides: &Overrides,
        env_token: Option<String>,
        version: &str,
    ) -> Result<Self, ConfigError> {
        let token = overrides
            .token
            .clone()
            .or_else(|| file.auth_token.clone())
            .or(env_token)
            .ok_or(ConfigError::MissingToken)?;
        let api_host = overrides.api_host.as_deref().unwrap_or(&file.api_host);
        let retry = file.retry.clone().unwrap_or_default().to_policy()?;
        if file.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self::new(api_host, token, version)?
            .with_timeout(Duration::from_secs(file.timeout_secs))
            .with_retry_policy(retry))
    }

    /// Like [`ClientConfig::resolve`], reading the token from `CACHIX_AUTH_TOKEN`.
    pub fn from_env(file: &FileConfig, overrides: &Overrides, version: &str) -> Result<Self, ConfigError> {
        Self::resolve(file, overrides, std::env::var(TOKEN_ENV).ok(), version)
    }

    pub fn user_agent(&self) -> String {
        format!("{APP_NAME}/{}", self.version)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed).map_err(|source| ConfigError::InvalidApiHost {
        host: raw.to_string(),
        source,
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
