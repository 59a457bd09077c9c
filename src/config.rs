//! Connection settings for the Logseq HTTP API
//!
//! Precedence, lowest first: built-in defaults, environment, CLI flags.
//! The CLI layer is `ConnectionArgs`, which clap also fills from the same
//! environment variables.

use clap::Args;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:12315/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "LOGSEQ_API_URL";
pub const ENV_TOKEN: &str = "LOGSEQ_TOKEN";
pub const ENV_TIMEOUT: &str = "LOGSEQ_TIMEOUT_SECS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no API token configured (set LOGSEQ_TOKEN or pass --token)")]
    MissingToken,

    #[error("invalid API url: {0}")]
    InvalidUrl(String),

    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Resolved connection settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_url = url.trim().to_string();
        }
        if let Some(token) = lookup(ENV_TOKEN).filter(|v| !v.trim().is_empty()) {
            config.token = Some(token.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_TIMEOUT).filter(|v| !v.trim().is_empty()) {
            config.timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }

    /// Apply CLI overrides on top of this config.
    pub fn merge_args(mut self, args: &ConnectionArgs) -> Self {
        if let Some(url) = &args.api_url {
            self.api_url = url.clone();
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if let Some(secs) = args.timeout {
            self.timeout = Duration::from_secs(secs);
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.api_url.clone()));
        }
        match self.token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => return Err(ConfigError::MissingToken),
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        Ok(())
    }
}

fn parse_timeout(raw: &str) -> ConfigResult<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidTimeout(raw.to_string()))
}

/// Connection flags shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// Logseq HTTP API endpoint
    #[arg(long, global = true, env = ENV_API_URL)]
    pub api_url: Option<String>,
    /// Logseq HTTP API token
    #[arg(long, global = true, env = ENV_TOKEN, hide_env_values = true)]
    pub token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true, env = ENV_TIMEOUT)]
    pub timeout: Option<u64>,
}
