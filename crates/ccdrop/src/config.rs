//! Configuration loading and validation for the `ccdrop` client.
//!
//! Values come from `CCDROP_*` environment variables; command-line flags
//! override them.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

/// Validated client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Relay origin used for uploads and for `get` without `-u`.
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Whole-request timeout in seconds; `0` disables it.
    #[serde(default)]
    pub request_timeout_secs: u64,

    /// Tracing log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_server_url() -> String {
    "http://localhost:3331".into()
}
fn default_log_level() -> String {
    "warn".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: 0,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `CCDROP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("CCDROP"))
            .build()
            .context("failed to build ccdrop configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise ccdrop configuration")?;

        c.validate()?;
        Ok(c)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("CCDROP_SERVER_URL is not a valid URL: {}", self.server_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("CCDROP_SERVER_URL must use http or https");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.server_url, "http://localhost:3331");
        assert_eq!(cfg.log_level, "warn");
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn timeout_when_set() {
        let cfg = Config {
            request_timeout_secs: 30,
            ..Config::default()
        };
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn validate_rejects_non_http_url() {
        let cfg = Config {
            server_url: "ftp://relay.test".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_garbage_url() {
        let cfg = Config {
            server_url: "relay".into(),
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_default() {
        assert!(Config::default().validate().is_ok());
    }
}
