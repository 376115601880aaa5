//! Configuration loading and validation for the relay.
//!
//! All values are read from environment variables at startup. The process
//! exits with a clear error message if any variable is invalid.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the relay listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Directory holding one file per stored frame.
    #[serde(default = "default_share_dir")]
    pub share_dir: PathBuf,

    /// Largest accepted upload body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Length of generated share identifiers.
    #[serde(default = "default_id_length")]
    pub id_length: usize,

    /// Per-request timeout in seconds; covers the whole upload or download.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// PEM certificate chain. When set together with `tls_key_path` the relay
    /// terminates TLS itself.
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,

    /// PEM private key matching `tls_cert_path`.
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    3331
}
fn default_share_dir() -> PathBuf {
    "shares".into()
}
fn default_max_upload_bytes() -> usize {
    1 << 30
}
fn default_id_length() -> usize {
    6
}
fn default_request_timeout() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build relay configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise relay configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Certificate and key paths, if TLS is configured.
    pub fn tls_paths(&self) -> Option<(&PathBuf, &PathBuf)> {
        self.tls_cert_path.as_ref().zip(self.tls_key_path.as_ref())
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.share_dir.as_os_str().is_empty() {
            anyhow::bail!("SHARE_DIR is required and must not be empty");
        }
        if self.max_upload_bytes == 0 {
            anyhow::bail!("MAX_UPLOAD_BYTES must be > 0");
        }
        if !(4..=64).contains(&self.id_length) {
            anyhow::bail!("ID_LENGTH must be between 4 and 64");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            anyhow::bail!("TLS_CERT_PATH and TLS_KEY_PATH must be set together");
        }
        Ok(())
    }
}
