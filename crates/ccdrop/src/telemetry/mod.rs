//! Logging for the `ccdrop` command-line tool.
//!
//! Human-readable output on stderr so that stdout carries only the share link
//! and command. Keys, links and plaintext are never logged.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` wins over `log_level`; `verbose` forces at least `debug` for
/// this crate.
///
/// # Errors
///
/// Returns an error if the subscriber has already been set.
pub fn init(log_level: &str, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new(format!("{log_level},ccdrop=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise ccdrop tracing subscriber: {e}"))
}
