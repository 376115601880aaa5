//! `ccdrop-relay`: relay binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise JSON logging.
//! 3. Open the share directory as a [`BlobStore`].
//! 4. Build the Axum router and serve it, over TLS when configured.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use relay::config::Config;
use relay::server::{router, state::AppState, tls};
use relay::store::BlobStore;
use relay::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Logging is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        share_dir = %cfg.share_dir.display(),
        max_upload_bytes = cfg.max_upload_bytes,
        "ccdrop-relay starting"
    );

    // -----------------------------------------------------------------------
    // 3. Storage
    // -----------------------------------------------------------------------
    let store = BlobStore::open(&cfg.share_dir, cfg.id_length)
        .await
        .with_context(|| format!("failed to open share directory {}", cfg.share_dir.display()))?;

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let state = AppState::new(store, cfg.max_upload_bytes);
    let app = router::build(state, Duration::from_secs(cfg.request_timeout_secs));

    let addr: std::net::SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    match cfg.tls_paths() {
        Some((cert, key)) => {
            let tls_config = tls::load_server_config(cert, key).await?;
            info!(addr = %addr, "listening (tls)");
            tls::serve(listener, tls_config, app, shutdown_signal()).await?;
        }
        None => {
            info!(addr = %addr, "listening");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            warn!(error = %e, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
