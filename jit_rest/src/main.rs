use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use jit_core::{SessionOptions, SolverSession};
use jit_rest::config::read_config;
use jit_rest::{router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config/config.yaml"));
    let config = read_config(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let state = AppState {
        session: Arc::new(Mutex::new(SolverSession::new(SessionOptions::default()))),
    };
    let app = router(state.clone());

    let listener = TcpListener::bind((config.host(), config.port())).await?;
    info!(host = %config.host(), port = config.port(), "jit scheduling service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Serve has returned, so no request holds the gate any more and the
    // engine handle can be released exactly once.
    match Arc::try_unwrap(state.session) {
        Ok(mutex) => mutex.into_inner().close(),
        Err(_) => warn!("solver session still shared at shutdown"),
    }
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for the shutdown signal");
    }
}
