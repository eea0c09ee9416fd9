//! HTTP API over the queue engine
//!
//! Enabled with the `api` feature. Caller identity comes from the
//! `x-queue-role` and `x-queue-operator` headers, which an upstream identity
//! provider is expected to set.

mod error;
mod handlers;
mod router;
mod state;

pub use error::ApiError;
pub use handlers::{OPERATOR_HEADER, ROLE_HEADER};
pub use router::router;
pub use state::AppState;

use crate::cli::handlers::HandlerContext;
use anyhow::Context;

/// Serve the queue in `data_dir` until the process is stopped
///
/// `host` and `port` override the `api` section of the configuration.
pub async fn serve(
    data_dir: Option<&str>,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let HandlerContext { data_dir, engine } = HandlerContext::new(data_dir)?;
    let api = engine.config().api.clone();
    let addr = format!(
        "{}:{}",
        host.unwrap_or(api.host),
        port.unwrap_or(api.port)
    );

    let app = router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(%addr, data_dir = %data_dir.display(), "Queue API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;
    Ok(())
}
