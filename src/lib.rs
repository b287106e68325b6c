// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod derive;
pub mod download;
pub mod error;
pub mod flow;
pub mod format;
pub mod info;
pub mod normalize;
pub mod preview;
pub mod server;
pub mod session;
pub mod telemetry;
pub mod validate;

// ---- Re-exports for stable public API ----
pub use crate::config::AppConfig;
pub use crate::error::AppError;
pub use crate::server::router;

use tracing::info;

/// Bind the asset server on `0.0.0.0:{port}` and serve until the process stops.
pub async fn serve(cfg: &AppConfig) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", cfg.port)).await?;
    info!(
        port = cfg.port,
        assets = %cfg.asset_dir.display(),
        "Web server running at http://localhost:{}",
        cfg.port
    );
    axum::serve(listener, router(cfg.asset_dir.clone())).await?;
    Ok(())
}
