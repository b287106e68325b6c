//! sentirax-web: static asset server entrypoint.
//! Serves the home page, results page and client script on `$PORT` (default 5173).

use sentirax_web::{telemetry, AppConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    telemetry::init_tracing();

    let cfg = AppConfig::from_env()?;
    telemetry::init_metrics(cfg.metrics_port)?;

    sentirax_web::serve(&cfg).await
}
