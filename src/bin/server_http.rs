//! Strictly Ascend REST server (environment-configured)

use anyhow::Result;
use strictly_ascend::{AscendConfig, rest};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let config = AscendConfig::load("ascend.toml")?.with_port(port);
    let store = config.session_store()?;
    let app = rest::app(store, config.static_dir());

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), port)).await?;
    info!(port, "AWS Ascend Game running on http://localhost:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
