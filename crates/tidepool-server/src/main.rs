use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use tidepool_core::TidepoolConfig;
use tidepool_server::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tidepool=info,tower_http=warn")),
        )
        .init();

    let data_dir = std::env::var("TIDEPOOL_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let config = TidepoolConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = AppState::new(config)?;
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Tidepool listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
