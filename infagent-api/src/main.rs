//! iNFAgent analytics API server

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use infagent_api::config::BackendConfig;
use infagent_api::routes;
use infagent_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting iNFAgent wallet analytics API");

    let config = BackendConfig::from_env();
    let state = Arc::new(AppState::from_config(&config)?);
    let app = routes::router(state);

    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
