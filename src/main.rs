//! Shelfwise Server - book search and personal library
//!
//! REST API server backed by Google Books with an Open Library fallback.

use anyhow::Context;
use std::net::SocketAddr;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shelfwise_server::{api, config::AppConfig, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("shelfwise_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Shelfwise Server v{}", env!("CARGO_PKG_VERSION"));

    if config.catalog.has_primary_credential() {
        tracing::info!("Google Books API key configured");
    } else {
        tracing::warn!("No Google Books API key configured, serving from Open Library only");
    }

    let services = Services::new(&config).context("Failed to create services")?;

    // Save server address and rate limit before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let rate_limit = config.rate_limit.clone();

    let state = AppState::new(config, services);

    // Per-IP rate limiting: one slot replenished every window/max seconds
    let replenish_secs = (rate_limit.window_seconds / u64::from(rate_limit.max_requests.max(1))).max(1);
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(replenish_secs)
        .burst_size(rate_limit.max_requests.max(1))
        .finish()
        .context("Invalid rate limit configuration")?;

    let app = api::create_router(state).layer(GovernorLayer {
        config: Box::leak(Box::new(governor_conf)),
    });

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().context("Invalid host address")?,
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
