//! OnlySports API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                 ONLYSPORTS API                    │
//!   Client Request    │  ┌─────────┐   ┌──────────┐   ┌──────────────┐   │
//!   ──────────────────┼─▶│  http   │──▶│  gate    │──▶│   handler    │───┼──▶ sports-data API
//!                     │  │ server  │   │ cors.rs  │   │ (validation) │───┼──▶ crest CDN
//!                     │  └─────────┘   └──────────┘   └──────┬───────┘───┼──▶ completion API
//!   Client Response   │  ┌──────────┐                        │           │
//!   ◀─────────────────┼──│ response │◀───────────────────────┘           │
//!                     │  │ finish   │  (errors, CORS, metrics)           │
//!                     │  └──────────┘                                    │
//!                     │  config · credentials · observability · lifecycle│
//!                     └──────────────────────────────────────────────────┘
//! ```

use tokio::net::TcpListener;

use onlysports_api::config::credentials::{FOOTBALL_DATA_TOKEN_VAR, GEMINI_API_KEY_VAR};
use onlysports_api::config::{load_from_env, Credentials};
use onlysports_api::lifecycle::{signals, Shutdown};
use onlysports_api::observability::{logging, metrics};
use onlysports_api::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_from_env()?;
    logging::init_logging(&config.observability);

    tracing::info!("onlysports-api v{} starting", env!("CARGO_PKG_VERSION"));

    let credentials = Credentials::from_env();
    if credentials.football_data_token().is_none() {
        tracing::warn!(variable = FOOTBALL_DATA_TOKEN_VAR, "Credential not set; sports-data proxy will answer 500");
    }
    if credentials.gemini_api_key().is_none() {
        tracing::warn!(variable = GEMINI_API_KEY_VAR, "Credential not set; prediction proxy will answer 500");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        cors_policy = ?config.cors.policy,
        gemini_model = %config.gemini.model,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(config, credentials)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
