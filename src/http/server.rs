//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, body limit)
//! - Build the upstream clients once per process
//! - Bind server to listener and drain on shutdown

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::config::{Credentials, ServiceConfig};
use crate::handlers::{crest_proxy, football_data_proxy, gemini_prediction, health};
use crate::http::cors::CorsPolicy;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::ShutdownSignal;
use crate::upstream::{CrestClient, FootballDataClient, GeminiClient};

/// Application state injected into handlers.
///
/// Everything here is read-only for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<Credentials>,
    pub cors: Arc<CorsPolicy>,
    pub football_data: FootballDataClient,
    pub crests: CrestClient,
    pub gemini: GeminiClient,
    /// Inbound deadline applied inside each handler.
    pub request_timeout: Duration,
    pub verbose_forwarding: bool,
}

impl AppState {
    pub fn new(config: &ServiceConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let connect_secs = config.timeouts.connect_secs;
        Ok(Self {
            credentials: Arc::new(credentials),
            cors: Arc::new(CorsPolicy::from_config(&config.cors)),
            football_data: FootballDataClient::new(&config.football_data, connect_secs)?,
            crests: CrestClient::new(&config.crests, connect_secs)?,
            gemini: GeminiClient::new(&config.gemini, connect_secs)?,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
            verbose_forwarding: config.observability.verbose_forwarding,
        })
    }
}

/// HTTP server hosting the handlers.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and credentials.
    pub fn new(config: ServiceConfig, credentials: Credentials) -> Result<Self, reqwest::Error> {
        let state = AppState::new(&config, credentials)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// Handlers are mounted with `any` so each one owns its method gate and
/// its 405 responses still carry CORS headers. The body cap and the inbound
/// deadline are enforced inside the handlers for the same reason.
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let router = Router::new()
        .route("/api/footballDataProxy", any(football_data_proxy))
        .route("/footballDataProxy", any(football_data_proxy))
        .route("/api/crestProxy", any(crest_proxy))
        .route("/api/geminiPrediction", any(gemini_prediction))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .with_state(state);

    let router = if config.security.enable_headers {
        router.layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
    } else {
        router
    };

    router.layer(
        ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer()),
    )
}
