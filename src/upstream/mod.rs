//! Outbound clients for the three upstream services.
//!
//! # Data Flow
//! ```text
//! handler
//!     → football_data.rs (GET + X-Auth-Token, query params)
//!     → crests.rs        (binary GET, no auth)
//!     → gemini.rs        (POST generateContent + API key)
//!     → UpstreamReply / typed response
//! ```
//!
//! # Design Decisions
//! - One reqwest client per upstream, built once per process
//! - Every client has a connect timeout and an overall request timeout
//! - Non-2xx answers are returned as data, not errors; only transport
//!   failures are errors, so handlers can relay upstream statuses

pub mod crests;
pub mod football_data;
pub mod gemini;

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error;

pub use crests::CrestClient;
pub use football_data::FootballDataClient;
pub use gemini::GeminiClient;

/// A complete upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamReply {
    async fn read(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }
}

impl IntoResponse for UpstreamReply {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        if let Some(content_type) = self.content_type {
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Failure to obtain any upstream response.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

fn build_http_client(connect_secs: u64, timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(connect_secs))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("onlysports-api/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn parse_url(raw: &str) -> Result<url::Url, FetchError> {
    url::Url::parse(raw).map_err(|source| FetchError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
