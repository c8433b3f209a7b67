//! Response finishing.
//!
//! # Responsibilities
//! - Turn a handler outcome into the final response
//! - Log every failure before it is sent
//! - Attach the handler's CORS headers to success and failure alike
//! - Record request metrics
//!
//! # Design Decisions
//! - Handlers return `Result<Response, ApiError>`; this is the only place
//!   that flattens errors, so no failure path can skip the CORS headers

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::observability::metrics;

/// Bare 200 for an answered preflight.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}

/// Run handler work under the inbound deadline.
///
/// Expiry is reported as an unreachable upstream with the handler's own
/// generic message, and still flows through [`finish`].
pub async fn within_deadline<F>(
    deadline: Duration,
    on_expiry: &'static str,
    work: F,
) -> Result<Response, ApiError>
where
    F: Future<Output = Result<Response, ApiError>>,
{
    match tokio::time::timeout(deadline, work).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(deadline_secs = deadline.as_secs(), "Request deadline elapsed");
            Err(ApiError::UpstreamUnreachable(on_expiry))
        }
    }
}

/// Finalize a handler outcome.
pub fn finish(
    handler: &'static str,
    request_id: &str,
    start: Instant,
    cors: HeaderMap,
    result: Result<Response, ApiError>,
) -> Response {
    let mut response = match result {
        Ok(response) => response,
        Err(err) => {
            match &err {
                ApiError::InvalidInput(_) | ApiError::MethodNotAllowed | ApiError::PayloadTooLarge => {
                    tracing::warn!(request_id = %request_id, handler, error = %err, "Request rejected");
                }
                ApiError::UpstreamRelay { status, .. } | ApiError::UpstreamStatus { status, .. } => {
                    tracing::error!(request_id = %request_id, handler, status = %status, "Upstream returned an error");
                }
                _ => {
                    tracing::error!(request_id = %request_id, handler, error = %err, "Request failed");
                }
            }
            err.into_response()
        }
    };

    response.headers_mut().extend(cors);

    let status = response.status();
    metrics::record_request(handler, status.as_u16(), start);
    tracing::debug!(
        request_id = %request_id,
        handler,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request complete"
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    #[test]
    fn test_failures_carry_cors_headers() {
        let mut cors = HeaderMap::new();
        cors.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

        let response = finish(
            "test",
            "req-1",
            Instant::now(),
            cors,
            Err(ApiError::MethodNotAllowed),
        );

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_elapsed_deadline_is_unreachable_upstream() {
        let result = within_deadline(Duration::from_millis(20), "gave up", async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(StatusCode::OK.into_response())
        })
        .await;

        assert!(matches!(result, Err(ApiError::UpstreamUnreachable("gave up"))));
    }

    #[tokio::test]
    async fn test_work_inside_deadline_passes_through() {
        let result = within_deadline(Duration::from_secs(5), "gave up", async {
            Err(ApiError::InvalidInput("bad".into()))
        })
        .await;

        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }
}
