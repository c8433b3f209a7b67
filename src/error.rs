//! Handler error taxonomy and its HTTP mapping.
//!
//! Every failure ends the current request. Failures that carry an upstream
//! response are relayed with their status; failures without one are flattened
//! to a generic message so no internals reach the caller.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input, or a disallowed image domain.
    #[error("{0}")]
    InvalidInput(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// The request body exceeded `security.max_body_size`.
    #[error("Request body too large.")]
    PayloadTooLarge,

    /// A required credential is absent from the execution environment.
    #[error("Server configuration error: {0} missing.")]
    ConfigurationMissing(&'static str),

    /// Upstream answered; its status and body are passed through verbatim.
    #[error("upstream responded with status {status}")]
    UpstreamRelay {
        status: StatusCode,
        content_type: Option<HeaderValue>,
        body: Bytes,
    },

    /// Upstream answered; its status is passed through with a summary body.
    #[error("{message}")]
    UpstreamStatus { status: StatusCode, message: String },

    /// No upstream response (network failure, timeout, bad URL).
    #[error("{0}")]
    UpstreamUnreachable(&'static str),

    /// The completion service produced no usable candidate.
    #[error("Prediction generation failed or was blocked: {0}")]
    GenerationBlocked(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ConfigurationMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamRelay { status, .. } => *status,
            ApiError::UpstreamStatus { status, .. } => *status,
            ApiError::UpstreamUnreachable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::GenerationBlocked(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::MethodNotAllowed => (status, "Method Not Allowed").into_response(),
            ApiError::UpstreamRelay {
                content_type, body, ..
            } => {
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                if let Some(content_type) = content_type {
                    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
                }
                response
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            ApiError::ConfigurationMissing("API token").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::UpstreamStatus {
                status: StatusCode::NOT_FOUND,
                message: "gone".into()
            }
            .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_configuration_message() {
        let err = ApiError::ConfigurationMissing("API token");
        assert_eq!(err.to_string(), "Server configuration error: API token missing.");
    }

    #[test]
    fn test_relay_keeps_upstream_content_type() {
        let response = ApiError::UpstreamRelay {
            status: StatusCode::FORBIDDEN,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: Bytes::from_static(b"{\"message\":\"denied\"}"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    }
}
