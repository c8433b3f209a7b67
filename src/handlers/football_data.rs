//! Generic-resource proxy for the sports-data REST API.
//!
//! `POST {path, params?}` becomes `GET base_url + path ? params` with the
//! server-held token attached. Upstream status and body are relayed as-is.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Instant;

use crate::error::ApiError;
use crate::http::cors::{GateDecision, MethodGate};
use crate::http::request::{read_body, request_id};
use crate::http::response::{finish, preflight, within_deadline};
use crate::http::server::AppState;
use crate::observability::metrics::{self, UpstreamOutcome};

const HANDLER: &str = "football_data_proxy";
const UPSTREAM: &str = "football_data";
const GENERIC_FAILURE: &str = "Internal Server Error proxying request.";

/// Inbound body shape.
#[derive(Debug, Default, Deserialize)]
pub struct ForwardRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

pub async fn football_data_proxy(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();
    let cors = state.cors.headers(headers.get(header::ORIGIN));
    let result = within_deadline(
        state.request_timeout,
        GENERIC_FAILURE,
        forward(&state, &request_id, &method, body),
    )
    .await;
    finish(HANDLER, &request_id, start, cors, result)
}

async fn forward(
    state: &AppState,
    request_id: &str,
    method: &Method,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    if MethodGate::new(Method::POST, true).check(method)? == GateDecision::Preflight {
        return Ok(preflight());
    }

    let request = parse_body(&read_body(body)?)?;
    let path = request
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Missing 'path' in request body.".to_string()))?;

    let token = state
        .credentials
        .football_data_token()
        .ok_or(ApiError::ConfigurationMissing("API token"))?;

    let params = flatten_params(request.params.as_ref());
    let target = state.football_data.target_url(&path);
    if state.verbose_forwarding {
        tracing::info!(request_id = %request_id, target = %target, params = ?params, "Forwarding to sports-data API");
    } else {
        tracing::debug!(request_id = %request_id, target = %target, "Forwarding to sports-data API");
    }

    let mut reply = match state.football_data.get(token, &path, &params).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(request_id = %request_id, target = %target, error = %e, "Sports-data API unreachable");
            metrics::record_upstream(UPSTREAM, UpstreamOutcome::Unreachable);
            return Err(ApiError::UpstreamUnreachable(GENERIC_FAILURE));
        }
    };

    if reply.content_type.is_none() {
        reply.content_type = Some(HeaderValue::from_static("application/json"));
    }

    if !reply.status.is_success() {
        metrics::record_upstream(UPSTREAM, UpstreamOutcome::ErrorStatus);
        return Err(ApiError::UpstreamRelay {
            status: reply.status,
            content_type: reply.content_type,
            body: reply.body,
        });
    }

    metrics::record_upstream(UPSTREAM, UpstreamOutcome::Success);
    if state.verbose_forwarding {
        tracing::info!(request_id = %request_id, status = %reply.status, bytes = reply.body.len(), "Sports-data API responded");
    }
    Ok(reply.into_response())
}

fn parse_body(body: &[u8]) -> Result<ForwardRequest, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ForwardRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|_| ApiError::InvalidInput("Invalid JSON in request body.".to_string()))
}

/// Turn the JSON `params` object into query pairs.
///
/// Scalars are stringified, `null` is skipped, arrays repeat the key and
/// nested objects are sent as compact JSON.
pub fn flatten_params(params: Option<&Map<String, Value>>) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in params.into_iter().flatten() {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(v) = scalar(item) {
                        pairs.push((key.clone(), v));
                    }
                }
            }
            other => {
                if let Some(v) = scalar(other) {
                    pairs.push((key.clone(), v));
                }
            }
        }
    }
    pairs
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_params() {
        let params = json!({
            "status": "SCHEDULED",
            "limit": 10,
            "live": true,
            "season": null,
            "ids": [1, 2]
        });
        let mut pairs = flatten_params(params.as_object());
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("ids".to_string(), "1".to_string()),
                ("ids".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string()),
                ("live".to_string(), "true".to_string()),
                ("status".to_string(), "SCHEDULED".to_string()),
            ]
        );
    }

    #[test]
    fn test_flatten_without_params() {
        assert!(flatten_params(None).is_empty());
    }

    #[test]
    fn test_empty_body_has_no_path() {
        let request = parse_body(b"").unwrap();
        assert!(request.path.is_none());
    }

    #[test]
    fn test_malformed_body_is_invalid_input() {
        assert!(matches!(parse_body(b"{path:"), Err(ApiError::InvalidInput(_))));
    }
}
