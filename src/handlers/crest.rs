//! Image proxy for allow-listed crest images.
//!
//! `GET ?url=<image>` fetches the image and returns the raw bytes with a
//! resolved content type and a one-day public cache policy. The URL prefix
//! check is the only thing stopping this from being an open relay, so it
//! runs before any network call.

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::error::ApiError;
use crate::http::cors::{public_headers, MethodGate};
use crate::http::request::request_id;
use crate::http::response::{finish, within_deadline};
use crate::http::server::AppState;
use crate::observability::metrics::{self, UpstreamOutcome};

const HANDLER: &str = "crest_proxy";
const UPSTREAM: &str = "crests";
const GENERIC_FAILURE: &str = "Internal Server Error proxying image request.";

pub const CACHE_CONTROL: &str = "public, s-maxage=86400, max-age=86400, stale-while-revalidate";

pub async fn crest_proxy(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers).to_string();
    let result = within_deadline(
        state.request_timeout,
        GENERIC_FAILURE,
        proxy_image(&state, &request_id, &method, query.as_deref()),
    )
    .await;
    finish(HANDLER, &request_id, start, public_headers(), result)
}

async fn proxy_image(
    state: &AppState,
    request_id: &str,
    method: &Method,
    query: Option<&str>,
) -> Result<Response, ApiError> {
    MethodGate::new(Method::GET, false).check(method)?;

    let image_url = single_url_param(query).ok_or_else(|| {
        ApiError::InvalidInput("Missing or invalid 'url' query parameter.".to_string())
    })?;

    if !state.crests.is_trusted(&image_url) {
        tracing::warn!(request_id = %request_id, url = %image_url, "Rejected image URL outside trusted prefix");
        return Err(ApiError::InvalidInput("Invalid image URL domain.".to_string()));
    }

    let reply = match state.crests.fetch(&image_url).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(request_id = %request_id, url = %image_url, error = %e, "Error fetching image");
            metrics::record_upstream(UPSTREAM, UpstreamOutcome::Unreachable);
            return Err(ApiError::UpstreamUnreachable(GENERIC_FAILURE));
        }
    };

    if !reply.status.is_success() {
        metrics::record_upstream(UPSTREAM, UpstreamOutcome::ErrorStatus);
        return Err(ApiError::UpstreamStatus {
            status: reply.status,
            message: format!(
                "Failed to fetch image: upstream status {}",
                reply.status.as_u16()
            ),
        });
    }

    metrics::record_upstream(UPSTREAM, UpstreamOutcome::Success);
    let content_type = resolve_content_type(reply.content_type.as_ref(), &image_url);
    tracing::debug!(request_id = %request_id, url = %image_url, content_type = ?content_type, bytes = reply.body.len(), "Image fetched");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL)),
        ],
        reply.body,
    )
        .into_response())
}

/// The `url` parameter, only when it occurs exactly once and is non-empty.
fn single_url_param(query: Option<&str>) -> Option<String> {
    let mut values = url::form_urlencoded::parse(query?.as_bytes())
        .filter(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned());
    let first = values.next()?;
    if values.next().is_some() || first.is_empty() {
        return None;
    }
    Some(first)
}

/// Upstream content type if it reported one, else inferred from the URL.
pub fn resolve_content_type(upstream: Option<&HeaderValue>, url: &str) -> HeaderValue {
    if let Some(value) = upstream.filter(|v| !v.is_empty()) {
        return value.clone();
    }
    if url.ends_with(".svg") {
        HeaderValue::from_static("image/svg+xml")
    } else if url.ends_with(".png") {
        HeaderValue::from_static("image/png")
    } else {
        HeaderValue::from_static("application/octet-stream")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_content_type_wins() {
        let upstream = HeaderValue::from_static("image/webp");
        assert_eq!(
            resolve_content_type(Some(&upstream), "https://crests.football-data.org/57.svg"),
            "image/webp"
        );
    }

    #[test]
    fn test_content_type_inferred_from_extension() {
        assert_eq!(
            resolve_content_type(None, "https://crests.football-data.org/57.svg"),
            "image/svg+xml"
        );
        assert_eq!(
            resolve_content_type(None, "https://crests.football-data.org/57.png"),
            "image/png"
        );
        assert_eq!(
            resolve_content_type(None, "https://crests.football-data.org/57.gif"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_empty_upstream_content_type_counts_as_absent() {
        let empty = HeaderValue::from_static("");
        assert_eq!(
            resolve_content_type(Some(&empty), "https://crests.football-data.org/57.png"),
            "image/png"
        );
    }

    #[test]
    fn test_single_url_param() {
        assert_eq!(
            single_url_param(Some("url=https%3A%2F%2Fcrests.football-data.org%2F57.png")),
            Some("https://crests.football-data.org/57.png".to_string())
        );
        assert_eq!(single_url_param(None), None);
        assert_eq!(single_url_param(Some("other=1")), None);
        assert_eq!(single_url_param(Some("url=")), None);
        assert_eq!(single_url_param(Some("url=a&url=b")), None);
    }
}
