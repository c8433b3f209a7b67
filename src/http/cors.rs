//! CORS and method gate shared by every handler.
//!
//! # Responsibilities
//! - Decide whether a request is a preflight to answer with a bare 200
//! - Reject methods the handler does not serve (405, no upstream call)
//! - Choose the `Access-Control-Allow-Origin` value
//!
//! # Design Decisions
//! - The origin check is a substring/prefix match, not a security boundary.
//!   It only controls which browser origins may read responses.
//! - Headers are produced as a `HeaderMap` and attached after the handler
//!   has run, so error responses carry them too.

use axum::http::{header, HeaderMap, HeaderValue, Method};

use crate::config::{CorsConfig, OriginPolicy};
use crate::error::ApiError;

const CREDENTIALED_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";
const PUBLIC_ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Origin policy for handlers that talk to credentialed upstreams.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    policy: OriginPolicy,
    production_origin: HeaderValue,
    preview_domain_fragment: String,
    local_dev_prefix: String,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        let production_origin = HeaderValue::from_str(&config.production_origin)
            .unwrap_or_else(|_| HeaderValue::from_static("null"));
        Self {
            policy: config.policy,
            production_origin,
            preview_domain_fragment: config.preview_domain_fragment.clone(),
            local_dev_prefix: config.local_dev_prefix.clone(),
        }
    }

    /// Pick the literal `Access-Control-Allow-Origin` value for a caller.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        let Some(origin) = origin else {
            return self.production_origin.clone();
        };
        let echo = match self.policy {
            OriginPolicy::EchoAny => true,
            OriginPolicy::Allowlist => origin
                .to_str()
                .map(|o| {
                    (!self.preview_domain_fragment.is_empty() && o.contains(&self.preview_domain_fragment))
                        || (!self.local_dev_prefix.is_empty() && o.starts_with(&self.local_dev_prefix))
                })
                .unwrap_or(false),
        };
        if echo {
            origin.clone()
        } else {
            self.production_origin.clone()
        }
    }

    /// Response headers for the credentialed (POST) handlers.
    pub fn headers(&self, origin: Option<&HeaderValue>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin(origin));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(CREDENTIALED_ALLOW_HEADERS),
        );
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers
    }
}

/// Response headers for public, secret-free resources such as images.
pub fn public_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PUBLIC_ALLOW_HEADERS),
    );
    headers
}

/// Outcome of a successful gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Answer with a bare 200 and stop.
    Preflight,
    /// Continue with the handler's own logic.
    Proceed,
}

/// Method gate: each handler serves exactly one method.
#[derive(Debug, Clone)]
pub struct MethodGate {
    allowed: Method,
    answers_preflight: bool,
}

impl MethodGate {
    pub fn new(allowed: Method, answers_preflight: bool) -> Self {
        Self {
            allowed,
            answers_preflight,
        }
    }

    pub fn check(&self, method: &Method) -> Result<GateDecision, ApiError> {
        if self.answers_preflight && *method == Method::OPTIONS {
            return Ok(GateDecision::Preflight);
        }
        if *method == self.allowed {
            Ok(GateDecision::Proceed)
        } else {
            Err(ApiError::MethodNotAllowed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowlist() -> CorsPolicy {
        CorsPolicy::from_config(&CorsConfig::default())
    }

    #[test]
    fn test_preview_origin_is_echoed() {
        let origin = HeaderValue::from_static("https://onlysports-git-feature-team.vercel.app");
        assert_eq!(allowlist().allow_origin(Some(&origin)), origin);
    }

    #[test]
    fn test_localhost_origin_is_echoed() {
        let origin = HeaderValue::from_static("http://localhost:5173");
        assert_eq!(allowlist().allow_origin(Some(&origin)), origin);
    }

    #[test]
    fn test_foreign_origin_falls_back_to_production() {
        let origin = HeaderValue::from_static("https://evil.example.com");
        assert_eq!(
            allowlist().allow_origin(Some(&origin)),
            "https://onlysports.vercel.app"
        );
        assert_eq!(allowlist().allow_origin(None), "https://onlysports.vercel.app");
    }

    #[test]
    fn test_localhost_must_be_a_prefix() {
        let origin = HeaderValue::from_static("https://example.com/http://localhost:3000");
        assert_eq!(
            allowlist().allow_origin(Some(&origin)),
            "https://onlysports.vercel.app"
        );
    }

    #[test]
    fn test_echo_any_reflects_origin() {
        let config = CorsConfig {
            policy: OriginPolicy::EchoAny,
            ..CorsConfig::default()
        };
        let origin = HeaderValue::from_static("https://anything.example");
        assert_eq!(CorsPolicy::from_config(&config).allow_origin(Some(&origin)), origin);
    }

    #[test]
    fn test_credentialed_headers() {
        let headers = allowlist().headers(None);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    }

    #[test]
    fn test_method_gate() {
        let post = MethodGate::new(Method::POST, true);
        assert_eq!(post.check(&Method::POST).unwrap(), GateDecision::Proceed);
        assert_eq!(post.check(&Method::OPTIONS).unwrap(), GateDecision::Preflight);
        assert!(matches!(post.check(&Method::GET), Err(ApiError::MethodNotAllowed)));

        let get = MethodGate::new(Method::GET, false);
        assert_eq!(get.check(&Method::GET).unwrap(), GateDecision::Proceed);
        assert!(matches!(get.check(&Method::OPTIONS), Err(ApiError::MethodNotAllowed)));
    }
}
