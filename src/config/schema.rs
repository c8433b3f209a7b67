//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.
//! Secrets are deliberately absent here; see `credentials.rs`.

use serde::{Deserialize, Serialize};

/// Root configuration for the handler service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Inbound and outbound timeouts.
    pub timeouts: TimeoutConfig,

    /// Origin policy for the credentialed handlers.
    pub cors: CorsConfig,

    /// Sports-data REST API upstream.
    pub football_data: FootballDataConfig,

    /// Crest image CDN upstream.
    pub crests: CrestConfig,

    /// Generative-AI completion upstream.
    pub gemini: GeminiConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration shared by every handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Inbound request deadline (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 60,
        }
    }
}

/// How the `Access-Control-Allow-Origin` value is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OriginPolicy {
    /// Echo preview-deployment and local-development origins, otherwise
    /// answer with the production origin.
    #[default]
    Allowlist,
    /// Reflect whatever origin the caller sent.
    EchoAny,
}

/// CORS origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub policy: OriginPolicy,

    /// Fallback origin when the caller's origin is not echoed.
    pub production_origin: String,

    /// Substring identifying the hosting platform's preview deployments.
    pub preview_domain_fragment: String,

    /// Prefix identifying local development servers.
    pub local_dev_prefix: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            policy: OriginPolicy::Allowlist,
            production_origin: "https://onlysports.vercel.app".to_string(),
            preview_domain_fragment: "vercel.app".to_string(),
            local_dev_prefix: "http://localhost:".to_string(),
        }
    }
}

/// Sports-data REST API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FootballDataConfig {
    /// Base URL the inbound `path` is appended to.
    pub base_url: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FootballDataConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.football-data.org/v4".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Crest image CDN configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrestConfig {
    /// Every proxied image URL must start with this prefix.
    pub trusted_prefix: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CrestConfig {
    fn default() -> Self {
        Self {
            trusted_prefix: "https://crests.football-data.org/".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Generative-AI completion service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API root, without the `/models/...` suffix.
    pub base_url: String,

    /// Model identifier (e.g., "gemini-pro").
    pub model: String,

    /// Total request timeout in seconds.
    pub timeout_secs: u64,

    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,

    /// Response length cap in tokens.
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-pro".to_string(),
            timeout_secs: 30,
            temperature: 0.7,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 200,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Log forwarding details (paths, params, upstream status) at info level.
    pub verbose_forwarding: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "onlysports_api=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            verbose_forwarding: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Add `X-Content-Type-Options: nosniff` to responses.
    pub enable_headers: bool,
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}
