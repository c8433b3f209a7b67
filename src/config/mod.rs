//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to all handlers
//!
//! process environment
//!     → credentials.rs (read once)
//!     → Credentials (immutable, checked per request)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets never live in the config file

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::{
    CorsConfig, CrestConfig, FootballDataConfig, GeminiConfig, ListenerConfig, LogFormat,
    ObservabilityConfig, OriginPolicy, SecurityConfig, ServiceConfig, TimeoutConfig,
};
