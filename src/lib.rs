//! OnlySports API: stateless HTTP handlers that forward to a sports-data
//! REST API, a crest image CDN and a generative-AI completion service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::{Credentials, ServiceConfig};
pub use error::ApiError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
