//! Request handlers.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → method/origin gate (http::cors)
//!     → input validation
//!     → single upstream call (upstream::*)
//!     → response mapping
//!     → http::response::finish (log, CORS headers, metrics)
//! ```
//!
//! Handlers are independent of each other and keep no state between calls.

pub mod crest;
pub mod football_data;
pub mod health;
pub mod prediction;

pub use crest::crest_proxy;
pub use football_data::football_data_proxy;
pub use health::health;
pub use prediction::gemini_prediction;
