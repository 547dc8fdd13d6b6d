mod client;
mod config;
mod error;

pub use client::Client;
pub use config::ClientConfig;
pub use error::SdkError;

// Re-export API types for convenience
pub use loki_api;
pub use loki_api::{Direction, QueryRangeRequest};
