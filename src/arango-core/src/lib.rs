//! arango-core
//!
//! Types shared by the ArangoDB client crates:
//! - Connection configuration
//! - Request and response models of the HTTP API

pub mod config;
pub mod models;

// Re-export commonly used types
pub use config::{ConnectionConfig, DEFAULT_DATABASE};
pub use models::*;
