//! ArangoDB Client Library
//!
//! HTTP client for the ArangoDB REST API: lazily paged query cursors,
//! cached database/collection/graph handles, and document, graph, index,
//! user and batch operations.

mod arango;
mod batch;
mod cache;
mod collection;
mod connection;
mod cursor;
mod database;
mod document;
mod error;
mod graph;
mod query;
mod simple_query;
mod transport;
mod user;

#[cfg(test)]
mod test_support;

pub use arango::Arango;
pub use batch::{PreparedRequest, SupportsBatch, BATCH_BOUNDARY};
pub use cache::{CacheDelta, IdentityCache, NameSource};
pub use collection::Collection;
pub use connection::{ApiRequest, Connection};
pub use cursor::Cursor;
pub use database::Database;
pub use document::{DocumentMutation, RevisionCondition, WriteOptions};
pub use error::{ArangoError, ResourceKind, Result, ServerError};
pub use graph::{ElementKind, Graph, GraphMutation};
pub use simple_query::{GeoQuery, Window};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use arango_core::*;
