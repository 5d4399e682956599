//! Error types for arango-rs.

use std::fmt;

use crate::transport::{HttpMethod, HttpResponse};

/// Alias for Results returning [`ArangoError`].
pub type Result<T> = std::result::Result<T, ArangoError>;

/// Kind of resource the identity caches hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Database,
    Collection,
    Graph,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Database => write!(f, "Database"),
            Self::Collection => write!(f, "Collection"),
            Self::Graph => write!(f, "Graph"),
        }
    }
}

/// What the server said when a request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub method: HttpMethod,
    pub url: String,
    pub status_code: u16,
    pub status_text: Option<String>,
    /// ArangoDB's own error number (`errorNum`)
    pub error_num: Option<i64>,
    /// `errorMessage` from the body, falling back to the status text
    pub message: Option<String>,
}

impl ServerError {
    pub fn from_response(response: &HttpResponse) -> Self {
        let error_num = response.get("errorNum").and_then(|v| v.as_i64());
        let message = response
            .get("errorMessage")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| response.status_text.clone());
        Self {
            method: response.method,
            url: response.url.clone(),
            status_code: response.status_code,
            status_text: response.status_text.clone(),
            error_num,
            message,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} returned HTTP {}", self.method, self.url, self.status_code)?;
        if let Some(num) = self.error_num {
            write!(f, " (error {})", num)?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Top-level error type for arango-rs.
#[derive(Debug, thiserror::Error)]
pub enum ArangoError {
    #[error("Connection check failed: {0}")]
    Connection(ServerError),

    #[error("{kind} not found: {name}")]
    NotFound { kind: ResourceKind, name: String },

    #[error("Revision conflict: {0}")]
    RevisionConflict(ServerError),

    #[error("{operation} failed: {response}")]
    Server {
        operation: &'static str,
        response: ServerError,
    },

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl ArangoError {
    pub fn server(operation: &'static str, response: &HttpResponse) -> Self {
        Self::Server {
            operation,
            response: ServerError::from_response(response),
        }
    }

    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// HTTP status behind this error, when a response was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Connection(response)
            | Self::RevisionConflict(response)
            | Self::Server { response, .. } => Some(response.status_code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. }) || self.status_code() == Some(404)
    }
}
