//! Batched execution of mutations in one multipart request.
//!
//! Every batchable operation is a value implementing [`SupportsBatch`]. The
//! same [`PreparedRequest`] is either sent on its own by the proxy methods or
//! packed into a `POST /batch` body by [`Database::execute_batch`].

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::connection::Connection;
use crate::database::Database;
use crate::error::{ArangoError, Result};
use crate::transport::HttpMethod;

pub const BATCH_BOUNDARY: &str = "XXXsubpartXXX";

/// Request description relative to a database's `/_api` prefix
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl PreparedRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Request line and headers of one multipart section.
    fn to_part(&self, conn: &Connection, database: &str) -> Result<String> {
        let mut url = Url::parse(&conn.url(database, &self.path))
            .map_err(|e| ArangoError::MalformedRequest(format!("invalid request path {}: {}", self.path, e)))?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.params);
        }

        let mut part = format!("{} {}", self.method, url.path());
        if let Some(query) = url.query() {
            part.push('?');
            part.push_str(query);
        }
        part.push_str(" HTTP/1.1");
        for (name, value) in &self.headers {
            part.push_str(&format!("\r\n{}: {}", name, value));
        }
        if let Some(body) = &self.body {
            part.push_str("\r\n\r\n");
            part.push_str(&serde_json::to_string(body)?);
        }
        Ok(part)
    }
}

/// An operation that can run standalone or as one part of a batch.
pub trait SupportsBatch {
    /// Validates the operation and describes its HTTP request.
    fn prepare(&self) -> Result<PreparedRequest>;
}

/// Builds the multipart body for `POST /batch`.
pub(crate) fn encode_batch(
    conn: &Connection,
    database: &str,
    operations: &[&dyn SupportsBatch],
) -> Result<String> {
    if operations.is_empty() {
        return Err(ArangoError::MalformedRequest(
            "batch contains no requests".to_string(),
        ));
    }

    let mut body = String::new();
    for (index, operation) in operations.iter().enumerate() {
        let prepared = operation
            .prepare()
            .map_err(|e| match e {
                ArangoError::MalformedRequest(message) => {
                    ArangoError::MalformedRequest(format!("pos {}: {}", index + 1, message))
                }
                other => other,
            })?;
        body.push_str(&format!("--{}\r\n", BATCH_BOUNDARY));
        body.push_str("Content-Type: application/x-arango-batchpart\r\n");
        body.push_str(&format!("Content-Id: {}\r\n\r\n", index + 1));
        body.push_str(&prepared.to_part(conn, database)?);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{}--\r\n\r\n", BATCH_BOUNDARY));
    Ok(body)
}

/// Every JSON object line of a multipart batch response, in order.
pub(crate) fn decode_batch(raw: &str) -> Vec<Value> {
    raw.split("\r\n")
        .filter(|line| line.starts_with('{') && line.ends_with('}'))
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

impl Database {
    /// Sends all operations in one request and returns the JSON answer of
    /// each part.
    pub async fn execute_batch(&self, operations: &[&dyn SupportsBatch]) -> Result<Vec<Value>> {
        let body = encode_batch(&self.conn, self.name(), operations)?;
        debug!(database = %self.name(), parts = operations.len(), "Executing batch");

        let response = self
            .conn
            .post(self.name(), "/batch")
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={}", BATCH_BOUNDARY),
            )
            .text(body)
            .send()
            .await?
            .ok_or("execute batch")?;
        Ok(decode_batch(response.raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentMutation, WriteOptions};
    use crate::test_support::MockTransport;
    use arango_core::ConnectionConfig;
    use serde_json::json;
    use std::sync::Arc;

    struct Invalid;

    impl SupportsBatch for Invalid {
        fn prepare(&self) -> Result<PreparedRequest> {
            Err(ArangoError::MalformedRequest("missing _from".to_string()))
        }
    }

    #[test]
    fn test_encode_parts() {
        let conn = Connection::new(ConnectionConfig::default());
        let create = DocumentMutation::create("people", json!({"_key": "a"}), false);
        let delete = DocumentMutation::delete("people", "b", WriteOptions::new().rev("12"));

        let body = encode_batch(&conn, "shop", &[&create, &delete]).unwrap();
        let expected = [
            "--XXXsubpartXXX",
            "Content-Type: application/x-arango-batchpart",
            "Content-Id: 1",
            "",
            "POST /_db/shop/_api/document?collection=people&waitForSync=false HTTP/1.1",
            "",
            r#"{"_key":"a"}"#,
            "--XXXsubpartXXX",
            "Content-Type: application/x-arango-batchpart",
            "Content-Id: 2",
            "",
            "DELETE /_db/shop/_api/document/people/b?waitForSync=false&rev=12&policy=error HTTP/1.1",
            "--XXXsubpartXXX--",
            "",
            "",
        ]
        .join("\r\n");
        assert_eq!(body, expected);
    }

    #[test]
    fn test_empty_batch_is_malformed() {
        let conn = Connection::new(ConnectionConfig::default());
        assert!(matches!(
            encode_batch(&conn, "shop", &[]),
            Err(ArangoError::MalformedRequest(_))
        ));
    }

    #[test]
    fn test_invalid_part_names_its_position() {
        let conn = Connection::new(ConnectionConfig::default());
        let ok = DocumentMutation::create("people", json!({}), false);
        let err = encode_batch(&conn, "shop", &[&ok, &Invalid]).unwrap_err();
        assert_eq!(err.to_string(), "Malformed request: pos 2: missing _from");
    }

    #[test]
    fn test_decode_keeps_json_object_lines() {
        let raw = "--XXXsubpartXXX\r\nContent-Type: application/x-arango-batchpart\r\n\r\nHTTP/1.1 202 Accepted\r\n\r\n{\"_key\":\"a\"}\r\n--XXXsubpartXXX\r\n\r\nHTTP/1.1 200 OK\r\n\r\n{\"_key\":\"b\"}\r\n--XXXsubpartXXX--";
        assert_eq!(decode_batch(raw), vec![json!({"_key": "a"}), json!({"_key": "b"})]);
    }

    #[tokio::test]
    async fn test_execute_batch_posts_multipart() {
        let transport = MockTransport::new();
        transport.push_raw(200, "--XXXsubpartXXX\r\n\r\nHTTP/1.1 202 Accepted\r\n\r\n{\"_id\":\"people/a\"}\r\n--XXXsubpartXXX--");
        let conn = Arc::new(Connection::with_transport(
            ConnectionConfig::default(),
            transport.clone(),
        ));
        let db = Database::new(conn, "shop");

        let create = DocumentMutation::create("people", json!({"_key": "a"}), true);
        let results = db.execute_batch(&[&create]).await.unwrap();
        assert_eq!(results, vec![json!({"_id": "people/a"})]);

        let requests = transport.requests();
        let request = &requests[0];
        assert_eq!(transport.calls(), vec!["POST /_db/shop/_api/batch"]);
        assert!(request.headers.contains(&(
            "Content-Type".to_string(),
            "multipart/form-data; boundary=XXXsubpartXXX".to_string()
        )));
    }
}
