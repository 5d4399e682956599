use arango_core::DocumentMeta;
use serde_json::Value;

use crate::batch::{PreparedRequest, SupportsBatch};
use crate::collection::Collection;
use crate::error::{ArangoError, Result};
use crate::transport::HttpMethod;

/// Shared options of update, replace and delete operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Revision the stored document must have
    pub rev: Option<String>,
    /// Keep attributes set to null on update instead of removing them
    pub keep_null: bool,
    pub wait_for_sync: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            rev: None,
            keep_null: true,
            wait_for_sync: false,
        }
    }
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rev(mut self, rev: impl Into<String>) -> Self {
        self.rev = Some(rev.into());
        self
    }

    pub fn keep_null(mut self, keep_null: bool) -> Self {
        self.keep_null = keep_null;
        self
    }

    pub fn wait_for_sync(mut self, wait_for_sync: bool) -> Self {
        self.wait_for_sync = wait_for_sync;
        self
    }

    /// Explicit revision, falling back to the `_rev` of the payload.
    pub(crate) fn effective_rev(&self, data: Option<&Value>) -> Option<String> {
        self.rev.clone().or_else(|| {
            data.and_then(|d| d.get("_rev"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    }
}

/// Precondition on the revision of a fetched document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionCondition {
    /// Fail unless the stored revision equals this one (`If-Match`)
    Matches(String),
    /// Fail if the stored revision equals this one (`If-None-Match`)
    Differs(String),
}

/// A single-document write on the `/document` API
#[derive(Debug, Clone)]
pub enum DocumentMutation {
    Create {
        collection: String,
        data: Value,
        wait_for_sync: bool,
    },
    Update {
        collection: String,
        key: String,
        data: Value,
        options: WriteOptions,
    },
    Replace {
        collection: String,
        key: String,
        data: Value,
        options: WriteOptions,
    },
    Delete {
        collection: String,
        key: String,
        options: WriteOptions,
    },
}

impl DocumentMutation {
    pub fn create(collection: impl Into<String>, data: Value, wait_for_sync: bool) -> Self {
        Self::Create {
            collection: collection.into(),
            data,
            wait_for_sync,
        }
    }

    pub fn update(
        collection: impl Into<String>,
        key: impl Into<String>,
        data: Value,
        options: WriteOptions,
    ) -> Self {
        Self::Update {
            collection: collection.into(),
            key: key.into(),
            data,
            options,
        }
    }

    pub fn replace(
        collection: impl Into<String>,
        key: impl Into<String>,
        data: Value,
        options: WriteOptions,
    ) -> Self {
        Self::Replace {
            collection: collection.into(),
            key: key.into(),
            data,
            options,
        }
    }

    pub fn delete(collection: impl Into<String>, key: impl Into<String>, options: WriteOptions) -> Self {
        Self::Delete {
            collection: collection.into(),
            key: key.into(),
            options,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create document",
            Self::Update { .. } => "update document",
            Self::Replace { .. } => "replace document",
            Self::Delete { .. } => "delete document",
        }
    }
}

fn with_revision(request: PreparedRequest, rev: Option<String>) -> PreparedRequest {
    match rev {
        Some(rev) => request.param("rev", rev).param("policy", "error"),
        None => request,
    }
}

impl SupportsBatch for DocumentMutation {
    fn prepare(&self) -> Result<PreparedRequest> {
        let request = match self {
            Self::Create {
                collection,
                data,
                wait_for_sync,
            } => {
                let mut request = PreparedRequest::new(HttpMethod::Post, "/document")
                    .param("collection", collection)
                    .param("waitForSync", wait_for_sync);
                for (field, param) in [("_from", "from"), ("_to", "to")] {
                    if let Some(handle) = data.get(field).and_then(Value::as_str) {
                        request = request.param(param, handle);
                    }
                }
                request.body(data.clone())
            }
            Self::Update {
                collection,
                key,
                data,
                options,
            } => {
                let request =
                    PreparedRequest::new(HttpMethod::Patch, format!("/document/{}/{}", collection, key))
                        .param("waitForSync", options.wait_for_sync)
                        .param("keepNull", options.keep_null);
                with_revision(request, options.effective_rev(Some(data))).body(data.clone())
            }
            Self::Replace {
                collection,
                key,
                data,
                options,
            } => {
                let request =
                    PreparedRequest::new(HttpMethod::Put, format!("/document/{}/{}", collection, key))
                        .param("waitForSync", options.wait_for_sync);
                with_revision(request, options.effective_rev(Some(data))).body(data.clone())
            }
            Self::Delete {
                collection,
                key,
                options,
            } => {
                let request =
                    PreparedRequest::new(HttpMethod::Delete, format!("/document/{}/{}", collection, key))
                        .param("waitForSync", options.wait_for_sync);
                with_revision(request, options.effective_rev(None))
            }
        };
        Ok(request)
    }
}

impl Collection {
    /// Fetches a document by key; `None` if it does not exist.
    pub async fn document(
        &self,
        key: &str,
        condition: Option<RevisionCondition>,
    ) -> Result<Option<Value>> {
        let mut request = self
            .conn
            .get(&self.database, format!("/document/{}/{}", self.name(), key));
        match condition {
            Some(RevisionCondition::Matches(rev)) => request = request.header("If-Match", rev),
            Some(RevisionCondition::Differs(rev)) => request = request.header("If-None-Match", rev),
            None => {}
        }

        let response = request.send().await?;
        match response.status_code {
            412 | 304 => Err(ArangoError::RevisionConflict(response.server_error())),
            404 => Ok(None),
            _ => Ok(Some(response.ok_or("get document")?.into_body()?)),
        }
    }

    pub async fn create_document(&self, data: Value, wait_for_sync: bool) -> Result<DocumentMeta> {
        self.execute_mutation(&DocumentMutation::create(self.name(), data, wait_for_sync))
            .await
    }

    /// Partially updates a document.
    pub async fn update_document(
        &self,
        key: &str,
        data: Value,
        options: WriteOptions,
    ) -> Result<DocumentMeta> {
        self.execute_mutation(&DocumentMutation::update(self.name(), key, data, options))
            .await
    }

    pub async fn replace_document(
        &self,
        key: &str,
        data: Value,
        options: WriteOptions,
    ) -> Result<DocumentMeta> {
        self.execute_mutation(&DocumentMutation::replace(self.name(), key, data, options))
            .await
    }

    pub async fn delete_document(&self, key: &str, options: WriteOptions) -> Result<DocumentMeta> {
        self.execute_mutation(&DocumentMutation::delete(self.name(), key, options))
            .await
    }

    async fn execute_mutation(&self, mutation: &DocumentMutation) -> Result<DocumentMeta> {
        let prepared = mutation.prepare()?;
        self.conn
            .send_prepared(&self.database, &prepared)
            .await?
            .ok_or_conflict(mutation.operation())?
            .into_body()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;
    use crate::test_support::MockTransport;
    use arango_core::ConnectionConfig;
    use serde_json::json;
    use std::sync::Arc;

    fn collection(transport: &Arc<MockTransport>) -> Collection {
        let conn = Arc::new(Connection::with_transport(
            ConnectionConfig::default(),
            transport.clone(),
        ));
        Collection::new(conn, "shop", "people")
    }

    fn param(request: &PreparedRequest, name: &str) -> Option<String> {
        request
            .params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    #[test]
    fn test_update_takes_rev_from_payload() {
        let mutation = DocumentMutation::update("people", "a", json!({"_rev": "7", "x": 1}), WriteOptions::new());
        let request = mutation.prepare().unwrap();
        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.path, "/document/people/a");
        assert_eq!(param(&request, "rev").as_deref(), Some("7"));
        assert_eq!(param(&request, "policy").as_deref(), Some("error"));
        assert_eq!(param(&request, "keepNull").as_deref(), Some("true"));
    }

    #[test]
    fn test_explicit_rev_wins() {
        let mutation = DocumentMutation::replace(
            "people",
            "a",
            json!({"_rev": "7"}),
            WriteOptions::new().rev("9"),
        );
        let request = mutation.prepare().unwrap();
        assert_eq!(param(&request, "rev").as_deref(), Some("9"));
        assert_eq!(param(&request, "keepNull"), None);
    }

    #[test]
    fn test_create_edge_document_passes_endpoints() {
        let mutation = DocumentMutation::create(
            "knows",
            json!({"_from": "people/a", "_to": "people/b"}),
            false,
        );
        let request = mutation.prepare().unwrap();
        assert_eq!(param(&request, "from").as_deref(), Some("people/a"));
        assert_eq!(param(&request, "to").as_deref(), Some("people/b"));
    }

    #[tokio::test]
    async fn test_update_conflict() {
        let transport = MockTransport::new();
        transport.push(412, json!({"error": true, "errorNum": 1200, "errorMessage": "conflict"}));
        let col = collection(&transport);

        let err = col
            .update_document("a", json!({"x": 2}), WriteOptions::new().rev("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, ArangoError::RevisionConflict(ref e) if e.error_num == Some(1200)));
    }

    #[tokio::test]
    async fn test_conditional_get() {
        let transport = MockTransport::new();
        transport.push_empty(304);
        transport.push(404, json!({"errorNum": 1202}));
        transport.push(200, json!({"_key": "a", "_rev": "3"}));
        let col = collection(&transport);

        let err = col
            .document("a", Some(RevisionCondition::Differs("3".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, ArangoError::RevisionConflict(_)));
        assert_eq!(
            transport.requests()[0].headers,
            vec![("If-None-Match".to_string(), "3".to_string())]
        );

        assert_eq!(col.document("gone", None).await.unwrap(), None);
        assert_eq!(
            col.document("a", Some(RevisionCondition::Matches("3".into()))).await.unwrap(),
            Some(json!({"_key": "a", "_rev": "3"}))
        );
    }

    #[tokio::test]
    async fn test_create_returns_meta() {
        let transport = MockTransport::new();
        transport.push(202, json!({"error": false, "_id": "people/a", "_key": "a", "_rev": "1"}));
        let col = collection(&transport);

        let meta = col.create_document(json!({"_key": "a"}), false).await.unwrap();
        assert_eq!(meta.id, "people/a");
        assert_eq!(meta.old_rev, None);
    }
}
