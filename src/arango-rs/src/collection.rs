use std::sync::Arc;

use arango_core::{
    CollectionProperties, CollectionPropertiesUpdate, CollectionStatus, ImportResult, IndexMap,
    IndexSpec,
};
use serde_json::Value;

use crate::connection::Connection;
use crate::error::{ArangoError, Result};

/// Handle to one collection of a database
#[derive(Debug, Clone)]
pub struct Collection {
    pub(crate) conn: Arc<Connection>,
    pub(crate) database: String,
    name: String,
}

impl Collection {
    pub(crate) fn new(conn: Arc<Connection>, database: &str, name: &str) -> Self {
        Self {
            conn,
            database: database.to_string(),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn path(&self, suffix: &str) -> String {
        format!("/collection/{}/{}", self.name, suffix)
    }

    pub async fn properties(&self) -> Result<CollectionProperties> {
        self.conn
            .get(&self.database, self.path("properties"))
            .send()
            .await?
            .ok_or("get collection properties")?
            .into_body()
    }

    /// Changes `waitForSync` and/or `journalSize`.
    pub async fn update_properties(
        &self,
        update: &CollectionPropertiesUpdate,
    ) -> Result<CollectionProperties> {
        if update.is_empty() {
            return Err(ArangoError::MalformedRequest(
                "no collection property to update".to_string(),
            ));
        }
        self.conn
            .put(&self.database, self.path("properties"))
            .json(update)
            .send()
            .await?
            .ok_or("update collection properties")?
            .into_body()
    }

    /// Number of documents.
    pub async fn count(&self) -> Result<u64> {
        self.conn
            .get(&self.database, self.path("count"))
            .send()
            .await?
            .ok_or("count documents")?
            .into_field("count")
    }

    /// Whether a document with `key` exists.
    pub async fn contains(&self, key: &str) -> Result<bool> {
        let response = self
            .conn
            .head(&self.database, format!("/document/{}/{}", self.name, key))
            .send()
            .await?;
        match response.status_code {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(ArangoError::server("check document", &response)),
        }
    }

    pub async fn figures(&self) -> Result<Value> {
        self.conn
            .get(&self.database, self.path("figures"))
            .send()
            .await?
            .ok_or("get collection figures")?
            .into_field("figures")
    }

    pub async fn revision(&self) -> Result<String> {
        let revision: Value = self
            .conn
            .get(&self.database, self.path("revision"))
            .send()
            .await?
            .ok_or("get collection revision")?
            .into_field("revision")?;
        Ok(scalar_to_string(revision))
    }

    pub async fn load(&self) -> Result<CollectionStatus> {
        self.conn
            .put(&self.database, self.path("load"))
            .send()
            .await?
            .ok_or("load collection")?
            .into_field("status")
    }

    pub async fn unload(&self) -> Result<CollectionStatus> {
        self.conn
            .put(&self.database, self.path("unload"))
            .send()
            .await?
            .ok_or("unload collection")?
            .into_field("status")
    }

    pub async fn rotate_journal(&self) -> Result<bool> {
        self.conn
            .put(&self.database, self.path("rotate"))
            .send()
            .await?
            .ok_or("rotate journal")?
            .into_field("result")
    }

    pub async fn checksum(&self, with_revisions: bool, with_data: bool) -> Result<String> {
        let checksum: Value = self
            .conn
            .get(&self.database, self.path("checksum"))
            .param("withRevision", with_revisions)
            .param("withData", with_data)
            .send()
            .await?
            .ok_or("get collection checksum")?
            .into_field("checksum")?;
        Ok(scalar_to_string(checksum))
    }

    /// Removes every document.
    pub async fn truncate(&self) -> Result<()> {
        self.conn
            .put(&self.database, self.path("truncate"))
            .send()
            .await?
            .ok_or("truncate collection")?;
        Ok(())
    }

    // ===== Indexes =====

    /// Indexes keyed by their id without the `collection/` prefix.
    pub async fn indexes(&self) -> Result<IndexMap> {
        let identifiers: IndexMap = self
            .conn
            .get(&self.database, "/index")
            .param("collection", &self.name)
            .send()
            .await?
            .ok_or("list indexes")?
            .into_field("identifiers")?;
        Ok(identifiers
            .into_iter()
            .map(|(id, details)| {
                let short = id.split_once('/').map(|(_, rest)| rest.to_string()).unwrap_or(id);
                (short, details)
            })
            .collect())
    }

    pub async fn create_index(&self, spec: &IndexSpec) -> Result<Value> {
        self.conn
            .post(&self.database, "/index")
            .param("collection", &self.name)
            .json(spec)
            .send()
            .await?
            .ok_or("create index")?
            .into_body()
    }

    pub async fn delete_index(&self, index_id: &str) -> Result<()> {
        self.conn
            .delete(&self.database, format!("/index/{}/{}", self.name, index_id))
            .send()
            .await?
            .ok_or("delete index")?;
        Ok(())
    }

    // ===== Bulk import =====

    /// Imports documents in one request, one JSON document per line.
    ///
    /// With `complete` set, one invalid document fails the whole import.
    pub async fn bulk_import(
        &self,
        documents: &[Value],
        complete: bool,
        details: bool,
    ) -> Result<ImportResult> {
        let lines = documents
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.conn
            .post(&self.database, "/import")
            .param("type", "documents")
            .param("collection", &self.name)
            .param("complete", complete)
            .param("details", details)
            .text(lines.join("\r\n"))
            .send()
            .await?
            .ok_or("bulk import")?
            .into_body()
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
