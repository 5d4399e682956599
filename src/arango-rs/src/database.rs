use std::sync::Arc;

use arango_core::{
    CollectionList, CollectionSummary, CreateCollectionOptions, DatabaseInfo, EdgeDefinition,
    TransactionOptions, DEFAULT_DATABASE,
};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::cache::{CacheDelta, CollectionNames, GraphNames, IdentityCache};
use crate::collection::Collection;
use crate::connection::Connection;
use crate::error::{ArangoError, Result};
use crate::graph::Graph;

/// Handle to one database.
///
/// Owns the caches of its collection and graph proxies.
#[derive(Debug)]
pub struct Database {
    pub(crate) conn: Arc<Connection>,
    name: String,
    collections: IdentityCache<Collection>,
    graphs: IdentityCache<Graph>,
}

#[derive(Serialize)]
struct CreateCollectionBody<'a> {
    name: &'a str,
    #[serde(flatten)]
    options: &'a CreateCollectionOptions,
}

impl Database {
    pub(crate) fn new(conn: Arc<Connection>, name: &str) -> Self {
        Self {
            conn,
            name: name.to_string(),
            collections: IdentityCache::new(),
            graphs: IdentityCache::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn collection_names(&self) -> CollectionNames {
        CollectionNames {
            conn: self.conn.clone(),
            database: self.name.clone(),
        }
    }

    fn graph_names(&self) -> GraphNames {
        GraphNames {
            conn: self.conn.clone(),
            database: self.name.clone(),
        }
    }

    pub async fn properties(&self) -> Result<DatabaseInfo> {
        self.conn
            .get(&self.name, "/database/current")
            .send()
            .await?
            .ok_or("get database properties")?
            .into_field("result")
    }

    // ===== Collections =====

    /// User and system collection names.
    pub async fn collections(&self) -> Result<CollectionList> {
        list_collections(&self.conn, &self.name).await
    }

    /// Looks up a collection proxy, refreshing the cache once on a miss.
    pub async fn collection(&mut self, name: &str) -> Result<&mut Collection> {
        let source = self.collection_names();
        self.collections.resolve(&source, name).await
    }

    pub async fn refresh_collections(&mut self) -> Result<CacheDelta> {
        let source = self.collection_names();
        self.collections.refresh(&source).await
    }

    pub async fn create_collection(
        &mut self,
        name: &str,
        options: &CreateCollectionOptions,
    ) -> Result<&mut Collection> {
        self.conn
            .post(&self.name, "/collection")
            .json(&CreateCollectionBody { name, options })
            .send()
            .await?
            .ok_or("create collection")?;
        self.refresh_collections().await?;
        self.collection(name).await
    }

    pub async fn delete_collection(&mut self, name: &str) -> Result<()> {
        self.conn
            .delete(&self.name, format!("/collection/{}", name))
            .send()
            .await?
            .ok_or("delete collection")?;
        self.refresh_collections().await?;
        Ok(())
    }

    pub async fn rename_collection(&mut self, name: &str, new_name: &str) -> Result<()> {
        self.conn
            .put(&self.name, format!("/collection/{}/rename", name))
            .json(&json!({ "name": new_name }))
            .send()
            .await?
            .ok_or("rename collection")?;
        self.refresh_collections().await?;
        Ok(())
    }

    // ===== Graphs =====

    pub async fn graphs(&self) -> Result<Vec<String>> {
        list_graphs(&self.conn, &self.name).await
    }

    /// Looks up a graph proxy, refreshing the cache once on a miss.
    pub async fn graph(&mut self, name: &str) -> Result<&mut Graph> {
        let source = self.graph_names();
        self.graphs.resolve(&source, name).await
    }

    pub async fn refresh_graphs(&mut self) -> Result<CacheDelta> {
        let source = self.graph_names();
        self.graphs.refresh(&source).await
    }

    /// Creates a graph and returns its cached proxy.
    ///
    /// Any status in the OK set counts as success, not only 201: the server
    /// answers 202 when the write was not synced to disk.
    pub async fn create_graph(
        &mut self,
        name: &str,
        edge_definitions: &[EdgeDefinition],
        orphan_collections: &[String],
    ) -> Result<&mut Graph> {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::from(name));
        if !edge_definitions.is_empty() {
            body.insert(
                "edgeDefinitions".to_string(),
                serde_json::to_value(edge_definitions)?,
            );
        }
        if !orphan_collections.is_empty() {
            body.insert("orphanCollections".to_string(), json!(orphan_collections));
        }

        self.conn
            .post(&self.name, "/gharial")
            .json(&body)
            .send()
            .await?
            .ok_or("create graph")?;
        self.refresh_graphs().await?;
        self.graph(name).await
    }

    /// Drops a graph definition and refreshes the graph cache.
    ///
    /// Like [`Database::create_graph`], success is any status in the OK set
    /// rather than exactly 200, since unsynced drops answer 202.
    pub async fn delete_graph(&mut self, name: &str) -> Result<()> {
        self.conn
            .delete(&self.name, format!("/gharial/{}", name))
            .send()
            .await?
            .ok_or("delete graph")?;
        self.refresh_graphs().await?;
        Ok(())
    }

    // ===== Transactions =====

    /// Runs a JavaScript `action` server-side and returns its result.
    pub async fn execute_transaction(
        &self,
        action: &str,
        options: &TransactionOptions,
    ) -> Result<Value> {
        let mut collections = Map::new();
        if let Some(read) = &options.read_collections {
            collections.insert("read".to_string(), json!(read));
        }
        if let Some(write) = &options.write_collections {
            collections.insert("write".to_string(), json!(write));
        }
        let mut body = json!({ "collections": collections, "action": action });
        if let Some(params) = &options.params {
            body["params"] = params.clone();
        }

        let response = self
            .conn
            .post(&self.name, "/transaction")
            .param("waitForSync", options.wait_for_sync)
            .param_opt("lockTimeout", options.lock_timeout)
            .json(&body)
            .send()
            .await?;
        if response.status_code != 200 {
            return Err(ArangoError::server("execute transaction", &response));
        }
        response.into_field("result")
    }
}

/// Every database on the server.
pub(crate) async fn list_all_databases(conn: &Connection) -> Result<Vec<String>> {
    conn.get(DEFAULT_DATABASE, "/database")
        .send()
        .await?
        .ok_or("list databases")?
        .into_field("result")
}

pub(crate) async fn list_collections(conn: &Connection, database: &str) -> Result<CollectionList> {
    let summaries: Vec<CollectionSummary> = conn
        .get(database, "/collection")
        .send()
        .await?
        .ok_or("list collections")?
        .into_field("collections")?;
    Ok(summaries.into_iter().collect())
}

pub(crate) async fn list_graphs(conn: &Connection, database: &str) -> Result<Vec<String>> {
    let graphs: Vec<Value> = conn
        .get(database, "/gharial")
        .send()
        .await?
        .ok_or("list graphs")?
        .into_field("graphs")?;
    graphs
        .iter()
        .map(|graph| {
            graph
                .get("_key")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ArangoError::InvalidResponse("graph entry without `_key`".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use arango_core::ConnectionConfig;

    fn database(transport: &Arc<MockTransport>) -> Database {
        let conn = Arc::new(Connection::with_transport(
            ConnectionConfig::default(),
            transport.clone(),
        ));
        Database::new(conn, "shop")
    }

    fn collections_body(names: &[(&str, bool)]) -> Value {
        let entries: Vec<Value> = names
            .iter()
            .map(|(name, system)| json!({"name": name, "isSystem": system}))
            .collect();
        json!({ "collections": entries })
    }

    #[tokio::test]
    async fn test_collection_resolution_is_cached() {
        let transport = MockTransport::new();
        transport.push(200, collections_body(&[("foo", false), ("bar", false), ("_users", true)]));
        let mut db = database(&transport);

        assert_eq!(db.collection("foo").await.unwrap().name(), "foo");
        assert_eq!(db.collection("bar").await.unwrap().name(), "bar");
        assert_eq!(db.collection("_users").await.unwrap().name(), "_users");
        assert_eq!(transport.calls(), vec!["GET /_db/shop/_api/collection"]);
    }

    #[tokio::test]
    async fn test_missing_graph_is_not_found() {
        let transport = MockTransport::new();
        transport.push(200, json!({"graphs": [{"_key": "social"}]}));
        let mut db = database(&transport);

        let err = db.graph("roads").await.unwrap_err();
        assert_eq!(err.to_string(), "Graph not found: roads");
        assert_eq!(transport.calls(), vec!["GET /_db/shop/_api/gharial"]);
    }

    #[tokio::test]
    async fn test_create_collection_refreshes_and_resolves() {
        let transport = MockTransport::new();
        transport.push(200, json!({"id": "1", "name": "people"}));
        transport.push(200, collections_body(&[("people", false)]));
        let mut db = database(&transport);

        let collection = db
            .create_collection("people", &CreateCollectionOptions::default())
            .await
            .unwrap();
        assert_eq!(collection.name(), "people");

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "people");
        assert_eq!(body["type"], 2);
        assert_eq!(body["doCompact"], true);
    }

    #[tokio::test]
    async fn test_delete_collection_drops_cache_entry() {
        let transport = MockTransport::new();
        transport.push(200, collections_body(&[("old", false)]));
        transport.push(200, json!({"id": "1"}));
        transport.push(200, collections_body(&[]));
        let mut db = database(&transport);

        db.collection("old").await.unwrap();
        db.delete_collection("old").await.unwrap();
        assert!(!db.collections.contains("old"));
    }

    #[tokio::test]
    async fn test_unsynced_graph_writes_succeed() {
        let transport = MockTransport::new();
        transport.push(202, json!({"graph": {"_key": "social"}}));
        transport.push(200, json!({"graphs": [{"_key": "social"}]}));
        transport.push(202, json!({"removed": true}));
        transport.push(200, json!({"graphs": []}));
        let mut db = database(&transport);

        let graph = db.create_graph("social", &[], &[]).await.unwrap();
        assert_eq!(graph.name(), "social");

        db.delete_graph("social").await.unwrap();
        assert!(!db.graphs.contains("social"));
        assert_eq!(
            transport.calls(),
            vec![
                "POST /_db/shop/_api/gharial",
                "GET /_db/shop/_api/gharial",
                "DELETE /_db/shop/_api/gharial/social",
                "GET /_db/shop/_api/gharial",
            ]
        );
    }

    #[tokio::test]
    async fn test_transaction_requires_exactly_200() {
        let transport = MockTransport::new();
        transport.push(201, json!({"result": 1}));
        transport.push(200, json!({"result": {"ok": true}}));
        let db = database(&transport);
        let options = TransactionOptions {
            write_collections: Some(vec!["people".into()]),
            lock_timeout: Some(0),
            ..Default::default()
        };

        let err = db.execute_transaction("function () {}", &options).await.unwrap_err();
        assert_eq!(err.status_code(), Some(201));

        let result = db.execute_transaction("function () {}", &options).await.unwrap();
        assert_eq!(result, json!({"ok": true}));

        let requests = transport.requests();
        let request = &requests[1];
        assert!(request.params.contains(&("lockTimeout".to_string(), "0".to_string())));
        let body: Value = serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["collections"], json!({"write": ["people"]}));
    }

    #[tokio::test]
    async fn test_properties() {
        let transport = MockTransport::new();
        transport.push(
            200,
            json!({"result": {"id": "1", "name": "shop", "path": "/data/shop", "isSystem": false}}),
        );
        let db = database(&transport);
        let info = db.properties().await.unwrap();
        assert_eq!(info.name, "shop");
        assert!(!info.is_system);
    }
}
