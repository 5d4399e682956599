use std::sync::Arc;

use arango_core::{
    CollectionList, ConnectionConfig, CreateCollectionOptions, DatabaseList, DatabaseUser,
    EdgeDefinition, QueryOptions, TransactionOptions, DEFAULT_DATABASE,
};
use serde_json::{json, Value};
use tracing::info;

use crate::batch::SupportsBatch;
use crate::cache::{CacheDelta, DatabaseNames, IdentityCache};
use crate::collection::Collection;
use crate::connection::Connection;
use crate::cursor::Cursor;
use crate::database::{list_all_databases, Database};
use crate::error::Result;
use crate::graph::Graph;
use crate::transport::Transport;

/// Client entry point for one ArangoDB server.
///
/// Owns the database proxy cache and a handle to `_system`, which the
/// collection, graph, query, transaction and batch shortcuts operate on.
#[derive(Debug)]
pub struct Arango {
    pub(crate) conn: Arc<Connection>,
    databases: IdentityCache<Database>,
    default_database: Database,
}

impl Arango {
    /// Connects with the default reqwest transport and checks the server.
    pub async fn connect(config: ConnectionConfig) -> Result<Self> {
        Self::from_connection(Connection::new(config)).await
    }

    /// Connects through a caller-supplied transport.
    pub async fn with_transport(
        config: ConnectionConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        Self::from_connection(Connection::with_transport(config, transport)).await
    }

    async fn from_connection(conn: Connection) -> Result<Self> {
        conn.verify().await?;
        info!(
            host = %conn.config().host,
            port = conn.config().port,
            "Connected to ArangoDB"
        );
        let conn = Arc::new(conn);
        Ok(Self {
            default_database: Database::new(conn.clone(), DEFAULT_DATABASE),
            databases: IdentityCache::new(),
            conn,
        })
    }

    pub fn connection(&self) -> &Arc<Connection> {
        &self.conn
    }

    fn database_names(&self) -> DatabaseNames {
        DatabaseNames {
            conn: self.conn.clone(),
        }
    }

    /// Server version string.
    pub async fn version(&self) -> Result<String> {
        self.conn
            .get(DEFAULT_DATABASE, "/version")
            .send()
            .await?
            .ok_or("get version")?
            .into_field("version")
    }

    // ===== Databases =====

    /// Databases on the server and those the current user can access.
    pub async fn databases(&self) -> Result<DatabaseList> {
        let user = self
            .conn
            .get(DEFAULT_DATABASE, "/database/user")
            .send()
            .await?
            .ok_or("list databases")?
            .into_field("result")?;
        let all = list_all_databases(&self.conn).await?;
        Ok(DatabaseList { all, user })
    }

    /// Looks up a database proxy, refreshing the cache once on a miss.
    pub async fn database(&mut self, name: &str) -> Result<&mut Database> {
        let source = self.database_names();
        self.databases.resolve(&source, name).await
    }

    pub async fn refresh_databases(&mut self) -> Result<CacheDelta> {
        let source = self.database_names();
        self.databases.refresh(&source).await
    }

    pub async fn create_database(
        &mut self,
        name: &str,
        users: &[DatabaseUser],
    ) -> Result<&mut Database> {
        let mut body = json!({ "name": name });
        if !users.is_empty() {
            body["users"] = serde_json::to_value(users)?;
        }
        self.conn
            .post(DEFAULT_DATABASE, "/database")
            .json(&body)
            .send()
            .await?
            .ok_or("create database")?;
        self.refresh_databases().await?;
        self.database(name).await
    }

    /// Drops a database; with `safe_delete` a missing database is not an error.
    pub async fn delete_database(&mut self, name: &str, safe_delete: bool) -> Result<()> {
        let response = self
            .conn
            .delete(DEFAULT_DATABASE, format!("/database/{}", name))
            .send()
            .await?;
        if !(safe_delete && response.status_code == 404) {
            response.ok_or("delete database")?;
        }
        self.refresh_databases().await?;
        Ok(())
    }

    // ===== Default database shortcuts =====

    /// The `_system` database the shortcuts below operate on.
    pub fn default_database(&mut self) -> &mut Database {
        &mut self.default_database
    }

    pub async fn collections(&self) -> Result<CollectionList> {
        self.default_database.collections().await
    }

    pub async fn collection(&mut self, name: &str) -> Result<&mut Collection> {
        self.default_database.collection(name).await
    }

    pub async fn create_collection(
        &mut self,
        name: &str,
        options: &CreateCollectionOptions,
    ) -> Result<&mut Collection> {
        self.default_database.create_collection(name, options).await
    }

    pub async fn delete_collection(&mut self, name: &str) -> Result<()> {
        self.default_database.delete_collection(name).await
    }

    pub async fn graphs(&self) -> Result<Vec<String>> {
        self.default_database.graphs().await
    }

    pub async fn graph(&mut self, name: &str) -> Result<&mut Graph> {
        self.default_database.graph(name).await
    }

    pub async fn create_graph(
        &mut self,
        name: &str,
        edge_definitions: &[EdgeDefinition],
        orphan_collections: &[String],
    ) -> Result<&mut Graph> {
        self.default_database
            .create_graph(name, edge_definitions, orphan_collections)
            .await
    }

    pub async fn delete_graph(&mut self, name: &str) -> Result<()> {
        self.default_database.delete_graph(name).await
    }

    pub async fn execute_query(&self, query: &str, options: &QueryOptions) -> Result<Cursor> {
        self.default_database.execute_query(query, options).await
    }

    pub async fn execute_transaction(
        &self,
        action: &str,
        options: &TransactionOptions,
    ) -> Result<Value> {
        self.default_database.execute_transaction(action, options).await
    }

    pub async fn execute_batch(&self, operations: &[&dyn SupportsBatch]) -> Result<Vec<Value>> {
        self.default_database.execute_batch(operations).await
    }
}
