use std::sync::Arc;

use arango_core::{EdgeDefinition, GraphInfo, TraversalOptions};
use serde::Serialize;
use serde_json::{json, Value};

use crate::batch::{PreparedRequest, SupportsBatch};
use crate::connection::Connection;
use crate::document::WriteOptions;
use crate::error::{ArangoError, Result};
use crate::transport::HttpMethod;

/// Handle to one named graph
#[derive(Debug, Clone)]
pub struct Graph {
    conn: Arc<Connection>,
    database: String,
    name: String,
}

/// Vertices and edges live under different `/gharial` sub-paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Vertex,
    Edge,
}

impl ElementKind {
    /// Path segment and response field for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Edge => "edge",
        }
    }
}

/// A single vertex or edge write through the graph API
#[derive(Debug, Clone)]
pub enum GraphMutation {
    Create {
        graph: String,
        kind: ElementKind,
        collection: String,
        data: Value,
        wait_for_sync: bool,
    },
    Update {
        graph: String,
        kind: ElementKind,
        id: String,
        data: Value,
        options: WriteOptions,
    },
    Replace {
        graph: String,
        kind: ElementKind,
        id: String,
        data: Value,
        options: WriteOptions,
    },
    Delete {
        graph: String,
        kind: ElementKind,
        id: String,
        options: WriteOptions,
    },
}

impl GraphMutation {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Create { kind, .. }
            | Self::Update { kind, .. }
            | Self::Replace { kind, .. }
            | Self::Delete { kind, .. } => *kind,
        }
    }

    fn operation(&self) -> &'static str {
        match (self, self.kind()) {
            (Self::Create { .. }, ElementKind::Vertex) => "create vertex",
            (Self::Create { .. }, ElementKind::Edge) => "create edge",
            (Self::Update { .. }, ElementKind::Vertex) => "update vertex",
            (Self::Update { .. }, ElementKind::Edge) => "update edge",
            (Self::Replace { .. }, ElementKind::Vertex) => "replace vertex",
            (Self::Replace { .. }, ElementKind::Edge) => "replace edge",
            (Self::Delete { .. }, ElementKind::Vertex) => "delete vertex",
            (Self::Delete { .. }, ElementKind::Edge) => "delete edge",
        }
    }
}

impl SupportsBatch for GraphMutation {
    fn prepare(&self) -> Result<PreparedRequest> {
        let request = match self {
            Self::Create {
                graph,
                kind,
                collection,
                data,
                wait_for_sync,
            } => {
                if *kind == ElementKind::Edge
                    && (data.get("_from").is_none() || data.get("_to").is_none())
                {
                    return Err(ArangoError::MalformedRequest(
                        "edge payload must contain `_from` and `_to`".to_string(),
                    ));
                }
                PreparedRequest::new(
                    HttpMethod::Post,
                    format!("/gharial/{}/{}/{}", graph, kind.as_str(), collection),
                )
                .param("waitForSync", wait_for_sync)
                .body(data.clone())
            }
            Self::Update {
                graph,
                kind,
                id,
                data,
                options,
            } => {
                let request = PreparedRequest::new(
                    HttpMethod::Patch,
                    format!("/gharial/{}/{}/{}", graph, kind.as_str(), id),
                )
                .param("waitForSync", options.wait_for_sync)
                .param("keepNull", options.keep_null);
                with_rev(request, options.effective_rev(Some(data))).body(data.clone())
            }
            Self::Replace {
                graph,
                kind,
                id,
                data,
                options,
            } => {
                let request = PreparedRequest::new(
                    HttpMethod::Put,
                    format!("/gharial/{}/{}/{}", graph, kind.as_str(), id),
                )
                .param("waitForSync", options.wait_for_sync);
                with_rev(request, options.effective_rev(Some(data))).body(data.clone())
            }
            Self::Delete {
                graph,
                kind,
                id,
                options,
            } => {
                let request = PreparedRequest::new(
                    HttpMethod::Delete,
                    format!("/gharial/{}/{}/{}", graph, kind.as_str(), id),
                )
                .param("waitForSync", options.wait_for_sync);
                with_rev(request, options.effective_rev(None))
            }
        };
        Ok(request)
    }
}

fn with_rev(request: PreparedRequest, rev: Option<String>) -> PreparedRequest {
    match rev {
        Some(rev) => request.param("rev", rev),
        None => request,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TraversalRequest<'a> {
    start_vertex: &'a str,
    graph_name: &'a str,
    #[serde(flatten)]
    options: &'a TraversalOptions,
}

impl Graph {
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

    fn path(&self, suffix: &str) -> String {
        format!("/gharial/{}{}", self.name, suffix)
    }

    pub async fn properties(&self) -> Result<GraphInfo> {
        self.conn
            .get(&self.database, self.path(""))
            .send()
            .await?
            .ok_or("get graph properties")?
            .into_field("graph")
    }

    pub async fn orphan_collections(&self) -> Result<Vec<String>> {
        Ok(self.properties().await?.orphan_collections)
    }

    // ===== Edge definitions =====

    pub async fn edge_definitions(&self) -> Result<Vec<EdgeDefinition>> {
        Ok(self.properties().await?.edge_definitions)
    }

    pub async fn add_edge_definition(&self, definition: &EdgeDefinition) -> Result<Vec<EdgeDefinition>> {
        let graph: GraphInfo = self
            .conn
            .post(&self.database, self.path("/edge"))
            .json(definition)
            .send()
            .await?
            .ok_or("add edge definition")?
            .into_field("graph")?;
        Ok(graph.edge_definitions)
    }

    pub async fn replace_edge_definition(
        &self,
        definition: &EdgeDefinition,
    ) -> Result<Vec<EdgeDefinition>> {
        let graph: GraphInfo = self
            .conn
            .put(&self.database, self.path(&format!("/edge/{}", definition.collection)))
            .json(definition)
            .send()
            .await?
            .ok_or("replace edge definition")?
            .into_field("graph")?;
        Ok(graph.edge_definitions)
    }

    /// Detaches an edge collection, dropping it too when `drop_collection` is set.
    pub async fn delete_edge_definition(
        &self,
        collection: &str,
        drop_collection: bool,
    ) -> Result<Vec<EdgeDefinition>> {
        let graph: GraphInfo = self
            .conn
            .delete(&self.database, self.path(&format!("/edge/{}", collection)))
            .param("dropCollection", drop_collection)
            .send()
            .await?
            .ok_or("delete edge definition")?
            .into_field("graph")?;
        Ok(graph.edge_definitions)
    }

    // ===== Vertex collections =====

    pub async fn vertex_collections(&self) -> Result<Vec<String>> {
        self.conn
            .get(&self.database, self.path("/vertex"))
            .send()
            .await?
            .ok_or("list vertex collections")?
            .into_field("collections")
    }

    pub async fn add_vertex_collection(&self, collection: &str) -> Result<GraphInfo> {
        self.conn
            .post(&self.database, self.path("/vertex"))
            .json(&json!({ "collection": collection }))
            .send()
            .await?
            .ok_or("add vertex collection")?
            .into_field("graph")
    }

    pub async fn delete_vertex_collection(
        &self,
        collection: &str,
        drop_collection: bool,
    ) -> Result<GraphInfo> {
        self.conn
            .delete(&self.database, self.path(&format!("/vertex/{}", collection)))
            .param("dropCollection", drop_collection)
            .send()
            .await?
            .ok_or("delete vertex collection")?
            .into_field("graph")
    }

    // ===== Vertices and edges =====

    async fn element(&self, kind: ElementKind, id: &str, rev: Option<&str>) -> Result<Option<Value>> {
        let response = self
            .conn
            .get(&self.database, self.path(&format!("/{}/{}", kind.as_str(), id)))
            .param_opt("rev", rev)
            .send()
            .await?;
        match response.status_code {
            412 => Err(ArangoError::RevisionConflict(response.server_error())),
            404 => Ok(None),
            _ => {
                let operation = match kind {
                    ElementKind::Vertex => "get vertex",
                    ElementKind::Edge => "get edge",
                };
                Ok(Some(response.ok_or(operation)?.into_field(kind.as_str())?))
            }
        }
    }

    /// Runs a vertex or edge write and returns the server's answer for it.
    ///
    /// Writes answer with the element's handle under `vertex` or `edge`;
    /// deletes carry no element, so their whole body (`removed`) is returned.
    pub async fn execute(&self, mutation: &GraphMutation) -> Result<Value> {
        let prepared = mutation.prepare()?;
        let response = self
            .conn
            .send_prepared(&self.database, &prepared)
            .await?
            .ok_or_conflict(mutation.operation())?;
        match mutation {
            GraphMutation::Delete { .. } => response.into_body(),
            _ => response.into_field(mutation.kind().as_str()),
        }
    }

    fn create(&self, kind: ElementKind, collection: &str, data: Value, wait_for_sync: bool) -> GraphMutation {
        GraphMutation::Create {
            graph: self.name.clone(),
            kind,
            collection: collection.to_string(),
            data,
            wait_for_sync,
        }
    }

    fn update(&self, kind: ElementKind, id: &str, data: Value, options: WriteOptions) -> GraphMutation {
        GraphMutation::Update {
            graph: self.name.clone(),
            kind,
            id: id.to_string(),
            data,
            options,
        }
    }

    fn replace(&self, kind: ElementKind, id: &str, data: Value, options: WriteOptions) -> GraphMutation {
        GraphMutation::Replace {
            graph: self.name.clone(),
            kind,
            id: id.to_string(),
            data,
            options,
        }
    }

    fn remove(&self, kind: ElementKind, id: &str, options: WriteOptions) -> GraphMutation {
        GraphMutation::Delete {
            graph: self.name.clone(),
            kind,
            id: id.to_string(),
            options,
        }
    }

    /// Fetches a vertex by `collection/key` id; `None` if it does not exist.
    pub async fn vertex(&self, id: &str, rev: Option<&str>) -> Result<Option<Value>> {
        self.element(ElementKind::Vertex, id, rev).await
    }

    pub fn vertex_create(&self, collection: &str, data: Value, wait_for_sync: bool) -> GraphMutation {
        self.create(ElementKind::Vertex, collection, data, wait_for_sync)
    }

    pub async fn create_vertex(&self, collection: &str, data: Value, wait_for_sync: bool) -> Result<Value> {
        self.execute(&self.vertex_create(collection, data, wait_for_sync))
            .await
    }

    pub async fn update_vertex(&self, id: &str, data: Value, options: WriteOptions) -> Result<Value> {
        self.execute(&self.update(ElementKind::Vertex, id, data, options))
            .await
    }

    pub async fn replace_vertex(&self, id: &str, data: Value, options: WriteOptions) -> Result<Value> {
        self.execute(&self.replace(ElementKind::Vertex, id, data, options))
            .await
    }

    pub async fn delete_vertex(&self, id: &str, options: WriteOptions) -> Result<Value> {
        self.execute(&self.remove(ElementKind::Vertex, id, options))
            .await
    }

    /// Fetches an edge by `collection/key` id; `None` if it does not exist.
    pub async fn edge(&self, id: &str, rev: Option<&str>) -> Result<Option<Value>> {
        self.element(ElementKind::Edge, id, rev).await
    }

    pub fn edge_create(&self, collection: &str, data: Value, wait_for_sync: bool) -> GraphMutation {
        self.create(ElementKind::Edge, collection, data, wait_for_sync)
    }

    /// Creates an edge; `data` must carry `_from` and `_to`.
    pub async fn create_edge(&self, collection: &str, data: Value, wait_for_sync: bool) -> Result<Value> {
        self.execute(&self.edge_create(collection, data, wait_for_sync))
            .await
    }

    pub async fn update_edge(&self, id: &str, data: Value, options: WriteOptions) -> Result<Value> {
        self.execute(&self.update(ElementKind::Edge, id, data, options))
            .await
    }

    pub async fn replace_edge(&self, id: &str, data: Value, options: WriteOptions) -> Result<Value> {
        self.execute(&self.replace(ElementKind::Edge, id, data, options))
            .await
    }

    pub async fn delete_edge(&self, id: &str, options: WriteOptions) -> Result<Value> {
        self.execute(&self.remove(ElementKind::Edge, id, options))
            .await
    }

    // ===== Traversal =====

    /// Walks the graph from `start_vertex` with the server's traversal API.
    pub async fn traverse(&self, start_vertex: &str, options: &TraversalOptions) -> Result<Value> {
        self.conn
            .post(&self.database, "/traversal")
            .json(&TraversalRequest {
                start_vertex,
                graph_name: &self.name,
                options,
            })
            .send()
            .await?
            .ok_or("traverse graph")?
            .into_field("result")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use arango_core::{ConnectionConfig, Direction};

    fn graph(transport: &Arc<MockTransport>) -> Graph {
        let conn = Arc::new(Connection::with_transport(
            ConnectionConfig::default(),
            transport.clone(),
        ));
        Graph::new(conn, "_system", "social")
    }

    #[tokio::test]
    async fn test_edge_without_endpoints_never_reaches_server() {
        let transport = MockTransport::new();
        let g = graph(&transport);

        let err = g
            .create_edge("knows", json!({"_from": "people/a"}), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ArangoError::MalformedRequest(_)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_vertex_and_edge_conflicts() {
        let transport = MockTransport::new();
        transport.push(412, json!({"errorNum": 1200}));
        transport.push(412, json!({"errorNum": 1200}));
        transport.push(412, json!({"errorNum": 1200}));
        let g = graph(&transport);

        let update = g
            .update_vertex("people/a", json!({"x": 1}), WriteOptions::new().rev("1"))
            .await;
        assert!(matches!(update, Err(ArangoError::RevisionConflict(_))));

        let delete = g.delete_edge("knows/e", WriteOptions::new().rev("1")).await;
        assert!(matches!(delete, Err(ArangoError::RevisionConflict(_))));

        let get = g.vertex("people/a", Some("1")).await;
        assert!(matches!(get, Err(ArangoError::RevisionConflict(_))));

        assert_eq!(
            transport.calls(),
            vec![
                "PATCH /_db/_system/_api/gharial/social/vertex/people/a",
                "DELETE /_db/_system/_api/gharial/social/edge/knows/e",
                "GET /_db/_system/_api/gharial/social/vertex/people/a",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_vertex_unwraps_answer() {
        let transport = MockTransport::new();
        transport.push(202, json!({"error": false, "vertex": {"_id": "people/a", "_key": "a", "_rev": "1"}}));
        transport.push(404, json!({"errorNum": 1202}));
        let g = graph(&transport);

        let vertex = g.create_vertex("people", json!({"_key": "a"}), false).await.unwrap();
        assert_eq!(vertex["_id"], "people/a");
        assert_eq!(g.edge("knows/missing", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_deletes_return_removed_flag() {
        let transport = MockTransport::new();
        transport.push(202, json!({"error": false, "removed": true, "code": 202}));
        transport.push(202, json!({"error": false, "removed": true, "code": 202}));
        let g = graph(&transport);

        let vertex = g.delete_vertex("people/a", WriteOptions::new()).await.unwrap();
        assert_eq!(vertex["removed"], true);

        let edge = g.delete_edge("knows/e", WriteOptions::new()).await.unwrap();
        assert_eq!(edge["removed"], true);

        assert_eq!(
            transport.calls(),
            vec![
                "DELETE /_db/_system/_api/gharial/social/vertex/people/a",
                "DELETE /_db/_system/_api/gharial/social/edge/knows/e",
            ]
        );
    }

    #[tokio::test]
    async fn test_traverse_body() {
        let transport = MockTransport::new();
        transport.push(200, json!({"result": {"visited": {"vertices": []}}}));
        let g = graph(&transport);

        let options = TraversalOptions {
            direction: Some(Direction::Any),
            max_depth: Some(1),
            ..Default::default()
        };
        g.traverse("people/a", &options).await.unwrap();

        let body: Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"startVertex": "people/a", "graphName": "social", "direction": "any", "maxDepth": 1})
        );
    }

    #[tokio::test]
    async fn test_delete_edge_definition_returns_remaining() {
        let transport = MockTransport::new();
        transport.push(
            202,
            json!({"graph": {"_key": "social", "edgeDefinitions": [], "orphanCollections": ["people"]}}),
        );
        let g = graph(&transport);

        assert!(g.delete_edge_definition("knows", true).await.unwrap().is_empty());
        assert_eq!(
            transport.requests()[0].params,
            vec![("dropCollection".to_string(), "true".to_string())]
        );
    }
}
