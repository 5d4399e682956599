//! Collection-scoped simple queries (`PUT /simple/*`).
//!
//! Queries that can return large result sets hand back a [`Cursor`].

use arango_core::RemoveByKeysResult;
use serde_json::{json, Map, Value};

use crate::collection::Collection;
use crate::cursor::Cursor;
use crate::error::Result;
use crate::transport::HttpResponse;

/// Paging applied server-side; `skip` is applied before `limit`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Window {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    fn apply(&self, body: &mut Map<String, Value>) {
        if let Some(skip) = self.skip {
            body.insert("skip".to_string(), skip.into());
        }
        if let Some(limit) = self.limit {
            body.insert("limit".to_string(), limit.into());
        }
    }
}

/// Coordinate search parameters shared by `near` and `within`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Attribute that receives the distance in meters
    pub distance: Option<String>,
    /// Id of the geo index to use when the collection has several
    pub geo: Option<String>,
    pub window: Window,
}

impl GeoQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Self::default()
        }
    }

    fn body(&self, collection: &str) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("collection".to_string(), collection.into());
        body.insert("latitude".to_string(), self.latitude.into());
        body.insert("longitude".to_string(), self.longitude.into());
        if let Some(distance) = &self.distance {
            body.insert("distance".to_string(), distance.clone().into());
        }
        if let Some(geo) = &self.geo {
            body.insert("geo".to_string(), geo.clone().into());
        }
        self.window.apply(&mut body);
        body
    }
}

impl Collection {
    fn simple_body(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("collection".to_string(), self.name().into());
        body
    }

    async fn simple(
        &self,
        endpoint: &str,
        body: &Map<String, Value>,
        operation: &'static str,
    ) -> Result<HttpResponse> {
        self.conn
            .put(&self.database, format!("/simple/{}", endpoint))
            .json(body)
            .send()
            .await?
            .ok_or(operation)
    }

    async fn simple_cursor(
        &self,
        endpoint: &str,
        body: &Map<String, Value>,
        operation: &'static str,
    ) -> Result<Cursor> {
        let response = self.simple(endpoint, body, operation).await?;
        Cursor::from_response(self.conn.clone(), &self.database, &response)
    }

    /// The first `count` documents.
    pub async fn first(&self, count: u64) -> Result<Vec<Value>> {
        let mut body = self.simple_body();
        body.insert("count".to_string(), count.into());
        self.simple("first", &body, "simple query first")
            .await?
            .into_field("result")
    }

    /// The last `count` documents.
    pub async fn last(&self, count: u64) -> Result<Vec<Value>> {
        let mut body = self.simple_body();
        body.insert("count".to_string(), count.into());
        self.simple("last", &body, "simple query last")
            .await?
            .into_field("result")
    }

    /// A random document.
    pub async fn any(&self) -> Result<Value> {
        self.simple("any", &self.simple_body(), "simple query any")
            .await?
            .into_field("document")
    }

    pub async fn all(&self, window: Window) -> Result<Cursor> {
        let mut body = self.simple_body();
        window.apply(&mut body);
        self.simple_cursor("all", &body, "simple query all").await
    }

    pub async fn find_by_example(&self, example: &Value, window: Window) -> Result<Cursor> {
        let mut body = self.simple_body();
        body.insert("example".to_string(), example.clone());
        window.apply(&mut body);
        self.simple_cursor("by-example", &body, "simple query by example")
            .await
    }

    /// First document matching `example`; `None` when nothing matches.
    pub async fn find_first_example(&self, example: &Value) -> Result<Option<Value>> {
        let mut body = self.simple_body();
        body.insert("example".to_string(), example.clone());
        let response = self
            .conn
            .put(&self.database, "/simple/first-example")
            .json(&body)
            .send()
            .await?;
        if response.status_code == 404 {
            return Ok(None);
        }
        response
            .ok_or("simple query first example")?
            .into_field("document")
            .map(Some)
    }

    /// Returns the number of updated documents.
    pub async fn update_by_example(
        &self,
        example: &Value,
        new_value: &Value,
        keep_null: bool,
        limit: Option<u64>,
        wait_for_sync: bool,
    ) -> Result<u64> {
        let mut body = self.simple_body();
        body.insert("example".to_string(), example.clone());
        body.insert("newValue".to_string(), new_value.clone());
        body.insert("keepNull".to_string(), keep_null.into());
        body.insert("waitForSync".to_string(), wait_for_sync.into());
        if let Some(limit) = limit {
            body.insert("limit".to_string(), limit.into());
        }
        self.simple("update-by-example", &body, "simple query update by example")
            .await?
            .into_field("updated")
    }

    /// Returns the number of replaced documents.
    pub async fn replace_by_example(
        &self,
        example: &Value,
        new_value: &Value,
        limit: Option<u64>,
        wait_for_sync: bool,
    ) -> Result<u64> {
        let mut body = self.simple_body();
        body.insert("example".to_string(), example.clone());
        body.insert("newValue".to_string(), new_value.clone());
        body.insert("waitForSync".to_string(), wait_for_sync.into());
        if let Some(limit) = limit {
            body.insert("limit".to_string(), limit.into());
        }
        self.simple("replace-by-example", &body, "simple query replace by example")
            .await?
            .into_field("replaced")
    }

    /// Returns the number of removed documents.
    pub async fn remove_by_example(
        &self,
        example: &Value,
        limit: Option<u64>,
        wait_for_sync: bool,
    ) -> Result<u64> {
        let mut body = self.simple_body();
        body.insert("example".to_string(), example.clone());
        body.insert("waitForSync".to_string(), wait_for_sync.into());
        if let Some(limit) = limit {
            body.insert("limit".to_string(), limit.into());
        }
        self.simple("remove-by-example", &body, "simple query remove by example")
            .await?
            .into_field("deleted")
    }

    /// Documents whose `attribute` lies between `left` and `right`.
    /// Needs a skiplist index on `attribute`.
    pub async fn range(
        &self,
        attribute: &str,
        left: Value,
        right: Value,
        closed: bool,
        window: Window,
    ) -> Result<Cursor> {
        let mut body = self.simple_body();
        body.insert("attribute".to_string(), attribute.into());
        body.insert("left".to_string(), left);
        body.insert("right".to_string(), right);
        body.insert("closed".to_string(), closed.into());
        window.apply(&mut body);
        self.simple_cursor("range", &body, "simple query range").await
    }

    /// Documents nearest to a coordinate, closest first.
    pub async fn near(&self, query: &GeoQuery, radius: Option<f64>) -> Result<Cursor> {
        let mut body = query.body(self.name());
        if let Some(radius) = radius {
            body.insert("radius".to_string(), radius.into());
        }
        self.simple_cursor("near", &body, "simple query near").await
    }

    /// Documents within `radius` meters of a coordinate.
    pub async fn within(&self, query: &GeoQuery, radius: f64) -> Result<Cursor> {
        let mut body = query.body(self.name());
        body.insert("radius".to_string(), radius.into());
        self.simple_cursor("within", &body, "simple query within").await
    }

    /// Documents matching a fulltext `query` on an indexed attribute.
    pub async fn fulltext(
        &self,
        attribute: &str,
        query: &str,
        index: Option<&str>,
        window: Window,
    ) -> Result<Cursor> {
        let mut body = self.simple_body();
        body.insert("attribute".to_string(), attribute.into());
        body.insert("query".to_string(), query.into());
        if let Some(index) = index {
            body.insert("index".to_string(), index.into());
        }
        window.apply(&mut body);
        self.simple_cursor("fulltext", &body, "simple query fulltext").await
    }

    pub async fn lookup_by_keys(&self, keys: &[&str]) -> Result<Vec<Value>> {
        let mut body = self.simple_body();
        body.insert("keys".to_string(), json!(keys));
        self.simple("lookup-by-keys", &body, "simple query lookup by keys")
            .await?
            .into_field("documents")
    }

    pub async fn remove_by_keys(&self, keys: &[&str]) -> Result<RemoveByKeysResult> {
        let mut body = self.simple_body();
        body.insert("keys".to_string(), json!(keys));
        self.simple("remove-by-keys", &body, "simple query remove by keys")
            .await?
            .into_body()
    }
}
