//! Request router: builds database-scoped URLs and dispatches through the
//! configured [`Transport`].

use std::sync::Arc;

use arango_core::{ConnectionConfig, DEFAULT_DATABASE};
use serde::Serialize;
use tracing::debug;

use crate::batch::PreparedRequest;
use crate::error::{ArangoError, Result};
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Immutable connection shared by every proxy handed out by one client
pub struct Connection {
    config: ConnectionConfig,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("protocol", &self.config.protocol)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("username", &self.config.username)
            .finish_non_exhaustive()
    }
}

impl Connection {
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(config: ConnectionConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Checks that the server answers `HEAD /version`.
    pub async fn verify(&self) -> Result<()> {
        let response = self.head(DEFAULT_DATABASE, "/version").send().await?;
        if !response.is_ok() {
            return Err(ArangoError::Connection(response.server_error()));
        }
        Ok(())
    }

    pub fn url(&self, database: &str, path: &str) -> String {
        format!("{}{}", self.config.url_prefix(database), path)
    }

    pub fn request(&self, method: HttpMethod, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        ApiRequest {
            conn: self,
            method,
            database: database.to_string(),
            path: path.into(),
            params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn head(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Head, database, path)
    }

    pub fn get(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Get, database, path)
    }

    pub fn post(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Post, database, path)
    }

    pub fn put(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Put, database, path)
    }

    pub fn patch(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Patch, database, path)
    }

    pub fn delete(&self, database: &str, path: impl Into<String>) -> ApiRequest<'_> {
        self.request(HttpMethod::Delete, database, path)
    }

    /// Sends a request prepared for batching as a standalone call.
    pub async fn send_prepared(&self, database: &str, prepared: &PreparedRequest) -> Result<HttpResponse> {
        let mut request = self.request(prepared.method, database, prepared.path.clone());
        request.params = prepared.params.clone();
        request.headers = prepared.headers.clone();
        if let Some(body) = &prepared.body {
            request = request.json(body);
        }
        request.send().await
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(method = %request.method, url = %request.url, "Sending request");
        let response = self.transport.send(request).await?;
        debug!(
            method = %response.method,
            url = %response.url,
            status = response.status_code,
            "Received response"
        );
        Ok(response)
    }
}

/// One request under construction, scoped to a database.
#[must_use = "requests do nothing until sent"]
pub struct ApiRequest<'a> {
    conn: &'a Connection,
    method: HttpMethod,
    database: String,
    path: String,
    params: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<Result<String>>,
}

impl<'a> ApiRequest<'a> {
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn param_opt<T: ToString>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// JSON body; a serialisation failure surfaces when the request is sent.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_string(body).map_err(ArangoError::from));
        if !self.has_header("Content-Type") {
            self.headers
                .push(("Content-Type".to_string(), "application/json".to_string()));
        }
        self
    }

    /// Raw text body, sent as is.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Ok(body.into()));
        self
    }

    fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name))
    }

    pub fn build(self) -> Result<HttpRequest> {
        let body = self.body.transpose()?;
        let auth = Some((
            self.conn.config.username.clone(),
            self.conn.config.password.clone(),
        ));
        Ok(HttpRequest {
            method: self.method,
            url: self.conn.url(&self.database, &self.path),
            params: self.params,
            headers: self.headers,
            body,
            auth,
        })
    }

    pub async fn send(self) -> Result<HttpResponse> {
        let conn = self.conn;
        let request = self.build()?;
        conn.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTransport;
    use serde_json::json;

    #[test]
    fn test_build_scopes_url_and_auth() {
        let conn = Connection::new(ConnectionConfig::default().with_credentials("admin", "pw"));
        let request = conn
            .put("shop", "/cursor/42")
            .param("waitForSync", true)
            .param_opt("rev", None::<String>)
            .json(&json!({"a": 1}))
            .build()
            .unwrap();

        assert_eq!(request.url, "http://localhost:8529/_db/shop/_api/cursor/42");
        assert_eq!(request.params, vec![("waitForSync".to_string(), "true".to_string())]);
        assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(request.auth, Some(("admin".to_string(), "pw".to_string())));
        assert!(request
            .headers
            .contains(&("Content-Type".to_string(), "application/json".to_string())));
    }

    #[test]
    fn test_explicit_content_type_is_kept() {
        let conn = Connection::new(ConnectionConfig::default());
        let request = conn
            .post("_system", "/batch")
            .header("Content-Type", "multipart/form-data")
            .json(&json!(null))
            .build()
            .unwrap();
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers[0].1, "multipart/form-data");
    }

    #[tokio::test]
    async fn test_verify_fails_on_non_ok_status() {
        let transport = MockTransport::new();
        transport.push(503, json!({"errorMessage": "starting up"}));
        let conn = Connection::with_transport(ConnectionConfig::default(), transport.clone());

        let err = conn.verify().await.unwrap_err();
        assert!(matches!(err, ArangoError::Connection(_)));
        assert_eq!(transport.calls(), vec!["HEAD /_db/_system/_api/version"]);
    }

    #[tokio::test]
    async fn test_verify_accepts_ok() {
        let transport = MockTransport::new();
        transport.push_empty(200);
        let conn = Connection::with_transport(ConnectionConfig::default(), transport);
        conn.verify().await.unwrap();
    }
}
