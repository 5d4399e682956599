//! Pluggable HTTP transport.
//!
//! Everything above this module speaks in [`HttpRequest`] / [`HttpResponse`]
//! values; the default [`ReqwestTransport`] turns them into real HTTP calls.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::error::{ArangoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Head,
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Basic-auth username and password
    pub auth: Option<(String, String)>,
}

/// Response envelope returned by every [`Transport`]
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub method: HttpMethod,
    pub url: String,
    pub status_code: u16,
    pub status_text: Option<String>,
    /// Parsed JSON body, `None` when the body is empty or not JSON
    pub body: Option<Value>,
    raw: String,
}

impl HttpResponse {
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        status_code: u16,
        status_text: Option<String>,
        content: impl Into<String>,
    ) -> Self {
        let raw = content.into();
        let body = if raw.is_empty() {
            None
        } else {
            serde_json::from_str(&raw).ok()
        };
        Self {
            method,
            url: url.into(),
            status_code,
            status_text,
            body,
            raw,
        }
    }

    /// Builds a response around an already parsed JSON body.
    pub fn json(method: HttpMethod, url: impl Into<String>, status_code: u16, body: Value) -> Self {
        let raw = body.to_string();
        Self {
            method,
            url: url.into(),
            status_code,
            status_text: None,
            body: Some(body),
            raw,
        }
    }

    /// True for the 2xx codes the server uses to signal success (200-206).
    pub fn is_ok(&self) -> bool {
        (200..=206).contains(&self.status_code)
    }

    /// Unparsed body text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|body| body.get(field))
    }

    /// Passes the response through when its status is in the OK set,
    /// otherwise turns it into a server error for `operation`.
    pub fn ok_or(self, operation: &'static str) -> Result<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(ArangoError::server(operation, &self))
        }
    }

    /// Like [`HttpResponse::ok_or`], but a failed revision precondition
    /// (412) becomes [`ArangoError::RevisionConflict`].
    pub fn ok_or_conflict(self, operation: &'static str) -> Result<Self> {
        if self.status_code == 412 {
            return Err(ArangoError::RevisionConflict(self.server_error()));
        }
        self.ok_or(operation)
    }

    pub fn server_error(&self) -> crate::error::ServerError {
        crate::error::ServerError::from_response(self)
    }

    /// Deserializes one top-level field of the body.
    pub fn field<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self
            .get(name)
            .cloned()
            .ok_or_else(|| ArangoError::InvalidResponse(format!("missing field `{}`", name)))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deserializes one top-level field, consuming the response.
    pub fn into_field<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let value = match self.body {
            Some(Value::Object(mut map)) => map.remove(name),
            _ => None,
        }
        .ok_or_else(|| ArangoError::InvalidResponse(format!("missing field `{}`", name)))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Deserializes the whole body.
    pub fn into_body<T: DeserializeOwned>(self) -> Result<T> {
        let body = self
            .body
            .ok_or_else(|| ArangoError::InvalidResponse("empty response body".to_string()))?;
        Ok(serde_json::from_value(body)?)
    }
}

/// HTTP capability the connection sends every request through.
///
/// Implement this to plug in another client, a proxy, or a test double.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Default transport backed by a pooled `reqwest` client
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some((username, password)) = &request.auth {
            builder = builder.basic_auth(username, Some(password));
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let content = response.text().await?;

        Ok(HttpResponse::new(
            request.method,
            request.url,
            status.as_u16(),
            status.canonical_reason().map(str::to_string),
            content,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_parses_json_leniently() {
        let res = HttpResponse::new(HttpMethod::Get, "http://x", 200, None, r#"{"a": 1}"#);
        assert_eq!(res.get("a"), Some(&json!(1)));

        let res = HttpResponse::new(HttpMethod::Get, "http://x", 200, None, "not json");
        assert!(res.body.is_none());
        assert_eq!(res.raw(), "not json");

        let res = HttpResponse::new(HttpMethod::Head, "http://x", 200, None, "");
        assert!(res.body.is_none());
    }

    #[test]
    fn test_ok_set() {
        for code in [200, 201, 202, 204, 206] {
            assert!(HttpResponse::json(HttpMethod::Get, "u", code, json!({})).is_ok());
        }
        for code in [199, 207, 304, 404, 412, 500] {
            assert!(!HttpResponse::json(HttpMethod::Get, "u", code, json!({})).is_ok());
        }
    }

    #[test]
    fn test_ok_or_conflict_maps_412() {
        let res = HttpResponse::json(HttpMethod::Patch, "u", 412, json!({"errorNum": 1200}));
        let err = res.ok_or_conflict("update document").unwrap_err();
        assert!(matches!(err, ArangoError::RevisionConflict(_)));
        assert_eq!(err.status_code(), Some(412));

        let res = HttpResponse::json(HttpMethod::Patch, "u", 400, json!({}));
        let err = res.ok_or_conflict("update document").unwrap_err();
        assert!(matches!(err, ArangoError::Server { operation: "update document", .. }));
    }

    #[test]
    fn test_field_access() {
        let res = HttpResponse::json(HttpMethod::Get, "u", 200, json!({"count": 7}));
        assert_eq!(res.field::<u64>("count").unwrap(), 7);
        assert!(matches!(
            res.field::<u64>("missing"),
            Err(ArangoError::InvalidResponse(_))
        ));
        assert_eq!(res.into_field::<u64>("count").unwrap(), 7);
    }
}
