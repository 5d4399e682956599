#![allow(dead_code)]

use arango_rs::{Arango, ConnectionConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at the mock server
pub fn config_for(server: &MockServer) -> ConnectionConfig {
    ConnectionConfig::new(server.address().ip().to_string(), server.address().port())
        .with_credentials("root", "secret")
}

/// Starts a mock server that accepts the connection handshake and connects to it.
pub async fn connect() -> (MockServer, Arango) {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/_db/_system/_api/version"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arango::connect(config_for(&server))
        .await
        .expect("handshake against mock server");
    (server, client)
}
