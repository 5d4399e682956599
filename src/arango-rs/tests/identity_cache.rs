mod common;

use arango_rs::{ArangoError, ResourceKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_second_resolve_is_served_from_cache() {
    let (server, mut client) = common::connect().await;

    Mock::given(method("GET"))
        .and(path("/_db/_system/_api/collection"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "collections": [
                {"name": "foo", "isSystem": false},
                {"name": "bar", "isSystem": false},
                {"name": "_graphs", "isSystem": true}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.collection("foo").await.unwrap().name(), "foo");
    assert_eq!(client.collection("bar").await.unwrap().name(), "bar");
    server.verify().await;
}

#[tokio::test]
async fn test_unknown_database_refreshes_then_fails() {
    let (server, mut client) = common::connect().await;

    Mock::given(method("GET"))
        .and(path("/_db/_system/_api/database"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": ["_system", "shop"]})),
        )
        .expect(2)
        .mount(&server)
        .await;

    assert_eq!(client.database("shop").await.unwrap().name(), "shop");
    let err = client.database("archive").await.unwrap_err();
    assert!(matches!(
        err,
        ArangoError::NotFound { kind: ResourceKind::Database, ref name } if name == "archive"
    ));
    server.verify().await;
}

#[tokio::test]
async fn test_refresh_reports_delta() {
    let (server, mut client) = common::connect().await;

    Mock::given(method("GET"))
        .and(path("/_db/shop/_api/gharial"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"graphs": [{"_key": "social"}, {"_key": "roads"}]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/_db/_system/_api/database"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": ["shop"]})))
        .mount(&server)
        .await;

    let shop = client.database("shop").await.unwrap();
    let delta = shop.refresh_graphs().await.unwrap();
    assert_eq!(delta.added.len(), 2);
    assert!(delta.removed.is_empty());

    let again = shop.refresh_graphs().await.unwrap();
    assert!(again.is_empty());
    assert_eq!(shop.graph("roads").await.unwrap().name(), "roads");
}
