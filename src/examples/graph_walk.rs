//! Graph Walk Example
//!
//! Builds a small social graph, walks it with the traversal API and shows
//! how a stale revision is rejected.
//!
//! Run with: cargo run --example graph_walk

use arango_rs::*;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arango_rs=debug".into()),
        )
        .init();

    let mut client = Arango::connect(ConnectionConfig::default()).await?;

    let knows = EdgeDefinition::new("knows", ["people"], ["people"]);
    let graph = client.create_graph("demo_social", &[knows], &[]).await?;
    println!("Created graph {}", graph.name());

    for name in ["alice", "bob", "carol"] {
        graph
            .create_vertex("people", json!({ "_key": name }), false)
            .await?;
    }
    graph
        .create_edge(
            "knows",
            json!({ "_from": "people/alice", "_to": "people/bob" }),
            false,
        )
        .await?;
    graph
        .create_edge(
            "knows",
            json!({ "_from": "people/bob", "_to": "people/carol" }),
            false,
        )
        .await?;

    let options = TraversalOptions {
        direction: Some(Direction::Outbound),
        max_depth: Some(2),
        ..Default::default()
    };
    let walk = graph.traverse("people/alice", &options).await?;
    let visited = walk["visited"]["vertices"]
        .as_array()
        .map(|vertices| vertices.len())
        .unwrap_or(0);
    println!("Traversal from alice visited {} vertices", visited);

    // An edge write without endpoints never reaches the server
    match graph.create_edge("knows", json!({ "since": 2020 }), false).await {
        Err(ArangoError::MalformedRequest(reason)) => println!("Rejected locally: {}", reason),
        other => println!("Unexpected: {:?}", other),
    }

    match graph
        .update_vertex("people/bob", json!({ "age": 40 }), WriteOptions::new().rev("0"))
        .await
    {
        Err(ArangoError::RevisionConflict(e)) => println!("Stale revision: {}", e),
        other => println!("Unexpected: {:?}", other),
    }

    client.delete_graph("demo_social").await?;
    for collection in ["knows", "people"] {
        client.delete_collection(collection).await?;
    }
    println!("Cleaned up");
    Ok(())
}
