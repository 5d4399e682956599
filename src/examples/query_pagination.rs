//! Query Pagination Example
//!
//! Streams a query result that spans several cursor pages, then abandons a
//! second cursor half way and closes it explicitly.
//!
//! Expects an ArangoDB server on localhost:8529 accepting `root` with an
//! empty password.
//!
//! Run with: cargo run --example query_pagination

use arango_rs::*;
use futures::TryStreamExt;
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
    println!("Connected to ArangoDB {}\n", client.version().await?);

    client
        .create_collection("demo_numbers", &CreateCollectionOptions::default())
        .await?;

    // Insert in one round trip
    let inserts: Vec<DocumentMutation> = (0..25)
        .map(|n| DocumentMutation::create("demo_numbers", json!({ "n": n }), false))
        .collect();
    let operations: Vec<&dyn SupportsBatch> =
        inserts.iter().map(|m| m as &dyn SupportsBatch).collect();
    let written = client.execute_batch(&operations).await?;
    println!(
        "Inserted {} documents, collection now holds {}",
        written.len(),
        numbers_count(&mut client).await?
    );

    // Ten records per page: three pages, two continuations
    let cursor = client
        .execute_query(
            "FOR d IN demo_numbers SORT d.n RETURN d.n",
            &QueryOptions::new().batch_size(10).count(true),
        )
        .await?;
    println!("Query reports {:?} results", cursor.count());
    let all: Vec<_> = cursor.into_stream().try_collect().await?;
    println!("Streamed {} values: {:?}\n", all.len(), all);

    let mut partial = client
        .execute_query(
            "FOR d IN demo_numbers FILTER d.n >= @min RETURN d",
            &QueryOptions::new().batch_size(5).bind_var("min", 10),
        )
        .await?;
    for _ in 0..3 {
        if let Some(doc) = partial.next().await? {
            println!("  got {}", doc["n"]);
        }
    }
    partial.close().await?;
    println!("Closed cursor early\n");

    client.delete_collection("demo_numbers").await?;
    println!("Dropped demo_numbers");
    Ok(())
}

async fn numbers_count(client: &mut Arango) -> anyhow::Result<u64> {
    Ok(client.collection("demo_numbers").await?.count().await?)
}
