//! Basic usage example for the NexaFlow client
//!
//! This example demonstrates:
//! - Checking network status
//! - Creating and listing spaces
//! - Creating a decentralized identity
//! - Uploading a file
//!
//! Run with: cargo run --example basic_usage

use nexaflow_client::{Config, Metadata, NexaflowClient};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🚀 NexaFlow - Basic Usage Example\n");

    let mut client = NexaflowClient::new(
        Config::new("https://api.nexaflow.com").with_timeout(Duration::from_secs(30)),
    )?;
    client.set_auth("did:key:z6MkvS5hwP993amMA9kCbwK2Wbd7SifuwsBnRKFmaGhN92ZR", "");

    println!("🌐 Getting network status...");
    let status = client.get_status().await?;
    println!("   Connected Peers: {}", status.peers);
    println!("   Network Health:  {}%", status.health);
    println!("   Total Storage:   {}", status.total_storage);
    println!("   Active Users:    {}", status.active_users);

    println!("\n📦 Creating space...");
    let space = client.create_space("My Rust Space", "Created from the Rust client").await?;
    println!("   {} (ID: {})", space.name, space.id);
    println!("   DID: {}", space.did);

    println!("\n📋 Listing spaces...");
    for (i, s) in client.list_spaces().await?.iter().enumerate() {
        println!("   {}. {} (Files: {}, Size: {} bytes)", i + 1, s.name, s.file_count, s.total_size);
    }

    println!("\n🆔 Creating identity...");
    let identity = client.create_identity("key").await?;
    println!("   Identity:   {}", identity.id);
    println!("   Public Key: {}", identity.public_key);

    println!("\n📁 Uploading file...");
    let mut metadata = Metadata::new();
    metadata.insert("title".to_string(), "Example File".into());
    metadata.insert("description".to_string(), "Uploaded from the Rust client".into());
    metadata.insert("tags".to_string(), serde_json::json!(["example", "rust", "nexaflow"]));

    match client.upload_file("example.txt", Some(metadata)).await {
        Ok(result) => {
            println!("   ✅ CID:  {}", result.cid);
            println!("      URL:  {}", result.url);
            println!("      Size: {} bytes", result.size);
        }
        Err(e) => println!("   ⚠️  {}", e),
    }

    Ok(())
}
