//! Command handlers

use crate::format::format_size;
use crate::store::LocalStore;
use anyhow::{Context, Result};
use nexaflow_client::{
    Did, Identity, Metadata, NetworkStatus, NexaflowClient, Space, UploadResult,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

/// DID offered when `login` is run without one
pub const DEMO_DID: &str = "did:key:z6MkvS5hwP993amMA9kCbwK2Wbd7SifuwsBnRKFmaGhN92ZR";

/// Options shared by every file of an `upload` invocation
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    pub space: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Load the stored login into the client
async fn authenticate(client: &mut NexaflowClient, store: &LocalStore) -> Result<()> {
    let auth = store.require_auth().await?;
    client.set_auth(auth.did, auth.private_key.unwrap_or_default());
    Ok(())
}

pub async fn login(store: &LocalStore, did: Option<String>, private_key: Option<String>) -> Result<Did> {
    let did = did.unwrap_or_else(|| DEMO_DID.to_string());
    let parsed = Did::parse(&did).with_context(|| format!("invalid DID {}", did))?;

    store.login(&did, private_key).await?;
    info!("Logged in as {}", did);

    println!("✅ Successfully logged in to NexaFlow!");
    println!("   DID: {}", parsed);
    println!("   You can now create spaces and upload files.");
    Ok(parsed)
}

pub async fn logout(store: &LocalStore) -> Result<()> {
    if store.logout().await? {
        println!("✅ Successfully logged out!");
    } else {
        println!("⚠️  You were not logged in");
    }
    Ok(())
}

pub async fn space_create(
    client: &mut NexaflowClient,
    store: &LocalStore,
    name: &str,
    description: Option<&str>,
) -> Result<Space> {
    authenticate(client, store).await?;
    let space = client
        .create_space(name, description.unwrap_or_default())
        .await
        .context("failed to create space")?;

    println!("📦 Space created");
    println!("   Name:    {}", space.name);
    println!("   ID:      {}", space.id);
    println!("   DID:     {}", space.did);
    println!("   Created: {}", space.created.to_rfc2822());
    if let Some(description) = description.filter(|d| !d.is_empty()) {
        println!("   Description: {}", description);
    }
    Ok(space)
}

pub async fn space_list(client: &mut NexaflowClient, store: &LocalStore) -> Result<Vec<Space>> {
    authenticate(client, store).await?;
    let spaces = client.list_spaces().await.context("failed to list spaces")?;

    if spaces.is_empty() {
        println!("📦 No spaces found. Create one with: nexaflow space create");
        return Ok(spaces);
    }

    let current = store.current_space().await?.map(|c| c.id);
    println!("📦 Found {} spaces", spaces.len());
    for (i, space) in spaces.iter().enumerate() {
        let marker = if current.as_deref() == Some(space.id.as_str()) {
            " (current)"
        } else {
            ""
        };
        println!("{}. {}{}", i + 1, space.name, marker);
        println!("   ID:    {}", space.id);
        println!("   Files: {}", space.file_count);
        println!("   Size:  {}", format_size(space.total_size));
    }
    Ok(spaces)
}

pub async fn space_use(store: &LocalStore, space_id: &str) -> Result<()> {
    store.require_auth().await?;
    store.use_space(space_id).await?;
    println!("✅ Switched to space: {}", space_id);
    Ok(())
}

/// Metadata sent with one file of an upload
pub fn file_metadata(file: &Path, options: &UploadOptions, current_space: Option<&str>) -> Metadata {
    let mut metadata = Metadata::new();
    let title = options.title.clone().unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    metadata.insert("title".to_string(), Value::String(title));

    if let Some(description) = &options.description {
        metadata.insert("description".to_string(), Value::String(description.clone()));
    }
    if !options.tags.is_empty() {
        metadata.insert(
            "tags".to_string(),
            Value::Array(options.tags.iter().cloned().map(Value::String).collect()),
        );
    }
    if let Some(space) = options.space.as_deref().or(current_space) {
        metadata.insert("space".to_string(), Value::String(space.to_string()));
    }
    metadata
}

pub async fn upload(
    client: &mut NexaflowClient,
    store: &LocalStore,
    files: &[PathBuf],
    options: &UploadOptions,
) -> Result<Vec<UploadResult>> {
    authenticate(client, store).await?;
    let current = store.current_space().await?.map(|c| c.id);

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let metadata = file_metadata(file, options, current.as_deref());
        let result = client
            .upload_file(file, Some(metadata))
            .await
            .with_context(|| format!("failed to upload {}", file.display()))?;
        results.push(result);
    }

    println!("📁 Successfully uploaded {} files", results.len());
    for (i, result) in results.iter().enumerate() {
        println!("{}. {}", i + 1, result.name);
        println!("   CID:  {}", result.cid);
        println!("   Size: {}", format_size(result.size));
        println!("   URL:  {}", result.url);
    }
    Ok(results)
}

pub async fn identity_create(client: &NexaflowClient, method: &str) -> Result<Identity> {
    let identity = client
        .create_identity(method)
        .await
        .context("failed to create identity")?;

    println!("🆔 New identity");
    println!("   DID:        {}", identity.id);
    println!("   Public Key: {}", identity.public_key);
    println!("⚠️  Keep your private key secure!");
    println!("   Private Key: {}", identity.private_key);
    Ok(identity)
}

pub fn identity_verify(did: &str) -> Result<Did> {
    let parsed = Did::parse(did).with_context(|| format!("invalid DID {}", did))?;
    println!("✅ Well-formed DID");
    println!("   Method:     {}", parsed.method());
    println!("   Identifier: {}", parsed.identifier());
    Ok(parsed)
}

pub async fn status(client: &NexaflowClient, store: &LocalStore) -> Result<NetworkStatus> {
    let status = client.get_status().await.context("failed to get status")?;

    println!("🌐 Network status");
    println!("   Connected Peers: {}", status.peers);
    println!("   Network Health:  {}%", status.health);
    println!("   Total Storage:   {}", status.total_storage);
    println!("   Active Users:    {}", status.active_users);

    match store.auth().await.ok().flatten() {
        Some(auth) => println!("✅ Logged in as {}", auth.did),
        None => println!("⚠️  Not logged in, run: nexaflow login"),
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexaflow_client::Config;
    use std::io::Write;

    fn client() -> NexaflowClient {
        NexaflowClient::new(Config::default()).unwrap()
    }

    #[test]
    fn test_file_metadata_defaults() {
        let metadata = file_metadata(Path::new("docs/report.pdf"), &UploadOptions::default(), None);
        assert_eq!(metadata["title"], "report.pdf");
        assert!(metadata.get("description").is_none());
        assert!(metadata.get("tags").is_none());
        assert!(metadata.get("space").is_none());
    }

    #[test]
    fn test_file_metadata_explicit_space_wins() {
        let options = UploadOptions {
            space: Some("space_42".to_string()),
            title: Some("Q3".to_string()),
            description: Some("numbers".to_string()),
            tags: vec!["finance".to_string(), "q3".to_string()],
        };
        let metadata = file_metadata(Path::new("a.csv"), &options, Some("space_default"));
        assert_eq!(metadata["title"], "Q3");
        assert_eq!(metadata["space"], "space_42");
        assert_eq!(metadata["tags"], serde_json::json!(["finance", "q3"]));

        let fallback = file_metadata(Path::new("a.csv"), &UploadOptions::default(), Some("space_default"));
        assert_eq!(fallback["space"], "space_default");
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_did() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        assert!(login(&store, Some("not-a-did".to_string()), None).await.is_err());
        assert!(store.auth().await.unwrap().is_none());

        let did = login(&store, None, None).await.unwrap();
        assert_eq!(did.to_string(), DEMO_DID);
    }

    #[tokio::test]
    async fn test_space_commands_require_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let mut client = client();

        assert!(space_create(&mut client, &store, "Test", None).await.is_err());
        assert!(space_list(&mut client, &store).await.is_err());
        assert!(space_use(&store, "space_default").await.is_err());
    }

    #[tokio::test]
    async fn test_upload_uses_stored_did() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("config"));
        store.login("did:key:z6Mkstored", None).await.unwrap();

        let path = dir.path().join("hello.txt");
        std::fs::File::create(&path).unwrap().write_all(b"hello").unwrap();

        let mut client = client();
        let results = upload(&mut client, &store, &[path], &UploadOptions::default())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cid, "bafybeig2cf24dba5fb0a30e26e83b2ac5b9e29e");
        assert_eq!(results[0].did, "did:key:z6Mkstored");
        assert_eq!(client.did(), "did:key:z6Mkstored");
    }

    #[tokio::test]
    async fn test_space_list_after_use() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.login(DEMO_DID, None).await.unwrap();
        space_use(&store, "space_default").await.unwrap();

        let mut client = client();
        let spaces = space_list(&mut client, &store).await.unwrap();
        assert_eq!(spaces.len(), 1);
        assert_eq!(spaces[0].id, "space_default");
    }

    #[test]
    fn test_identity_verify() {
        assert_eq!(identity_verify(DEMO_DID).unwrap().method(), "key");
        assert!(identity_verify("did::x").is_err());
    }
}
