//! Local credential and space selection store
//!
//! Two small JSON files under the config directory (`~/.nexaflow` by default):
//! `auth.json` holds the logged-in DID, `space.json` the selected space.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

const AUTH_FILE: &str = "auth.json";
const SPACE_FILE: &str = "space.json";

/// Owner read/write only; `auth.json` may hold a private key
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Stored login
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub did: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Space chosen with `space use`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentSpace {
    pub id: String,
    pub selected_at: DateTime<Utc>,
}

/// File-backed store rooted at a config directory
#[derive(Clone, Debug)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `~/.nexaflow`, if the home directory is known
    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".nexaflow"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record a login, replacing any previous one
    pub async fn login(&self, did: &str, private_key: Option<String>) -> Result<AuthData> {
        let auth = AuthData {
            did: did.to_string(),
            private_key,
            timestamp: Utc::now(),
        };
        self.write_json(AUTH_FILE, &auth).await?;
        Ok(auth)
    }

    /// Forget the login. Returns whether one existed.
    pub async fn logout(&self) -> Result<bool> {
        let path = self.dir.join(AUTH_FILE);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
        }
    }

    /// The stored login, if any
    pub async fn auth(&self) -> Result<Option<AuthData>> {
        self.read_json(AUTH_FILE).await
    }

    /// The stored login, or an error telling the user to log in
    pub async fn require_auth(&self) -> Result<AuthData> {
        self.auth()
            .await?
            .context("not authenticated, run `nexaflow login` first")
    }

    /// Select the space new uploads go to
    pub async fn use_space(&self, id: &str) -> Result<CurrentSpace> {
        let current = CurrentSpace {
            id: id.to_string(),
            selected_at: Utc::now(),
        };
        self.write_json(SPACE_FILE, &current).await?;
        Ok(current)
    }

    pub async fn current_space(&self) -> Result<Option<CurrentSpace>> {
        self.read_json(SPACE_FILE).await
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
        };
        let value = serde_json::from_slice(&contents)
            .with_context(|| format!("corrupt file {}", path.display()))?;
        Ok(Some(value))
    }

    async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create {}", self.dir.display()))?;

        let path = self.dir.join(file);
        let contents = serde_json::to_vec_pretty(value)?;

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);

        let mut handle = options
            .open(&path)
            .await
            .with_context(|| format!("failed to open {}", path.display()))?;
        // mode() only applies on creation; tighten pre-existing files too
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            handle
                .set_permissions(std::fs::Permissions::from_mode(FILE_MODE))
                .await
                .with_context(|| format!("failed to restrict {}", path.display()))?;
        }
        handle
            .write_all(&contents)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        handle.flush().await?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("nested"));

        assert!(store.auth().await.unwrap().is_none());
        assert!(store.require_auth().await.is_err());

        let auth = store.login("did:key:z6Mkabc", None).await.unwrap();
        assert_eq!(store.auth().await.unwrap(), Some(auth.clone()));
        assert_eq!(store.require_auth().await.unwrap().did, "did:key:z6Mkabc");

        let raw = std::fs::read_to_string(dir.path().join("nested/auth.json")).unwrap();
        assert!(raw.contains("\"did\""));
        assert!(!raw.contains("privateKey"));

        assert!(store.logout().await.unwrap());
        assert!(!store.logout().await.unwrap());
        assert!(store.auth().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_private_key_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store
            .login("did:key:z6Mkabc", Some("zsecret".to_string()))
            .await
            .unwrap();
        let auth = store.auth().await.unwrap().unwrap();
        assert_eq!(auth.private_key.as_deref(), Some("zsecret"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_auth_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let path = dir.path().join(AUTH_FILE);

        std::fs::write(&path, "{}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        store
            .login("did:key:z6Mkabc", Some("zsecret".to_string()))
            .await
            .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_auth_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("fresh"));
        store.login("did:key:z6Mkabc", None).await.unwrap();

        let path = dir.path().join("fresh").join(AUTH_FILE);
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn test_current_space() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        assert!(store.current_space().await.unwrap().is_none());
        store.use_space("space_1700000000").await.unwrap();
        store.use_space("space_default").await.unwrap();

        let current = store.current_space().await.unwrap().unwrap();
        assert_eq!(current.id, "space_default");
    }

    #[tokio::test]
    async fn test_corrupt_auth_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("auth.json"), b"{not json").unwrap();

        let store = LocalStore::new(dir.path());
        let err = store.auth().await.unwrap_err();
        assert!(err.to_string().contains("corrupt file"));
    }
}
