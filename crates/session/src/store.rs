//! Durable credential persistence.
//!
//! All storage reads/writes are isolated behind [`CredentialStore`] so the
//! session operations stay free of persistence concerns and can be tested
//! with the in-memory fake. The store is read exactly once at process start
//! (seeding) and written only by session operations.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crewdeck_auth::UserProfile;

/// The durable mirror of the credential fields of the session.
///
/// Absence of every field is equivalent to an anonymous session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.user.is_none()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(String),
    #[error("store serialization error: {0}")]
    Serde(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

/// Key/value persistence for the credential fields.
///
/// Implementations may suspend (a remote-capable store), but must guarantee
/// that a completed `save` is observed by any subsequent `load`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn load(&self) -> Result<StoredCredentials, StoreError>;
    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store: the test fake, also useful for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<StoredCredentials>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            inner: Mutex::new(credentials),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load(&self) -> Result<StoredCredentials, StoreError> {
        Ok(self.inner.lock().expect("store poisoned").clone())
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError> {
        *self.inner.lock().expect("store poisoned") = credentials.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().expect("store poisoned") = StoredCredentials::default();
        Ok(())
    }
}

/// File-backed store: one JSON document under the platform data directory.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data_dir>/crewdeck/credentials.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("crewdeck").join("credentials.json"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn load(&self) -> Result<StoredCredentials, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(StoredCredentials::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, credentials: &StoredCredentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a sibling temp file, then rename: a crash mid-write must
        // not leave a truncated credentials document.
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(credentials)?;
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample() -> StoredCredentials {
        StoredCredentials {
            access_token: Some("at".to_string()),
            refresh_token: Some("rt".to_string()),
            user: Some(UserProfile {
                id: Uuid::now_v7(),
                email: "ada@example.com".to_string(),
                username: None,
                first_name: Some("Ada".to_string()),
                last_name: None,
                avatar: None,
            }),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let creds = sample();
        store.save(&creds).await.unwrap();
        assert_eq!(store.load().await.unwrap(), creds);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("credentials.json"));

        // Missing file reads as anonymous.
        assert!(store.load().await.unwrap().is_empty());

        let creds = sample();
        store.save(&creds).await.unwrap();
        assert_eq!(store.load().await.unwrap(), creds);

        // Clearing twice is fine.
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested/deep/credentials.json"));
        store.save(&sample()).await.unwrap();
        assert!(!store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_surfaces_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let store = FileCredentialStore::new(path);
        assert!(matches!(
            store.load().await,
            Err(StoreError::Serde(_))
        ));
    }
}
