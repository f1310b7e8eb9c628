//! File-based Session Store Adapter
//!
//! Stores one YAML document per user. File names are the SHA-256 of the
//! user id, so platform ids (which may contain `/` and `.`) never reach the
//! filesystem as paths.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::UserDocument;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for user documents
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// The directory is created on first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the document path for a user
    fn document_path(&self, user_id: &str) -> PathBuf {
        let digest = Sha256::digest(user_id.as_bytes());
        self.base_path.join(format!("{}.yaml", hex::encode(digest)))
    }

    /// Ensure directory exists
    async fn ensure_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn restore(&self, user_id: &str) -> Result<Option<UserDocument>, SessionStoreError> {
        let yaml = match fs::read_to_string(self.document_path(user_id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::IoError(e.to_string())),
        };

        let document = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(document))
    }

    async fn persist(
        &self,
        user_id: &str,
        document: &UserDocument,
    ) -> Result<(), SessionStoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(document)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        fs::write(self.document_path(user_id), yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        tracing::debug!(path = %self.base_path.display(), "user document persisted");
        Ok(())
    }
}
