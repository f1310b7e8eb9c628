//! In-Memory Session Store Adapter
//!
//! Keeps user documents in a map for the lifetime of the process.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserDocument;
use crate::ports::{SessionStore, SessionStoreError};

/// In-memory storage for user documents
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    documents: Arc<RwLock<HashMap<String, UserDocument>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Get the number of users with a stored document
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn restore(&self, user_id: &str) -> Result<Option<UserDocument>, SessionStoreError> {
        let documents = self.documents.read().await;
        Ok(documents.get(user_id).cloned())
    }

    async fn persist(
        &self,
        user_id: &str,
        document: &UserDocument,
    ) -> Result<(), SessionStoreError> {
        let mut documents = self.documents.write().await;
        documents.insert(user_id.to_string(), document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_restore_unknown_user_is_none() {
        let store = InMemorySessionStore::new();
        assert!(store.restore("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persist_then_restore() {
        let store = InMemorySessionStore::new();
        let mut document = UserDocument::default();
        document.storage.insert("plays".to_string(), json!(2));

        store.persist("u-1", &document).await.unwrap();
        let restored = store.restore("u-1").await.unwrap().unwrap();
        assert_eq!(restored, document);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_persist_replaces_previous_document() {
        let store = InMemorySessionStore::new();
        let mut document = UserDocument::default();
        store.persist("u-1", &document).await.unwrap();

        document.storage.insert("k".to_string(), json!("v"));
        store.persist("u-1", &document).await.unwrap();

        let restored = store.restore("u-1").await.unwrap().unwrap();
        assert_eq!(restored.storage.get("k"), Some(&json!("v")));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemorySessionStore::new();
        let handle = store.clone();
        handle.persist("u-1", &UserDocument::default()).await.unwrap();

        assert!(!store.is_empty().await);
        store.clear().await;
        assert!(handle.is_empty().await);
    }
}
