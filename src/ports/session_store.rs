//! Session Store Port - Interface for persisting user data between sessions.
//!
//! The engine restores a user's document at the start of a new session and
//! persists it at the end of every turn.

use async_trait::async_trait;

use crate::domain::foundation::UserDocument;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("User ID not found in request")]
    MissingUserId,

    #[error("Failed to serialize user document: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize user document: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting and restoring per-user documents
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the document saved for `user_id`
    ///
    /// # Returns
    /// `None` when nothing has been persisted for the user yet
    async fn restore(&self, user_id: &str) -> Result<Option<UserDocument>, SessionStoreError>;

    /// Save `document` for `user_id`, replacing any previous one
    async fn persist(&self, user_id: &str, document: &UserDocument)
        -> Result<(), SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_store_error_messages() {
        assert!(SessionStoreError::MissingUserId
            .to_string()
            .contains("User ID"));
        let err = SessionStoreError::DeserializationFailed("bad yaml".to_string());
        assert!(err.to_string().contains("deserialize"));
        assert!(err.to_string().contains("bad yaml"));
    }
}
