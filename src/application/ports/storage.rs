//! Artifact storage port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioArtifact;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Storage is not initialized: {0}")]
    NotInitialized(String),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

/// Port for uploading recordings
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Upload an artifact under the given user's namespace.
    ///
    /// # Returns
    /// A URL the artifact can be downloaded from
    async fn upload(&self, audio: &AudioArtifact, user_id: &str) -> Result<String, StorageError>;
}
