//! Filesystem artifact store

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use crate::application::ports::{ArtifactStore, StorageError};
use crate::domain::audio::AudioArtifact;

use super::StorageClient;

/// Writes recordings under the client's storage root
#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    client: StorageClient,
}

impl LocalArtifactStore {
    pub fn new(client: StorageClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StorageClient {
        &self.client
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn upload(&self, audio: &AudioArtifact, user_id: &str) -> Result<String, StorageError> {
        if audio.is_empty() {
            return Err(StorageError::UploadFailed("recording is empty".into()));
        }

        let dir = self.client.recordings_dir(user_id)?;
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", dir.display(), e)))?;

        let (bytes, extension) = audio.file_contents();
        let name = format!("recording-{}.{}", Utc::now().timestamp_millis(), extension);
        let path = dir.join(name);

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", path.display(), e)))?;
        let path = tokio::fs::canonicalize(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), size = audio.size_bytes(), "artifact stored");
        Ok(format!("file://{}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioMimeType;
    use crate::infrastructure::storage::Credentials;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalArtifactStore {
        let client =
            StorageClient::connect(dir.path(), "test-app", Credentials::Anonymous).unwrap();
        LocalArtifactStore::new(client)
    }

    #[tokio::test]
    async fn upload_writes_under_user_namespace() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = AudioArtifact::new(vec![1, 2, 3], AudioMimeType::Webm);

        let url = store.upload(&audio, "user-7").await.unwrap();
        assert!(url.starts_with("file://"));

        let path = std::path::PathBuf::from(url.trim_start_matches("file://"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("recording-"));
        assert!(name.ends_with(".webm"));
        assert!(path
            .parent()
            .unwrap()
            .ends_with("artifacts/test-app/users/user-7/audio_recordings"));
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn pcm_upload_is_wav() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = AudioArtifact::new(
            vec![0; 4],
            AudioMimeType::Pcm16 {
                sample_rate: 16_000,
                channels: 1,
            },
        );

        let url = store.upload(&audio, "u").await.unwrap();
        assert!(url.ends_with(".wav"));
    }

    #[tokio::test]
    async fn invalid_user_id_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = AudioArtifact::new(vec![1], AudioMimeType::Webm);

        let err = store.upload(&audio, "../other").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidUserId(_)));
    }

    #[tokio::test]
    async fn empty_recording_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let audio = AudioArtifact::new(Vec::new(), AudioMimeType::Webm);

        let err = store.upload(&audio, "u").await.unwrap_err();
        assert!(matches!(err, StorageError::UploadFailed(_)));
    }
}
