//! Playback handles backed by temporary files
//!
//! Each registered artifact is written to its own file under a scratch
//! directory. Releasing the handle deletes the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::ports::{PlaybackError, PlaybackHandle, PlaybackHost};
use crate::domain::audio::AudioArtifact;

/// Playback host that materializes artifacts as files
#[derive(Debug)]
pub struct TempFilePlaybackHost {
    dir: PathBuf,
    handles: Mutex<HashMap<Uuid, PathBuf>>,
}

impl TempFilePlaybackHost {
    /// Use `<tmp>/speakprep` as the scratch directory
    pub fn new() -> Self {
        Self::with_dir(std::env::temp_dir().join("speakprep"))
    }

    /// Use a specific scratch directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            handles: Mutex::new(HashMap::new()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn lock_err<T>(_: T) -> PlaybackError {
        PlaybackError::RegisterFailed("handle table poisoned".into())
    }
}

impl Default for TempFilePlaybackHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackHost for TempFilePlaybackHost {
    async fn register(&self, artifact: &AudioArtifact) -> Result<PlaybackHandle, PlaybackError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PlaybackError::RegisterFailed(format!("{}: {}", self.dir.display(), e)))?;

        let id = Uuid::new_v4();
        let (bytes, extension) = artifact.file_contents();
        let path = self.dir.join(format!("recording-{}.{}", id, extension));

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PlaybackError::RegisterFailed(format!("{}: {}", path.display(), e)))?;

        self.handles
            .lock()
            .map_err(Self::lock_err)?
            .insert(id, path.clone());
        debug!(%id, path = %path.display(), "playback handle registered");

        Ok(PlaybackHandle::new(id, path))
    }

    async fn release(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
        let path = self
            .handles
            .lock()
            .map_err(Self::lock_err)?
            .remove(&handle.id())
            .ok_or(PlaybackError::UnknownHandle(handle.id()))?;

        if let Err(err) = tokio::fs::remove_file(&path).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %err, "failed to remove playback file");
            }
        }
        debug!(id = %handle.id(), "playback handle released");
        Ok(())
    }

    fn live_handles(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::audio::AudioMimeType;
    use tempfile::TempDir;

    fn host() -> (TempDir, TempFilePlaybackHost) {
        let dir = TempDir::new().unwrap();
        let host = TempFilePlaybackHost::with_dir(dir.path().join("playback"));
        (dir, host)
    }

    #[tokio::test]
    async fn register_writes_file() {
        let (_dir, host) = host();
        let artifact = AudioArtifact::new(vec![1, 2, 3], AudioMimeType::Webm);

        let handle = host.register(&artifact).await.unwrap();
        assert_eq!(host.live_handles(), 1);
        assert!(handle.path().to_string_lossy().ends_with(".webm"));
        assert_eq!(std::fs::read(handle.path()).unwrap(), vec![1, 2, 3]);
        assert!(handle.uri().starts_with("file://"));
    }

    #[tokio::test]
    async fn release_deletes_file() {
        let (_dir, host) = host();
        let artifact = AudioArtifact::new(vec![9; 8], AudioMimeType::Ogg);

        let handle = host.register(&artifact).await.unwrap();
        let path = handle.path().to_path_buf();
        host.release(handle).await.unwrap();

        assert_eq!(host.live_handles(), 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn double_release_is_rejected() {
        let (_dir, host) = host();
        let artifact = AudioArtifact::new(vec![1], AudioMimeType::Webm);

        let handle = host.register(&artifact).await.unwrap();
        host.release(handle.clone()).await.unwrap();
        let err = host.release(handle).await.unwrap_err();
        assert!(matches!(err, PlaybackError::UnknownHandle(_)));
    }

    #[tokio::test]
    async fn handles_are_distinct() {
        let (_dir, host) = host();
        let artifact = AudioArtifact::new(vec![1], AudioMimeType::Webm);

        let a = host.register(&artifact).await.unwrap();
        let b = host.register(&artifact).await.unwrap();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.path(), b.path());
        assert_eq!(host.live_handles(), 2);
    }

    #[tokio::test]
    async fn raw_pcm_is_written_as_wav() {
        let (_dir, host) = host();
        let artifact = AudioArtifact::new(
            vec![0, 0, 1, 0],
            AudioMimeType::Pcm16 {
                sample_rate: 16_000,
                channels: 1,
            },
        );

        let handle = host.register(&artifact).await.unwrap();
        assert!(handle.path().to_string_lossy().ends_with(".wav"));
        let bytes = std::fs::read(handle.path()).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WAVE");
    }
}
