//! Playback port interfaces

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::audio::AudioArtifact;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to register playback handle: {0}")]
    RegisterFailed(String),

    #[error("Unknown playback handle: {0}")]
    UnknownHandle(Uuid),

    #[error("Audio output not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Reference that lets the UI render an artifact.
///
/// Handles are a scarce host resource: each one must be passed back to
/// `PlaybackHost::release` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackHandle {
    id: Uuid,
    path: PathBuf,
}

impl PlaybackHandle {
    pub fn new(id: Uuid, path: PathBuf) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// URI form of the handle, suitable for external players
    pub fn uri(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

/// Port for creating and releasing playback handles
#[async_trait]
pub trait PlaybackHost: Send + Sync {
    /// Register an artifact and return a handle to it
    async fn register(&self, artifact: &AudioArtifact) -> Result<PlaybackHandle, PlaybackError>;

    /// Release a handle previously returned by `register`
    async fn release(&self, handle: PlaybackHandle) -> Result<(), PlaybackError>;

    /// Number of handles registered and not yet released
    fn live_handles(&self) -> usize;
}

/// Port for audible playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the artifact to the default output, returning when done
    async fn play(&self, artifact: &AudioArtifact) -> Result<(), PlaybackError>;
}
