//! Capture capability port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::{AudioChunk, AudioMimeType};
use crate::domain::recording::CaptureFailure;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Audio capture is not supported on this host")]
    Unsupported,

    #[error("Microphone access denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to open capture stream: {0}")]
    OpenFailed(String),

    #[error("Capture stream failed: {0}")]
    StreamFailed(String),
}

impl From<CaptureError> for CaptureFailure {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::Unsupported => CaptureFailure::CapabilityUnsupported,
            CaptureError::PermissionDenied(_) => CaptureFailure::PermissionDenied,
            CaptureError::OpenFailed(msg) | CaptureError::StreamFailed(msg) => {
                CaptureFailure::AcquisitionFailed(msg)
            }
        }
    }
}

/// Sending half of a session's chunk channel, handed to the host.
pub type ChunkSender = mpsc::UnboundedSender<AudioChunk>;

/// Receiving half, held by the controller for the lifetime of one session.
pub type ChunkReceiver = mpsc::UnboundedReceiver<AudioChunk>;

/// Host facility for microphone access
#[async_trait]
pub trait CaptureCapability: Send + Sync {
    /// Live stream type returned by `open`
    type Stream: CaptureStream;

    /// Whether this host can capture audio at all.
    /// Checked before anything is requested from the host.
    fn is_supported(&self) -> bool;

    /// Request exclusive microphone access and start a stream.
    ///
    /// Every chunk the host produces for this stream is sent on `chunks`,
    /// in emission order.
    async fn open(&self, chunks: ChunkSender) -> Result<Self::Stream, CaptureError>;
}

/// A live capture stream holding the hardware track
#[async_trait]
pub trait CaptureStream: Send {
    /// Content type negotiated for this stream's chunks
    fn mime_type(&self) -> AudioMimeType;

    /// Stop producing audio.
    ///
    /// Resolves once the host confirms the stop. Every chunk for the stream
    /// must have been sent before this returns.
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Release the underlying hardware tracks. Idempotent.
    ///
    /// Hosts may finish the teardown after this returns; `active_tracks`
    /// keeps counting the track until they do.
    fn release(&mut self);

    /// Number of hardware tracks currently held
    fn active_tracks(&self) -> usize;
}
