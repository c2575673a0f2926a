//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioArtifact;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Empty audio input")]
    EmptyAudio,

    #[error("Transcription request failed: {0}")]
    RequestFailed(String),
}

/// Port for speech-to-text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe audio data to text.
    ///
    /// # Arguments
    /// * `audio` - The recorded answer
    ///
    /// # Returns
    /// The transcribed text or an error
    async fn transcribe(&self, audio: &AudioArtifact) -> Result<String, TranscriptionError>;
}
