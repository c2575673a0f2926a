//! Canned speech recognition
//!
//! Stands in for a real recognizer: waits a fixed latency, then returns
//! the same sentence for every non-empty recording.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::audio::AudioArtifact;

/// Sentence returned for every answer
pub const MOCK_TRANSCRIPT: &str = "Well, I think the most important thing to consider when looking for a new job is the company culture, as it greatly impacts daily work life.";

/// Transcriber returning a fixed sentence after a fixed delay
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    delay: Duration,
    transcript: String,
}

impl MockTranscriber {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            transcript: MOCK_TRANSCRIPT.to_string(),
        }
    }

    /// Override the returned sentence
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = transcript.into();
        self
    }
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new(Duration::from_millis(
            crate::domain::config::DEFAULT_TRANSCRIPTION_DELAY_MS,
        ))
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &AudioArtifact) -> Result<String, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        debug!(
            size = audio.size_bytes(),
            delay_ms = self.delay.as_millis() as u64,
            "mock transcription"
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.transcript.clone())
    }
}
