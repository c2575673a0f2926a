//! Practice evaluation use case
//!
//! Runs once per finished recording: transcribe, score, optionally upload,
//! then produce the AI sample shown next to the user's answer.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::audio::AudioArtifact;
use crate::domain::scoring::ScoreResult;

use super::ports::{
    ArtifactStore, SampleGenerator, Scorer, ScoringError, Transcriber, TranscriptionError,
};

/// Errors from the practice use case
#[derive(Debug, Error)]
pub enum PracticeError {
    #[error("Speech recognition failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Scoring failed: {0}")]
    Scoring(#[from] ScoringError),
}

/// Settings for one evaluation
#[derive(Debug, Clone, Default)]
pub struct PracticeConfig {
    /// Upload the answer to the artifact store
    pub upload: bool,
    /// Namespace for uploads
    pub user_id: String,
}

/// Everything the result screen needs
#[derive(Debug, Clone)]
pub struct PracticeResult {
    pub answer: AudioArtifact,
    pub duration_secs: f64,
    pub transcript: String,
    pub score: ScoreResult,
    /// Download URL when the upload succeeded
    pub remote_url: Option<String>,
    /// Model answer, when one could be generated
    pub sample: Option<AudioArtifact>,
}

/// Serializable view of a `PracticeResult` (no audio bytes)
#[derive(Debug, Clone, Serialize)]
pub struct PracticeSummary {
    pub duration_secs: f64,
    pub audio_size_bytes: usize,
    pub mime_type: String,
    pub transcript: String,
    pub score: u8,
    pub max_score: u8,
    pub feedback: String,
    pub remote_url: Option<String>,
    pub sample_available: bool,
}

impl PracticeResult {
    pub fn summary(&self) -> PracticeSummary {
        PracticeSummary {
            duration_secs: self.duration_secs,
            audio_size_bytes: self.answer.size_bytes(),
            mime_type: self.answer.mime_type().to_string(),
            transcript: self.transcript.clone(),
            score: self.score.score(),
            max_score: crate::domain::scoring::MAX_SCORE,
            feedback: self.score.feedback().to_string(),
            remote_url: self.remote_url.clone(),
            sample_available: self.sample.is_some(),
        }
    }
}

/// Practice evaluation use case
pub struct PracticeUseCase<T, S, G, A>
where
    T: Transcriber,
    S: Scorer,
    G: SampleGenerator,
    A: ArtifactStore,
{
    transcriber: T,
    scorer: S,
    sample_generator: G,
    store: A,
    config: PracticeConfig,
}

impl<T, S, G, A> PracticeUseCase<T, S, G, A>
where
    T: Transcriber,
    S: Scorer,
    G: SampleGenerator,
    A: ArtifactStore,
{
    /// Create a new use case instance
    pub fn new(
        transcriber: T,
        scorer: S,
        sample_generator: G,
        store: A,
        config: PracticeConfig,
    ) -> Self {
        Self {
            transcriber,
            scorer,
            sample_generator,
            store,
            config,
        }
    }

    /// Evaluate a finished recording.
    ///
    /// Transcription and scoring failures abort the evaluation; upload and
    /// sample generation failures only drop their part of the result.
    pub async fn evaluate(
        &self,
        answer: AudioArtifact,
        duration_secs: f64,
    ) -> Result<PracticeResult, PracticeError> {
        let transcript = self.transcriber.transcribe(&answer).await?;
        debug!(%transcript, "speech recognition result");

        let score = self.scorer.score(&answer, &transcript).await?;
        info!(score = score.score(), "answer scored");

        let remote_url = if self.config.upload {
            match self.store.upload(&answer, &self.config.user_id).await {
                Ok(url) => {
                    info!(%url, "answer uploaded");
                    Some(url)
                }
                Err(err) => {
                    warn!(error = %err, "upload failed");
                    None
                }
            }
        } else {
            None
        };

        let sample = match self.sample_generator.generate(&answer).await {
            Ok(sample) => Some(sample),
            Err(err) => {
                warn!(error = %err, "AI sample unavailable");
                None
            }
        };

        Ok(PracticeResult {
            answer,
            duration_secs,
            transcript,
            score,
            remote_url,
            sample,
        })
    }
}
