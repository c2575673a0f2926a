//! Scoring port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioArtifact;
use crate::domain::scoring::ScoreResult;

/// Scoring errors
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("Nothing to score: {0}")]
    EmptyInput(String),

    #[error("Scoring failed: {0}")]
    Failed(String),
}

/// Port for rating a spoken answer
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Score an answer from its audio and transcript
    async fn score(
        &self,
        audio: &AudioArtifact,
        transcript: &str,
    ) -> Result<ScoreResult, ScoringError>;
}
