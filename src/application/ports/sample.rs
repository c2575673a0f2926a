//! AI sample generation port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioArtifact;

/// Sample generation errors
#[derive(Debug, Clone, Error)]
pub enum SampleError {
    #[error("Sample generation failed: {0}")]
    Failed(String),
}

/// Port for producing a model answer to play next to the user's recording
#[async_trait]
pub trait SampleGenerator: Send + Sync {
    async fn generate(&self, answer: &AudioArtifact) -> Result<AudioArtifact, SampleError>;
}
