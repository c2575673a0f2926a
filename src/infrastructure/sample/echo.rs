//! Echo sample generator
//!
//! Placeholder for a model-voiced answer: after a short delay it hands the
//! user's own recording back.

use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{SampleError, SampleGenerator};
use crate::domain::audio::AudioArtifact;

/// Default generation latency
pub const ECHO_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct EchoSampleGenerator {
    delay: Duration,
}

impl EchoSampleGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for EchoSampleGenerator {
    fn default() -> Self {
        Self::new(ECHO_DELAY)
    }
}

#[async_trait]
impl SampleGenerator for EchoSampleGenerator {
    async fn generate(&self, answer: &AudioArtifact) -> Result<AudioArtifact, SampleError> {
        if answer.is_empty() {
            return Err(SampleError::Failed("no recording to echo".into()));
        }
        tokio::time::sleep(self.delay).await;
        Ok(answer.clone())
    }
}
