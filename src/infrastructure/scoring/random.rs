//! Randomized mock scorer

use std::ops::RangeInclusive;

use async_trait::async_trait;
use rand::Rng;

use crate::application::ports::{Scorer, ScoringError};
use crate::domain::audio::AudioArtifact;
use crate::domain::scoring::{ScoreResult, MAX_SCORE};

/// Range mock scores are drawn from
pub const MOCK_SCORE_RANGE: RangeInclusive<u8> = 18..=25;

/// Scorer that draws a uniform score from `MOCK_SCORE_RANGE`
#[derive(Debug, Clone)]
pub struct RandomScorer {
    range: RangeInclusive<u8>,
}

impl RandomScorer {
    pub fn new() -> Self {
        Self {
            range: MOCK_SCORE_RANGE,
        }
    }

    /// Draw from a custom range; the upper bound is capped at `MAX_SCORE`
    pub fn with_range(range: RangeInclusive<u8>) -> Self {
        let (low, high) = range.into_inner();
        let high = high.min(MAX_SCORE);
        Self {
            range: low.min(high)..=high,
        }
    }
}

impl Default for RandomScorer {
    fn default() -> Self {
        Self::new()
    }
}

fn feedback(score: u8) -> String {
    format!(
        "Your mock score is {}. Your spoken expression is clear, but there is room for improvement in fluency and vocabulary diversity.",
        score
    )
}

#[async_trait]
impl Scorer for RandomScorer {
    async fn score(
        &self,
        _audio: &AudioArtifact,
        transcript: &str,
    ) -> Result<ScoreResult, ScoringError> {
        if transcript.trim().is_empty() {
            return Err(ScoringError::EmptyInput("transcript is empty".into()));
        }
        let score = rand::thread_rng().gen_range(self.range.clone());
        Ok(ScoreResult::new(score, feedback(score)))
    }
}
