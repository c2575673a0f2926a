//! Score value objects

use std::fmt;

use serde::Serialize;

/// Highest score a single speaking answer can receive
pub const MAX_SCORE: u8 = 30;

/// Dimensions an answer is rated on, in display order
pub const SCORING_DIMENSIONS: &[&str] = &["Pronunciation", "Fluency", "Intonation", "Content"];

/// Score for one answer plus human-readable feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    score: u8,
    feedback: String,
}

impl ScoreResult {
    /// Create a score, clamped to `MAX_SCORE`
    pub fn new(score: u8, feedback: impl Into<String>) -> Self {
        Self {
            score: score.min(MAX_SCORE),
            feedback: feedback.into(),
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Score as a fraction of the maximum
    pub fn ratio(&self) -> f64 {
        f64::from(self.score) / f64::from(MAX_SCORE)
    }
}

impl fmt::Display for ScoreResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.score, MAX_SCORE)
    }
}
