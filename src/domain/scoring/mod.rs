//! Scoring domain module

mod score;

pub use score::{ScoreResult, MAX_SCORE, SCORING_DIMENSIONS};
