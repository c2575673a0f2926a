//! Scoring adapters

mod random;

pub use random::{RandomScorer, MOCK_SCORE_RANGE};
