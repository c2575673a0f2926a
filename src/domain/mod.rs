//! Domain layer - Core business logic
//!
//! Contains value objects, the recording session state machine, and domain
//! errors. This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod recording;
pub mod scoring;

// Re-export common types
pub use audio::{AudioArtifact, AudioChunk, AudioMimeType};
pub use config::AppConfig;
pub use error::*;
pub use recording::{CaptureFailure, Duration, RecordingSession, RecordingState};
pub use scoring::ScoreResult;
