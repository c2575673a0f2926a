//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod playback;
pub mod sample;
pub mod scorer;
pub mod storage;
pub mod transcriber;

// Re-export common types
pub use capture::{CaptureCapability, CaptureError, CaptureStream, ChunkReceiver, ChunkSender};
pub use config::ConfigStore;
pub use playback::{AudioPlayer, PlaybackError, PlaybackHandle, PlaybackHost};
pub use sample::{SampleError, SampleGenerator};
pub use scorer::{Scorer, ScoringError};
pub use storage::{ArtifactStore, StorageError};
pub use transcriber::{Transcriber, TranscriptionError};
