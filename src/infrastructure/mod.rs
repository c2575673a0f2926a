//! Infrastructure layer - Adapter implementations
//!
//! Concrete implementations of the port interfaces: cpal capture, rodio
//! playback, mock evaluation services, local storage and the XDG config.

pub mod capture;
pub mod config;
pub mod playback;
pub mod sample;
pub mod scoring;
pub mod storage;
pub mod transcription;

// Re-export adapters
pub use capture::{CpalCapture, CpalStream};
pub use config::XdgConfigStore;
pub use playback::{RodioPlayer, TempFilePlaybackHost};
pub use sample::EchoSampleGenerator;
pub use scoring::RandomScorer;
pub use storage::{Credentials, LocalArtifactStore, StorageClient};
pub use transcription::MockTranscriber;
