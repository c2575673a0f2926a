//! Application layer - Use cases and port interfaces
//!
//! Contains the recording lifecycle controller, the practice evaluation
//! use case, and trait definitions for external system interactions.

pub mod ports;
pub mod practice;
pub mod recorder;

// Re-export use cases
pub use practice::{PracticeConfig, PracticeError, PracticeResult, PracticeSummary, PracticeUseCase};
pub use recorder::{CompletionCallback, RecorderError, RecordingController, StateObserver};
