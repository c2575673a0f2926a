//! Audio domain module

mod artifact;

pub use artifact::{AudioArtifact, AudioChunk, AudioMimeType};
