//! Rodio-based audio player
//!
//! Plays finished recordings and AI samples on the default output.

use std::io::Cursor;

use async_trait::async_trait;
use rodio::buffer::SamplesBuffer;
use rodio::{Decoder, OutputStream, Sink};

use crate::application::ports::{AudioPlayer, PlaybackError};
use crate::domain::audio::{AudioArtifact, AudioMimeType};

/// Audio player implementation using rodio
pub struct RodioPlayer {
    volume: f32,
}

impl RodioPlayer {
    /// Create a player at full volume
    pub fn new() -> Self {
        Self { volume: 1.0 }
    }

    /// Set the playback volume (1.0 is unchanged)
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.max(0.0);
        self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioPlayer for RodioPlayer {
    async fn play(&self, artifact: &AudioArtifact) -> Result<(), PlaybackError> {
        if artifact.is_empty() {
            return Ok(());
        }
        let artifact = artifact.clone();
        let volume = self.volume;

        // Run audio playback in blocking thread to avoid blocking the async runtime
        tokio::task::spawn_blocking(move || play_sync(&artifact, volume))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Play an artifact synchronously (called from spawn_blocking)
fn play_sync(artifact: &AudioArtifact, volume: f32) -> Result<(), PlaybackError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

    let sink =
        Sink::try_new(&stream_handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;
    sink.set_volume(volume);

    match artifact.mime_type() {
        AudioMimeType::Pcm16 {
            sample_rate,
            channels,
        } => {
            sink.append(SamplesBuffer::new(
                channels,
                sample_rate,
                artifact.pcm_samples(),
            ));
        }
        mime_type => {
            let decoder = Decoder::new(Cursor::new(artifact.data().to_vec())).map_err(|e| {
                PlaybackError::UnsupportedFormat(format!("{}: {}", mime_type, e))
            })?;
            sink.append(decoder);
        }
    }

    // Wait for playback to complete
    sink.sleep_until_end();

    Ok(())
}
