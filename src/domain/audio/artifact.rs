//! Audio artifact and chunk value objects

use std::fmt;

/// Content type of a recorded artifact.
///
/// Container formats map to their registered MIME types. Raw capture output
/// is tagged as linear PCM (`audio/L16`, RFC 2586) with its rate and channel
/// count carried as parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Webm,
    Ogg,
    Wav,
    Mp4,
    Mpeg,
    Pcm16 { sample_rate: u32, channels: u16 },
}

impl AudioMimeType {
    /// MIME type without parameters
    pub const fn essence(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Wav => "audio/wav",
            Self::Mp4 => "audio/mp4",
            Self::Mpeg => "audio/mpeg",
            Self::Pcm16 { .. } => "audio/L16",
        }
    }

    /// File extension used when the artifact is written to disk
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
            Self::Mpeg => "mp3",
            Self::Pcm16 { .. } => "pcm",
        }
    }

    /// Whether the bytes are raw samples rather than a container
    pub const fn is_raw_pcm(&self) -> bool {
        matches!(self, Self::Pcm16 { .. })
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pcm16 {
                sample_rate,
                channels,
            } => write!(
                f,
                "{};rate={};channels={}",
                self.essence(),
                sample_rate,
                channels
            ),
            _ => write!(f, "{}", self.essence()),
        }
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Webm
    }
}

/// One fragment of audio delivered by the host while a session is recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk(Vec<u8>);

impl AudioChunk {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AudioChunk {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

/// A finalized recording: raw bytes plus the declared content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioArtifact {
    /// Create an artifact from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Join chunks in the given order into one artifact
    pub fn from_chunks<'a, I>(chunks: I, mime_type: AudioMimeType) -> Self
    where
        I: IntoIterator<Item = &'a AudioChunk>,
    {
        let data = chunks
            .into_iter()
            .flat_map(|c| c.as_bytes().iter().copied())
            .collect();
        Self { data, mime_type }
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume and return the raw audio data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }

    /// Bytes and extension for writing the artifact to a file.
    /// Raw PCM gets a WAV header so ordinary players can open it.
    pub fn file_contents(&self) -> (Vec<u8>, &'static str) {
        match self.mime_type {
            AudioMimeType::Pcm16 {
                sample_rate,
                channels,
            } => (encode_wav(&self.data, sample_rate, channels), "wav"),
            other => (self.data.clone(), other.extension()),
        }
    }

    /// Decode little-endian 16-bit samples. Empty for container formats.
    pub fn pcm_samples(&self) -> Vec<i16> {
        if !self.mime_type.is_raw_pcm() {
            return Vec::new();
        }
        self.data
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Wrap 16-bit PCM in a canonical 44-byte WAV header
pub fn encode_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let data_len = pcm.len() as u32;
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}
