//! Recording session state machine

use std::fmt;
use std::time::Instant;

use thiserror::Error;

use crate::domain::audio::{AudioArtifact, AudioChunk, AudioMimeType};

/// Recording lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Acquiring,
    Recording,
    Stopping,
    Stopped,
    Error,
}

impl RecordingState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Acquiring => "acquiring",
            Self::Recording => "recording",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Error => "error",
        }
    }

    /// States from which a new session may be started
    pub const fn accepts_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Error)
    }

    /// Whether the single start/stop trigger is enabled
    pub const fn trigger_enabled(&self) -> bool {
        !matches!(self, Self::Acquiring | Self::Stopping)
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a session ended in the `error` state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureFailure {
    #[error("audio capture is not supported on this host")]
    CapabilityUnsupported,

    #[error("microphone permission was denied")]
    PermissionDenied,

    #[error("audio capture failed: {0}")]
    AcquisitionFailed(String),
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecordingState,
    pub action: String,
}

/// Output of a successful session
#[derive(Debug, Clone)]
pub struct FinishedRecording {
    pub artifact: AudioArtifact,
    pub duration_secs: f64,
}

/// One capture attempt.
///
/// State machine:
///   IDLE | STOPPED | ERROR -> ACQUIRING (begin_acquiring)
///   ACQUIRING -> RECORDING (begin_recording)
///   ACQUIRING -> ERROR (fail)
///   RECORDING -> STOPPING (begin_stopping)
///   STOPPING -> STOPPED (finish)
///   STOPPING -> ERROR (fail)
#[derive(Debug, Default)]
pub struct RecordingSession {
    state: RecordingState,
    chunks: Vec<AudioChunk>,
    started_at: Option<Instant>,
    failure: Option<CaptureFailure>,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn failure(&self) -> Option<&CaptureFailure> {
        self.failure.as_ref()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// Number of chunks accumulated so far
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total buffered bytes
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.iter().map(AudioChunk::len).sum()
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }

    /// Transition to ACQUIRING, discarding everything from the previous attempt
    pub fn begin_acquiring(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.state.accepts_start() {
            return Err(self.invalid("start recording"));
        }
        self.chunks.clear();
        self.started_at = None;
        self.failure = None;
        self.state = RecordingState::Acquiring;
        Ok(())
    }

    /// Transition from ACQUIRING to RECORDING. The start time is taken here.
    pub fn begin_recording(&mut self, now: Instant) -> Result<(), InvalidStateTransition> {
        if self.state != RecordingState::Acquiring {
            return Err(self.invalid("begin recording"));
        }
        self.started_at = Some(now);
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Append a chunk. Empty chunks are dropped; returns whether it was kept.
    ///
    /// Chunks are only accepted while the stream is live (RECORDING or
    /// STOPPING, since the host may still deliver until it confirms the stop).
    pub fn push_chunk(&mut self, chunk: AudioChunk) -> bool {
        if chunk.is_empty() {
            return false;
        }
        match self.state {
            RecordingState::Recording | RecordingState::Stopping => {
                self.chunks.push(chunk);
                true
            }
            _ => false,
        }
    }

    /// Transition from RECORDING to STOPPING
    pub fn begin_stopping(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != RecordingState::Recording {
            return Err(self.invalid("stop recording"));
        }
        self.state = RecordingState::Stopping;
        Ok(())
    }

    /// Transition from STOPPING to STOPPED, producing the artifact.
    ///
    /// Duration is `now - started_at`, in seconds.
    pub fn finish(
        &mut self,
        now: Instant,
        mime_type: AudioMimeType,
    ) -> Result<FinishedRecording, InvalidStateTransition> {
        if self.state != RecordingState::Stopping {
            return Err(self.invalid("finish recording"));
        }
        let started_at = self.started_at.ok_or_else(|| self.invalid("finish recording"))?;
        let duration_secs = now.saturating_duration_since(started_at).as_secs_f64();
        let artifact = AudioArtifact::from_chunks(&self.chunks, mime_type);
        self.chunks.clear();
        self.state = RecordingState::Stopped;
        Ok(FinishedRecording {
            artifact,
            duration_secs,
        })
    }

    /// Transition from ACQUIRING or STOPPING to ERROR
    pub fn fail(&mut self, failure: CaptureFailure) -> Result<(), InvalidStateTransition> {
        match self.state {
            // Unsupported hosts fail before anything is acquired.
            RecordingState::Idle | RecordingState::Stopped | RecordingState::Error
                if failure == CaptureFailure::CapabilityUnsupported => {}
            RecordingState::Acquiring | RecordingState::Stopping => {}
            _ => return Err(self.invalid("fail recording")),
        }
        self.chunks.clear();
        self.started_at = None;
        self.failure = Some(failure);
        self.state = RecordingState::Error;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn recording_session(start: Instant) -> RecordingSession {
        let mut session = RecordingSession::new();
        session.begin_acquiring().unwrap();
        session.begin_recording(start).unwrap();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert_eq!(session.state(), RecordingState::Idle);
        assert!(session.failure().is_none());
        assert!(session.started_at().is_none());
    }

    #[test]
    fn full_cycle() {
        let start = Instant::now();
        let mut session = recording_session(start);
        assert_eq!(session.state(), RecordingState::Recording);
        assert_eq!(session.started_at(), Some(start));

        assert!(session.push_chunk(AudioChunk::new(vec![1, 2])));
        session.begin_stopping().unwrap();
        assert!(session.push_chunk(AudioChunk::new(vec![3])));

        let done = session
            .finish(start + Duration::from_millis(2500), AudioMimeType::Webm)
            .unwrap();
        assert_eq!(session.state(), RecordingState::Stopped);
        assert_eq!(done.artifact.data(), &[1, 2, 3]);
        assert!((done.duration_secs - 2.5).abs() < 1e-9);
    }

    #[test]
    fn empty_chunks_are_dropped() {
        let mut session = recording_session(Instant::now());
        assert!(!session.push_chunk(AudioChunk::new(Vec::new())));
        assert_eq!(session.chunk_count(), 0);
    }

    #[test]
    fn chunks_outside_live_stream_are_ignored() {
        let mut session = RecordingSession::new();
        assert!(!session.push_chunk(AudioChunk::new(vec![1])));
        session.begin_acquiring().unwrap();
        assert!(!session.push_chunk(AudioChunk::new(vec![1])));
    }

    #[test]
    fn start_rejected_while_busy() {
        let mut session = RecordingSession::new();
        session.begin_acquiring().unwrap();
        let err = session.begin_acquiring().unwrap_err();
        assert_eq!(err.current_state, RecordingState::Acquiring);

        session.begin_recording(Instant::now()).unwrap();
        assert!(session.begin_acquiring().is_err());

        session.begin_stopping().unwrap();
        assert!(session.begin_acquiring().is_err());
    }

    #[test]
    fn stop_only_from_recording() {
        let mut session = RecordingSession::new();
        assert!(session.begin_stopping().is_err());
        session.begin_acquiring().unwrap();
        assert!(session.begin_stopping().is_err());
    }

    #[test]
    fn restart_from_stopped_clears_buffer() {
        let start = Instant::now();
        let mut session = recording_session(start);
        session.push_chunk(AudioChunk::new(vec![9; 4]));
        session.begin_stopping().unwrap();
        session.finish(start, AudioMimeType::Webm).unwrap();

        session.begin_acquiring().unwrap();
        assert_eq!(session.state(), RecordingState::Acquiring);
        assert_eq!(session.buffered_bytes(), 0);
        assert!(session.started_at().is_none());
    }

    #[test]
    fn permission_failure_from_acquiring() {
        let mut session = RecordingSession::new();
        session.begin_acquiring().unwrap();
        session.fail(CaptureFailure::PermissionDenied).unwrap();
        assert_eq!(session.state(), RecordingState::Error);
        assert_eq!(session.failure(), Some(&CaptureFailure::PermissionDenied));

        // Retry is a fresh start
        session.begin_acquiring().unwrap();
        assert!(session.failure().is_none());
    }

    #[test]
    fn unsupported_failure_from_idle() {
        let mut session = RecordingSession::new();
        session.fail(CaptureFailure::CapabilityUnsupported).unwrap();
        assert_eq!(session.state(), RecordingState::Error);
    }

    #[test]
    fn permission_failure_from_idle_is_invalid() {
        let mut session = RecordingSession::new();
        assert!(session.fail(CaptureFailure::PermissionDenied).is_err());
        assert_eq!(session.state(), RecordingState::Idle);
    }

    #[test]
    fn failure_while_recording_is_invalid() {
        let mut session = recording_session(Instant::now());
        assert!(session
            .fail(CaptureFailure::AcquisitionFailed("boom".into()))
            .is_err());
        assert_eq!(session.state(), RecordingState::Recording);
    }

    #[test]
    fn trigger_disabled_in_transient_states() {
        assert!(RecordingState::Idle.trigger_enabled());
        assert!(RecordingState::Recording.trigger_enabled());
        assert!(RecordingState::Stopped.trigger_enabled());
        assert!(RecordingState::Error.trigger_enabled());
        assert!(!RecordingState::Acquiring.trigger_enabled());
        assert!(!RecordingState::Stopping.trigger_enabled());
    }

    #[test]
    fn state_display() {
        assert_eq!(RecordingState::Idle.to_string(), "idle");
        assert_eq!(RecordingState::Acquiring.to_string(), "acquiring");
        assert_eq!(RecordingState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: RecordingState::Stopping,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("stopping"));
    }
}
