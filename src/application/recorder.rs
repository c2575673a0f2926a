//! Recording lifecycle controller
//!
//! Mediates between a single UI trigger and the host capture capability.
//! One session at a time: the controller owns the live stream, the chunk
//! channel and the playback handle for the latest finished recording.

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::audio::AudioArtifact;
use crate::domain::recording::{
    CaptureFailure, InvalidStateTransition, RecordingSession, RecordingState,
};

use super::ports::{
    CaptureCapability, CaptureStream, ChunkReceiver, PlaybackHandle, PlaybackHost,
};

/// Receives the finished artifact and its duration in seconds.
/// Invoked exactly once per successful session.
pub type CompletionCallback = Box<dyn FnMut(AudioArtifact, f64) + Send>;

/// Observes every state change, in order
pub type StateObserver = Box<dyn Fn(RecordingState) + Send + Sync>;

/// Errors from the recording controller
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Cannot start a recording while {0}")]
    Busy(RecordingState),

    #[error("{0}")]
    Capture(CaptureFailure),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

impl RecorderError {
    /// The capture failure behind this error, if any
    pub fn failure(&self) -> Option<&CaptureFailure> {
        match self {
            Self::Capture(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Recording lifecycle controller
pub struct RecordingController<C, P>
where
    C: CaptureCapability,
    P: PlaybackHost,
{
    capture: C,
    playback: P,
    on_complete: CompletionCallback,
    on_state: Option<StateObserver>,
    session: RecordingSession,
    stream: Option<C::Stream>,
    chunks: Option<ChunkReceiver>,
    handle: Option<PlaybackHandle>,
}

impl<C, P> RecordingController<C, P>
where
    C: CaptureCapability,
    P: PlaybackHost,
{
    /// Create a controller in idle state
    pub fn new(capture: C, playback: P, on_complete: CompletionCallback) -> Self {
        Self {
            capture,
            playback,
            on_complete,
            on_state: None,
            session: RecordingSession::new(),
            stream: None,
            chunks: None,
            handle: None,
        }
    }

    /// Attach an observer that sees every state change
    pub fn with_state_observer(mut self, observer: StateObserver) -> Self {
        self.on_state = Some(observer);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecordingState {
        self.session.state()
    }

    /// Whether the start/stop trigger should be enabled
    pub fn can_trigger(&self) -> bool {
        self.session.state().trigger_enabled()
    }

    /// Reason for the last `error` state
    pub fn last_failure(&self) -> Option<&CaptureFailure> {
        self.session.failure()
    }

    /// Handle for reviewing the latest finished recording
    pub fn playback_handle(&self) -> Option<&PlaybackHandle> {
        self.handle.as_ref()
    }

    /// Hardware tracks currently held (0 or 1)
    pub fn active_tracks(&self) -> usize {
        self.stream.as_ref().map_or(0, |s| s.active_tracks())
    }

    /// Time since recording started, while recording
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        if self.session.state() != RecordingState::Recording {
            return None;
        }
        self.session
            .started_at()
            .map(|started| Instant::now().into_std().saturating_duration_since(started))
    }

    /// Move delivered chunks into the session buffer.
    ///
    /// Returns the number of bytes buffered so far.
    pub fn poll_chunks(&mut self) -> usize {
        if let Some(rx) = self.chunks.as_mut() {
            while let Ok(chunk) = rx.try_recv() {
                self.session.push_chunk(chunk);
            }
        }
        self.session.buffered_bytes()
    }

    /// Single-button behaviour: start when idle/stopped/error, stop when
    /// recording, ignored while acquiring or stopping.
    pub async fn trigger(&mut self) -> Result<RecordingState, RecorderError> {
        match self.session.state() {
            state if state.accepts_start() => {
                self.start().await?;
                Ok(self.session.state())
            }
            RecordingState::Recording => self.stop().await,
            state => {
                debug!(%state, "trigger disabled");
                Ok(state)
            }
        }
    }

    /// Start a new session.
    ///
    /// Accepted only from idle, stopped or error. The previous playback
    /// handle and any leftover stream are released before the host is asked
    /// for the microphone.
    pub async fn start(&mut self) -> Result<(), RecorderError> {
        let state = self.session.state();
        if !state.accepts_start() {
            debug!(%state, "start request ignored");
            return Err(RecorderError::Busy(state));
        }

        self.release_stream();
        self.release_playback().await;

        if !self.capture.is_supported() {
            let failure = CaptureFailure::CapabilityUnsupported;
            self.session.fail(failure.clone())?;
            self.notify();
            warn!("audio capture is not supported on this host");
            return Err(RecorderError::Capture(failure));
        }

        self.session.begin_acquiring()?;
        self.notify();
        debug!("requesting microphone access");

        let (tx, rx) = mpsc::unbounded_channel();
        match self.capture.open(tx).await {
            Ok(stream) => {
                self.session.begin_recording(Instant::now().into_std())?;
                info!(mime = %stream.mime_type(), "recording started");
                self.stream = Some(stream);
                self.chunks = Some(rx);
                self.notify();
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to acquire microphone");
                let failure = CaptureFailure::from(err);
                self.session.fail(failure.clone())?;
                self.notify();
                Err(RecorderError::Capture(failure))
            }
        }
    }

    /// Stop the active session.
    ///
    /// A no-op returning the unchanged state unless recording. On success the
    /// completion callback has run by the time this returns.
    pub async fn stop(&mut self) -> Result<RecordingState, RecorderError> {
        let state = self.session.state();
        if state != RecordingState::Recording {
            debug!(%state, "stop request ignored");
            return Ok(state);
        }

        self.poll_chunks();
        self.session.begin_stopping()?;
        self.notify();

        let Some(mut stream) = self.stream.take() else {
            return self.fail_stopping("no active capture stream".to_string());
        };

        let stopped = stream.stop().await;
        let confirmed_at = Instant::now().into_std();
        let mime_type = stream.mime_type();
        stream.release();
        drop(stream);

        // The host sends everything before confirming the stop.
        self.poll_chunks();
        self.chunks = None;

        if let Err(err) = stopped {
            return self.fail_stopping(err.to_string());
        }

        let finished = self.session.finish(confirmed_at, mime_type)?;
        info!(
            duration_secs = finished.duration_secs,
            size = %finished.artifact.human_readable_size(),
            "recording stopped"
        );

        match self.playback.register(&finished.artifact).await {
            Ok(handle) => {
                debug!(uri = %handle.uri(), "playback handle created");
                self.handle = Some(handle);
            }
            Err(err) => warn!(error = %err, "could not create playback handle"),
        }

        self.notify();
        (self.on_complete)(finished.artifact, finished.duration_secs);
        Ok(RecordingState::Stopped)
    }

    /// Tear down: release the hardware track and the playback handle.
    pub async fn shutdown(mut self) {
        self.release_stream();
        self.release_playback().await;
        debug!(state = %self.session.state(), "recording controller shut down");
    }

    fn fail_stopping(&mut self, reason: String) -> Result<RecordingState, RecorderError> {
        warn!(%reason, "capture stream failed while stopping");
        let failure = CaptureFailure::AcquisitionFailed(reason);
        self.session.fail(failure.clone())?;
        self.notify();
        Err(RecorderError::Capture(failure))
    }

    fn release_stream(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!("force-releasing previous capture stream");
            stream.release();
        }
        self.chunks = None;
    }

    async fn release_playback(&mut self) {
        if let Some(handle) = self.handle.take() {
            let id = handle.id();
            if let Err(err) = self.playback.release(handle).await {
                warn!(%id, error = %err, "failed to release playback handle");
            }
        }
    }

    fn notify(&self) {
        if let Some(ref observer) = self.on_state {
            observer(self.session.state());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{CaptureError, ChunkSender, PlaybackError};
    use crate::domain::audio::{AudioChunk, AudioMimeType};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::Duration;
    use uuid::Uuid;

    #[derive(Debug, Clone, Copy)]
    enum OpenBehavior {
        Grant,
        Deny,
        Fail,
    }

    #[derive(Default)]
    struct HostState {
        sender: Option<ChunkSender>,
        opens: usize,
        live_tracks: usize,
        max_live_tracks: usize,
        handles_live_at_open: Vec<usize>,
    }

    #[derive(Clone, Default)]
    struct FakeHost(Arc<StdMutex<HostState>>);

    impl FakeHost {
        fn emit(&self, bytes: &[u8]) {
            let state = self.0.lock().unwrap();
            if let Some(ref tx) = state.sender {
                tx.send(AudioChunk::new(bytes.to_vec())).unwrap();
            }
        }

        fn opens(&self) -> usize {
            self.0.lock().unwrap().opens
        }

        fn live_tracks(&self) -> usize {
            self.0.lock().unwrap().live_tracks
        }

        fn max_live_tracks(&self) -> usize {
            self.0.lock().unwrap().max_live_tracks
        }

        fn handles_live_at_open(&self) -> Vec<usize> {
            self.0.lock().unwrap().handles_live_at_open.clone()
        }
    }

    struct FakeCapture {
        host: FakeHost,
        supported: bool,
        behavior: OpenBehavior,
        tail: Vec<Vec<u8>>,
        fail_stop: bool,
        playback_live: Arc<AtomicUsize>,
    }

    struct FakeStream {
        host: FakeHost,
        tail: Vec<Vec<u8>>,
        fail_stop: bool,
        released: bool,
    }

    #[async_trait]
    impl CaptureCapability for FakeCapture {
        type Stream = FakeStream;

        fn is_supported(&self) -> bool {
            self.supported
        }

        async fn open(&self, chunks: ChunkSender) -> Result<FakeStream, CaptureError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let mut state = self.host.0.lock().unwrap();
            state.opens += 1;
            state
                .handles_live_at_open
                .push(self.playback_live.load(Ordering::SeqCst));
            match self.behavior {
                OpenBehavior::Deny => Err(CaptureError::PermissionDenied("NotAllowedError".into())),
                OpenBehavior::Fail => Err(CaptureError::OpenFailed("device busy".into())),
                OpenBehavior::Grant => {
                    state.sender = Some(chunks);
                    state.live_tracks += 1;
                    state.max_live_tracks = state.max_live_tracks.max(state.live_tracks);
                    Ok(FakeStream {
                        host: self.host.clone(),
                        tail: self.tail.clone(),
                        fail_stop: self.fail_stop,
                        released: false,
                    })
                }
            }
        }
    }

    #[async_trait]
    impl CaptureStream for FakeStream {
        fn mime_type(&self) -> AudioMimeType {
            AudioMimeType::Webm
        }

        async fn stop(&mut self) -> Result<(), CaptureError> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            for bytes in &self.tail {
                self.host.emit(bytes);
            }
            self.host.0.lock().unwrap().sender = None;
            if self.fail_stop {
                return Err(CaptureError::StreamFailed("device unplugged".into()));
            }
            Ok(())
        }

        fn release(&mut self) {
            if !self.released {
                self.released = true;
                self.host.0.lock().unwrap().live_tracks -= 1;
            }
        }

        fn active_tracks(&self) -> usize {
            usize::from(!self.released)
        }
    }

    #[derive(Clone, Default)]
    struct FakePlayback {
        live: Arc<AtomicUsize>,
        registered: Arc<AtomicUsize>,
        released: Arc<StdMutex<Vec<Uuid>>>,
    }

    #[async_trait]
    impl PlaybackHost for FakePlayback {
        async fn register(&self, _artifact: &AudioArtifact) -> Result<PlaybackHandle, PlaybackError> {
            self.live.fetch_add(1, Ordering::SeqCst);
            self.registered.fetch_add(1, Ordering::SeqCst);
            let id = Uuid::new_v4();
            Ok(PlaybackHandle::new(id, PathBuf::from(format!("/tmp/{}.webm", id))))
        }

        async fn release(&self, handle: PlaybackHandle) -> Result<(), PlaybackError> {
            self.live.fetch_sub(1, Ordering::SeqCst);
            self.released.lock().unwrap().push(handle.id());
            Ok(())
        }

        fn live_handles(&self) -> usize {
            self.live.load(Ordering::SeqCst)
        }
    }

    type Completions = Arc<StdMutex<Vec<(AudioArtifact, f64)>>>;

    struct Harness {
        controller: RecordingController<FakeCapture, FakePlayback>,
        host: FakeHost,
        playback: FakePlayback,
        completions: Completions,
        states: Arc<StdMutex<Vec<RecordingState>>>,
    }

    fn harness_with(supported: bool, behavior: OpenBehavior, fail_stop: bool) -> Harness {
        let host = FakeHost::default();
        let playback = FakePlayback::default();
        let capture = FakeCapture {
            host: host.clone(),
            supported,
            behavior,
            tail: vec![vec![0xEE]],
            fail_stop,
            playback_live: Arc::clone(&playback.live),
        };
        let completions: Completions = Arc::default();
        let sink = Arc::clone(&completions);
        let states: Arc<StdMutex<Vec<RecordingState>>> = Arc::default();
        let seen = Arc::clone(&states);
        let controller = RecordingController::new(
            capture,
            playback.clone(),
            Box::new(move |artifact, duration| sink.lock().unwrap().push((artifact, duration))),
        )
        .with_state_observer(Box::new(move |state| seen.lock().unwrap().push(state)));
        Harness {
            controller,
            host,
            playback,
            completions,
            states,
        }
    }

    fn harness() -> Harness {
        harness_with(true, OpenBehavior::Grant, false)
    }

    #[tokio::test(start_paused = true)]
    async fn normal_flow_reaches_stopped() {
        let mut h = harness();
        assert_eq!(h.controller.state(), RecordingState::Idle);

        h.controller.start().await.unwrap();
        assert_eq!(h.controller.state(), RecordingState::Recording);
        assert_eq!(h.controller.active_tracks(), 1);

        h.host.emit(&[1, 2, 3]);
        tokio::time::advance(Duration::from_secs(2)).await;
        h.host.emit(&[4, 5]);

        let state = h.controller.stop().await.unwrap();
        assert_eq!(state, RecordingState::Stopped);
        assert_eq!(h.controller.active_tracks(), 0);
        assert_eq!(h.host.live_tracks(), 0);

        let completions = h.completions.lock().unwrap();
        assert_eq!(completions.len(), 1);
        let (artifact, duration) = &completions[0];
        assert_eq!(artifact.data(), &[1, 2, 3, 4, 5, 0xEE]);
        assert_eq!(artifact.mime_type(), AudioMimeType::Webm);
        assert!(*duration > 0.0);

        assert!(h.controller.playback_handle().is_some());
        assert_eq!(h.playback.live_handles(), 1);
        assert_eq!(
            *h.states.lock().unwrap(),
            vec![
                RecordingState::Acquiring,
                RecordingState::Recording,
                RecordingState::Stopping,
                RecordingState::Stopped,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn duration_spans_recording_start_to_stop_confirmation() {
        let mut h = harness();
        // Acquisition time (20ms in the fake) is not part of the duration.
        h.controller.start().await.unwrap();
        tokio::time::advance(Duration::from_millis(3000)).await;
        h.controller.stop().await.unwrap();

        let completions = h.completions.lock().unwrap();
        // 3000ms recording + 10ms until the host confirms the stop
        assert!((completions[0].1 - 3.010).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn artifact_is_in_order_concatenation_without_empty_chunks() {
        let mut h = harness();
        h.controller.start().await.unwrap();
        h.host.emit(&[10]);
        h.host.emit(&[]);
        h.host.emit(&[20, 21]);
        assert_eq!(h.controller.poll_chunks(), 3);
        h.host.emit(&[30]);
        h.controller.stop().await.unwrap();

        let completions = h.completions.lock().unwrap();
        assert_eq!(completions[0].0.data(), &[10, 20, 21, 30, 0xEE]);
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_host_fails_immediately() {
        let mut h = harness_with(false, OpenBehavior::Grant, false);
        let err = h.controller.start().await.unwrap_err();

        assert_eq!(err.failure(), Some(&CaptureFailure::CapabilityUnsupported));
        assert_eq!(h.controller.state(), RecordingState::Error);
        assert_eq!(h.host.opens(), 0);
        assert_eq!(h.host.max_live_tracks(), 0);
        assert!(h.completions.lock().unwrap().is_empty());
        assert_eq!(*h.states.lock().unwrap(), vec![RecordingState::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn permission_denied_goes_through_acquiring() {
        let mut h = harness_with(true, OpenBehavior::Deny, false);
        let err = h.controller.start().await.unwrap_err();

        assert_eq!(err.failure(), Some(&CaptureFailure::PermissionDenied));
        assert_eq!(h.controller.last_failure(), Some(&CaptureFailure::PermissionDenied));
        assert_eq!(
            *h.states.lock().unwrap(),
            vec![RecordingState::Acquiring, RecordingState::Error]
        );
        assert!(h.completions.lock().unwrap().is_empty());
        assert_eq!(h.host.live_tracks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn acquisition_failure_is_distinct_from_permission() {
        let mut h = harness_with(true, OpenBehavior::Fail, false);
        let err = h.controller.start().await.unwrap_err();
        assert!(matches!(
            err.failure(),
            Some(CaptureFailure::AcquisitionFailed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_noop_outside_recording() {
        let mut h = harness();
        assert_eq!(h.controller.stop().await.unwrap(), RecordingState::Idle);

        h.controller.start().await.unwrap();
        h.controller.stop().await.unwrap();
        assert_eq!(h.controller.stop().await.unwrap(), RecordingState::Stopped);
        assert_eq!(h.completions.lock().unwrap().len(), 1);

        let mut denied = harness_with(true, OpenBehavior::Deny, false);
        let _ = denied.controller.start().await;
        assert_eq!(denied.controller.stop().await.unwrap(), RecordingState::Error);
    }

    #[tokio::test(start_paused = true)]
    async fn start_while_recording_is_rejected() {
        let mut h = harness();
        h.controller.start().await.unwrap();

        let err = h.controller.start().await.unwrap_err();
        assert!(matches!(err, RecorderError::Busy(RecordingState::Recording)));
        assert_eq!(h.host.opens(), 1);
        assert_eq!(h.host.max_live_tracks(), 1);
        assert_eq!(h.controller.state(), RecordingState::Recording);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_releases_previous_handle_before_acquiring() {
        let mut h = harness();
        h.controller.start().await.unwrap();
        h.controller.stop().await.unwrap();
        let first = h.controller.playback_handle().unwrap().id();

        h.controller.start().await.unwrap();
        assert!(h.controller.playback_handle().is_none());
        assert_eq!(*h.playback.released.lock().unwrap(), vec![first]);
        // No handle was live when the host was asked for the second stream.
        assert_eq!(h.host.handles_live_at_open(), vec![0, 0]);
        assert_eq!(h.host.max_live_tracks(), 1);

        h.controller.stop().await.unwrap();
        assert_eq!(h.completions.lock().unwrap().len(), 2);
        assert_eq!(h.playback.live_handles(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_after_error_is_a_fresh_start() {
        let mut h = harness_with(true, OpenBehavior::Deny, false);
        let _ = h.controller.start().await;
        assert_eq!(h.controller.state(), RecordingState::Error);

        h.controller.capture.behavior = OpenBehavior::Grant;
        h.controller.start().await.unwrap();
        assert_eq!(h.controller.state(), RecordingState::Recording);
        assert!(h.controller.last_failure().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stream_failure_while_stopping_releases_track() {
        let mut h = harness_with(true, OpenBehavior::Grant, true);
        h.controller.start().await.unwrap();
        h.host.emit(&[1]);

        let err = h.controller.stop().await.unwrap_err();
        assert!(matches!(
            err.failure(),
            Some(CaptureFailure::AcquisitionFailed(_))
        ));
        assert_eq!(h.controller.state(), RecordingState::Error);
        assert_eq!(h.host.live_tracks(), 0);
        assert!(h.completions.lock().unwrap().is_empty());
        assert_eq!(h.playback.live_handles(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_toggles_between_start_and_stop() {
        let mut h = harness();
        assert!(h.controller.can_trigger());
        assert_eq!(h.controller.trigger().await.unwrap(), RecordingState::Recording);
        assert_eq!(h.controller.trigger().await.unwrap(), RecordingState::Stopped);
        assert_eq!(h.controller.trigger().await.unwrap(), RecordingState::Recording);
        assert_eq!(h.completions.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_only_while_recording() {
        let mut h = harness();
        assert!(h.controller.elapsed().is_none());
        h.controller.start().await.unwrap();
        tokio::time::advance(Duration::from_millis(1500)).await;
        assert_eq!(h.controller.elapsed(), Some(Duration::from_millis(1500)));
        h.controller.stop().await.unwrap();
        assert!(h.controller.elapsed().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_releases_track_and_handle() {
        let mut h = harness();
        h.controller.start().await.unwrap();
        h.controller.stop().await.unwrap();
        h.controller.start().await.unwrap();
        assert_eq!(h.host.live_tracks(), 1);

        let host = h.host.clone();
        let playback = h.playback.clone();
        h.controller.shutdown().await;
        assert_eq!(host.live_tracks(), 0);
        assert_eq!(playback.live_handles(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_after_stop_releases_handle() {
        let mut h = harness();
        h.controller.start().await.unwrap();
        h.controller.stop().await.unwrap();
        assert_eq!(h.playback.live_handles(), 1);

        let playback = h.playback.clone();
        h.controller.shutdown().await;
        assert_eq!(playback.live_handles(), 0);
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        Start,
        Stop,
        Emit,
    }

    fn sequences(max_len: usize) -> Vec<Vec<Step>> {
        let steps = [Step::Start, Step::Stop, Step::Emit];
        let mut all: Vec<Vec<Step>> = vec![vec![]];
        let mut frontier: Vec<Vec<Step>> = vec![vec![]];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|seq| {
                    steps.iter().map(move |&step| {
                        let mut next = seq.clone();
                        next.push(step);
                        next
                    })
                })
                .collect();
            all.extend(frontier.iter().cloned());
        }
        all
    }

    #[tokio::test(start_paused = true)]
    async fn every_short_sequence_holds_at_most_one_track() {
        let all = sequences(5);
        assert_eq!(all.len(), 364);

        for seq in all {
            let mut h = harness();
            let mut stops = 0;
            for step in &seq {
                match step {
                    Step::Start => {
                        let was = h.controller.state();
                        let result = h.controller.start().await;
                        assert_eq!(result.is_ok(), was.accepts_start(), "{:?}", seq);
                    }
                    Step::Stop => {
                        let was = h.controller.state();
                        let state = h.controller.stop().await.unwrap();
                        if was == RecordingState::Recording {
                            assert_eq!(state, RecordingState::Stopped, "{:?}", seq);
                            stops += 1;
                        } else {
                            assert_eq!(state, was, "{:?}", seq);
                        }
                    }
                    Step::Emit => h.host.emit(&[1]),
                }
                assert!(h.host.live_tracks() <= 1, "{:?}", seq);
                assert_eq!(h.controller.active_tracks(), h.host.live_tracks(), "{:?}", seq);
                assert!(h.playback.live_handles() <= 1, "{:?}", seq);
            }

            assert!(h.host.max_live_tracks() <= 1, "{:?}", seq);
            assert_eq!(h.completions.lock().unwrap().len(), stops, "{:?}", seq);
            assert_eq!(h.playback.registered.load(Ordering::SeqCst), stops, "{:?}", seq);
        }
    }
}
