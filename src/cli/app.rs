//! Practice round runner

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ports::{AudioPlayer, CaptureCapability, ConfigStore, PlaybackHost};
use crate::application::{
    CompletionCallback, PracticeConfig, PracticeUseCase, RecorderError, RecordingController,
};
use crate::domain::audio::AudioArtifact;
use crate::domain::config::AppConfig;
use crate::domain::recording::{Duration, RecordingState};
use crate::infrastructure::capture::list_input_devices;
use crate::infrastructure::{
    CpalCapture, Credentials, EchoSampleGenerator, LocalArtifactStore, MockTranscriber,
    RandomScorer, RodioPlayer, StorageClient, TempFilePlaybackHost, XdgConfigStore,
};

use super::args::PracticeOptions;
use super::presenter::Presenter;
use super::signals::{StopRequest, StopSignals};

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Environment variable supplying the user id
pub const USER_ID_ENV: &str = "SPEAKPREP_USER_ID";

/// Environment variable supplying the storage auth token
pub const AUTH_TOKEN_ENV: &str = "SPEAKPREP_AUTH_TOKEN";

/// How often the recording progress line refreshes
const PROGRESS_TICK: std::time::Duration = std::time::Duration::from_millis(100);

type Controller = RecordingController<CpalCapture, TempFilePlaybackHost>;

/// Run one practice round: record, evaluate, present, play back
pub async fn run_practice(options: PracticeOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let client = match connect_storage(&options) {
        Ok(client) => client,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let (mut signals, _signal_tx) = match StopSignals::new(true) {
        Ok(pair) => pair,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let capture = match &options.input_device {
        Some(name) => CpalCapture::with_device(name.clone()),
        None => CpalCapture::new(),
    };
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<(AudioArtifact, f64)>();
    let on_complete: CompletionCallback =
        Box::new(move |artifact: AudioArtifact, duration_secs: f64| {
            let _ = done_tx.send((artifact, duration_secs));
        });
    let mut controller: Controller =
        RecordingController::new(capture, TempFilePlaybackHost::new(), on_complete)
            .with_state_observer(Box::new(|state: RecordingState| {
                debug!(%state, "recording state changed")
            }));

    // Record
    presenter.start_spinner("Waiting for microphone...");
    if let Err(e) = start_recording(&mut controller, &mut signals).await {
        presenter.stop_spinner();
        report_recorder_error(&presenter, &e);
        controller.shutdown().await;
        return ExitCode::from(EXIT_ERROR);
    }

    let end = record_until_stopped(
        &mut controller,
        &mut signals,
        &presenter,
        options.max_duration,
    )
    .await;
    debug!(?end, "recording loop finished");

    match controller.stop().await {
        Ok(RecordingState::Stopped) => {}
        Ok(state) => {
            presenter.spinner_fail(&format!("Recording ended in state {}", state));
            controller.shutdown().await;
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            report_recorder_error(&presenter, &e);
            controller.shutdown().await;
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let Ok((answer, duration_secs)) = done_rx.try_recv() else {
        presenter.spinner_fail("Recording produced no result");
        controller.shutdown().await;
        return ExitCode::from(EXIT_ERROR);
    };
    presenter.spinner_success(&format!(
        "Recorded {:.1}s ({})",
        duration_secs,
        answer.human_readable_size()
    ));
    if answer.is_empty() {
        presenter.warn("No audio was captured");
    }

    // Evaluate
    let user_id = options
        .user_id
        .clone()
        .unwrap_or_else(|| client.uid().to_string());
    let use_case = PracticeUseCase::new(
        MockTranscriber::new(options.transcription_delay),
        RandomScorer::new(),
        EchoSampleGenerator::default(),
        LocalArtifactStore::new(client),
        PracticeConfig {
            upload: options.upload,
            user_id,
        },
    );

    presenter.start_spinner("Scoring your answer...");
    signals.drain();
    let result = tokio::select! {
        result = use_case.evaluate(answer, duration_secs) => result,
        _ = next_cancel(&mut signals) => {
            presenter.spinner_fail("Cancelled");
            controller.shutdown().await;
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let result = match result {
        Ok(result) => {
            presenter.spinner_success("Answer scored");
            result
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            controller.shutdown().await;
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Present
    if options.json {
        if let Err(e) = presenter.practice_json(&result) {
            presenter.error(&format!("Failed to serialize result: {}", e));
            controller.shutdown().await;
            return ExitCode::from(EXIT_ERROR);
        }
    } else {
        presenter.practice_result(&result);
        if let Some(handle) = controller.playback_handle() {
            presenter.info(&format!("Recording available at {}", handle.uri()));
        }
    }
    if options.upload && result.remote_url.is_none() {
        presenter.warn("Upload failed; the answer was not saved");
    }

    // Play back
    if options.playback {
        let player = RodioPlayer::new();
        presenter.info("Playing your answer (Ctrl-C to skip)");
        play(&player, &result.answer, &mut signals, &presenter).await;

        match &result.sample {
            Some(sample) => {
                presenter.info("Playing the AI sample (Ctrl-C to skip)");
                play(&player, sample, &mut signals, &presenter).await;
            }
            None => presenter.warn("AI sample is not available"),
        }
    }

    controller.shutdown().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Why the recording loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordingEnd {
    MaxDuration,
    Requested(Option<StopRequest>),
}

/// Start the controller, then forget stop requests made while the
/// microphone was being acquired.
async fn start_recording<C, P>(
    controller: &mut RecordingController<C, P>,
    signals: &mut StopSignals,
) -> Result<(), RecorderError>
where
    C: CaptureCapability,
    P: PlaybackHost,
{
    controller.start().await?;
    signals.drain();
    Ok(())
}

/// Show progress until Enter, a signal, or the max duration
async fn record_until_stopped<C, P>(
    controller: &mut RecordingController<C, P>,
    signals: &mut StopSignals,
    presenter: &Presenter,
    limit: Duration,
) -> RecordingEnd
where
    C: CaptureCapability,
    P: PlaybackHost,
{
    let deadline = tokio::time::sleep(limit.as_std());
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(PROGRESS_TICK);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                debug!(max = %limit, "max duration reached");
                presenter.update_spinner("Max duration reached, stopping...");
                return RecordingEnd::MaxDuration;
            }
            request = signals.recv() => {
                debug!(?request, "stop requested");
                presenter.update_spinner("Stopping...");
                return RecordingEnd::Requested(request);
            }
            _ = ticker.tick() => {
                controller.poll_chunks();
                let elapsed = controller.elapsed().unwrap_or_default();
                presenter.update_recording_progress(elapsed, limit);
            }
        }
    }
}

/// Resolve on the next Ctrl-C or SIGTERM, ignoring Enter
async fn next_cancel(signals: &mut StopSignals) {
    loop {
        match signals.recv().await {
            Some(request) if request.is_cancel() => return,
            Some(_) => continue,
            None => std::future::pending::<()>().await,
        }
    }
}

async fn play(
    player: &RodioPlayer,
    artifact: &AudioArtifact,
    signals: &mut StopSignals,
    presenter: &Presenter,
) {
    signals.drain();
    tokio::select! {
        played = player.play(artifact) => {
            if let Err(e) = played {
                presenter.warn(&format!("Playback failed: {}", e));
            }
        }
        _ = next_cancel(signals) => presenter.info("Skipped"),
    }
}

fn report_recorder_error(presenter: &Presenter, err: &RecorderError) {
    match err.failure() {
        Some(failure) => presenter.capture_failure(failure),
        None => presenter.error(&err.to_string()),
    }
}

/// Sign in to storage with the env token, or anonymously
fn connect_storage(options: &PracticeOptions) -> Result<StorageClient, String> {
    let root = options
        .storage_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_storage_dir);
    let credentials = match env::var(AUTH_TOKEN_ENV) {
        Ok(token) if !token.is_empty() => Credentials::Token(token),
        _ => Credentials::Anonymous,
    };

    StorageClient::connect(root, options.app_id.clone(), credentials)
        .map_err(|e| format!("Failed to initialize storage: {}", e))
}

/// `$XDG_DATA_HOME/speakprep`
pub fn default_storage_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speakprep")
}

/// Print the input devices
pub fn run_devices(presenter: &Presenter) -> ExitCode {
    match list_input_devices() {
        Ok(devices) => {
            presenter.device_list(&devices);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration from file, env, and CLI.
///
/// An unreadable config file is skipped; the second value describes why,
/// for the caller to report once output is set up.
pub async fn load_merged_config(cli_config: AppConfig) -> (AppConfig, Option<String>) {
    let store = XdgConfigStore::new();
    let (file_config, file_problem) = match store.load().await {
        Ok(config) => (config, None),
        Err(e) => {
            let problem = format!("Ignoring config file {}: {}", store.path().display(), e);
            (AppConfig::empty(), Some(problem))
        }
    };

    let env_config = AppConfig {
        user_id: env::var(USER_ID_ENV).ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    let config = AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config);
    (config, file_problem)
}
