//! Microphone capture using cpal
//!
//! Each session gets a dedicated thread that owns the `cpal::Stream`
//! (the stream is not `Send`). The input callback downmixes to mono and
//! forwards every buffer as a little-endian 16-bit PCM chunk.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{
    BuildStreamError, PlayStreamError, SampleFormat, SampleRate, StreamConfig,
    SupportedStreamConfigsError,
};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::application::ports::{CaptureCapability, CaptureError, CaptureStream, ChunkSender};
use crate::domain::audio::{AudioChunk, AudioMimeType};

/// Preferred capture rate for speech
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Information about one input device
#[derive(Debug, Clone)]
pub struct InputDeviceInfo {
    pub name: String,
    pub is_default: bool,
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

/// List the host's input devices
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let default_name = host.default_input_device().and_then(|d| d.name().ok());
    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::OpenFailed(format!("Failed to enumerate devices: {}", e)))?;

    Ok(devices
        .filter_map(|device| {
            let name = device.name().ok()?;
            let config = device.default_input_config().ok();
            Some(InputDeviceInfo {
                is_default: default_name.as_deref() == Some(name.as_str()),
                sample_rate: config.as_ref().map(|c| c.sample_rate().0),
                channels: config.as_ref().map(|c| c.channels()),
                name,
            })
        })
        .collect())
}

/// Capture capability backed by the default cpal host
#[derive(Debug, Clone, Default)]
pub struct CpalCapture {
    /// Input device to use; the host default when unset
    device_name: Option<String>,
}

impl CpalCapture {
    /// Capture from the default input device
    pub fn new() -> Self {
        Self { device_name: None }
    }

    /// Capture from a named input device
    pub fn with_device(name: impl Into<String>) -> Self {
        Self {
            device_name: Some(name.into()),
        }
    }

    fn find_device(name: Option<&str>) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        match name {
            None => host.default_input_device().ok_or(CaptureError::Unsupported),
            Some(wanted) => host
                .input_devices()
                .map_err(|e| CaptureError::OpenFailed(e.to_string()))?
                .find(|d| d.name().ok().as_deref() == Some(wanted))
                .ok_or_else(|| {
                    CaptureError::OpenFailed(format!("Input device not found: {}", wanted))
                }),
        }
    }

    /// Pick an i16/f32 config, preferring mono and 16kHz
    fn input_config(device: &cpal::Device) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let ranges = device.supported_input_configs().map_err(|e| match e {
            SupportedStreamConfigsError::DeviceNotAvailable => denied(),
            other => CaptureError::OpenFailed(format!("Failed to get configs: {}", other)),
        })?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in ranges {
            if !matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
                continue;
            }
            let has_target = range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE;
            let better = match &best {
                None => true,
                Some(current) => {
                    let current_has_target = current.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                        && current.max_sample_rate().0 >= TARGET_SAMPLE_RATE;
                    range.channels() < current.channels() || (has_target && !current_has_target)
                }
            };
            if better {
                best = Some(range);
            }
        }

        let range = best.ok_or_else(|| CaptureError::OpenFailed("No suitable config found".into()))?;
        let sample_rate = if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        Ok((
            StreamConfig {
                channels: range.channels(),
                sample_rate,
                buffer_size: cpal::BufferSize::Default,
            },
            range.sample_format(),
        ))
    }

    /// Build and start the input stream. Runs on the capture thread.
    fn build_stream(
        device_name: Option<&str>,
        chunks: ChunkSender,
        stream_error: Arc<StdMutex<Option<String>>>,
    ) -> Result<(cpal::Stream, AudioMimeType), CaptureError> {
        let device = Self::find_device(device_name)?;
        let (config, sample_format) = Self::input_config(&device)?;
        let channels = config.channels;
        let mime_type = AudioMimeType::Pcm16 {
            sample_rate: config.sample_rate.0,
            channels: 1,
        };

        let on_error = move |err: cpal::StreamError| {
            warn!(error = %err, "audio stream error");
            if let Ok(mut slot) = stream_error.lock() {
                slot.get_or_insert_with(|| err.to_string());
            }
        };

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let _ = chunks.send(pcm_chunk(data, channels));
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                    let _ = chunks.send(pcm_chunk(&samples, channels));
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::OpenFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| match e {
            BuildStreamError::DeviceNotAvailable => denied(),
            other => CaptureError::OpenFailed(other.to_string()),
        })?;

        stream.play().map_err(|e| match e {
            PlayStreamError::DeviceNotAvailable => denied(),
            other => CaptureError::OpenFailed(other.to_string()),
        })?;

        debug!(
            rate = config.sample_rate.0,
            channels, "capture stream playing"
        );
        Ok((stream, mime_type))
    }
}

/// The host refused the device: on desktop platforms this is how a
/// withheld microphone permission surfaces.
fn denied() -> CaptureError {
    CaptureError::PermissionDenied("input device not available".into())
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Average interleaved frames down to mono
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks(channels as usize)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / frame.len() as i32) as i16
        })
        .collect()
}

fn pcm_chunk(samples: &[i16], channels: u16) -> AudioChunk {
    let mono = downmix(samples, channels);
    let mut bytes = Vec::with_capacity(mono.len() * 2);
    for sample in mono {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    AudioChunk::new(bytes)
}

#[async_trait]
impl CaptureCapability for CpalCapture {
    type Stream = CpalStream;

    fn is_supported(&self) -> bool {
        let host = cpal::default_host();
        host.default_input_device().is_some()
            || host
                .input_devices()
                .map(|mut devices| devices.next().is_some())
                .unwrap_or(false)
    }

    async fn open(&self, chunks: ChunkSender) -> Result<CpalStream, CaptureError> {
        let device_name = self.device_name.clone();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<AudioMimeType, CaptureError>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let stream_error = Arc::new(StdMutex::new(None));
        let error_slot = Arc::clone(&stream_error);
        let live = Arc::new(AtomicBool::new(false));
        let worker_live = Arc::clone(&live);

        // Detached: the thread ends when the stop channel fires or disconnects.
        std::thread::Builder::new()
            .name("speakprep-capture".into())
            .spawn(move || {
                let stream =
                    match CpalCapture::build_stream(device_name.as_deref(), chunks, error_slot) {
                        Ok((stream, mime_type)) => {
                            worker_live.store(true, Ordering::SeqCst);
                            let _ = ready_tx.send(Ok(mime_type));
                            stream
                        }
                        Err(err) => {
                            let _ = ready_tx.send(Err(err));
                            return;
                        }
                    };

                hold_until_stopped(stream, &stop_rx, &worker_live, done_tx);
            })
            .map_err(|e| CaptureError::OpenFailed(format!("Failed to spawn capture thread: {}", e)))?;

        let mime_type = ready_rx
            .await
            .map_err(|_| CaptureError::OpenFailed("Capture thread exited".into()))??;

        Ok(CpalStream {
            mime_type,
            stop_tx: Some(stop_tx),
            done_rx: Some(done_rx),
            stream_error,
            live,
            released: false,
        })
    }
}

/// Body of the capture thread once the stream is playing.
///
/// Blocks until `stop()` sends or `release()` drops the sender. Dropping the
/// stream drops the input callback and its chunk sender; only then is the
/// track reported as gone.
fn hold_until_stopped<S>(
    stream: S,
    stop_rx: &std_mpsc::Receiver<()>,
    live: &AtomicBool,
    done_tx: oneshot::Sender<()>,
) {
    let _ = stop_rx.recv();
    drop(stream);
    live.store(false, Ordering::SeqCst);
    let _ = done_tx.send(());
}

/// Live cpal capture session
pub struct CpalStream {
    mime_type: AudioMimeType,
    stop_tx: Option<std_mpsc::Sender<()>>,
    done_rx: Option<oneshot::Receiver<()>>,
    stream_error: Arc<StdMutex<Option<String>>>,
    /// Set by the capture thread while it owns the `cpal::Stream`
    live: Arc<AtomicBool>,
    released: bool,
}

#[async_trait]
impl CaptureStream for CpalStream {
    fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(done) = self.done_rx.take() {
            done.await
                .map_err(|_| CaptureError::StreamFailed("Capture thread exited".into()))?;
        }
        let stream_error = self.stream_error.lock().ok().and_then(|mut slot| slot.take());
        match stream_error {
            Some(err) => Err(CaptureError::StreamFailed(err)),
            None => Ok(()),
        }
    }

    /// Asynchronous: disconnects the stop channel and returns at once. The
    /// capture thread drops the device stream shortly after, and
    /// `active_tracks` keeps reporting it until then.
    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.stop_tx = None;
        debug!("capture track released");
    }

    fn active_tracks(&self) -> usize {
        usize::from(self.live.load(Ordering::SeqCst))
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        self.release();
    }
}
