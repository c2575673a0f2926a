//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Default application id used in upload paths
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Default artificial latency of the mock transcriber
pub const DEFAULT_TRANSCRIPTION_DELAY_MS: u64 = 1500;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub user_id: Option<String>,
    pub app_id: Option<String>,
    pub input_device: Option<String>,
    pub max_duration: Option<String>,
    pub upload: Option<bool>,
    pub playback: Option<bool>,
    pub storage_dir: Option<String>,
    pub log_level: Option<String>,
    pub transcription_delay_ms: Option<u64>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            user_id: None,
            app_id: Some(DEFAULT_APP_ID.to_string()),
            input_device: None,
            max_duration: Some("60s".to_string()),
            upload: Some(false),
            playback: Some(true),
            storage_dir: None,
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            transcription_delay_ms: Some(DEFAULT_TRANSCRIPTION_DELAY_MS),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            user_id: other.user_id.or(self.user_id),
            app_id: other.app_id.or(self.app_id),
            input_device: other.input_device.or(self.input_device),
            max_duration: other.max_duration.or(self.max_duration),
            upload: other.upload.or(self.upload),
            playback: other.playback.or(self.playback),
            storage_dir: other.storage_dir.or(self.storage_dir),
            log_level: other.log_level.or(self.log_level),
            transcription_delay_ms: other.transcription_delay_ms.or(self.transcription_delay_ms),
        }
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    pub fn app_id_or_default(&self) -> &str {
        self.app_id.as_deref().unwrap_or(DEFAULT_APP_ID)
    }

    pub fn upload_or_default(&self) -> bool {
        self.upload.unwrap_or(false)
    }

    pub fn playback_or_default(&self) -> bool {
        self.playback.unwrap_or(true)
    }

    pub fn log_level_or_default(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn transcription_delay_or_default(&self) -> std::time::Duration {
        std::time::Duration::from_millis(
            self.transcription_delay_ms
                .unwrap_or(DEFAULT_TRANSCRIPTION_DELAY_MS),
        )
    }
}
