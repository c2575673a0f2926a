//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// SpeakPrep - speaking practice recorder
#[derive(Parser, Debug)]
#[command(name = "speakprep")]
#[command(version)]
#[command(about = "Record a spoken answer, get a mock score, and hear it back")]
#[command(long_about = None)]
pub struct Cli {
    /// Stop recording automatically after this long (e.g., 45s, 1m, 2m30s)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_duration: Option<String>,

    /// Upload the answer to the artifact store
    #[arg(short = 'u', long)]
    pub upload: bool,

    /// User id for uploads (overrides SPEAKPREP_USER_ID and config)
    #[arg(long, value_name = "ID")]
    pub user_id: Option<String>,

    /// Skip playing the recording and the AI sample
    #[arg(long)]
    pub no_playback: bool,

    /// Print the result as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// List audio input devices
    Devices,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed options for one practice round
#[derive(Debug, Clone)]
pub struct PracticeOptions {
    pub max_duration: Duration,
    pub upload: bool,
    pub user_id: Option<String>,
    pub app_id: String,
    pub input_device: Option<String>,
    pub playback: bool,
    pub json: bool,
    pub storage_dir: Option<String>,
    pub transcription_delay: std::time::Duration,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "user_id",
    "app_id",
    "input_device",
    "max_duration",
    "upload",
    "playback",
    "storage_dir",
    "log_level",
    "transcription_delay_ms",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
