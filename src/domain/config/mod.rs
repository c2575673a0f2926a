//! Configuration domain module

mod app_config;

pub use app_config::{
    AppConfig, DEFAULT_APP_ID, DEFAULT_LOG_LEVEL, DEFAULT_TRANSCRIPTION_DELAY_MS,
};
