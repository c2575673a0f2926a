//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = config_value(&config, key);
    presenter.output(value.as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Current value of a key as displayed by `get` and `list`
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "user_id" => config.user_id.clone(),
        "app_id" => config.app_id.clone(),
        "input_device" => config.input_device.clone(),
        "max_duration" => config.max_duration.clone(),
        "upload" => config.upload.map(|b| b.to_string()),
        "playback" => config.playback.map(|b| b.to_string()),
        "storage_dir" => config.storage_dir.clone(),
        "log_level" => config.log_level.clone(),
        "transcription_delay_ms" => config.transcription_delay_ms.map(|ms| ms.to_string()),
        _ => None,
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "user_id" | "app_id" => {
            if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
                return Err(invalid(key, "Value must be a plain name without slashes"));
            }
            let value = Some(value.to_string());
            if key == "user_id" {
                config.user_id = value;
            } else {
                config.app_id = value;
            }
        }
        "input_device" => config.input_device = Some(value.to_string()),
        "max_duration" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            config.max_duration = Some(value.to_string());
        }
        "upload" => config.upload = Some(parse_bool(key, value)?),
        "playback" => config.playback = Some(parse_bool(key, value)?),
        "storage_dir" => config.storage_dir = Some(value.to_string()),
        "log_level" => {
            tracing_subscriber::EnvFilter::try_new(value)
                .map_err(|e| invalid(key, format!("Invalid log filter: {}", e)))?;
            config.log_level = Some(value.to_string());
        }
        "transcription_delay_ms" => {
            let ms = value
                .parse::<u64>()
                .map_err(|_| invalid(key, "Value must be a whole number of milliseconds"))?;
            config.transcription_delay_ms = Some(ms);
        }
        _ => return Err(invalid(key, "Unknown key")),
    }
    Ok(())
}

/// Parse a boolean value
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(invalid(key, "Value must be 'true' or 'false'")),
    }
}
