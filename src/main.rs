//! SpeakPrep CLI entry point

use std::process::ExitCode;

use clap::Parser;

use speakprep::cli::{
    app::{load_merged_config, run_devices, run_practice, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    PracticeOptions,
};
use speakprep::domain::config::AppConfig;
use speakprep::domain::recording::Duration;
use speakprep::infrastructure::XdgConfigStore;
use speakprep::logging::init_logging;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Build CLI config from args
    let cli_config = AppConfig {
        user_id: cli.user_id.clone(),
        max_duration: cli.max_duration.clone(),
        upload: if cli.upload { Some(true) } else { None },
        playback: if cli.no_playback { Some(false) } else { None },
        ..Default::default()
    };

    // Merge config
    let (config, config_problem) = load_merged_config(cli_config).await;

    if let Err(e) = init_logging(config.log_level_or_default()) {
        presenter.warn(&format!("Logging disabled: {}", e));
    }
    if let Some(problem) = config_problem {
        presenter.warn(&problem);
    }

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Devices) => return run_devices(&presenter),
        None => {}
    }

    // Parse max duration
    let max_duration = match config.max_duration.as_ref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&format!("Invalid max-duration: {}", e));
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_max_duration(),
    };

    let options = PracticeOptions {
        max_duration,
        upload: config.upload_or_default(),
        user_id: config.user_id.clone(),
        app_id: config.app_id_or_default().to_string(),
        input_device: config.input_device.clone(),
        playback: config.playback_or_default(),
        json: cli.json,
        storage_dir: config.storage_dir.clone(),
        transcription_delay: config.transcription_delay_or_default(),
    };

    run_practice(options).await
}
