//! CLI presenter for output formatting
//!
//! Status, progress and guidance go to stderr. Stdout carries only the
//! result (human-readable or JSON).

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::PracticeResult;
use crate::domain::recording::{CaptureFailure, Duration};
use crate::domain::scoring::{MAX_SCORE, SCORING_DIMENSIONS};
use crate::infrastructure::capture::InputDeviceInfo;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        eprintln!("{} {}", "ℹ".cyan(), message);
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", "✓".green(), message);
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Format recording progress bar
    pub fn format_progress(&self, elapsed_ms: u64, total_ms: u64) -> String {
        let elapsed_secs = elapsed_ms / 1000;
        let total_secs = total_ms / 1000;
        let percent = if total_ms > 0 {
            (elapsed_ms as f64 / total_ms as f64 * 100.0).min(100.0)
        } else {
            0.0
        };

        let bar_width = 20;
        let filled = ((percent / 100.0) * bar_width as f64) as usize;
        let empty = bar_width - filled;

        format!(
            "[{}{}] {:>3}s / {}s",
            "█".repeat(filled).cyan(),
            "░".repeat(empty),
            elapsed_secs,
            total_secs
        )
    }

    /// Update recording progress
    pub fn update_recording_progress(&self, elapsed: std::time::Duration, limit: Duration) {
        let progress = self.format_progress(elapsed.as_millis() as u64, limit.as_millis());
        let left = limit.remaining(elapsed).as_secs();
        self.update_spinner(&format!(
            "Recording... {}  {}s left, Enter to stop",
            progress, left
        ));
    }

    /// What the user can do about a capture failure
    pub fn capture_guidance(failure: &CaptureFailure) -> &'static str {
        match failure {
            CaptureFailure::CapabilityUnsupported => {
                "No audio input is available on this system. Connect a microphone and check `speakprep devices`."
            }
            CaptureFailure::PermissionDenied => {
                "Microphone access was refused. Allow microphone access for this terminal in your system settings and try again."
            }
            CaptureFailure::AcquisitionFailed(_) => {
                "The microphone could not be used. Make sure no other application holds it, or pick another device with `speakprep config set input_device <NAME>`."
            }
        }
    }

    /// Report a capture failure with guidance
    pub fn capture_failure(&self, failure: &CaptureFailure) {
        self.error(&format!("Recording failed: {}", failure));
        eprintln!("  {}", Self::capture_guidance(failure).dimmed());
    }

    /// Format the score line, e.g. "21 / 30"
    pub fn format_score(score: u8) -> String {
        let text = format!("{} / {}", score, MAX_SCORE);
        let ratio = f64::from(score) / f64::from(MAX_SCORE);
        if ratio >= 0.8 {
            text.green().bold().to_string()
        } else if ratio >= 0.6 {
            text.yellow().bold().to_string()
        } else {
            text.red().bold().to_string()
        }
    }

    /// Print the practice result to stdout
    pub fn practice_result(&self, result: &PracticeResult) {
        println!("{}", "Your answer".bold());
        println!("  {} {:.1}s ({})", "Length:".cyan(), result.duration_secs, result.answer.human_readable_size());
        println!("  {} {}", "Transcript:".cyan(), result.transcript);
        println!();
        println!("{} {}", "Score:".bold(), Self::format_score(result.score.score()));
        println!("  {} {}", "Rated on:".cyan(), SCORING_DIMENSIONS.join(", "));
        println!("  {}", result.score.feedback());
        if let Some(url) = &result.remote_url {
            println!();
            println!("{} {}", "Saved to:".cyan(), url);
        }
    }

    /// Print the practice result as JSON to stdout
    pub fn practice_json(&self, result: &PracticeResult) -> Result<(), serde_json::Error> {
        let json = serde_json::to_string_pretty(&result.summary())?;
        println!("{}", json);
        Ok(())
    }

    /// Print the input device list
    pub fn device_list(&self, devices: &[InputDeviceInfo]) {
        if devices.is_empty() {
            self.warn("No input devices found");
            return;
        }
        for device in devices {
            let marker = if device.is_default { "*".green().to_string() } else { " ".to_string() };
            let format = match (device.sample_rate, device.channels) {
                (Some(rate), Some(channels)) => format!("{} Hz, {} ch", rate, channels),
                _ => "format unknown".to_string(),
            };
            println!("{} {} {}", marker, device.name, format!("({})", format).dimmed());
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
