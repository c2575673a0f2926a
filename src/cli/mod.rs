//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, stop-signal handling,
//! and the practice round runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_devices, run_practice, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, PracticeOptions};
pub use presenter::Presenter;
