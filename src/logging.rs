//! Structured logging using the tracing crate.
//!
//! Diagnostics go to stderr so stdout stays clean for `--json` output.
//! The filter comes from `RUST_LOG` when set, otherwise from the
//! configured `log_level`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Build the filter, preferring `RUST_LOG` over the configured level.
/// An unparsable level falls back to `warn`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(crate::domain::config::DEFAULT_LOG_LEVEL))
}

/// Initializes the global subscriber.
///
/// # Errors
/// If a global subscriber has already been installed
pub fn init_logging(
    default_level: &str,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .try_init()?;

    tracing::debug!(level = default_level, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_level_falls_back() {
        // Must not panic on garbage input
        let _ = env_filter("definitely[not a filter");
    }

    #[test]
    fn second_init_fails() {
        let _ = init_logging("warn");
        assert!(init_logging("warn").is_err());
    }
}
