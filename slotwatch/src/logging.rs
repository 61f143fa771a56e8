//! Logging initialization
//!
//! Diagnostics go to stderr so stdout carries only the status display.
//! Setting `SLOTWATCH_LOG_DIR` additionally writes a daily rolling file.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{get_env, get_env_with_fallback};

/// Log level variable (falls back to `RUST_LOG`)
pub const ENV_LOG_LEVEL: &str = "SLOTWATCH_LOG_LEVEL";
/// Directory for rolling diagnostic log files
pub const ENV_LOG_DIR: &str = "SLOTWATCH_LOG_DIR";

const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_FILE_PREFIX: &str = "slotwatch.log";

/// Filter directive from the environment, defaulting to `info`
pub fn log_filter_directive() -> String {
    get_env_with_fallback(ENV_LOG_LEVEL, "RUST_LOG")
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Install the global subscriber
///
/// The returned guard (present when file logging is enabled) must be held
/// until exit so buffered lines are flushed.
pub fn init() -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_new(log_filter_directive())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    match get_env(ENV_LOG_DIR) {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_log_filter_directive_default() {
        std::env::remove_var(ENV_LOG_LEVEL);
        std::env::remove_var("RUST_LOG");
        assert_eq!(log_filter_directive(), "info");
    }

    #[test]
    #[serial]
    fn test_log_filter_directive_prefers_own_variable() {
        std::env::set_var(ENV_LOG_LEVEL, "debug");
        std::env::set_var("RUST_LOG", "warn");
        assert_eq!(log_filter_directive(), "debug");

        std::env::remove_var(ENV_LOG_LEVEL);
        assert_eq!(log_filter_directive(), "warn");

        std::env::remove_var("RUST_LOG");
    }
}
