//! Configuration management via environment variables
//!
//! Provides helpers for reading environment variables and builds the
//! environment layer of [`ProbeConfig`]. CLI flags are applied on top of this
//! in `cli.rs`.

use std::path::PathBuf;
use std::str::FromStr;

use slotwatch_common::config::ProbeConfig;

/// Reference endpoint URL
pub const ENV_REFERENCE_URL: &str = "SLOTWATCH_REFERENCE_URL";
/// Name used for the reference in lag lines
pub const ENV_REFERENCE_LABEL: &str = "SLOTWATCH_REFERENCE_LABEL";
/// Endpoint list file
pub const ENV_NODES: &str = "SLOTWATCH_NODES";
/// Lag log file
pub const ENV_LOG_FILE: &str = "SLOTWATCH_LOG_FILE";
/// Lag threshold in slots
pub const ENV_LAG_THRESHOLD: &str = "SLOTWATCH_LAG_THRESHOLD";
/// Poll interval in seconds
pub const ENV_INTERVAL_SECS: &str = "SLOTWATCH_INTERVAL_SECS";
/// Request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "SLOTWATCH_TIMEOUT_SECS";
/// Concurrent fetch limit
pub const ENV_MAX_CONCURRENCY: &str = "SLOTWATCH_MAX_CONCURRENCY";
/// Disable clearing the terminal between ticks
pub const ENV_NO_CLEAR: &str = "SLOTWATCH_NO_CLEAR";

/// Get a non-empty environment variable
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Get an environment variable, falling back to a second name
///
/// # Example
/// ```
/// use slotwatch::config::get_env_with_fallback;
///
/// let level = get_env_with_fallback("SLOTWATCH_LOG_LEVEL", "RUST_LOG");
/// ```
pub fn get_env_with_fallback(name: &str, fallback: &str) -> Option<String> {
    get_env(name).or_else(|| get_env(fallback))
}

/// Get an environment variable, parsing to a specific type
///
/// Unset variables yield `default`. Unparseable values also yield `default`
/// and log a warning.
pub fn get_env_parse<T: FromStr>(name: &str, default: T) -> T {
    match get_env(name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Environment variable '{}' has invalid value '{}', using default",
                    name,
                    raw
                );
                default
            }
        },
        None => default,
    }
}

/// Get a boolean flag (`true/1/yes/on`)
pub fn get_env_flag(name: &str) -> bool {
    get_env(name)
        .map(|value| {
            matches!(
                value.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}

/// Build a [`ProbeConfig`] from defaults overridden by `SLOTWATCH_*` variables
pub fn probe_config_from_env() -> ProbeConfig {
    let defaults = ProbeConfig::default();

    ProbeConfig {
        reference_url: get_env(ENV_REFERENCE_URL).unwrap_or(defaults.reference_url),
        reference_label: get_env(ENV_REFERENCE_LABEL).unwrap_or(defaults.reference_label),
        nodes_path: get_env(ENV_NODES)
            .map(PathBuf::from)
            .unwrap_or(defaults.nodes_path),
        log_path: get_env(ENV_LOG_FILE)
            .map(PathBuf::from)
            .unwrap_or(defaults.log_path),
        lag_threshold: get_env_parse(ENV_LAG_THRESHOLD, defaults.lag_threshold),
        poll_interval_secs: get_env_parse(ENV_INTERVAL_SECS, defaults.poll_interval_secs),
        request_timeout_secs: get_env_parse(ENV_TIMEOUT_SECS, defaults.request_timeout_secs),
        max_concurrency: get_env_parse(ENV_MAX_CONCURRENCY, defaults.max_concurrency),
        clear_screen: defaults.clear_screen && !get_env_flag(ENV_NO_CLEAR),
    }
}
