//! Command-line interface
//!
//! Flags override the `SLOTWATCH_*` environment layer built by
//! [`crate::config::probe_config_from_env`].

use std::path::PathBuf;

use clap::Parser;
use slotwatch_common::config::ProbeConfig;

use crate::report::OutputFormat;

/// Solana slot lag monitor - compares RPC endpoints against a reference node
#[derive(Parser, Debug, Clone)]
#[command(name = "slotwatch")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    SLOTWATCH_REFERENCE_URL     Reference RPC URL (default: https://api.mainnet-beta.solana.com)
    SLOTWATCH_REFERENCE_LABEL   Reference name in lag lines (default: mainnet)
    SLOTWATCH_NODES             Endpoint list file (default: nodes.txt)
    SLOTWATCH_LOG_FILE          Lag log file (default: behind.log)
    SLOTWATCH_LAG_THRESHOLD     Log when lag exceeds this many slots (default: 4)
    SLOTWATCH_INTERVAL_SECS     Poll interval in seconds (default: 3)
    SLOTWATCH_TIMEOUT_SECS      Per-request timeout in seconds (default: 2)
    SLOTWATCH_MAX_CONCURRENCY   Concurrent fetch limit (default: 16)
    SLOTWATCH_NO_CLEAR          Do not clear the terminal between ticks
    SLOTWATCH_LOG_LEVEL         Log level (default: info, falls back to RUST_LOG)
    SLOTWATCH_LOG_DIR           Also write diagnostics to a daily file in this directory
"#)]
pub struct Cli {
    /// Endpoint list file, one URL per line
    #[arg(short, long, value_name = "FILE")]
    pub nodes: Option<PathBuf>,

    /// Reference RPC URL
    #[arg(short, long, value_name = "URL")]
    pub reference_url: Option<String>,

    /// Reference name used in lag lines
    #[arg(long, value_name = "NAME")]
    pub reference_label: Option<String>,

    /// Lag log file
    #[arg(short, long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log an endpoint when its lag exceeds this many slots
    #[arg(short, long, value_name = "SLOTS")]
    pub threshold: Option<i64>,

    /// Seconds between ticks
    #[arg(short, long, value_name = "SECS")]
    pub interval_secs: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum concurrent fetches per tick
    #[arg(long, value_name = "N")]
    pub max_concurrency: Option<usize>,

    /// Do not clear the terminal between ticks
    #[arg(long)]
    pub no_clear: bool,

    /// Run a single tick and exit
    #[arg(long)]
    pub once: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Overlay flags that were given on top of `config`
    pub fn apply(&self, mut config: ProbeConfig) -> ProbeConfig {
        if let Some(path) = &self.nodes {
            config.nodes_path = path.clone();
        }
        if let Some(url) = &self.reference_url {
            config.reference_url = url.clone();
        }
        if let Some(label) = &self.reference_label {
            config.reference_label = label.clone();
        }
        if let Some(path) = &self.log_file {
            config.log_path = path.clone();
        }
        if let Some(threshold) = self.threshold {
            config.lag_threshold = threshold;
        }
        if let Some(secs) = self.interval_secs {
            config.poll_interval_secs = secs;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(n) = self.max_concurrency {
            config.max_concurrency = n;
        }
        if self.no_clear {
            config.clear_screen = false;
        }
        config
    }
}
