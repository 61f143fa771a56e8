//! Solana slot lag monitor
//!
//! Polls a list of Solana JSON-RPC endpoints alongside a reference node,
//! reports how many slots each endpoint trails the reference, and appends a
//! line to the lag log when an endpoint falls too far behind.

#![warn(missing_docs)]

/// Lag log (append-only file)
pub mod behind_log;
/// Command-line interface
pub mod cli;
/// Environment configuration
pub mod config;
/// Error types
pub mod error;
/// Lag arithmetic
pub mod lag;
/// Logging initialization
pub mod logging;
/// Poll loop
pub mod monitor;
/// Endpoint list loading
pub mod nodes;
/// Status display
pub mod report;
/// JSON-RPC transport and response decoding
pub mod rpc;
/// Graceful shutdown
pub mod shutdown;
