//! RPC access to chain nodes
//!
//! `client` sends the probe batch over HTTP, `parser` turns the raw batch
//! response into slot and block height values.

pub mod client;
pub mod parser;

use async_trait::async_trait;
use slotwatch_common::types::Endpoint;

use crate::error::FetchError;

pub use client::RpcClient;
pub use parser::{decode_probe, parse_values, DecodedProbe};

/// Source of raw probe responses
///
/// Implemented by [`RpcClient`] for real endpoints; the poll loop only depends
/// on this trait so it can be driven by in-memory fakes in tests.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Send the probe batch to `endpoint` and return the raw response body
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError>;
}
