//! HTTP JSON-RPC client
//!
//! One POST per endpoint per tick carrying the fixed three-call batch.
//! No retries: a failed fetch is retried only by the next tick.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use slotwatch_common::protocol::probe_batch;
use slotwatch_common::types::Endpoint;
use tracing::debug;

use super::ProbeTransport;
use crate::error::FetchError;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// HTTP transport for probe batches
#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    timeout: Duration,
}

impl RpcClient {
    /// Build a client whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl ProbeTransport for RpcClient {
    async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError> {
        // `.json()` sets Content-Type: application/json
        let response = self
            .client
            .post(endpoint.as_str())
            .timeout(self.timeout)
            .json(&probe_batch())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        debug!(endpoint = %endpoint, bytes = body.len(), "Probe response received");
        Ok(body.to_vec())
    }
}
