//! Probe response parser
//!
//! Responses are correlated with the request batch by position, not by the
//! echoed id: element 1 carries the slot, element 2 the block height.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use slotwatch_common::protocol::{
    RpcResponse, BLOCK_HEIGHT_INDEX, HEALTH_INDEX, PROBE_BATCH_LEN, SLOT_INDEX,
};
use slotwatch_common::types::{NodeHealth, ProbeResult};
use tracing::warn;

use crate::error::ParseError;

/// Decoded probe batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedProbe {
    /// Slot and block height
    pub result: ProbeResult,
    /// Outcome of the health sub-call (informational only)
    pub health: NodeHealth,
}

/// Decode a raw batch response
///
/// The array length is checked before any positional access, so a short or
/// reordered batch becomes a [`ParseError`] rather than an index fault.
pub fn decode_probe(body: &[u8]) -> Result<DecodedProbe, ParseError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    let items = value.as_array().ok_or(ParseError::NotABatch)?;

    if items.len() < PROBE_BATCH_LEN {
        return Err(ParseError::ShortBatch {
            expected: PROBE_BATCH_LEN,
            actual: items.len(),
        });
    }

    let health = node_health(&items[HEALTH_INDEX]);
    let slot = response_at(items, SLOT_INDEX)?;
    let block_height = response_at(items, BLOCK_HEIGHT_INDEX)?;

    Ok(DecodedProbe {
        result: ProbeResult::new(
            extract_u64("slot", &slot)?,
            extract_u64("blockHeight", &block_height)?,
        ),
        health,
    })
}

/// Forgiving variant returning the `(0, 0)` sentinel
///
/// `None` (the fetch already failed) short-circuits without decoding. Decode
/// failures are logged and also yield the sentinel; this never panics.
pub fn parse_values(body: Option<&[u8]>) -> ProbeResult {
    let Some(body) = body else {
        return ProbeResult::UNAVAILABLE;
    };

    match decode_probe(body) {
        Ok(decoded) => decoded.result,
        Err(e) => {
            warn!(error = %e, "Failed to parse probe response");
            ProbeResult::UNAVAILABLE
        }
    }
}

fn response_at(items: &[Value], index: usize) -> Result<RpcResponse, ParseError> {
    RpcResponse::deserialize(&items[index]).map_err(|_| ParseError::NotABatch)
}

fn extract_u64(field: &'static str, response: &RpcResponse) -> Result<u64, ParseError> {
    if let Some(error) = &response.error {
        return Err(ParseError::Rpc {
            field,
            code: error.code,
            message: error.message.clone(),
        });
    }

    let value = response
        .result
        .as_ref()
        .ok_or(ParseError::MissingResult(field))?;
    coerce_u64(field, value)
}

/// Accept any JSON number that denotes a non-negative integer value.
/// Floats are truncated toward zero.
fn coerce_u64(field: &'static str, value: &Value) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidValue {
        field,
        value: value.to_string(),
    };

    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    if value.is_i64() {
        // as_u64 failed, so this is negative
        return Err(invalid());
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f < u64::MAX as f64 => Ok(f.trunc() as u64),
        _ => Err(invalid()),
    }
}

/// Health never gates the probe, so an element that does not decode is just
/// `Unknown`.
fn node_health(item: &Value) -> NodeHealth {
    let Ok(response) = RpcResponse::deserialize(item) else {
        return NodeHealth::Unknown;
    };
    if let Some(error) = &response.error {
        return NodeHealth::Unhealthy(error.message.clone());
    }
    match response.result.as_ref().and_then(Value::as_str) {
        Some("ok") => NodeHealth::Ok,
        _ => NodeHealth::Unknown,
    }
}
