//! Append-only lag log (`behind.log`)
//!
//! One plain-text line per endpoint per tick whose lag exceeds the threshold.
//! No rotation and no deduplication. Appends are serialized so concurrent
//! callers never interleave partial lines.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use slotwatch_common::types::{Endpoint, LagRecord};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::lag::exceeds_threshold;

/// Threshold-triggered writer for the lag log
///
/// Clone-able; clones share the same write lock.
#[derive(Clone, Debug)]
pub struct LagLog {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    threshold: i64,
    reference_label: String,
    write_lock: Mutex<()>,
}

impl LagLog {
    /// Create a log writing to `path`, recording lags strictly above `threshold`
    pub fn new(
        path: impl Into<PathBuf>,
        threshold: i64,
        reference_label: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                path: path.into(),
                threshold,
                reference_label: reference_label.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Log file path
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append a line if `lag` exceeds the threshold
    ///
    /// Returns whether a line was written. Open and write failures are logged
    /// and reported as `false`; they never propagate.
    pub async fn record_if_behind(&self, endpoint: &Endpoint, lag: i64) -> bool {
        if !exceeds_threshold(lag, self.inner.threshold) {
            return false;
        }

        let record = LagRecord::new(endpoint.clone(), lag);
        match self.append(&record).await {
            Ok(()) => {
                debug!(
                    endpoint = %endpoint,
                    lag,
                    path = %self.inner.path.display(),
                    "Lag recorded"
                );
                true
            }
            Err(e) => {
                warn!(
                    endpoint = %endpoint,
                    lag,
                    path = %self.inner.path.display(),
                    error = %e,
                    "Failed to write lag log"
                );
                false
            }
        }
    }

    /// Append one record unconditionally
    ///
    /// The file is opened per call and closed when this returns, on success
    /// and on failure alike.
    pub async fn append(&self, record: &LagRecord) -> std::io::Result<()> {
        let _guard = self.inner.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.inner.path)
            .await?;

        let line = format!("{}\n", record.to_log_line(&self.inner.reference_label));
        let written = file.write_all(line.as_bytes()).await;
        // flush even if the write failed so the handle is released cleanly
        let flushed = file.flush().await;
        written.and(flushed)
    }
}
