//! Slot lag monitor (poll loop)
//!
//! Each tick fetches the reference and every target concurrently, joins, then
//! computes lag and writes the lag log in list order. Per-endpoint failures
//! are reported and skipped; they never end the loop.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use slotwatch_common::config::ProbeConfig;
use slotwatch_common::types::Endpoint;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::behind_log::LagLog;
use crate::error::ProbeError;
use crate::lag::slot_lag;
use crate::report::StatusDisplay;
use crate::rpc::{decode_probe, DecodedProbe, ProbeTransport};
use crate::shutdown::ShutdownController;

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// When the tick started
    pub started_at: DateTime<Utc>,
    /// Reference endpoint
    pub reference: Endpoint,
    /// Reference probe outcome
    pub reference_outcome: ReferenceOutcome,
    /// Per-target outcomes in endpoint list order (empty when the reference failed)
    pub targets: Vec<TargetReport>,
}

impl TickReport {
    /// Whether lag was computed this tick
    pub fn is_complete(&self) -> bool {
        matches!(self.reference_outcome, ReferenceOutcome::Measured(_))
    }

    /// Number of lag log lines written this tick
    pub fn logged_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|t| matches!(t.outcome, TargetOutcome::Measured { logged: true, .. }))
            .count()
    }

    /// Outcome for `endpoint`, if it was part of this tick
    pub fn target(&self, endpoint: &str) -> Option<&TargetOutcome> {
        self.targets
            .iter()
            .find(|t| t.endpoint.as_str() == endpoint)
            .map(|t| &t.outcome)
    }
}

/// Reference endpoint outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReferenceOutcome {
    /// Reference answered
    Measured(DecodedProbe),
    /// Reference failed; the whole tick is skipped
    Unavailable {
        /// Why
        reason: String,
    },
}

/// One target's entry in a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    /// Target endpoint
    pub endpoint: Endpoint,
    /// What happened
    pub outcome: TargetOutcome,
}

/// Target outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TargetOutcome {
    /// Target answered and lag was computed
    Measured {
        /// Decoded values
        probe: DecodedProbe,
        /// Reference slot minus target slot
        lag: i64,
        /// Whether a lag log line was written
        logged: bool,
    },
    /// Target skipped this tick
    Unavailable {
        /// Why
        reason: String,
    },
}

/// Poll loop over a fixed endpoint list
pub struct SlotMonitor<T> {
    transport: Arc<T>,
    reference: Endpoint,
    targets: Arc<[Endpoint]>,
    config: ProbeConfig,
    lag_log: LagLog,
}

impl<T: ProbeTransport> SlotMonitor<T> {
    /// Build a monitor; the lag log is derived from `config`
    pub fn new(transport: T, targets: Vec<Endpoint>, config: ProbeConfig) -> Self {
        let lag_log = LagLog::new(
            config.log_path.clone(),
            config.lag_threshold,
            config.reference_label.clone(),
        );
        Self {
            transport: Arc::new(transport),
            reference: Endpoint::new(config.reference_url.clone()),
            targets: targets.into(),
            config,
            lag_log,
        }
    }

    /// Target endpoints in display order
    pub fn targets(&self) -> &[Endpoint] {
        &self.targets
    }

    /// Lag log written by this monitor
    pub fn lag_log(&self) -> &LagLog {
        &self.lag_log
    }

    /// Fetch and decode one endpoint, giving up at `deadline`
    async fn probe(
        &self,
        endpoint: &Endpoint,
        deadline: Instant,
    ) -> Result<DecodedProbe, ProbeError> {
        let body = timeout_at(deadline, self.transport.fetch(endpoint))
            .await
            .map_err(|_| ProbeError::DeadlineExceeded)??;
        Ok(decode_probe(&body)?)
    }

    /// Run one fetch-parse-compare-log cycle
    pub async fn run_tick(&self) -> TickReport {
        let started_at = Utc::now();
        let deadline = Instant::now() + self.config.tick_deadline();

        let reference_probe = self.probe(&self.reference, deadline);
        // owned items keep the tick future Send
        let target_probes = stream::iter(self.targets.iter().cloned())
            .map(|endpoint| async move {
                let result = self.probe(&endpoint, deadline).await;
                (endpoint, result)
            })
            .buffered(self.config.max_concurrency)
            .collect::<Vec<_>>();

        let (reference_result, target_results) = tokio::join!(reference_probe, target_probes);

        let reference = match reference_result {
            Ok(reference) => reference,
            Err(e) => {
                warn!(
                    endpoint = %self.reference,
                    error = %e,
                    "Reference endpoint unavailable, skipping tick"
                );
                return TickReport {
                    started_at,
                    reference: self.reference.clone(),
                    reference_outcome: ReferenceOutcome::Unavailable {
                        reason: e.to_string(),
                    },
                    targets: Vec::new(),
                };
            }
        };

        let mut targets = Vec::with_capacity(target_results.len());
        for (endpoint, result) in target_results {
            let outcome = match result {
                Ok(probe) => {
                    let lag = slot_lag(reference.result.slot, probe.result.slot);
                    let logged = self.lag_log.record_if_behind(&endpoint, lag).await;
                    debug!(
                        endpoint = %endpoint,
                        slot = probe.result.slot,
                        block_height = probe.result.block_height,
                        lag,
                        logged,
                        "Probe succeeded"
                    );
                    TargetOutcome::Measured { probe, lag, logged }
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "No valid response, skipping");
                    TargetOutcome::Unavailable {
                        reason: e.to_string(),
                    }
                }
            };
            targets.push(TargetReport { endpoint, outcome });
        }

        TickReport {
            started_at,
            reference: self.reference.clone(),
            reference_outcome: ReferenceOutcome::Measured(reference),
            targets,
        }
    }

    /// Tick, display, sleep; repeat until shutdown is requested
    pub async fn run(&self, shutdown: &ShutdownController, display: &StatusDisplay) {
        info!(
            reference = %self.reference,
            targets = self.targets.len(),
            interval_secs = self.config.poll_interval_secs,
            "Slot monitor started"
        );

        while !shutdown.is_shutdown_requested() {
            let report = self.run_tick().await;
            display.show(&report);

            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                _ = shutdown.wait() => {}
            }
        }

        info!("Slot monitor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::report::OutputFormat;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory transport keyed by URL
    #[derive(Default)]
    struct FakeTransport {
        slots: HashMap<String, Result<u64, u16>>,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn with(mut self, url: &str, slot: u64) -> Self {
            self.slots.insert(url.to_string(), Ok(slot));
            self
        }

        fn failing(mut self, url: &str, status: u16) -> Self {
            self.slots.insert(url.to_string(), Err(status));
            self
        }
    }

    #[async_trait]
    impl ProbeTransport for FakeTransport {
        async fn fetch(&self, endpoint: &Endpoint) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.slots.get(endpoint.as_str()) {
                Some(Ok(slot)) => Ok(serde_json::to_vec(&json!([
                    {"result": "ok"},
                    {"result": slot},
                    {"result": slot.saturating_sub(10)}
                ]))
                .unwrap()),
                Some(Err(status)) => Err(FetchError::Status(*status)),
                None => Err(FetchError::Transport("connection refused".to_string())),
            }
        }
    }

    /// Never answers
    struct HangingTransport;

    #[async_trait]
    impl ProbeTransport for HangingTransport {
        async fn fetch(&self, _endpoint: &Endpoint) -> Result<Vec<u8>, FetchError> {
            std::future::pending().await
        }
    }

    fn config(dir: &tempfile::TempDir) -> ProbeConfig {
        ProbeConfig {
            reference_url: "https://ref".to_string(),
            log_path: dir.path().join("behind.log"),
            clear_screen: false,
            ..ProbeConfig::default()
        }
    }

    fn endpoints(urls: &[&str]) -> Vec<Endpoint> {
        urls.iter().map(|u| Endpoint::new(*u)).collect()
    }

    fn lag_of(report: &TickReport, url: &str) -> Option<(i64, bool)> {
        match report.target(url)? {
            TargetOutcome::Measured { lag, logged, .. } => Some((*lag, *logged)),
            TargetOutcome::Unavailable { .. } => None,
        }
    }

    #[tokio::test]
    async fn computes_lag_and_logs_above_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .with("https://ref", 100)
            .with("https://a", 94)
            .with("https://b", 97);
        let monitor = SlotMonitor::new(
            transport,
            endpoints(&["https://a", "https://b"]),
            config(&dir),
        );

        let report = monitor.run_tick().await;

        assert!(report.is_complete());
        assert_eq!(lag_of(&report, "https://a"), Some((6, true)));
        assert_eq!(lag_of(&report, "https://b"), Some((3, false)));
        assert_eq!(report.logged_count(), 1);

        let log = std::fs::read_to_string(dir.path().join("behind.log")).unwrap();
        assert_eq!(log, "https://a is 6 slots behind mainnet\n");
    }

    #[tokio::test]
    async fn failing_target_does_not_affect_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .with("https://ref", 100)
            .failing("https://a", 502)
            .with("https://b", 90);
        let monitor = SlotMonitor::new(
            transport,
            endpoints(&["https://a", "https://missing", "https://b"]),
            config(&dir),
        );

        let report = monitor.run_tick().await;

        assert!(matches!(
            report.target("https://a"),
            Some(TargetOutcome::Unavailable { reason }) if reason.contains("502")
        ));
        assert!(matches!(
            report.target("https://missing"),
            Some(TargetOutcome::Unavailable { .. })
        ));
        assert_eq!(lag_of(&report, "https://b"), Some((10, true)));
        // list order is preserved
        assert_eq!(
            report
                .targets
                .iter()
                .map(|t| t.endpoint.as_str())
                .collect::<Vec<_>>(),
            vec!["https://a", "https://missing", "https://b"]
        );
    }

    #[tokio::test]
    async fn reference_failure_skips_the_tick() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .failing("https://ref", 500)
            .with("https://a", 1);
        let monitor = SlotMonitor::new(transport, endpoints(&["https://a"]), config(&dir));

        let report = monitor.run_tick().await;

        assert!(!report.is_complete());
        assert!(report.targets.is_empty());
        assert!(!dir.path().join("behind.log").exists());
    }

    #[tokio::test]
    async fn target_ahead_of_reference_has_negative_lag() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .with("https://ref", 100)
            .with("https://a", 103);
        let monitor = SlotMonitor::new(transport, endpoints(&["https://a"]), config(&dir));

        let report = monitor.run_tick().await;
        assert_eq!(lag_of(&report, "https://a"), Some((-3, false)));
    }

    #[tokio::test]
    async fn every_endpoint_is_fetched_once_per_tick() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .with("https://ref", 100)
            .with("https://a", 100)
            .with("https://b", 100);
        let monitor = SlotMonitor::new(
            transport,
            endpoints(&["https://a", "https://b"]),
            config(&dir),
        );

        monitor.run_tick().await;
        monitor.run_tick().await;

        assert_eq!(monitor.transport.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_endpoints_are_cut_off_at_the_tick_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = SlotMonitor::new(HangingTransport, endpoints(&["https://a"]), config(&dir));

        let report = tokio::time::timeout(Duration::from_secs(10), monitor.run_tick())
            .await
            .expect("tick must finish within the deadline");

        assert_eq!(
            report.reference_outcome,
            ReferenceOutcome::Unavailable {
                reason: "Tick deadline exceeded".to_string()
            }
        );
    }

    fn assert_send<F: std::future::Future + Send>(_: F) {}

    #[test]
    fn tick_and_loop_futures_are_send() {
        let dir = tempfile::tempdir().unwrap();
        let monitor = SlotMonitor::new(
            FakeTransport::default(),
            endpoints(&["https://a"]),
            config(&dir),
        );
        let shutdown = ShutdownController::default();
        let display = StatusDisplay::new(false, OutputFormat::Json, "mainnet");

        assert_send(monitor.run_tick());
        assert_send(monitor.run(&shutdown, &display));
    }

    #[tokio::test(start_paused = true)]
    async fn run_stops_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FakeTransport::default()
            .with("https://ref", 100)
            .with("https://a", 100);
        let monitor = Arc::new(SlotMonitor::new(
            transport,
            endpoints(&["https://a"]),
            config(&dir),
        ));
        let shutdown = ShutdownController::default();
        let display = StatusDisplay::new(false, OutputFormat::Json, "mainnet");

        let handle = {
            let monitor = monitor.clone();
            let shutdown = shutdown.clone();
            tokio::spawn(async move { monitor.run(&shutdown, &display).await })
        };

        tokio::time::sleep(Duration::from_secs(7)).await;
        shutdown.request_shutdown();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop should exit promptly")
            .unwrap();

        assert!(monitor.transport.calls.load(Ordering::SeqCst) >= 2);
    }
}
