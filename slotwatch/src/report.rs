//! Status display
//!
//! Renders tick reports to stdout, as human-readable text or one JSON object
//! per tick.

use std::io::Write;

use tracing::warn;

use crate::monitor::{ReferenceOutcome, TargetOutcome, TickReport};

/// ANSI: clear screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Output format for tick reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable status lines
    #[default]
    Text,
    /// One JSON object per tick
    Json,
}

/// Writes tick reports to stdout
#[derive(Debug, Clone)]
pub struct StatusDisplay {
    clear_screen: bool,
    format: OutputFormat,
    reference_label: String,
}

impl StatusDisplay {
    /// Create a display; `reference_label` names the reference in lag lines
    pub fn new(
        clear_screen: bool,
        format: OutputFormat,
        reference_label: impl Into<String>,
    ) -> Self {
        Self {
            clear_screen,
            format,
            reference_label: reference_label.into(),
        }
    }

    /// Print one tick
    pub fn show(&self, report: &TickReport) {
        let rendered = match self.format {
            OutputFormat::Text => render_text(report, &self.reference_label),
            OutputFormat::Json => match serde_json::to_string(report) {
                Ok(json) => format!("{}\n", json),
                Err(e) => {
                    warn!(error = %e, "Failed to serialize tick report");
                    return;
                }
            },
        };

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // clearing only makes sense for the interactive text view
        let clear = self.clear_screen && self.format == OutputFormat::Text;
        let result = if clear {
            out.write_all(CLEAR_SCREEN.as_bytes())
                .and_then(|_| out.write_all(rendered.as_bytes()))
        } else {
            out.write_all(rendered.as_bytes())
        };
        if let Err(e) = result.and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write status output");
        }
    }
}

/// Render a tick as status text
pub fn render_text(report: &TickReport, reference_label: &str) -> String {
    let mut out = String::new();

    let reference = match &report.reference_outcome {
        ReferenceOutcome::Measured(reference) => reference,
        ReferenceOutcome::Unavailable { reason } => {
            out.push_str(&format!(
                "({}) unavailable: {}\nSkipping this tick\n",
                report.reference, reason
            ));
            return out;
        }
    };

    out.push_str(&format!(
        "({}) Slot: {}, BlockHeight: {}\n\n",
        report.reference, reference.result.slot, reference.result.block_height
    ));

    for target in &report.targets {
        match &target.outcome {
            TargetOutcome::Measured { probe, lag, .. } => {
                out.push_str(&format!(
                    "Response from {}\nSlot: {}, BlockHeight: {}, Health: {}\n\
                     {} is {} slots behind {}\n\n",
                    target.endpoint,
                    probe.result.slot,
                    probe.result.block_height,
                    probe.health,
                    target.endpoint,
                    lag,
                    reference_label
                ));
            }
            TargetOutcome::Unavailable { reason } => {
                out.push_str(&format!("{}: unavailable ({})\n\n", target.endpoint, reason));
            }
        }
    }

    out
}
