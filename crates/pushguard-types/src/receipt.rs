//! The run-scoped receipt: an append-only, verbosity-filtered audit trail.
//!
//! Every appended entry is traced unconditionally on the `pushguard::receipt`
//! target. Only entries whose required verbosity is within the active
//! threshold are retained for the rendered receipt and the JSON report.

use crate::ids;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Receipt verbosity. Higher values are chattier.
pub type Verbosity = i32;

/// Run milestones; retained at the default threshold.
pub const ESSENTIAL: Verbosity = 0;
/// Per-commit progress, per-file verdicts, rule loading.
pub const DETAIL: Verbosity = 1;
/// Per-line config import and per-rule application.
pub const TRACE: Verbosity = 2;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:4]");

/// Human-readable receipt timestamp (`2024-01-31 12:00:00.1234`).
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptEntry {
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub message: String,
    pub required_verbosity: Verbosity,
}

#[derive(Clone, Debug, Default)]
pub struct Receipt {
    threshold: Verbosity,
    entries: Vec<ReceiptEntry>,
}

impl Receipt {
    /// An empty receipt at the default threshold.
    pub fn new() -> Self {
        Self::with_threshold(ESSENTIAL)
    }

    pub fn with_threshold(threshold: Verbosity) -> Self {
        Self {
            threshold,
            entries: Vec::new(),
        }
    }

    pub fn threshold(&self) -> Verbosity {
        self.threshold
    }

    /// Change the active threshold. Already retained entries are kept.
    pub fn set_threshold(&mut self, threshold: Verbosity) {
        self.threshold = threshold;
    }

    pub fn append(&mut self, message: impl Into<String>, required_verbosity: Verbosity) {
        let message = message.into();
        let retained = required_verbosity <= self.threshold;
        tracing::info!(
            target: ids::RECEIPT_TRACE_TARGET,
            required_verbosity,
            retained,
            "{message}"
        );
        if retained {
            self.entries.push(ReceiptEntry {
                timestamp: OffsetDateTime::now_utc(),
                message,
                required_verbosity,
            });
        }
    }

    pub fn entries(&self) -> &[ReceiptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// An empty receipt sharing this one's threshold, for a worker to fill.
    pub fn fork(&self) -> Receipt {
        Receipt::with_threshold(self.threshold)
    }

    /// Append the entries a forked receipt retained.
    pub fn absorb(&mut self, other: Receipt) {
        self.entries.extend(other.entries);
    }

    /// One line per retained entry: `timestamp  message`.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format_timestamp(entry.timestamp));
            out.push_str("  ");
            out.push_str(&entry.message);
            out.push('\n');
        }
        out
    }
}
