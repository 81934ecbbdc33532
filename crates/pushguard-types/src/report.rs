use crate::{Pusher, ReceiptEntry};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for the JSON run report.
pub const SCHEMA_PUSH_REPORT_V1: &str = "pushguard.report.v1";

/// Outcome of applying the rule set to one changed file.
///
/// `Unmonitored` is the no-match default; it is not a flavour of `Allowed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileVerdict {
    Allowed,
    Denied,
    Unmonitored,
}

impl FileVerdict {
    pub fn label(self) -> &'static str {
        match self {
            FileVerdict::Allowed => "ALLOWED",
            FileVerdict::Denied => "NOT ALLOWED",
            FileVerdict::Unmonitored => "NOT MONITORED",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictCounts {
    pub allowed: u32,
    pub denied: u32,
    pub unmonitored: u32,
}

impl VerdictCounts {
    pub fn record(&mut self, verdict: FileVerdict) {
        match verdict {
            FileVerdict::Allowed => self.allowed += 1,
            FileVerdict::Denied => self.denied += 1,
            FileVerdict::Unmonitored => self.unmonitored += 1,
        }
    }

    pub fn merge(&mut self, other: VerdictCounts) {
        self.allowed += other.allowed;
        self.denied += other.denied;
        self.unmonitored += other.unmonitored;
    }

    pub fn total(&self) -> u32 {
        self.allowed + self.denied + self.unmonitored
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    NoCommits,
    Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub normalized_path: String,
    pub verdict: FileVerdict,
    /// Patterns of the rules that matched, in configuration order.
    #[serde(default)]
    pub matched_rules: Vec<String>,
}

/// JSON artifact describing one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PushReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[serde(with = "time::serde::rfc3339")]
    pub generated_at: OffsetDateTime,
    pub status: RunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub repository: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub pusher: Pusher,
    pub counts: VerdictCounts,
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub receipt: Vec<ReceiptEntry>,
}
