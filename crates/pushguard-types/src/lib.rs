//! Stable DTOs and IDs used across the pushguard workspace.
//!
//! This crate is intentionally boring:
//! - the push-event payload as delivered by the source-control host
//! - project-root anchored path handling
//! - the run-scoped receipt (verbosity-filtered audit trail)
//! - data types for the emitted JSON run report

#![forbid(unsafe_code)]

pub mod event;
pub mod ids;
pub mod path;
pub mod receipt;
pub mod report;

pub use event::{Commit, Identity, PushEvent, Pusher, Repository};
pub use path::{PROJECT_ROOT_MARKER, ProjectPath, anchor_pattern};
pub use receipt::{Receipt, ReceiptEntry, Verbosity, format_timestamp};
pub use report::{
    FileRecord, FileVerdict, PushReport, RunStatus, SCHEMA_PUSH_REPORT_V1, ToolMeta, VerdictCounts,
};
