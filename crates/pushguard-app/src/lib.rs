//! Use case orchestration for pushguard.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, domain, and render layers for one invocation. It is intentionally
//! thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing, payload
//! acquisition, environment detection, and the concrete notification sinks.

#![forbid(unsafe_code)]

mod config;
mod context;
mod inspect;
mod notify;
mod report;
mod run;

pub use config::load_config;
pub use context::{Environment, ExecutionContext};
pub use inspect::{EvaluateOutput, format_evaluations, format_rules, run_evaluate};
pub use notify::{
    ACCENT_DANGER, Attachment, DeliveryError, Notification, NotificationSink, NotificationStatus,
};
pub use report::{ReportInput, build_notification, build_push_report, serialize_report};
pub use run::{RunError, RunInput, RunOutcome, RunState, run_push};
