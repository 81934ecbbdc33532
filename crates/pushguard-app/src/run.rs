//! The `run` use case: one push through config loading, evaluation, and
//! delivery of the report.

use crate::config::load_config;
use crate::context::{Environment, ExecutionContext};
use crate::notify::{DeliveryError, Notification, NotificationSink};
use crate::report::{ReportInput, build_notification, build_push_report};
use camino::Utf8Path;
use pushguard_domain::model::RunResult;
use pushguard_domain::{WorkerPoolError, process_batch_parallel};
use pushguard_settings::{ConfigError, RoutingConfig};
use pushguard_types::ids::{STATUS_COMPLETED, STATUS_NO_COMMITS};
use pushguard_types::receipt::ESSENTIAL;
use pushguard_types::{PushEvent, PushReport, Receipt, RunStatus};
use thiserror::Error;
use time::OffsetDateTime;

/// Lifecycle of one run.
///
/// `Idle -> ConfigLoading -> {Aborted | Evaluating} -> Reporting -> Idle`.
/// A push without commits never leaves `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    ConfigLoading,
    Evaluating,
    Reporting,
    Aborted,
}

impl RunState {
    pub fn can_advance_to(self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Idle, RunState::ConfigLoading)
                | (RunState::ConfigLoading, RunState::Evaluating)
                | (RunState::ConfigLoading, RunState::Aborted)
                | (RunState::Evaluating, RunState::Reporting)
                | (RunState::Evaluating, RunState::Aborted)
                | (RunState::Reporting, RunState::Idle)
                | (RunState::Reporting, RunState::Aborted)
        )
    }
}

/// Tracks the current state and the path taken through it.
#[derive(Debug)]
struct Lifecycle {
    visited: Vec<RunState>,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            visited: vec![RunState::Idle],
        }
    }

    fn current(&self) -> RunState {
        self.visited.last().copied().unwrap_or(RunState::Idle)
    }

    fn advance(&mut self, next: RunState) {
        let from = self.current();
        debug_assert!(
            from.can_advance_to(next),
            "invalid run transition {from:?} -> {next:?}"
        );
        tracing::debug!(?from, to = ?next, "run state");
        self.visited.push(next);
    }
}

/// Input for the run use case.
#[derive(Clone, Copy, Debug)]
pub struct RunInput<'a> {
    pub event: &'a PushEvent,
    pub config_path: &'a Utf8Path,
    /// Detected once by the caller.
    pub environment: Environment,
    pub routing: &'a RoutingConfig,
    /// Evaluation threads; `0` or `1` walks sequentially.
    pub workers: usize,
}

/// A run that finished without error.
#[derive(Clone, Debug)]
pub struct RunOutcome {
    /// Short status returned to the invoker.
    pub status: &'static str,
    pub run_status: RunStatus,
    pub report: PushReport,
    /// The delivered notification; `None` when there was nothing to evaluate.
    pub notification: Option<Notification>,
    /// States visited, starting and ending with `Idle`.
    pub states: Vec<RunState>,
}

/// A run that stopped before completing. Each variant carries the report
/// describing how far it got, with status `aborted`.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to load configuration")]
    Config {
        #[source]
        source: ConfigError,
        report: Box<PushReport>,
    },
    #[error("failed to evaluate push")]
    WorkerPool {
        #[source]
        source: WorkerPoolError,
        report: Box<PushReport>,
    },
    #[error("failed to deliver notification")]
    Delivery {
        #[source]
        source: DeliveryError,
        report: Box<PushReport>,
    },
}

impl RunError {
    pub fn report(&self) -> &PushReport {
        match self {
            RunError::Config { report, .. }
            | RunError::WorkerPool { report, .. }
            | RunError::Delivery { report, .. } => report,
        }
    }
}

/// Run one push event through the policy and deliver the verdict.
///
/// Zero commits returns [`STATUS_NO_COMMITS`] without reading the config.
/// A missing or malformed config aborts before evaluation and nothing is
/// delivered. A delivery failure fails the run.
pub fn run_push(
    input: RunInput<'_>,
    sink: &dyn NotificationSink,
) -> Result<RunOutcome, RunError> {
    let mut lifecycle = Lifecycle::new();
    let mut receipt = Receipt::new();
    receipt.append(
        format!(
            "pushguard receipt, running in {} environment",
            input.environment.label()
        ),
        ESSENTIAL,
    );

    if input.event.commits.is_empty() {
        receipt.append(STATUS_NO_COMMITS, ESSENTIAL);
        tracing::info!("{STATUS_NO_COMMITS}");
        let report = build_push_report(
            RunStatus::NoCommits,
            None,
            input.event,
            None,
            &receipt,
            OffsetDateTime::now_utc(),
        );
        return Ok(RunOutcome {
            status: STATUS_NO_COMMITS,
            run_status: RunStatus::NoCommits,
            report,
            notification: None,
            states: lifecycle.visited,
        });
    }

    lifecycle.advance(RunState::ConfigLoading);
    let config = match load_config(input.config_path, &mut receipt) {
        Ok(config) => config,
        Err(source) => {
            lifecycle.advance(RunState::Aborted);
            tracing::error!(error = %source, "configuration rejected, run aborted");
            let report = aborted_report(&source, input.event, None, &receipt);
            return Err(RunError::Config { source, report });
        }
    };

    lifecycle.advance(RunState::Evaluating);
    let result = match process_batch_parallel(
        &input.event.commits,
        &config.rules,
        &mut receipt,
        input.workers,
    ) {
        Ok(result) => result,
        Err(source) => {
            lifecycle.advance(RunState::Aborted);
            tracing::error!(error = %source, "evaluation failed, run aborted");
            let report = aborted_report(&source, input.event, None, &receipt);
            return Err(RunError::WorkerPool { source, report });
        }
    };
    let counts = result.counts();
    tracing::info!(
        allowed = counts.allowed,
        denied = counts.denied,
        unmonitored = counts.unmonitored,
        "push evaluated"
    );

    lifecycle.advance(RunState::Reporting);
    let context = ExecutionContext {
        environment: input.environment,
        live_target: input
            .routing
            .is_live(&input.event.repository.full_name, &input.event.git_ref),
    };
    let generated_at = OffsetDateTime::now_utc();
    let notification = build_notification(&ReportInput {
        result: &result,
        event: input.event,
        context: &context,
        routing: input.routing,
        receipt: &receipt,
        generated_at,
    });

    if let Err(source) = sink.deliver(&notification) {
        lifecycle.advance(RunState::Aborted);
        tracing::error!(error = %source, "notification not delivered");
        let report = aborted_report(&source, input.event, Some(&result), &receipt);
        return Err(RunError::Delivery { source, report });
    }
    tracing::info!(channel = %notification.channel, "{STATUS_COMPLETED}");
    lifecycle.advance(RunState::Idle);

    let report = build_push_report(
        RunStatus::Completed,
        None,
        input.event,
        Some(&result),
        &receipt,
        generated_at,
    );
    Ok(RunOutcome {
        status: STATUS_COMPLETED,
        run_status: RunStatus::Completed,
        report,
        notification: Some(notification),
        states: lifecycle.visited,
    })
}

fn aborted_report(
    error: &dyn std::error::Error,
    event: &PushEvent,
    result: Option<&RunResult>,
    receipt: &Receipt,
) -> Box<PushReport> {
    Box::new(build_push_report(
        RunStatus::Aborted,
        Some(error.to_string()),
        event,
        result,
        receipt,
        OffsetDateTime::now_utc(),
    ))
}
