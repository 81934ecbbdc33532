//! Report building: the chat notification and the JSON run report.

use crate::context::ExecutionContext;
use crate::notify::{ACCENT_DANGER, Attachment, Notification, NotificationStatus};
use pushguard_domain::model::RunResult;
use pushguard_render::{
    FileListing, RenderableFile, RenderableReport, RenderableStatus, RenderableVerdict,
};
use pushguard_settings::RoutingConfig;
use pushguard_types::ids::TOOL_NAME;
use pushguard_types::receipt::DETAIL;
use pushguard_types::{
    FileVerdict, PushEvent, PushReport, Receipt, RunStatus, SCHEMA_PUSH_REPORT_V1, ToolMeta,
    format_timestamp,
};
use time::OffsetDateTime;

/// Everything the report builder reads. Nothing here is mutated.
#[derive(Clone, Copy, Debug)]
pub struct ReportInput<'a> {
    pub result: &'a RunResult,
    pub event: &'a PushEvent,
    pub context: &'a ExecutionContext,
    pub routing: &'a RoutingConfig,
    pub receipt: &'a Receipt,
    pub generated_at: OffsetDateTime,
}

/// Aggregate a finished run into the notification to deliver.
///
/// Severity and routing: no denied files is `Ok` on the default channel;
/// otherwise `Ko` with the danger accent, on the production channel when the
/// push targets the live repository + ref and the development channel if not.
pub fn build_notification(input: &ReportInput<'_>) -> Notification {
    let counts = input.result.counts();
    let (status, accent, channel) = if counts.denied == 0 {
        (
            NotificationStatus::Ok,
            None,
            input.routing.default_channel.clone(),
        )
    } else if input.context.live_target {
        (
            NotificationStatus::Ko,
            Some(ACCENT_DANGER),
            input.routing.production_channel.clone(),
        )
    } else {
        (
            NotificationStatus::Ko,
            Some(ACCENT_DANGER),
            input.routing.development_channel.clone(),
        )
    };

    let listing = if input.receipt.threshold() >= DETAIL {
        FileListing::All
    } else {
        FileListing::DeniedOnly
    };

    let renderable = RenderableReport {
        status: match status {
            NotificationStatus::Ok => RenderableStatus::Ok,
            NotificationStatus::Ko => RenderableStatus::Ko,
        },
        generated_at: format_timestamp(input.generated_at),
        denied_count: counts.denied,
        repository: input.event.repository.full_name.clone(),
        git_ref: input.event.git_ref.clone(),
        files: input
            .result
            .evaluations()
            .iter()
            .map(|e| RenderableFile {
                path: e.path.original().to_string(),
                verdict: renderable_verdict(e.verdict),
            })
            .collect(),
        pusher_name: input.event.pusher.name.clone(),
        pusher_email: input.event.pusher.email.clone(),
        context: input.context.describe(),
    };

    let attachment = (!input.receipt.is_empty()).then(|| Attachment {
        title: "receipt".to_string(),
        text: input.receipt.render_text(),
    });

    Notification {
        text: pushguard_render::render_message(&renderable, listing),
        channel,
        icon: input.routing.icon.clone(),
        username: input.routing.username.clone(),
        status,
        accent,
        attachment,
    }
}

fn renderable_verdict(verdict: FileVerdict) -> RenderableVerdict {
    match verdict {
        FileVerdict::Allowed => RenderableVerdict::Allowed,
        FileVerdict::Denied => RenderableVerdict::Denied,
        FileVerdict::Unmonitored => RenderableVerdict::Unmonitored,
    }
}

/// JSON artifact for one run. `result` is absent when the run stopped before
/// evaluation (no commits, or an aborted config load).
pub fn build_push_report(
    status: RunStatus,
    error: Option<String>,
    event: &PushEvent,
    result: Option<&RunResult>,
    receipt: &Receipt,
    generated_at: OffsetDateTime,
) -> PushReport {
    PushReport {
        schema: SCHEMA_PUSH_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: TOOL_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at,
        status,
        error,
        repository: event.repository.full_name.clone(),
        git_ref: event.git_ref.clone(),
        pusher: event.pusher.clone(),
        counts: result.map(RunResult::counts).unwrap_or_default(),
        files: result
            .map(|r| r.evaluations().iter().map(|e| e.to_record()).collect())
            .unwrap_or_default(),
        receipt: receipt.entries().to_vec(),
    }
}

pub fn serialize_report(report: &PushReport) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Environment;
    use pushguard_domain::model::{Rule, RuleSet};
    use pushguard_domain::process_batch;
    use pushguard_types::{Commit, Pusher, Repository, VerdictCounts};
    use time::macros::datetime;

    fn event(added: &[&str], removed: &[&str]) -> PushEvent {
        PushEvent {
            commits: vec![Commit {
                id: "c1".to_string(),
                added: added.iter().map(|p| p.to_string()).collect(),
                removed: removed.iter().map(|p| p.to_string()).collect(),
                ..Commit::default()
            }],
            repository: Repository {
                full_name: "acme/site".to_string(),
            },
            git_ref: "refs/heads/main".to_string(),
            pusher: Pusher {
                name: "dana".to_string(),
                email: "dana@example.com".to_string(),
            },
        }
    }

    fn routing() -> RoutingConfig {
        RoutingConfig {
            default_channel: "#push".to_string(),
            production_channel: "#prod".to_string(),
            development_channel: "#dev".to_string(),
            ..RoutingConfig::default()
        }
    }

    fn evaluate(event: &PushEvent) -> RunResult {
        let rules = RuleSet::from(vec![Rule::deny("/secrets")]);
        process_batch(&event.commits, &rules, &mut Receipt::new())
    }

    fn notify(
        event: &PushEvent,
        result: &RunResult,
        live_target: bool,
        receipt: &Receipt,
    ) -> Notification {
        let context = ExecutionContext {
            environment: Environment::Local,
            live_target,
        };
        let routing = routing();
        build_notification(&ReportInput {
            result,
            event,
            context: &context,
            routing: &routing,
            receipt,
            generated_at: datetime!(2024-01-02 03:04:05 UTC),
        })
    }

    #[test]
    fn denied_push_lists_only_denied_files_by_default() {
        let event = event(&["secrets/key.pem"], &["README.md"]);
        let result = evaluate(&event);
        let n = notify(&event, &result, false, &Receipt::new());

        assert_eq!(n.status, NotificationStatus::Ko);
        assert_eq!(n.accent, Some(ACCENT_DANGER));
        assert_eq!(n.channel, "#dev");
        assert!(n.text.contains("*1 files matched protected paths*"));
        assert!(n.text.contains("secrets/key.pem"));
        assert!(!n.text.contains("README.md"));
        assert!(n.text.contains("repository `acme/site` ref `refs/heads/main`"));
        assert!(n.text.contains("pushed by dana <dana@example.com>"));
        assert!(n.text.contains("context: local, live target: no"));
    }

    #[test]
    fn denied_push_to_live_target_routes_to_production() {
        let event = event(&["secrets/key.pem"], &[]);
        let result = evaluate(&event);
        let n = notify(&event, &result, true, &Receipt::new());
        assert_eq!(n.channel, "#prod");
        assert!(n.text.contains("live target: yes"));
    }

    #[test]
    fn clean_push_is_ok_on_default_channel_even_when_live() {
        let event = event(&["src/lib.rs"], &[]);
        let result = evaluate(&event);
        let n = notify(&event, &result, true, &Receipt::new());
        assert_eq!(n.status, NotificationStatus::Ok);
        assert_eq!(n.accent, None);
        assert_eq!(n.channel, "#push");
        assert!(n.text.starts_with("[OK] RECEIPT GENERATED 2024-01-02 03:04:05.0000"));
    }

    #[test]
    fn verbose_receipt_lists_every_file_and_attaches_receipt() {
        let event = event(&["secrets/key.pem"], &["README.md"]);
        let result = evaluate(&event);
        let mut receipt = Receipt::with_threshold(DETAIL);
        receipt.append("something happened", DETAIL);

        let n = notify(&event, &result, false, &receipt);
        assert!(n.text.contains("✖ secrets/key.pem"));
        assert!(n.text.contains("· README.md"));
        let attachment = n.attachment.expect("receipt attachment");
        assert_eq!(attachment.title, "receipt");
        assert!(attachment.text.contains("something happened"));
    }

    #[test]
    fn empty_receipt_means_no_attachment() {
        let event = event(&["src/lib.rs"], &[]);
        let result = evaluate(&event);
        let n = notify(&event, &result, false, &Receipt::new());
        assert!(n.attachment.is_none());
    }

    #[test]
    fn push_report_carries_counts_and_records() {
        let event = event(&["secrets/key.pem"], &["README.md"]);
        let result = evaluate(&event);
        let report = build_push_report(
            RunStatus::Completed,
            None,
            &event,
            Some(&result),
            &Receipt::new(),
            datetime!(2024-01-02 03:04:05 UTC),
        );

        assert_eq!(report.schema, SCHEMA_PUSH_REPORT_V1);
        assert_eq!(report.tool.name, "pushguard");
        assert_eq!(
            report.counts,
            VerdictCounts {
                allowed: 0,
                denied: 1,
                unmonitored: 1
            }
        );
        assert_eq!(report.files[0].normalized_path, "[PROOT]/secrets/key.pem");
        assert_eq!(report.files[0].matched_rules, vec!["[PROOT]/secrets".to_string()]);
        assert_eq!(report.files[1].verdict, FileVerdict::Unmonitored);

        let json: serde_json::Value =
            serde_json::from_slice(&serialize_report(&report).expect("serialize"))
                .expect("valid json");
        assert_eq!(json["ref"], "refs/heads/main");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["generated_at"], "2024-01-02T03:04:05Z");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn push_report_without_result_has_zero_counts() {
        let event = event(&[], &[]);
        let report = build_push_report(
            RunStatus::Aborted,
            Some("boom".to_string()),
            &event,
            None,
            &Receipt::new(),
            datetime!(2024-01-02 03:04:05 UTC),
        );
        assert_eq!(report.counts, VerdictCounts::default());
        assert!(report.files.is_empty());
        assert_eq!(report.error.as_deref(), Some("boom"));
    }
}
