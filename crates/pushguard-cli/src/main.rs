//! CLI entry point for pushguard.
//!
//! This module is intentionally thin: it handles argument parsing, payload
//! acquisition, environment detection, I/O, and exit codes. All policy and
//! reporting logic lives in the `pushguard-app` crate.

mod sink;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use pushguard_app::{
    Environment, NotificationSink, RunError, RunInput, RunOutcome, build_push_report,
    format_evaluations, format_rules, load_config, run_evaluate, run_push, serialize_report,
};
use pushguard_settings::{DEFAULT_CONFIG_FILE, RoutingConfig};
use pushguard_types::{PushEvent, PushReport, Receipt, RunStatus};
use sink::{StdoutSink, UnconfiguredSink, WebhookSink};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pushguard",
    version,
    about = "Policy gate for repository pushes: did this push touch a protected path?"
)]
struct Cli {
    /// Path to the directive file (OKK/KOO/MDT lines).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Tracing filter (e.g. `debug`, `pushguard::receipt=off`). Defaults to
    /// `RUST_LOG`, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Execution environment; detected from the process when omitted.
    #[arg(long, global = true, value_enum)]
    environment: Option<EnvironmentArg>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a push event and deliver the notification.
    Run(RunArgs),

    /// Print the ordered rule set and metadata from the config.
    Rules,

    /// Evaluate ad-hoc paths against the config. Exits 2 if any is denied.
    Evaluate {
        /// Repository-relative paths, as a push payload would list them.
        #[arg(required = true)]
        paths: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Push payload file, read when no event body is given.
    #[arg(long, default_value = "payload.json")]
    payload: Utf8PathBuf,

    /// Invocation-bound event body (JSON). Takes precedence over `--payload`.
    #[arg(long, env = "PUSHGUARD_EVENT_BODY", hide_env_values = true)]
    event_body: Option<String>,

    /// Evaluation worker threads; 1 walks sequentially.
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Where to write the JSON run report.
    #[arg(long)]
    report_out: Option<Utf8PathBuf>,

    /// Print the notification JSON to stdout instead of posting it.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EnvironmentArg {
    Local,
    Container,
    Cloud,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Local => Environment::Local,
            EnvironmentArg::Container => Environment::Container,
            EnvironmentArg::Cloud => Environment::Cloud,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref())?;

    let environment = cli
        .environment
        .map(Environment::from)
        .unwrap_or_else(detect_environment);
    tracing::debug!(environment = environment.label(), "execution environment");

    let result = match &cli.cmd {
        Commands::Run(args) => cmd_run(&cli.config, environment, args),
        Commands::Rules => cmd_rules(&cli.config),
        Commands::Evaluate { paths } => cmd_evaluate(&cli.config, paths),
    };
    if let Err(err) = result {
        eprintln!("pushguard error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(level: Option<&str>) -> anyhow::Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive).context("parse --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Managed cloud functions export their region; containers leave a marker.
fn detect_environment() -> Environment {
    let set = |name: &str| std::env::var_os(name).is_some_and(|v| !v.is_empty());
    if set("AWS_REGION") || set("AWS_LAMBDA_FUNCTION_NAME") {
        Environment::Cloud
    } else if Utf8Path::new("/.dockerenv").exists() || set("container") {
        Environment::Container
    } else {
        Environment::Local
    }
}

fn cmd_run(config: &Utf8Path, environment: Environment, args: &RunArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<RunOutcome> {
        let event = read_event(args.event_body.as_deref(), &args.payload)?;
        let routing = RoutingConfig::from_lookup(|name| std::env::var(name).ok());
        let sink = select_sink(args.dry_run, &routing)?;

        let outcome = run_push(
            RunInput {
                event: &event,
                config_path: config,
                environment,
                routing: &routing,
                workers: args.workers,
            },
            sink.as_ref(),
        )?;
        Ok(outcome)
    })();

    match result {
        Ok(outcome) => {
            if let Some(out) = &args.report_out {
                write_report_file(out, &outcome.report).context("write report json")?;
            }
            println!("{}", outcome.status);
            Ok(())
        }
        Err(err) => {
            if let Some(out) = &args.report_out {
                let report = match err.downcast_ref::<RunError>() {
                    Some(run_err) => run_err.report().clone(),
                    None => runtime_error_report(&format!("{err:#}")),
                };
                let _ = write_report_file(out, &report);
            }
            Err(err)
        }
    }
}

fn read_event(event_body: Option<&str>, payload: &Utf8Path) -> anyhow::Result<PushEvent> {
    let text = match event_body {
        Some(body) => body.to_string(),
        None => std::fs::read_to_string(payload)
            .with_context(|| format!("read payload: {}", payload))?,
    };
    PushEvent::from_json(&text).context("parse push payload")
}

fn select_sink(
    dry_run: bool,
    routing: &RoutingConfig,
) -> anyhow::Result<Box<dyn NotificationSink>> {
    if dry_run {
        return Ok(Box::new(StdoutSink));
    }
    match &routing.webhook_url {
        Some(url) => Ok(Box::new(
            WebhookSink::new(url.as_str()).context("build webhook client")?,
        )),
        None => Ok(Box::new(UnconfiguredSink)),
    }
}

/// Report for failures that happen before a run starts (unreadable payload).
fn runtime_error_report(message: &str) -> PushReport {
    build_push_report(
        RunStatus::Aborted,
        Some(message.to_string()),
        &PushEvent::default(),
        None,
        &Receipt::new(),
        OffsetDateTime::now_utc(),
    )
}

fn write_report_file(path: &Utf8Path, report: &PushReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn cmd_rules(config: &Utf8Path) -> anyhow::Result<()> {
    let policy = load_config(config, &mut Receipt::new())
        .with_context(|| format!("load config: {}", config))?;
    print!("{}", format_rules(&policy));
    Ok(())
}

fn cmd_evaluate(config: &Utf8Path, paths: &[String]) -> anyhow::Result<()> {
    let mut receipt = Receipt::new();
    let policy =
        load_config(config, &mut receipt).with_context(|| format!("load config: {}", config))?;
    let output = run_evaluate(paths, &policy, &mut receipt);
    print!("{}", format_evaluations(&output.result));

    let code = output.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
