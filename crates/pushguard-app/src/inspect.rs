//! The `rules` and `evaluate` use cases: look at a policy without a push.

use pushguard_domain::evaluate_file;
use pushguard_domain::model::RunResult;
use pushguard_domain::policy::PolicyConfig;
use pushguard_types::Receipt;

/// Output from the evaluate use case.
#[derive(Clone, Debug)]
pub struct EvaluateOutput {
    pub result: RunResult,
}

impl EvaluateOutput {
    pub fn any_denied(&self) -> bool {
        self.result.counts().denied > 0
    }

    /// 0 when nothing is denied, 2 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.any_denied() { 2 } else { 0 }
    }
}

/// Evaluate ad-hoc paths, in the order given, against a loaded policy.
pub fn run_evaluate<S: AsRef<str>>(
    paths: &[S],
    config: &PolicyConfig,
    receipt: &mut Receipt,
) -> EvaluateOutput {
    let mut result = RunResult::default();
    for path in paths {
        result.push(evaluate_file(path.as_ref(), &config.rules, receipt));
    }
    EvaluateOutput { result }
}

/// Format the ordered rule set and metadata for terminal display.
pub fn format_rules(config: &PolicyConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("Rules ({})\n", config.rules.len()));
    if config.rules.is_empty() {
        out.push_str("  (none)\n");
    }
    for (index, rule) in config.rules.iter().enumerate() {
        out.push_str(&format!(
            "  {:>3}. {:<5} {}  (as written: {})\n",
            index + 1,
            rule.access.label(),
            rule.pattern,
            rule.original_pattern
        ));
    }

    out.push_str(&format!("\nMetadata ({})\n", config.metadata.len()));
    for (key, value) in config.metadata.iter() {
        out.push_str(&format!("  {} = {}\n", key, value));
    }

    out
}

/// Format per-path verdicts for terminal display.
pub fn format_evaluations(result: &RunResult) -> String {
    let mut out = String::new();

    for evaluation in result.evaluations() {
        out.push_str(&format!(
            "{}: {}\n",
            evaluation.path.original(),
            evaluation.verdict.label()
        ));
        for rule in &evaluation.matched_rules {
            out.push_str(&format!("  matched {} {}\n", rule.access.label(), rule.pattern));
        }
    }

    let counts = result.counts();
    out.push_str(&format!(
        "\n{} allowed, {} denied, {} not monitored\n",
        counts.allowed, counts.denied, counts.unmonitored
    ));

    out
}
