use crate::model::{FileEvaluation, RuleSet};
use pushguard_types::receipt::{DETAIL, TRACE};
use pushguard_types::{ProjectPath, Receipt};

/// Evaluate one changed file against the ordered rule set.
///
/// The scan never stops early. Every matching rule is recorded and overwrites
/// the verdict, so the *last* matching rule in configuration order decides.
/// This lets a broad allow be followed by a narrower deny (or the reverse).
/// With no match the file stays `Unmonitored`.
pub fn evaluate_file(path: &str, rules: &RuleSet, receipt: &mut Receipt) -> FileEvaluation {
    let mut evaluation = FileEvaluation::unmonitored(ProjectPath::new(path));
    receipt.append(format!("file {}", evaluation.path.as_str()), TRACE);

    for rule in rules {
        receipt.append(format!("applying rule {}", rule.pattern), TRACE);
        if rule.matches(&evaluation.path) {
            receipt.append("rule matches file", TRACE);
            evaluation.verdict = rule.access.verdict();
            evaluation.matched_rules.push(rule.clone());
        } else {
            receipt.append("rule does not match file", TRACE);
        }
    }

    receipt.append(
        format!(
            "file {} matched by {} rules, the final result is {}",
            evaluation.path.original(),
            evaluation.matched_rules.len(),
            evaluation.verdict.label()
        ),
        DETAIL,
    );

    evaluation
}
