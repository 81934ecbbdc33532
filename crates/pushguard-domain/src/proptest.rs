//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - the Unmonitored default and substring matching
//! - last-match-wins precedence
//! - determinism of repeated and parallel walks
//! - tallies agreeing with the per-file verdicts

use crate::commits::{process_batch, process_batch_parallel};
use crate::engine::evaluate_file;
use crate::model::{Access, Rule, RuleSet};
use proptest::prelude::*;
use pushguard_types::{Commit, FileVerdict, ProjectPath, Receipt, VerdictCounts};

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Repo-relative file paths built from a small alphabet so rules actually hit.
fn arb_path() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("src"),
            Just("secrets"),
            Just("docs"),
            Just("a"),
            Just("b"),
            Just("key.pem"),
            Just("main.rs"),
        ],
        1..5,
    )
    .prop_map(|segments| segments.join("/"))
}

fn arb_access() -> impl Strategy<Value = Access> {
    prop_oneof![Just(Access::Allow), Just(Access::Deny)]
}

/// Rule payloads: anchored (`/x`) and floating (`x`) fragments.
fn arb_payload() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_path().prop_map(|p| format!("/{p}")),
        arb_path(),
        Just(".pem".to_string()),
        Just("/".to_string()),
    ]
}

fn arb_rules() -> impl Strategy<Value = RuleSet> {
    prop::collection::vec((arb_access(), arb_payload()), 0..8).prop_map(|specs| {
        specs
            .into_iter()
            .map(|(access, payload)| Rule::new(access, &payload))
            .collect::<Vec<_>>()
            .into()
    })
}

fn arb_commit() -> impl Strategy<Value = Commit> {
    (
        prop::collection::vec(arb_path(), 0..4),
        prop::collection::vec(arb_path(), 0..4),
        prop::collection::vec(arb_path(), 0..4),
    )
        .prop_map(|(added, modified, removed)| Commit {
            added,
            modified,
            removed,
            ..Commit::default()
        })
}

fn arb_commits() -> impl Strategy<Value = Vec<Commit>> {
    prop::collection::vec(arb_commit(), 0..5)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn unmonitored_iff_no_rule_is_a_substring(path in arb_path(), rules in arb_rules()) {
        let eval = evaluate_file(&path, &rules, &mut Receipt::new());
        let normalized = ProjectPath::new(&path);
        let any_match = rules.iter().any(|r| normalized.as_str().contains(r.pattern.as_str()));
        prop_assert_eq!(eval.verdict == FileVerdict::Unmonitored, !any_match);
    }

    #[test]
    fn verdict_comes_from_last_matching_rule(path in arb_path(), rules in arb_rules()) {
        let eval = evaluate_file(&path, &rules, &mut Receipt::new());
        let normalized = ProjectPath::new(&path);
        let last = rules.iter().rev().find(|r| r.matches(&normalized));
        let expected = last.map(|r| r.access.verdict()).unwrap_or(FileVerdict::Unmonitored);
        prop_assert_eq!(eval.verdict, expected);
        prop_assert_eq!(eval.matched_rules.last(), last);
    }

    #[test]
    fn matched_rules_preserve_configuration_order(path in arb_path(), rules in arb_rules()) {
        let eval = evaluate_file(&path, &rules, &mut Receipt::new());
        let normalized = ProjectPath::new(&path);
        let expected: Vec<&Rule> = rules.iter().filter(|r| r.matches(&normalized)).collect();
        let actual: Vec<&Rule> = eval.matched_rules.iter().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn repeated_walks_are_identical(commits in arb_commits(), rules in arb_rules()) {
        let first = process_batch(&commits, &rules, &mut Receipt::new());
        let second = process_batch(&commits, &rules, &mut Receipt::new());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tallies_agree_with_verdicts(commits in arb_commits(), rules in arb_rules()) {
        let result = process_batch(&commits, &rules, &mut Receipt::new());

        let mut recount = VerdictCounts::default();
        for eval in result.evaluations() {
            recount.record(eval.verdict);
        }
        prop_assert_eq!(result.counts(), recount);

        let occurrences: usize = commits.iter().map(Commit::changed_file_count).sum();
        prop_assert_eq!(result.counts().total() as usize, occurrences);
    }

    #[test]
    fn parallel_walk_equals_sequential(
        commits in arb_commits(),
        rules in arb_rules(),
        workers in 1usize..6,
    ) {
        let sequential = process_batch(&commits, &rules, &mut Receipt::new());
        let parallel = process_batch_parallel(&commits, &rules, &mut Receipt::new(), workers)
            .expect("worker pool");
        prop_assert_eq!(sequential, parallel);
    }
}
