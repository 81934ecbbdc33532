use crate::engine::evaluate_file;
use crate::model::{FileEvaluation, RuleSet, RunResult};
use pushguard_types::receipt::DETAIL;
use pushguard_types::{Commit, Receipt};
use rayon::prelude::*;

#[derive(Debug, thiserror::Error)]
#[error("failed to build evaluation worker pool")]
pub struct WorkerPoolError(#[from] rayon::ThreadPoolBuildError);

/// Walk every commit and evaluate each changed-file occurrence in order.
///
/// Files are not deduplicated: a path both added and removed in one commit,
/// or touched by two commits of the same push, is evaluated and counted once
/// per occurrence.
pub fn process_batch(commits: &[Commit], rules: &RuleSet, receipt: &mut Receipt) -> RunResult {
    let mut result = RunResult::default();
    if commits.is_empty() {
        return result;
    }

    receipt.append(format!("{} commits found in the payload", commits.len()), DETAIL);
    for (index, commit) in commits.iter().enumerate() {
        announce_commit(index, commit, receipt);
        for path in commit.changed_files() {
            result.push(evaluate_file(path, rules, receipt));
        }
    }

    result
}

/// Same contract as [`process_batch`], with file evaluations spread over a
/// bounded pool of `workers` threads.
///
/// Evaluations come back in walk order and tallies are merged after the join,
/// so the result equals the sequential one. Per-file receipt entries are
/// buffered per task and appended after the join; their interleaving with the
/// per-commit progress entries differs from the sequential walk.
pub fn process_batch_parallel(
    commits: &[Commit],
    rules: &RuleSet,
    receipt: &mut Receipt,
    workers: usize,
) -> Result<RunResult, WorkerPoolError> {
    if workers <= 1 || commits.is_empty() {
        return Ok(process_batch(commits, rules, receipt));
    }

    receipt.append(format!("{} commits found in the payload", commits.len()), DETAIL);
    let mut files: Vec<&str> = Vec::new();
    for (index, commit) in commits.iter().enumerate() {
        announce_commit(index, commit, receipt);
        files.extend(commit.changed_files());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;

    let template = receipt.fork();
    let partials: Vec<(FileEvaluation, Receipt)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                let mut local = template.fork();
                let evaluation = evaluate_file(path, rules, &mut local);
                (evaluation, local)
            })
            .collect()
    });

    let mut result = RunResult::default();
    for (evaluation, local) in partials {
        receipt.absorb(local);
        result.push(evaluation);
    }
    Ok(result)
}

fn announce_commit(index: usize, commit: &Commit, receipt: &mut Receipt) {
    receipt.append(format!("processing commit #{index}  {}", commit.id), DETAIL);
    receipt.append(
        format!("{} files to process", commit.changed_file_count()),
        DETAIL,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Access;
    use crate::test_support::{commit, rules};
    use pushguard_types::{FileVerdict, VerdictCounts};

    #[test]
    fn end_to_end_counts_for_single_commit() {
        let set = rules(&[(Access::Deny, "/secrets")]);
        let commits = vec![commit("c1", &["secrets/key.pem"], &[], &["README.md"])];

        let result = process_batch(&commits, &set, &mut Receipt::new());

        assert_eq!(
            result.counts(),
            VerdictCounts {
                allowed: 0,
                denied: 1,
                unmonitored: 1
            }
        );
        let denied: Vec<&str> = result.denied().map(|e| e.path.original()).collect();
        assert_eq!(denied, vec!["secrets/key.pem"]);
    }

    #[test]
    fn walk_order_is_added_modified_removed_per_commit() {
        let commits = vec![
            commit("c1", &["a"], &["b"], &["c"]),
            commit("c2", &["d"], &[], &[]),
        ];
        let result = process_batch(&commits, &RuleSet::new(), &mut Receipt::new());
        let order: Vec<&str> = result
            .evaluations()
            .iter()
            .map(|e| e.path.original())
            .collect();
        assert_eq!(order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn path_in_added_and_removed_is_counted_twice() {
        let set = rules(&[(Access::Deny, "/secrets")]);
        let commits = vec![commit("c1", &["secrets/x"], &[], &["secrets/x"])];
        let result = process_batch(&commits, &set, &mut Receipt::new());
        assert_eq!(result.counts().denied, 2);
        assert_eq!(result.evaluations().len(), 2);
    }

    #[test]
    fn path_repeated_across_commits_is_counted_twice() {
        let set = rules(&[(Access::Allow, "/src")]);
        let commits = vec![
            commit("c1", &[], &["src/lib.rs"], &[]),
            commit("c2", &[], &["src/lib.rs"], &[]),
        ];
        let result = process_batch(&commits, &set, &mut Receipt::new());
        assert_eq!(result.counts().allowed, 2);
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        let mut receipt = Receipt::with_threshold(DETAIL);
        let result = process_batch(&[], &rules(&[(Access::Deny, "/")]), &mut receipt);
        assert!(result.is_empty());
        assert_eq!(result.counts(), VerdictCounts::default());
        assert!(receipt.is_empty());
    }

    #[test]
    fn progress_entries_are_written_at_detail() {
        let commits = vec![commit("abc", &["a", "b"], &[], &[])];
        let mut receipt = Receipt::with_threshold(DETAIL);
        process_batch(&commits, &RuleSet::new(), &mut receipt);

        let messages: Vec<&str> = receipt.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages[0], "1 commits found in the payload");
        assert_eq!(messages[1], "processing commit #0  abc");
        assert_eq!(messages[2], "2 files to process");
        assert_eq!(messages.len(), 5);
    }

    #[test]
    fn parallel_walk_matches_sequential_walk() {
        let set = rules(&[
            (Access::Allow, "/src"),
            (Access::Deny, "/src/secret"),
            (Access::Deny, ".env"),
        ]);
        let commits = vec![
            commit("c1", &["src/a.rs", "src/secret/k"], &["docs/x.md"], &[".env"]),
            commit("c2", &["src/a.rs"], &[], &["src/secret/k"]),
            commit("c3", &[], &[], &[]),
        ];

        let sequential = process_batch(&commits, &set, &mut Receipt::new());
        let parallel =
            process_batch_parallel(&commits, &set, &mut Receipt::new(), 4).expect("pool");

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.counts().denied, 3);
        assert_eq!(parallel.evaluations()[2].verdict, FileVerdict::Unmonitored);
    }

    #[test]
    fn parallel_walk_merges_worker_receipts() {
        let commits = vec![commit("c1", &["a", "b", "c"], &[], &[])];
        let mut receipt = Receipt::with_threshold(DETAIL);
        process_batch_parallel(&commits, &RuleSet::new(), &mut receipt, 3).expect("pool");

        let verdict_lines = receipt
            .entries()
            .iter()
            .filter(|e| e.message.contains("the final result is NOT MONITORED"))
            .count();
        assert_eq!(verdict_lines, 3);
    }
}
