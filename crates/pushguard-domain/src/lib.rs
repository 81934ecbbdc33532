//! Pure policy evaluation (no IO).
//!
//! Input: an ordered rule set loaded elsewhere and the commits of one push.
//! Output: per-file verdicts plus allowed/denied/unmonitored tallies.
//!
//! Matching is substring containment on the project-root anchored path, and
//! precedence is last-match-wins: every rule is applied in configuration
//! order and each match overwrites the verdict of the previous one.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;

mod commits;
mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use commits::{WorkerPoolError, process_batch, process_batch_parallel};
pub use engine::evaluate_file;
