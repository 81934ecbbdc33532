use crate::model::{Access, Rule, RuleSet};
use pushguard_types::Commit;

pub fn rules(specs: &[(Access, &str)]) -> RuleSet {
    specs
        .iter()
        .map(|(access, payload)| Rule::new(*access, payload))
        .collect::<Vec<_>>()
        .into()
}

pub fn commit(id: &str, added: &[&str], modified: &[&str], removed: &[&str]) -> Commit {
    let owned = |paths: &[&str]| paths.iter().map(|p| p.to_string()).collect::<Vec<_>>();
    Commit {
        id: id.to_string(),
        added: owned(added),
        modified: owned(modified),
        removed: owned(removed),
        ..Commit::default()
    }
}
