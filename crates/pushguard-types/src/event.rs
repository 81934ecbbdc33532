//! Push-event payload as delivered by the source-control webhook.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! host's payload is ignored on deserialization. Every field defaults so that
//! a sparse or empty body (`{}`) still yields a valid, commit-less event.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(default)]
    pub commits: Vec<Commit>,
    #[serde(default)]
    pub repository: Repository,
    #[serde(default, rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub pusher: Pusher,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub author: Identity,
    #[serde(default)]
    pub committer: Identity,
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub modified: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub full_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pusher {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl PushEvent {
    /// Parse a webhook body. Blank input is treated as `{}`.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
    }
}

impl Commit {
    /// Added, then modified, then removed paths, duplicates preserved.
    pub fn changed_files(&self) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .chain(self.modified.iter())
            .chain(self.removed.iter())
            .map(String::as_str)
    }

    pub fn changed_file_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }
}
