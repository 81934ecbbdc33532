//! Notification routing resolved from process variables.

/// Variable names read by [`RoutingConfig::from_lookup`].
pub mod vars {
    pub const WEBHOOK_URL: &str = "PUSHGUARD_WEBHOOK_URL";
    pub const CHANNEL: &str = "PUSHGUARD_CHANNEL";
    pub const CHANNEL_PRODUCTION: &str = "PUSHGUARD_CHANNEL_PRODUCTION";
    pub const CHANNEL_DEVELOPMENT: &str = "PUSHGUARD_CHANNEL_DEVELOPMENT";
    pub const ICON: &str = "PUSHGUARD_ICON";
    pub const USERNAME: &str = "PUSHGUARD_USERNAME";
    pub const LIVE_REPOSITORY: &str = "PUSHGUARD_LIVE_REPOSITORY";
    pub const LIVE_REF: &str = "PUSHGUARD_LIVE_REF";
}

const DEFAULT_ICON: &str = ":shield:";
const DEFAULT_USERNAME: &str = "pushguard";

/// The repository + ref pair that identifies production pushes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveTarget {
    pub repository: String,
    pub git_ref: String,
}

impl LiveTarget {
    pub fn matches(&self, repository: &str, git_ref: &str) -> bool {
        self.repository == repository && self.git_ref == git_ref
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoutingConfig {
    pub webhook_url: Option<String>,
    pub default_channel: String,
    pub production_channel: String,
    pub development_channel: String,
    pub icon: String,
    pub username: String,
    pub live_target: Option<LiveTarget>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl RoutingConfig {
    /// Resolve routing once. Blank values count as unset; the production and
    /// development channels fall back to the default channel.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let default_channel = get(vars::CHANNEL).unwrap_or_default();
        let live_target = match (get(vars::LIVE_REPOSITORY), get(vars::LIVE_REF)) {
            (Some(repository), Some(git_ref)) => Some(LiveTarget {
                repository,
                git_ref,
            }),
            _ => None,
        };

        Self {
            webhook_url: get(vars::WEBHOOK_URL),
            production_channel: get(vars::CHANNEL_PRODUCTION)
                .unwrap_or_else(|| default_channel.clone()),
            development_channel: get(vars::CHANNEL_DEVELOPMENT)
                .unwrap_or_else(|| default_channel.clone()),
            default_channel,
            icon: get(vars::ICON).unwrap_or_else(|| DEFAULT_ICON.to_string()),
            username: get(vars::USERNAME).unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            live_target,
        }
    }

    /// Whether a push to `repository` at `git_ref` targets the live pair.
    pub fn is_live(&self, repository: &str, git_ref: &str) -> bool {
        self.live_target
            .as_ref()
            .is_some_and(|t| t.matches(repository, git_ref))
    }
}
