/// Where the invocation runs. Detected once at startup by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Container,
    Cloud,
}

impl Environment {
    pub fn label(self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Container => "container",
            Environment::Cloud => "cloud",
        }
    }
}

/// Execution facts injected into the report builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    pub environment: Environment,
    /// The push targets the configured live repository + ref.
    pub live_target: bool,
}

impl ExecutionContext {
    pub fn describe(&self) -> String {
        format!(
            "context: {}, live target: {}",
            self.environment.label(),
            if self.live_target { "yes" } else { "no" }
        )
    }
}
