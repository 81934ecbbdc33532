use thiserror::Error;

/// Fatal config-loading failures. Any of these aborts the run before
/// evaluation; no notification is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("config line {line}: {reason}")]
    Syntax { line: usize, reason: &'static str },

    #[error("read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
