//! Config parsing and routing resolution.
//!
//! This crate is intentionally IO-free: it parses configuration provided as
//! strings and resolves routing from a caller-supplied variable lookup.

#![forbid(unsafe_code)]

mod directive;
mod error;
mod parse;
mod routing;

pub use directive::{
    COMMENT_PREFIXES, Directive, PREFIX_ALLOW, PREFIX_DENY, PREFIX_LEN, PREFIX_METADATA,
};
pub use error::ConfigError;
pub use parse::parse_config;
pub use routing::{LiveTarget, RoutingConfig, vars};

/// Default directive file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config";
