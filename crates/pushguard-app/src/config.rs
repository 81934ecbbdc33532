//! Directive-file loading: the only filesystem access in the run.

use camino::Utf8Path;
use pushguard_domain::policy::PolicyConfig;
use pushguard_settings::{ConfigError, parse_config};
use pushguard_types::Receipt;
use pushguard_types::receipt::ESSENTIAL;
use std::io::ErrorKind;

/// Read and parse the directive file at `path`.
///
/// A missing file is [`ConfigError::NotFound`]; it is never treated as an
/// empty policy.
pub fn load_config(path: &Utf8Path, receipt: &mut Receipt) -> Result<PolicyConfig, ConfigError> {
    let name = path.file_name().unwrap_or(path.as_str());
    receipt.append(format!("reading config file [{name}]"), ESSENTIAL);

    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            receipt.append(format!("config file [{name}] not found"), ESSENTIAL);
            ConfigError::NotFound {
                path: path.to_string(),
            }
        } else {
            ConfigError::Io {
                path: path.to_string(),
                source,
            }
        }
    })?;

    parse_config(&text, receipt)
}
