use crate::directive::{Directive, PREFIX_LEN};
use crate::error::ConfigError;
use pushguard_domain::model::{Access, Rule};
use pushguard_domain::policy::{Metadata, PolicyConfig};
use pushguard_types::Receipt;
use pushguard_types::ids::METADATA_VERBOSE_RECEIPT;
use pushguard_types::receipt::{DETAIL, ESSENTIAL, TRACE};

/// Parse a directive file into an ordered rule set and metadata.
///
/// Processing is line by line, top to bottom. The first malformed metadata
/// line aborts parsing; nothing after it is applied. A `verbosereceipt`
/// metadata entry changes the receipt threshold immediately, so later lines
/// are logged under the new threshold.
pub fn parse_config(text: &str, receipt: &mut Receipt) -> Result<PolicyConfig, ConfigError> {
    let mut cfg = PolicyConfig::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        receipt.append(format!("importing line #{line_no}  [{raw}]"), TRACE);

        if raw.len() < PREFIX_LEN {
            receipt.append("line too short, considered empty, skipped", TRACE);
            continue;
        }

        // A multi-byte character straddling the prefix boundary cannot be a
        // known prefix; report the whole line as unrecognized.
        let (prefix, payload) = match (raw.get(..PREFIX_LEN), raw.get(PREFIX_LEN..)) {
            (Some(prefix), Some(payload)) => (prefix, payload.trim()),
            _ => (raw, ""),
        };

        match Directive::from_prefix(prefix) {
            Directive::Allow => push_rule(&mut cfg, Access::Allow, payload, line_no, receipt),
            Directive::Deny => push_rule(&mut cfg, Access::Deny, payload, line_no, receipt),
            Directive::Metadata => {
                parse_metadata(payload, line_no, &mut cfg.metadata, receipt)?;
            }
            Directive::Comment => receipt.append("line is a comment, skipped", TRACE),
            Directive::Unrecognized(prefix) => {
                tracing::warn!(line = line_no, prefix, "unrecognized config directive");
                receipt.append(
                    format!("line #{line_no}: prefix [{prefix}] not valid, skipped"),
                    DETAIL,
                );
            }
        }
    }

    receipt.append(
        format!(
            "configuration loaded: {} allow rules, {} deny rules, {} metadata",
            cfg.rules.count(Access::Allow),
            cfg.rules.count(Access::Deny),
            cfg.metadata.len()
        ),
        ESSENTIAL,
    );
    Ok(cfg)
}

fn push_rule(
    cfg: &mut PolicyConfig,
    access: Access,
    payload: &str,
    line_no: usize,
    receipt: &mut Receipt,
) {
    // An empty pattern is a substring of every path.
    if payload.is_empty() {
        tracing::warn!(line = line_no, "rule directive without a pattern");
        receipt.append(
            format!("line #{line_no}: rule without a pattern, skipped"),
            DETAIL,
        );
        return;
    }

    let rule = Rule::new(access, payload);
    receipt.append(
        format!(
            "rule [{}] is allowed [{}]",
            rule.original_pattern,
            access == Access::Allow
        ),
        DETAIL,
    );
    cfg.rules.push(rule);
}

fn parse_metadata(
    payload: &str,
    line_no: usize,
    metadata: &mut Metadata,
    receipt: &mut Receipt,
) -> Result<(), ConfigError> {
    let syntax = |reason: &'static str, receipt: &mut Receipt| {
        receipt.append(format!("line #{line_no}: {reason}"), ESSENTIAL);
        ConfigError::Syntax {
            line: line_no,
            reason,
        }
    };

    let Some((key, value)) = payload.split_once('=') else {
        return Err(syntax("metadata line is missing the `=` assignment", receipt));
    };
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return Err(syntax("metadata key is empty", receipt));
    }
    if value.is_empty() {
        return Err(syntax("metadata value is empty", receipt));
    }

    receipt.append(
        format!("element [{key}] added to metadata with value [{value}]"),
        DETAIL,
    );
    metadata.insert(key, value);

    if key == METADATA_VERBOSE_RECEIPT {
        match value.parse() {
            Ok(threshold) => {
                receipt.set_threshold(threshold);
                receipt.append(
                    format!("updating receipt log level to {threshold}"),
                    DETAIL,
                );
            }
            Err(_) => {
                receipt.append(
                    format!("receipt log level [{value}] is not an integer, unchanged"),
                    DETAIL,
                );
            }
        }
    }

    Ok(())
}
