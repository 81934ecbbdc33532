//! Shared test utilities for the pushguard workspace.
//!
//! The CLI integration tests compare run reports against golden files; they
//! need this outside of `#[cfg(test)]`, hence a crate of its own.

use serde_json::Value;

const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` only when the root
///    object looks like a run report (has `schema`, `tool`, `status`,
///    `counts`, and `files`).
///
/// 2. **Recursive**: `generated_at` and `timestamp` keys become
///    `"__TIMESTAMP__"` at any depth, which covers every receipt entry.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_report = ["schema", "tool", "status", "counts", "files"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_report
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String(VERSION_PLACEHOLDER.to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["generated_at", "timestamp"] {
                if map.contains_key(key) {
                    map.insert(
                        key.to_string(),
                        Value::String(TIMESTAMP_PLACEHOLDER.to_string()),
                    );
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_version_and_timestamps_are_replaced() {
        let input = json!({
            "schema": "pushguard.report.v1",
            "tool": { "name": "pushguard", "version": "0.1.0" },
            "generated_at": "2025-01-01T00:00:00Z",
            "status": "completed",
            "counts": { "allowed": 0, "denied": 1, "unmonitored": 0 },
            "files": [],
            "receipt": [
                { "timestamp": "2025-01-01T00:00:00.1Z", "message": "a", "required_verbosity": 0 },
                { "timestamp": "2025-01-01T00:00:00.2Z", "message": "b", "required_verbosity": 0 }
            ]
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["tool"]["name"], "pushguard");
        assert_eq!(result["generated_at"], "__TIMESTAMP__");
        assert_eq!(result["receipt"][0]["timestamp"], "__TIMESTAMP__");
        assert_eq!(result["receipt"][1]["timestamp"], "__TIMESTAMP__");
        assert_eq!(result["receipt"][1]["message"], "b");
    }

    #[test]
    fn commit_timestamps_in_non_report_json_are_normalized_but_version_kept() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" },
            "commits": [ { "id": "c1", "timestamp": "2025-01-01T00:00:00Z" } ]
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "2.0.0");
        assert_eq!(result["commits"][0]["timestamp"], "__TIMESTAMP__");
        assert_eq!(result["commits"][0]["id"], "c1");
    }
}
