/// Fixed prefix that anchors changed-file paths and root-level rule patterns.
pub const PROJECT_ROOT_MARKER: &str = "[PROOT]";

/// A changed-file path together with its project-root anchored form.
///
/// The normalized form is always `[PROOT]/` followed by the path exactly as the
/// push payload reported it. No slash folding or `./` stripping happens here:
/// rule matching is plain substring containment on this string.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectPath {
    normalized: String,
    original: String,
}

impl ProjectPath {
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        let original = path.as_ref().to_string();
        Self {
            normalized: format!("{PROJECT_ROOT_MARKER}/{original}"),
            original,
        }
    }

    /// The anchored form rules are matched against.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}

/// Anchor a rule payload to the project root.
///
/// Payloads starting with `/` name a root-relative location and get the marker
/// prepended; anything else is kept as-is and may match mid-path.
pub fn anchor_pattern(payload: &str) -> String {
    if payload.starts_with('/') {
        format!("{PROJECT_ROOT_MARKER}{payload}")
    } else {
        payload.to_string()
    }
}
