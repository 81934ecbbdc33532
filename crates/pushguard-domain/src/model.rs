use pushguard_types::{FileRecord, FileVerdict, ProjectPath, VerdictCounts, anchor_pattern};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn verdict(self) -> FileVerdict {
        match self {
            Access::Allow => FileVerdict::Allowed,
            Access::Deny => FileVerdict::Denied,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Access::Allow => "ALLOW",
            Access::Deny => "DENY",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub access: Access,
    /// Anchored pattern the engine matches with.
    pub pattern: String,
    /// Payload exactly as written in the config file.
    pub original_pattern: String,
}

impl Rule {
    pub fn new(access: Access, payload: &str) -> Self {
        Self {
            access,
            pattern: anchor_pattern(payload),
            original_pattern: payload.to_string(),
        }
    }

    pub fn allow(payload: &str) -> Self {
        Self::new(Access::Allow, payload)
    }

    pub fn deny(payload: &str) -> Self {
        Self::new(Access::Deny, payload)
    }

    /// Plain substring containment. Not a glob, not a regex: `/src` also
    /// matches `[PROOT]/src-old/x` because the pattern need not end on a
    /// segment boundary.
    pub fn matches(&self, path: &ProjectPath) -> bool {
        path.as_str().contains(self.pattern.as_str())
    }
}

/// Rules in configuration order. Order is precedence: later rules win.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn count(&self, access: Access) -> usize {
        self.rules.iter().filter(|r| r.access == access).count()
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEvaluation {
    pub path: ProjectPath,
    pub verdict: FileVerdict,
    /// Every rule that matched, in configuration order.
    pub matched_rules: Vec<Rule>,
}

impl FileEvaluation {
    pub fn unmonitored(path: ProjectPath) -> Self {
        Self {
            path,
            verdict: FileVerdict::Unmonitored,
            matched_rules: Vec::new(),
        }
    }

    pub fn to_record(&self) -> FileRecord {
        FileRecord {
            path: self.path.original().to_string(),
            normalized_path: self.path.as_str().to_string(),
            verdict: self.verdict,
            matched_rules: self
                .matched_rules
                .iter()
                .map(|r| r.pattern.clone())
                .collect(),
        }
    }
}

/// Evaluations in walk order plus tallies that always agree with them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    evaluations: Vec<FileEvaluation>,
    counts: VerdictCounts,
}

impl RunResult {
    pub fn push(&mut self, evaluation: FileEvaluation) {
        self.counts.record(evaluation.verdict);
        self.evaluations.push(evaluation);
    }

    pub fn evaluations(&self) -> &[FileEvaluation] {
        &self.evaluations
    }

    pub fn counts(&self) -> VerdictCounts {
        self.counts
    }

    pub fn denied(&self) -> impl Iterator<Item = &FileEvaluation> {
        self.evaluations
            .iter()
            .filter(|e| e.verdict == FileVerdict::Denied)
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }
}
