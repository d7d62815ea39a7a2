use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static CONVENTIONAL_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z]+)(?:\(([^)]*)\))?(!?):\s*(.*)$").expect("static regex is valid")
});

/// Release-relevant category of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitKind {
    Feat,
    Fix,
    Other,
}

impl fmt::Display for CommitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommitKind::Feat => "feat",
            CommitKind::Fix => "fix",
            CommitKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Parsed representation of a conventional commit subject
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    /// Lowercased type token; `None` for non-conventional subjects
    pub r#type: Option<String>,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse the subject line of a commit message
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    pub fn parse(message: &str) -> Self {
        let subject = message.lines().next().unwrap_or("").trim();

        if let Some(captures) = CONVENTIONAL_SUBJECT.captures(subject) {
            let r#type = captures.get(1).map(|m| m.as_str().to_lowercase());
            let scope = captures
                .get(2)
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty());
            let has_exclamation = captures.get(3).map(|m| m.as_str()) == Some("!");
            let description = captures
                .get(4)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();

            return ParsedCommit {
                r#type,
                scope,
                description,
                is_breaking_change: has_exclamation || message.contains("BREAKING CHANGE:"),
            };
        }

        ParsedCommit {
            r#type: None,
            scope: None,
            description: subject.to_string(),
            is_breaking_change: false,
        }
    }

    /// Classify for version arithmetic.
    ///
    /// Breaking markers do not promote anything; a `feat!:` is still a feat.
    pub fn kind(&self) -> CommitKind {
        match self.r#type.as_deref() {
            Some("feat") => CommitKind::Feat,
            Some("fix") => CommitKind::Fix,
            _ => CommitKind::Other,
        }
    }
}

/// Per-kind commit counts for one release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitTally {
    pub feat: usize,
    pub fix: usize,
    pub other: usize,
}

impl CommitTally {
    /// Count one commit of the given kind
    pub fn record(&mut self, kind: CommitKind) {
        match kind {
            CommitKind::Feat => self.feat += 1,
            CommitKind::Fix => self.fix += 1,
            CommitKind::Other => self.other += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.feat + self.fix + self.other
    }

    /// True when nothing would move the version
    pub fn is_noop(&self) -> bool {
        self.feat == 0 && self.fix == 0
    }
}

impl fmt::Display for CommitTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{fix: {}, feat: {}, other: {}}}",
            self.fix, self.feat, self.other
        )
    }
}
