use crate::domain::{CommitTally, ParsedCommit, TagPattern, Version};
use crate::gitlab::CommitInfo;

/// Version change derived from the previous release and the commits since
#[derive(Debug, Clone, PartialEq)]
pub struct VersionProposal {
    pub previous: Version,
    pub tally: CommitTally,
    pub next: Version,
    pub next_tag: String,
}

impl VersionProposal {
    /// True when the commits since the last tag don't move the version
    pub fn is_unchanged(&self) -> bool {
        self.previous == self.next
    }
}

/// Classifies commits and derives the next release version
pub struct VersionAnalyzer {
    pattern: TagPattern,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(pattern: TagPattern) -> Self {
        VersionAnalyzer { pattern }
    }

    /// Count commits by kind
    pub fn tally_commits(&self, commits: &[CommitInfo]) -> CommitTally {
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        self.tally_messages(&messages)
    }

    /// Count commit messages by kind; every message lands in exactly one bucket
    pub fn tally_messages<S: AsRef<str>>(&self, messages: &[S]) -> CommitTally {
        let mut tally = CommitTally::default();
        for message in messages {
            tally.record(ParsedCommit::parse(message.as_ref()).kind());
        }
        tally
    }

    /// Compute the next version and its tag name
    pub fn propose(&self, previous: Version, tally: CommitTally) -> VersionProposal {
        let next = previous.bump(&tally);
        VersionProposal {
            previous,
            tally,
            next,
            next_tag: self.pattern.format(&next),
        }
    }
}

impl Default for VersionAnalyzer {
    fn default() -> Self {
        VersionAnalyzer::new(TagPattern::default())
    }
}
