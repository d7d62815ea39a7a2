use std::fmt;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the operator but never stop the run.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// The repository has no version tag yet; the bootstrap tag is used
    NoPreviousTag { bootstrap_tag: String },
    /// Tags that exist but cannot be read as a release version
    UnparsableTags { tags: Vec<String> },
    /// No commits between the latest tag and the source branch head
    NoNewCommits { latest_tag: String, branch: String },
    /// Awarding an emoji after approval failed
    EmojiAwardFailed { emoji: String, reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::NoPreviousTag { bootstrap_tag } => {
                write!(
                    f,
                    "No release tag found, starting from '{}'",
                    bootstrap_tag
                )
            }
            ReleaseWarning::UnparsableTags { tags } => {
                const SHOWN: usize = 5;
                let listed = tags
                    .iter()
                    .take(SHOWN)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if tags.len() > SHOWN {
                    write!(
                        f,
                        "Ignored {} tag(s) that are not versions: {} and {} more",
                        tags.len(),
                        listed,
                        tags.len() - SHOWN
                    )
                } else {
                    write!(
                        f,
                        "Ignored {} tag(s) that are not versions: {}",
                        tags.len(),
                        listed
                    )
                }
            }
            ReleaseWarning::NoNewCommits { latest_tag, branch } => {
                write!(
                    f,
                    "No new commits on '{}' since tag '{}'",
                    branch, latest_tag
                )
            }
            ReleaseWarning::EmojiAwardFailed { emoji, reason } => {
                write!(f, "Could not award emoji '{}': {}", emoji, reason)
            }
        }
    }
}
