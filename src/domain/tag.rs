use crate::domain::Version;
use crate::error::{ReleaseError, Result};

/// Represents a release tag on the remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    /// Commit the tag points at; `None` for a bootstrap tag that does not
    /// exist remotely yet.
    pub commit_id: Option<String>,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            commit_id: None,
        }
    }

    /// Attach the commit this tag points at
    pub fn at(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = Some(commit_id.into());
        self
    }
}

/// Outcome of scanning a tag list for the latest release
#[derive(Debug, Clone, PartialEq)]
pub struct LatestTag {
    pub tag: Tag,
    pub version: Version,
    /// Tag names that could not be read as a version
    pub skipped: Vec<String>,
}

/// Pick the tag with the highest version.
///
/// Comparison is numeric per component, so `v2.10.0` beats `v2.9.0`.
/// Names that don't fit `pattern` are collected in `skipped` rather than
/// failing the scan. Returns `NotFound` when no tag carries a version.
pub fn select_latest(tags: &[Tag], pattern: &TagPattern) -> Result<LatestTag> {
    let mut best: Option<(&Tag, Version)> = None;
    let mut skipped = Vec::new();

    for tag in tags {
        match pattern.parse(&tag.name) {
            Ok(version) => {
                if best.map_or(true, |(_, current)| version > current) {
                    best = Some((tag, version));
                }
            }
            Err(_) => skipped.push(tag.name.clone()),
        }
    }

    match best {
        Some((tag, version)) => Ok(LatestTag {
            tag: tag.clone(),
            version,
            skipped,
        }),
        None => Err(ReleaseError::not_found(format!(
            "no version tag found among {} tag(s)",
            tags.len()
        ))),
    }
}

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
}

impl TagPattern {
    /// Create a new tag pattern
    pub fn new(pattern: impl Into<String>) -> Self {
        TagPattern {
            pattern: pattern.into(),
        }
    }

    /// Check the pattern carries exactly one `{version}` placeholder
    pub fn validate(&self) -> Result<()> {
        if self.pattern.matches("{version}").count() != 1 {
            return Err(ReleaseError::config(format!(
                "Tag pattern '{}' must contain exactly one {{version}} placeholder",
                self.pattern
            )));
        }
        Ok(())
    }

    /// Extract the version from a tag name produced by this pattern
    pub fn parse(&self, tag: &str) -> Result<Version> {
        let (prefix, suffix) = self
            .pattern
            .split_once("{version}")
            .unwrap_or((self.pattern.as_str(), ""));

        let mismatch = || {
            ReleaseError::version(format!(
                "Tag '{}' does not match pattern '{}'",
                tag, self.pattern
            ))
        };

        let rest = tag.strip_suffix(suffix).ok_or_else(mismatch)?;
        match rest.strip_prefix(prefix) {
            Some(version_part) => Version::parse_plain(version_part),
            // `v1.2.3`, `V1.2.3` and `1.2.3` name the same release
            None if prefix == "v" => Version::parse(rest),
            None => Err(mismatch()),
        }
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern::new("v{version}")
    }
}
