use crate::domain::CommitTally;
use crate::error::{ReleaseError, Result};
use std::fmt;

/// Semantic version representation
///
/// Field order matters: the derived `Ord` compares major, then minor, then
/// patch, numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3))
    ///
    /// At most one `v`/`V` prefix is accepted.
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let clean_tag = trimmed
            .strip_prefix(|c| c == 'v' || c == 'V')
            .unwrap_or(trimmed);
        Self::parse_plain(clean_tag)
    }

    /// Parse a bare `MAJOR.MINOR.PATCH` triple.
    ///
    /// Pre-release and build metadata are rejected; release tags are plain
    /// triples.
    pub fn parse_plain(tag: &str) -> Result<Self> {
        let parsed = semver::Version::parse(tag).map_err(|e| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z ({})",
                tag, e
            ))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "Pre-release or build metadata not supported in release tag '{}'",
                tag
            )));
        }

        Ok(Version {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
        })
    }

    /// Apply a commit tally to this version.
    ///
    /// - features present: minor += feat, patch restarts at the fix count
    /// - fixes only: patch += fix
    /// - nothing to release: unchanged
    ///
    /// Major is never touched.
    pub fn bump(&self, tally: &CommitTally) -> Self {
        if tally.feat > 0 {
            Version {
                major: self.major,
                minor: self.minor + tally.feat as u64,
                patch: tally.fix as u64,
            }
        } else {
            Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch + tally.fix as u64,
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_uppercase_v() {
        let v = Version::parse("V1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("release").is_err());
        assert!(Version::parse("v1.2.x").is_err());
    }

    #[test]
    fn test_version_parse_single_prefix_only() {
        assert!(Version::parse("vv1.2.3").is_err());
        assert!(Version::parse("vV1.2.3").is_err());
        assert!(Version::parse_plain("v1.2.3").is_err());
        assert_eq!(Version::parse_plain("1.2.3").unwrap(), Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_rejects_prerelease() {
        assert!(Version::parse("v1.2.3-rc.1").is_err());
        assert!(Version::parse("v1.2.3+build.5").is_err());
    }

    #[test]
    fn test_version_ordering_is_numeric() {
        assert!(Version::new(2, 9, 0) < Version::new(2, 10, 0));
        assert!(Version::new(1, 99, 99) < Version::new(2, 0, 0));
        assert!(Version::new(2, 10, 1) > Version::new(2, 10, 0));
    }

    #[test]
    fn test_bump_features_and_fixes() {
        let v = Version::new(2, 18, 6);
        let tally = CommitTally {
            feat: 4,
            fix: 8,
            other: 0,
        };
        assert_eq!(v.bump(&tally), Version::new(2, 22, 8));
    }

    #[test]
    fn test_bump_features_only_resets_patch() {
        let v = Version::new(1, 2, 3);
        let tally = CommitTally {
            feat: 1,
            fix: 0,
            other: 5,
        };
        assert_eq!(v.bump(&tally), Version::new(1, 3, 0));
    }

    #[test]
    fn test_bump_fixes_only() {
        let v = Version::new(1, 2, 3);
        let tally = CommitTally {
            feat: 0,
            fix: 3,
            other: 1,
        };
        assert_eq!(v.bump(&tally), Version::new(1, 2, 6));
    }

    #[test]
    fn test_bump_empty_tally_is_noop() {
        let v = Version::new(4, 5, 6);
        assert_eq!(v.bump(&CommitTally::default()), v);

        let only_other = CommitTally {
            feat: 0,
            fix: 0,
            other: 12,
        };
        assert_eq!(v.bump(&only_other), v);
    }

    #[test]
    fn test_bump_never_touches_major() {
        let v = Version::new(7, 0, 0);
        let tally = CommitTally {
            feat: 100,
            fix: 100,
            other: 0,
        };
        assert_eq!(v.bump(&tally).major, 7);
    }

    #[test]
    fn test_version_display() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.to_string(), "1.2.3");
    }
}
