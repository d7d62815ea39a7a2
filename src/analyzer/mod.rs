//! Analysis engine for deriving the next release from commits

pub mod version_analyzer;

pub use version_analyzer::{VersionAnalyzer, VersionProposal};
