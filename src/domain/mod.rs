//! Domain logic - pure release rules independent of the hosting API

pub mod commit;
pub mod merge_request;
pub mod tag;
pub mod version;

pub use commit::{CommitKind, CommitTally, ParsedCommit};
pub use merge_request::{MergeRequest, MergeRequestState, NewMergeRequest};
pub use tag::{select_latest, LatestTag, Tag, TagPattern};
pub use version::Version;
