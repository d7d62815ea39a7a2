//! Release workflow orchestration
//!
//! The orchestrator drives one release run from tag discovery to the final
//! tag, through an injected [crate::gitlab::GitHost] and
//! [crate::ui::StatusReporter]. Progress is tracked as a [RunState] so a
//! caller can see exactly where a run stopped.

pub mod orchestrator;

pub use orchestrator::{merge_request_title, ReleaseOrchestrator};

use std::fmt;

use crate::domain::CommitTally;

/// One externally visible step of a release run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    FetchLatestTag,
    ListCommits,
    ClassifyCommits,
    ComputeVersion,
    CreateMergeRequest,
    ApproveMergeRequest,
    CheckConflicts,
    MergeMergeRequest,
    CreateTag,
}

impl Step {
    /// Label shown by the status reporter
    pub fn label(&self) -> &'static str {
        match self {
            Step::FetchLatestTag => "Fetch latest tag",
            Step::ListCommits => "List commits since tag",
            Step::ClassifyCommits => "Classify commits",
            Step::ComputeVersion => "Compute next version",
            Step::CreateMergeRequest => "Create merge request",
            Step::ApproveMergeRequest => "Approve merge request",
            Step::CheckConflicts => "Check merge conflicts",
            Step::MergeMergeRequest => "Merge merge request",
            Step::CreateTag => "Create tag",
        }
    }

    /// State reached when this step succeeds.
    ///
    /// Listing commits has no state of its own; the run only counts as
    /// `CommitsCounted` once they are classified.
    pub fn completes(&self) -> Option<RunState> {
        match self {
            Step::FetchLatestTag => Some(RunState::TagFetched),
            Step::ListCommits => None,
            Step::ClassifyCommits => Some(RunState::CommitsCounted),
            Step::ComputeVersion => Some(RunState::VersionComputed),
            Step::CreateMergeRequest => Some(RunState::MrCreated),
            Step::ApproveMergeRequest => Some(RunState::MrApproved),
            Step::CheckConflicts => Some(RunState::ConflictChecked),
            Step::MergeMergeRequest => Some(RunState::Merged),
            Step::CreateTag => Some(RunState::Tagged),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress of a run; `Failed` is absorbing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    TagFetched,
    CommitsCounted,
    VersionComputed,
    MrCreated,
    MrApproved,
    ConflictChecked,
    Merged,
    Tagged,
    Done,
    Failed(Step),
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Tag the version was derived from (possibly the bootstrap tag)
    pub previous_tag: String,
    pub tally: CommitTally,
    pub new_tag: String,
    pub merge_request_iid: u64,
    pub merge_request_title: String,
    pub web_url: Option<String>,
    /// Commit sha or branch name the new tag was created at
    pub tagged_ref: String,
}
