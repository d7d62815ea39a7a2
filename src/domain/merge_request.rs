use std::fmt;

/// Merge statuses GitLab reports while it is still computing mergeability
const PENDING_MERGE_STATUSES: &[&str] = &[
    "unchecked",
    "checking",
    "cannot_be_merged_recheck",
    "preparing",
    "approvals_syncing",
];

/// Lifecycle state of a merge request as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRequestState {
    Opened,
    Closed,
    Locked,
    Merged,
    Other(String),
}

impl MergeRequestState {
    pub fn from_api(state: &str) -> Self {
        match state {
            "opened" => MergeRequestState::Opened,
            "closed" => MergeRequestState::Closed,
            "locked" => MergeRequestState::Locked,
            "merged" => MergeRequestState::Merged,
            other => MergeRequestState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeRequestState::Opened => f.write_str("opened"),
            MergeRequestState::Closed => f.write_str("closed"),
            MergeRequestState::Locked => f.write_str("locked"),
            MergeRequestState::Merged => f.write_str("merged"),
            MergeRequestState::Other(s) => f.write_str(s),
        }
    }
}

/// Request body for opening a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMergeRequest {
    pub source_branch: String,
    pub target_branch: String,
    pub title: String,
    pub remove_source_branch: bool,
}

/// Snapshot of a merge request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Project-scoped id used in every follow-up call
    pub iid: u64,
    pub title: String,
    pub source_branch: String,
    pub target_branch: String,
    pub state: MergeRequestState,
    pub merge_status: Option<String>,
    pub has_conflicts: bool,
    pub changes_count: Option<String>,
    pub prepared_at: Option<String>,
    pub merge_commit_sha: Option<String>,
    pub web_url: Option<String>,
}

impl MergeRequest {
    /// Minimal open merge request, as returned right after creation
    pub fn opened(iid: u64, request: &NewMergeRequest) -> Self {
        MergeRequest {
            iid,
            title: request.title.clone(),
            source_branch: request.source_branch.clone(),
            target_branch: request.target_branch.clone(),
            state: MergeRequestState::Opened,
            merge_status: None,
            has_conflicts: false,
            changes_count: None,
            prepared_at: None,
            merge_commit_sha: None,
            web_url: None,
        }
    }

    /// Whether the host has finished computing diff and mergeability.
    ///
    /// `has_conflicts` is only meaningful once this returns true.
    pub fn is_prepared(&self) -> bool {
        if self.prepared_at.is_none() {
            return false;
        }
        match self.merge_status.as_deref() {
            Some(status) => !PENDING_MERGE_STATUSES.contains(&status),
            None => true,
        }
    }

    pub fn is_merged(&self) -> bool {
        self.state == MergeRequestState::Merged
    }
}
