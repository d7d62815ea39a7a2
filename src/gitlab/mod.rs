//! Git hosting API abstraction layer
//!
//! This module provides a trait-based abstraction over the remote calls a
//! release needs, allowing the real GitLab client and an in-memory mock to
//! be swapped behind the orchestrator.
//!
//! # Overview
//!
//! The primary abstraction is the [GitHost] trait. The concrete
//! implementations include:
//!
//! - [client::GitLabClient]: blocking HTTP client for the GitLab v4 REST API
//! - [mock::MockGitHost]: in-memory host that records every call, for tests
//!
//! # Usage
//!
//! Code should depend on the [GitHost] trait rather than a concrete
//! implementation.
//!
//! ```rust
//! # use gitlab_release::gitlab::GitHost;
//! # fn example<H: GitHost>(host: &H) -> gitlab_release::Result<()> {
//! let tags = host.list_tags()?;
//! let commits = host.list_commits(tags.first().map(|t| t.name.as_str()), "development")?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod mock;

pub use client::{GitLabClient, Operation};
pub use mock::{HostCall, MockGitHost};

use crate::domain::{MergeRequest, NewMergeRequest, Tag};
use crate::error::Result;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The commit hash
    pub id: String,
    /// The commit message (title first)
    pub message: String,
}

impl CommitInfo {
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        CommitInfo {
            id: id.into(),
            message: message.into(),
        }
    }
}

/// Remote operations a release run performs
///
/// ## Thread Safety
///
/// All implementors must be `Send + Sync` to allow safe sharing across threads.
///
/// ## Error Handling
///
/// Implementations map transport failures and non-success responses onto
/// [crate::error::ReleaseError] variants: `Permission` for rejected
/// credentials, `Conflict` for duplicate merge requests, `Merge` for a
/// refused merge, `TagCreation` for a refused tag and `Api` otherwise.
pub trait GitHost: Send + Sync {
    /// List every tag in the repository, in no particular order
    fn list_tags(&self) -> Result<Vec<Tag>>;

    /// List commits on `branch` that are not reachable from `since`
    ///
    /// With `since = None` every commit on the branch is returned.
    fn list_commits(&self, since: Option<&str>, branch: &str) -> Result<Vec<CommitInfo>>;

    /// Open a merge request
    ///
    /// # Returns
    /// * `Ok(MergeRequest)` - The created merge request, state `opened`
    /// * `Err(Conflict)` - An open merge request already exists for the branch pair
    fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest>;

    /// Approve a merge request with the current credential
    fn approve_merge_request(&self, iid: u64) -> Result<()>;

    /// Add an award emoji to a merge request
    fn award_emoji(&self, iid: u64, name: &str) -> Result<()>;

    /// Fetch the current status of a merge request
    fn get_merge_request_status(&self, iid: u64) -> Result<MergeRequest>;

    /// Merge a merge request, returning its state after the call
    fn merge_merge_request(&self, iid: u64) -> Result<MergeRequest>;

    /// Create a tag named `name` at `reference` (commit sha or branch)
    ///
    /// Must fail with `TagCreation` rather than move an existing tag.
    fn create_tag(&self, name: &str, reference: &str) -> Result<Tag>;
}
