use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use reqwest::StatusCode;

use crate::domain::{MergeRequest, MergeRequestState, NewMergeRequest, Tag};
use crate::error::{ReleaseError, Result};
use crate::gitlab::client::{classify_failure, Operation};
use crate::gitlab::{CommitInfo, GitHost};

/// A call made against [MockGitHost], in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ListTags,
    ListCommits {
        since: Option<String>,
        branch: String,
    },
    CreateMergeRequest(NewMergeRequest),
    ApproveMergeRequest(u64),
    AwardEmoji {
        iid: u64,
        name: String,
    },
    GetMergeRequestStatus(u64),
    MergeMergeRequest(u64),
    CreateTag {
        name: String,
        reference: String,
    },
}

#[derive(Default)]
struct MockState {
    tags: Vec<Tag>,
    merge_request: Option<MergeRequest>,
    status_polls: usize,
    polls_since_merge: usize,
    calls: Vec<HostCall>,
}

/// Mock host for testing without network access
///
/// Behaves like a small GitLab project: tags created through it show up in
/// later listings, merge requests move through `opened` → `merged`, and any
/// operation can be made to fail with a chosen HTTP status.
pub struct MockGitHost {
    commits: Vec<CommitInfo>,
    next_iid: u64,
    has_conflicts: bool,
    unprepared_polls: usize,
    merge_lag_polls: usize,
    merge_commit_sha: Option<String>,
    failures: HashMap<Operation, (u16, String)>,
    state: Mutex<MockState>,
}

impl MockGitHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockGitHost {
            commits: Vec::new(),
            next_iid: 1,
            has_conflicts: false,
            unprepared_polls: 0,
            merge_lag_polls: 0,
            merge_commit_sha: Some("0123456789abcdef0123456789abcdef01234567".to_string()),
            failures: HashMap::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Seed existing tags
    pub fn with_tags<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut state = self.lock();
            for (i, name) in names.into_iter().enumerate() {
                state.tags.push(Tag::new(name).at(format!("{:040x}", i + 1)));
            }
        }
        self
    }

    /// Seed commits returned by every commit listing
    pub fn with_commits<I, S>(mut self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            let id = format!("{:040x}", 0x1000 + self.commits.len());
            self.commits.push(CommitInfo::new(id, message));
        }
        self
    }

    /// Iid handed to the next created merge request
    pub fn with_next_iid(mut self, iid: u64) -> Self {
        self.next_iid = iid;
        self
    }

    /// Report merge conflicts once the merge request is prepared
    pub fn with_conflicts(mut self) -> Self {
        self.has_conflicts = true;
        self
    }

    /// Number of status polls answered with "still checking"
    pub fn with_unprepared_polls(mut self, polls: usize) -> Self {
        self.unprepared_polls = polls;
        self
    }

    /// Number of status polls after a merge before the state reads `merged`
    pub fn with_merge_lag(mut self, polls: usize) -> Self {
        self.merge_lag_polls = polls;
        self
    }

    /// Sha reported for the merge commit; `None` mimics hosts that omit it
    pub fn with_merge_commit_sha(mut self, sha: Option<&str>) -> Self {
        self.merge_commit_sha = sha.map(str::to_string);
        self
    }

    /// Make `operation` answer with an HTTP error
    pub fn fail_with(mut self, operation: Operation, status: u16, message: &str) -> Self {
        self.failures
            .insert(operation, (status, format!(r#"{{"message":"{}"}}"#, message)));
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    /// Count calls matching a predicate
    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Tags currently known to the host, including ones created by a run
    pub fn tags(&self) -> Vec<Tag> {
        self.lock().tags.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded calls.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: HostCall) {
        self.lock().calls.push(call);
    }

    fn check(&self, operation: Operation) -> Result<()> {
        match self.failures.get(&operation) {
            Some((status, body)) => {
                let status = StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                Err(classify_failure(operation, status, body))
            }
            None => Ok(()),
        }
    }

    fn current_merge_request(state: &MockState, iid: u64) -> Result<MergeRequest> {
        state
            .merge_request
            .clone()
            .filter(|mr| mr.iid == iid)
            .ok_or_else(|| ReleaseError::not_found(format!("merge request !{} not found", iid)))
    }
}

impl Default for MockGitHost {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHost for MockGitHost {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        self.record(HostCall::ListTags);
        self.check(Operation::ListTags)?;
        Ok(self.tags())
    }

    fn list_commits(&self, since: Option<&str>, branch: &str) -> Result<Vec<CommitInfo>> {
        self.record(HostCall::ListCommits {
            since: since.map(str::to_string),
            branch: branch.to_string(),
        });
        self.check(Operation::ListCommits)?;
        Ok(self.commits.clone())
    }

    fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        self.record(HostCall::CreateMergeRequest(request.clone()));
        self.check(Operation::CreateMergeRequest)?;

        let mut state = self.lock();
        if let Some(existing) = &state.merge_request {
            if existing.state == MergeRequestState::Opened {
                return Err(ReleaseError::conflict(format!(
                    "Another open merge request already exists for this source branch: !{}",
                    existing.iid
                )));
            }
        }

        let mut mr = MergeRequest::opened(self.next_iid, request);
        mr.web_url = Some(format!(
            "https://gitlab.example.com/group/app/-/merge_requests/{}",
            self.next_iid
        ));
        state.merge_request = Some(mr.clone());
        state.status_polls = 0;
        Ok(mr)
    }

    fn approve_merge_request(&self, iid: u64) -> Result<()> {
        self.record(HostCall::ApproveMergeRequest(iid));
        self.check(Operation::ApproveMergeRequest)?;
        Self::current_merge_request(&self.lock(), iid).map(|_| ())
    }

    fn award_emoji(&self, iid: u64, name: &str) -> Result<()> {
        self.record(HostCall::AwardEmoji {
            iid,
            name: name.to_string(),
        });
        self.check(Operation::AwardEmoji)
    }

    fn get_merge_request_status(&self, iid: u64) -> Result<MergeRequest> {
        self.record(HostCall::GetMergeRequestStatus(iid));
        self.check(Operation::GetMergeRequest)?;

        let mut state = self.lock();
        let mut mr = Self::current_merge_request(&state, iid)?;

        if mr.state == MergeRequestState::Merged {
            state.polls_since_merge += 1;
            if state.polls_since_merge <= self.merge_lag_polls {
                mr.state = MergeRequestState::Opened;
                mr.merge_status = Some("merging".to_string());
            }
            return Ok(mr);
        }

        state.status_polls += 1;
        if state.status_polls <= self.unprepared_polls {
            mr.merge_status = Some("checking".to_string());
            mr.prepared_at = None;
        } else {
            mr.prepared_at = Some("2025-04-28T10:00:00.000Z".to_string());
            mr.has_conflicts = self.has_conflicts;
            mr.changes_count = Some(self.commits.len().to_string());
            mr.merge_status = Some(if self.has_conflicts {
                "conflict".to_string()
            } else {
                "mergeable".to_string()
            });
        }
        state.merge_request = Some(mr.clone());
        Ok(mr)
    }

    fn merge_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        self.record(HostCall::MergeMergeRequest(iid));
        self.check(Operation::MergeMergeRequest)?;

        let mut state = self.lock();
        let mut mr = Self::current_merge_request(&state, iid)?;
        if mr.has_conflicts {
            return Err(ReleaseError::merge(format!(
                "merging merge request failed: !{} has conflicts",
                iid
            )));
        }

        mr.state = MergeRequestState::Merged;
        mr.merge_commit_sha = self.merge_commit_sha.clone();
        state.merge_request = Some(mr.clone());
        state.polls_since_merge = 0;

        if self.merge_lag_polls > 0 {
            mr.state = MergeRequestState::Opened;
            mr.merge_status = Some("merging".to_string());
        }
        Ok(mr)
    }

    fn create_tag(&self, name: &str, reference: &str) -> Result<Tag> {
        self.record(HostCall::CreateTag {
            name: name.to_string(),
            reference: reference.to_string(),
        });
        self.check(Operation::CreateTag)?;

        let mut state = self.lock();
        if state.tags.iter().any(|t| t.name == name) {
            return Err(ReleaseError::tag_creation(format!(
                "creating tag failed: Tag {} already exists",
                name
            )));
        }

        let tag = Tag::new(name).at(reference);
        state.tags.push(tag.clone());
        Ok(tag)
    }
}
