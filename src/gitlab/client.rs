use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{MergeRequest, MergeRequestState, NewMergeRequest, Tag};
use crate::error::{ReleaseError, Result};
use crate::gitlab::{CommitInfo, GitHost};

const PER_PAGE: &str = "100";

/// Which call a response belongs to; decides how failures are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListTags,
    ListCommits,
    CreateMergeRequest,
    ApproveMergeRequest,
    AwardEmoji,
    GetMergeRequest,
    MergeMergeRequest,
    CreateTag,
}

impl Operation {
    fn describe(&self) -> &'static str {
        match self {
            Operation::ListTags => "listing tags",
            Operation::ListCommits => "listing commits",
            Operation::CreateMergeRequest => "creating merge request",
            Operation::ApproveMergeRequest => "approving merge request",
            Operation::AwardEmoji => "awarding emoji",
            Operation::GetMergeRequest => "reading merge request",
            Operation::MergeMergeRequest => "merging merge request",
            Operation::CreateTag => "creating tag",
        }
    }
}

/// Map a non-success response onto the error kind the orchestrator reports.
pub fn classify_failure(operation: Operation, status: StatusCode, body: &str) -> ReleaseError {
    let detail = format!(
        "{} failed: {}",
        operation.describe(),
        extract_message(body).unwrap_or_else(|| status.to_string())
    );

    match (operation, status) {
        (Operation::MergeMergeRequest, _) => ReleaseError::merge(detail),
        (_, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => ReleaseError::permission(detail),
        (Operation::CreateMergeRequest, StatusCode::CONFLICT) => ReleaseError::conflict(detail),
        (Operation::CreateTag, _) => ReleaseError::tag_creation(detail),
        (_, StatusCode::NOT_FOUND) => ReleaseError::not_found(detail),
        _ => ReleaseError::api(status.as_u16(), detail),
    }
}

/// Pull the human-readable part out of a GitLab error body.
///
/// GitLab answers with `{"message": ...}` or `{"error": ...}` where the
/// message may itself be a string, a list or an object.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    let value: serde_json::Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(_) => return Some(trimmed.to_string()),
    };

    let message = value.get("message").or_else(|| value.get("error"))?;
    Some(match message {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).unwrap_or_else(|| item.to_string()))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
struct ApiCommitRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ApiTag {
    name: String,
    commit: Option<ApiCommitRef>,
}

impl From<ApiTag> for Tag {
    fn from(tag: ApiTag) -> Self {
        Tag {
            name: tag.name,
            commit_id: tag.commit.map(|c| c.id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<ApiCommit> for CommitInfo {
    fn from(commit: ApiCommit) -> Self {
        let message = commit
            .message
            .filter(|m| !m.trim().is_empty())
            .or(commit.title)
            .unwrap_or_default();
        CommitInfo {
            id: commit.id,
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiCompare {
    #[serde(default)]
    commits: Vec<ApiCommit>,
}

#[derive(Debug, Deserialize)]
struct ApiMergeRequest {
    iid: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    source_branch: String,
    #[serde(default)]
    target_branch: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    merge_status: Option<String>,
    #[serde(default)]
    detailed_merge_status: Option<String>,
    #[serde(default)]
    has_conflicts: bool,
    #[serde(default)]
    changes_count: Option<String>,
    #[serde(default)]
    prepared_at: Option<String>,
    #[serde(default)]
    merge_commit_sha: Option<String>,
    #[serde(default)]
    squash_commit_sha: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
}

impl From<ApiMergeRequest> for MergeRequest {
    fn from(mr: ApiMergeRequest) -> Self {
        MergeRequest {
            iid: mr.iid,
            title: mr.title,
            source_branch: mr.source_branch,
            target_branch: mr.target_branch,
            state: MergeRequestState::from_api(&mr.state),
            merge_status: mr.detailed_merge_status.or(mr.merge_status),
            has_conflicts: mr.has_conflicts,
            changes_count: mr.changes_count,
            prepared_at: mr.prepared_at,
            merge_commit_sha: mr.merge_commit_sha.or(mr.squash_commit_sha),
            web_url: mr.web_url,
        }
    }
}

/// Blocking client for the GitLab v4 REST API, scoped to one project
pub struct GitLabClient {
    http: Client,
    api_url: Url,
    project: String,
    token: String,
}

impl GitLabClient {
    /// Creates a client for `project` (numeric id or `group/name` path).
    ///
    /// # Arguments
    /// * `api_url` - API root, e.g. `https://gitlab.com/api/v4`
    /// * `project` - Project id or full path
    /// * `token` - Personal/project access token sent as `PRIVATE-TOKEN`
    /// * `timeout` - Per-request timeout
    pub fn new(api_url: &str, project: &str, token: &str, timeout: Duration) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .map_err(|e| ReleaseError::config(format!("Invalid API URL '{}': {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(ReleaseError::config(format!(
                "Invalid API URL '{}': not a base URL",
                api_url
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gitlab-release/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GitLabClient {
            http,
            api_url,
            project: project.to_string(),
            token: token.to_string(),
        })
    }

    /// Build `{api}/projects/{project}/{segments...}`, percent-encoding each
    /// segment so path-style project ids become `group%2Fname`.
    pub fn project_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ReleaseError::config("API URL cannot carry a path"))?;
            path.pop_if_empty().push("projects").push(&self.project);
            path.extend(segments);
        }
        Ok(url)
    }

    fn send(&self, request: RequestBuilder, operation: Operation) -> Result<Response> {
        let response = request.header("PRIVATE-TOKEN", &self.token).send()?;
        let status = response.status();
        log::debug!("{} -> {}", operation.describe(), status);

        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().unwrap_or_default();
            Err(classify_failure(operation, status, &body))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url, operation: Operation) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self.send(self.http.get(url), operation)?;
        Ok(response.json()?)
    }

    /// Follow GitLab's `x-next-page` header until the listing is exhausted
    fn get_paged<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
        operation: Operation,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = "1".to_string();

        loop {
            log::debug!("GET {} (page {})", url, page);
            let request = self
                .http
                .get(url.clone())
                .query(query)
                .query(&[("per_page", PER_PAGE), ("page", page.as_str())]);
            let response = self.send(request, operation)?;

            let next_page = response
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let mut batch: Vec<T> = response.json()?;
            items.append(&mut batch);

            match next_page {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(items)
    }
}

impl GitHost for GitLabClient {
    fn list_tags(&self) -> Result<Vec<Tag>> {
        let url = self.project_url(&["repository", "tags"])?;
        let tags: Vec<ApiTag> = self.get_paged(url, &[], Operation::ListTags)?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    fn list_commits(&self, since: Option<&str>, branch: &str) -> Result<Vec<CommitInfo>> {
        let commits: Vec<ApiCommit> = match since {
            Some(from) => {
                let mut url = self.project_url(&["repository", "compare"])?;
                url.query_pairs_mut()
                    .append_pair("from", from)
                    .append_pair("to", branch);
                let compare: ApiCompare = self.get_json(url, Operation::ListCommits)?;
                compare.commits
            }
            None => {
                let url = self.project_url(&["repository", "commits"])?;
                self.get_paged(url, &[("ref_name", branch)], Operation::ListCommits)?
            }
        };
        Ok(commits.into_iter().map(CommitInfo::from).collect())
    }

    fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        let url = self.project_url(&["merge_requests"])?;
        log::debug!("POST {}", url);
        let body = json!({
            "source_branch": request.source_branch,
            "target_branch": request.target_branch,
            "title": request.title,
            "remove_source_branch": request.remove_source_branch,
        });
        let response = self.send(
            self.http.post(url).json(&body),
            Operation::CreateMergeRequest,
        )?;
        let created: ApiMergeRequest = response.json()?;
        Ok(created.into())
    }

    fn approve_merge_request(&self, iid: u64) -> Result<()> {
        let iid = iid.to_string();
        let url = self.project_url(&["merge_requests", &iid, "approve"])?;
        log::debug!("POST {}", url);
        self.send(self.http.post(url), Operation::ApproveMergeRequest)?;
        Ok(())
    }

    fn award_emoji(&self, iid: u64, name: &str) -> Result<()> {
        let iid = iid.to_string();
        let mut url = self.project_url(&["merge_requests", &iid, "award_emoji"])?;
        url.query_pairs_mut().append_pair("name", name);
        log::debug!("POST {}", url);
        self.send(self.http.post(url), Operation::AwardEmoji)?;
        Ok(())
    }

    fn get_merge_request_status(&self, iid: u64) -> Result<MergeRequest> {
        let iid = iid.to_string();
        let url = self.project_url(&["merge_requests", &iid])?;
        let mr: ApiMergeRequest = self.get_json(url, Operation::GetMergeRequest)?;
        Ok(mr.into())
    }

    fn merge_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        let iid = iid.to_string();
        let url = self.project_url(&["merge_requests", &iid, "merge"])?;
        log::debug!("PUT {}", url);
        let response = self.send(self.http.put(url), Operation::MergeMergeRequest)?;
        let merged: ApiMergeRequest = response.json()?;
        Ok(merged.into())
    }

    fn create_tag(&self, name: &str, reference: &str) -> Result<Tag> {
        let url = self.project_url(&["repository", "tags"])?;
        log::debug!("POST {} ({} -> {})", url, name, reference);
        let body = json!({ "tag_name": name, "ref": reference });
        let response = self.send(self.http.post(url).json(&body), Operation::CreateTag)?;
        let created: ApiTag = response.json()?;
        Ok(created.into())
    }
}
