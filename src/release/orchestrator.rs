use std::thread;

use chrono::{Local, NaiveDate};

use crate::analyzer::{VersionAnalyzer, VersionProposal};
use crate::boundary::ReleaseWarning;
use crate::config::{BranchesConfig, Config, ReleaseConfig};
use crate::domain::{
    select_latest, CommitTally, LatestTag, MergeRequest, NewMergeRequest, Tag, TagPattern,
};
use crate::error::{ReleaseError, Result};
use crate::gitlab::{CommitInfo, GitHost};
use crate::release::{ReleaseOutcome, RunState, Step};
use crate::ui::StatusReporter;

/// Title of the release merge request, e.g.
/// `Main Release: 28.04.2025 TAG: v2.22.8`
pub fn merge_request_title(prefix: &str, date: NaiveDate, tag: &str) -> String {
    format!("{}: {} TAG: {}", prefix, date.format("%d.%m.%Y"), tag)
}

/// Drives one release run against a [GitHost].
///
/// Steps run strictly in order and the first error aborts the run, leaving
/// the state at `Failed(step)`. Nothing is retried and nothing already done
/// remotely is rolled back.
pub struct ReleaseOrchestrator<H: GitHost, R: StatusReporter> {
    host: H,
    reporter: R,
    branches: BranchesConfig,
    release: ReleaseConfig,
    pattern: TagPattern,
    analyzer: VersionAnalyzer,
    date: NaiveDate,
    state: RunState,
    history: Vec<RunState>,
}

impl<H: GitHost, R: StatusReporter> ReleaseOrchestrator<H, R> {
    pub fn new(host: H, reporter: R, branches: BranchesConfig, release: ReleaseConfig) -> Self {
        let pattern = release.tag_pattern();
        ReleaseOrchestrator {
            host,
            reporter,
            branches,
            analyzer: VersionAnalyzer::new(pattern.clone()),
            pattern,
            release,
            date: Local::now().date_naive(),
            state: RunState::Init,
            history: vec![RunState::Init],
        }
    }

    pub fn from_config(host: H, reporter: R, config: &Config) -> Self {
        Self::new(host, reporter, config.branches.clone(), config.release.clone())
    }

    /// Fix the date used in the merge request title
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Every state the last run went through, starting with `Init`
    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Run the whole release: tag lookup, version computation, merge
    /// request lifecycle and the final tag.
    pub fn run(&mut self) -> Result<ReleaseOutcome> {
        self.state = RunState::Init;
        self.history = vec![RunState::Init];

        let (latest, known_tags) = self.execute(
            Step::FetchLatestTag,
            |o| o.fetch_latest_tag(),
            |(latest, _): &(LatestTag, Vec<String>)| Some(latest.tag.name.clone()),
        )?;

        let since = latest.tag.commit_id.as_ref().map(|_| latest.tag.name.clone());
        let source = self.branches.source.clone();
        let commits = self.execute(
            Step::ListCommits,
            |o| o.host.list_commits(since.as_deref(), &source),
            |commits: &Vec<CommitInfo>| Some(format!("{} commit(s)", commits.len())),
        )?;
        if commits.is_empty() {
            self.warn(ReleaseWarning::NoNewCommits {
                latest_tag: latest.tag.name.clone(),
                branch: source.clone(),
            });
        }

        let tally = self.execute(
            Step::ClassifyCommits,
            |o| Ok(o.analyzer.tally_commits(&commits)),
            |tally: &CommitTally| Some(tally.to_string()),
        )?;
        if tally.is_noop() {
            log::info!("no feat or fix commits since {}", latest.tag.name);
        }

        let proposal = self.execute(
            Step::ComputeVersion,
            |o| o.compute_version(&latest, tally, &known_tags),
            |p: &VersionProposal| Some(format!("{} -> {}", latest.tag.name, p.next_tag)),
        )?;
        log::info!(
            "next release {} ({} -> {}, {})",
            proposal.next_tag,
            proposal.previous,
            proposal.next,
            proposal.tally
        );

        let request = NewMergeRequest {
            source_branch: self.branches.source.clone(),
            target_branch: self.branches.target.clone(),
            title: merge_request_title(&self.release.title_prefix, self.date, &proposal.next_tag),
            remove_source_branch: false,
        };
        let created = self.execute(
            Step::CreateMergeRequest,
            |o| o.host.create_merge_request(&request),
            |mr: &MergeRequest| Some(format!("!{}", mr.iid)),
        )?;
        let iid = created.iid;

        self.execute(
            Step::ApproveMergeRequest,
            |o| o.approve(iid),
            |_: &()| None,
        )?;

        let checked = self.execute(
            Step::CheckConflicts,
            |o| o.check_conflicts(iid),
            |mr: &MergeRequest| mr.merge_status.clone(),
        )?;

        let merged = self.execute(
            Step::MergeMergeRequest,
            |o| o.merge(iid),
            |mr: &MergeRequest| mr.merge_commit_sha.clone(),
        )?;

        let reference = merged
            .merge_commit_sha
            .clone()
            .unwrap_or_else(|| self.branches.target.clone());
        self.execute(
            Step::CreateTag,
            |o| o.host.create_tag(&proposal.next_tag, &reference),
            |tag: &Tag| Some(tag.name.clone()),
        )?;

        self.transition(RunState::Done);
        Ok(ReleaseOutcome {
            previous_tag: latest.tag.name,
            tally: proposal.tally,
            new_tag: proposal.next_tag,
            merge_request_iid: iid,
            merge_request_title: request.title,
            web_url: checked.web_url.or(created.web_url),
            tagged_ref: reference,
        })
    }

    /// Run one step, reporting its outcome and advancing the state
    fn execute<T, F, D>(&mut self, step: Step, op: F, detail: D) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
        D: FnOnce(&T) -> Option<String>,
    {
        self.reporter.begin(step.label());
        match op(self) {
            Ok(value) => {
                let detail = detail(&value);
                self.reporter.succeed(step.label(), detail.as_deref());
                if let Some(state) = step.completes() {
                    self.transition(state);
                }
                Ok(value)
            }
            Err(err) => {
                log::debug!("step '{}' failed: {}", step, err);
                self.reporter.fail(step.label(), &err.to_string());
                self.transition(RunState::Failed(step));
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: RunState) {
        log::debug!("release state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
    }

    fn warn(&mut self, warning: ReleaseWarning) {
        log::warn!("{}", warning);
        self.reporter.warn(&warning);
    }

    /// Latest version tag plus the names of every tag seen
    fn fetch_latest_tag(&mut self) -> Result<(LatestTag, Vec<String>)> {
        let tags = self.host.list_tags()?;
        let names: Vec<String> = tags.iter().map(|t| t.name.clone()).collect();

        let latest = match select_latest(&tags, &self.pattern) {
            Ok(latest) => latest,
            Err(ReleaseError::NotFound(reason)) => match self.release.bootstrap_tag.clone() {
                Some(bootstrap) => {
                    let version = self.pattern.parse(&bootstrap)?;
                    self.warn(ReleaseWarning::NoPreviousTag {
                        bootstrap_tag: bootstrap.clone(),
                    });
                    LatestTag {
                        tag: Tag::new(bootstrap),
                        version,
                        skipped: names.clone(),
                    }
                }
                None => return Err(ReleaseError::NotFound(reason)),
            },
            Err(e) => return Err(e),
        };

        if !latest.skipped.is_empty() {
            self.warn(ReleaseWarning::UnparsableTags {
                tags: latest.skipped.clone(),
            });
        }
        Ok((latest, names))
    }

    fn compute_version(
        &self,
        latest: &LatestTag,
        tally: CommitTally,
        known_tags: &[String],
    ) -> Result<VersionProposal> {
        let proposal = self.analyzer.propose(latest.version, tally);
        if !known_tags.iter().any(|name| *name == proposal.next_tag) {
            return Ok(proposal);
        }

        if proposal.is_unchanged() {
            Err(ReleaseError::tag_creation(format!(
                "no feat or fix commits since {}, tag '{}' already exists",
                latest.tag.name, proposal.next_tag
            )))
        } else {
            Err(ReleaseError::tag_creation(format!(
                "tag '{}' already exists (commits since {}: {})",
                proposal.next_tag, latest.tag.name, tally
            )))
        }
    }

    /// Approve, then award the configured emojis; emoji failures only warn
    fn approve(&mut self, iid: u64) -> Result<()> {
        self.host.approve_merge_request(iid)?;
        for emoji in self.release.award_emojis.clone() {
            if let Err(e) = self.host.award_emoji(iid, &emoji) {
                self.warn(ReleaseWarning::EmojiAwardFailed {
                    emoji,
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    fn check_conflicts(&mut self, iid: u64) -> Result<MergeRequest> {
        let mr = self.poll_until(iid, "prepared", MergeRequest::is_prepared)?;

        self.reporter
            .note("Has conflicts:", &mr.has_conflicts.to_string());
        self.reporter.note(
            "Changes count:",
            mr.changes_count.as_deref().unwrap_or("unknown"),
        );
        self.reporter.note(
            "Merge status:",
            mr.merge_status.as_deref().unwrap_or("unknown"),
        );
        self.reporter.note("State:", &mr.state.to_string());
        if let Some(url) = &mr.web_url {
            self.reporter.note("URL:", url);
        }

        if mr.has_conflicts {
            return Err(ReleaseError::conflict(format!(
                "merge request !{} has conflicts and was left open",
                iid
            )));
        }
        Ok(mr)
    }

    fn merge(&mut self, iid: u64) -> Result<MergeRequest> {
        let mr = self.host.merge_merge_request(iid)?;
        if mr.is_merged() {
            return Ok(mr);
        }
        self.poll_until(iid, "merged", MergeRequest::is_merged)
    }

    /// Poll the merge request until `done` holds, at most `max_polls` times
    fn poll_until(
        &mut self,
        iid: u64,
        what: &str,
        done: fn(&MergeRequest) -> bool,
    ) -> Result<MergeRequest> {
        let max_polls = self.release.max_polls;
        for attempt in 1..=max_polls {
            let mr = self.host.get_merge_request_status(iid)?;
            if done(&mr) {
                return Ok(mr);
            }
            log::debug!(
                "merge request !{} not {} yet (poll {}/{}, status {:?})",
                iid,
                what,
                attempt,
                max_polls,
                mr.merge_status
            );
            if attempt < max_polls {
                thread::sleep(self.release.poll_interval());
            }
        }
        Err(ReleaseError::api(
            200,
            format!(
                "merge request !{} was not {} after {} polls",
                iid, what, max_polls
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::gitlab::{HostCall, MockGitHost, Operation};
    use crate::ui::{RecordingReporter, ReportEvent};

    fn release_config() -> ReleaseConfig {
        ReleaseConfig {
            poll_interval_secs: 0,
            max_polls: 5,
            ..ReleaseConfig::default()
        }
    }

    fn orchestrator(host: MockGitHost) -> ReleaseOrchestrator<MockGitHost, RecordingReporter> {
        ReleaseOrchestrator::new(
            host,
            RecordingReporter::new(),
            BranchesConfig::default(),
            release_config(),
        )
        .with_date(NaiveDate::from_ymd_opt(2025, 4, 28).unwrap())
    }

    fn release_commits() -> Vec<String> {
        let mut messages: Vec<String> = (0..4).map(|i| format!("feat: feature {}", i)).collect();
        messages.extend((0..8).map(|i| format!("fix(api): bug {}", i)));
        messages.push("chore: bump deps".to_string());
        messages
    }

    #[test]
    fn test_merge_request_title() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
        assert_eq!(
            merge_request_title("Main Release", date, "v2.22.8"),
            "Main Release: 08.04.2025 TAG: v2.22.8"
        );
    }

    #[test]
    fn test_full_run() {
        let host = MockGitHost::new()
            .with_tags(["v2.9.0", "v2.18.6", "v2.10.0"])
            .with_commits(release_commits())
            .with_next_iid(17);
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();

        assert_eq!(outcome.previous_tag, "v2.18.6");
        assert_eq!(outcome.new_tag, "v2.22.8");
        assert_eq!(outcome.tally.feat, 4);
        assert_eq!(outcome.tally.fix, 8);
        assert_eq!(outcome.tally.other, 1);
        assert_eq!(outcome.merge_request_iid, 17);
        assert_eq!(
            outcome.merge_request_title,
            "Main Release: 28.04.2025 TAG: v2.22.8"
        );
        assert_eq!(outcome.tagged_ref, "0123456789abcdef0123456789abcdef01234567");
        assert_eq!(orch.state(), RunState::Done);
        assert_eq!(
            orch.history(),
            &[
                RunState::Init,
                RunState::TagFetched,
                RunState::CommitsCounted,
                RunState::VersionComputed,
                RunState::MrCreated,
                RunState::MrApproved,
                RunState::ConflictChecked,
                RunState::Merged,
                RunState::Tagged,
                RunState::Done,
            ]
        );
        assert!(orch.host().tags().iter().any(|t| t.name == "v2.22.8"));
        assert!(orch.reporter().failures().is_empty());
    }

    #[test]
    fn test_commits_listed_since_latest_tag_on_source_branch() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"]);
        let mut orch = orchestrator(host);
        orch.run().unwrap();

        assert!(orch.host().calls().contains(&HostCall::ListCommits {
            since: Some("v1.0.0".to_string()),
            branch: "development".to_string(),
        }));
    }

    #[test]
    fn test_call_order() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["feat: a"]);
        let mut orch = orchestrator(host);
        orch.run().unwrap();

        let calls = orch.host().calls();
        let position = |pred: fn(&HostCall) -> bool| calls.iter().position(pred).unwrap();
        let create = position(|c| matches!(c, HostCall::CreateMergeRequest(_)));
        let approve = position(|c| matches!(c, HostCall::ApproveMergeRequest(_)));
        let status = position(|c| matches!(c, HostCall::GetMergeRequestStatus(_)));
        let merge = position(|c| matches!(c, HostCall::MergeMergeRequest(_)));
        let tag = position(|c| matches!(c, HostCall::CreateTag { .. }));
        assert!(create < approve && approve < status && status < merge && merge < tag);
    }

    #[test]
    fn test_emojis_awarded_after_approval() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"]);
        let mut orch = orchestrator(host);
        orch.run().unwrap();

        let emojis: Vec<String> = orch
            .host()
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::AwardEmoji { name, .. } => Some(name),
                _ => None,
            })
            .collect();
        assert_eq!(emojis, vec!["no_mouth", "thumbsup"]);
    }

    #[test]
    fn test_emoji_failure_is_only_a_warning() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .fail_with(Operation::AwardEmoji, 404, "404 Not Found");
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();
        assert_eq!(outcome.new_tag, "v1.0.1");
        let warnings = orch.reporter().warnings();
        assert_eq!(warnings.len(), 2);
        assert!(matches!(
            warnings[0],
            ReleaseWarning::EmojiAwardFailed { emoji, .. } if emoji == "no_mouth"
        ));
    }

    #[test]
    fn test_conflict_aborts_before_merge() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["feat: a"])
            .with_conflicts();
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Conflict(_)));
        assert_eq!(orch.state(), RunState::Failed(Step::CheckConflicts));
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::MergeMergeRequest(_) | HostCall::CreateTag { .. })),
            0
        );
        assert_eq!(orch.reporter().failures(), vec!["Check merge conflicts"]);
    }

    #[test]
    fn test_conflict_check_prints_details() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["feat: a"]);
        let mut orch = orchestrator(host);
        orch.run().unwrap();

        let notes: Vec<(&str, &str)> = orch
            .reporter()
            .events()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Note(label, detail) => Some((label.as_str(), detail.as_str())),
                _ => None,
            })
            .collect();
        assert!(notes.contains(&("Has conflicts:", "false")));
        assert!(notes.contains(&("Changes count:", "1")));
        assert!(notes.contains(&("Merge status:", "mergeable")));
        assert!(notes.contains(&("State:", "opened")));
        assert!(notes
            .iter()
            .any(|(label, url)| *label == "URL:" && url.starts_with("https://gitlab.example.com/")));
    }

    #[test]
    fn test_failed_merge_request_creation_stops_run() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["feat: a"])
            .fail_with(
                Operation::CreateMergeRequest,
                409,
                "Another open merge request already exists for this source branch: !3",
            );
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Conflict(_)));
        assert_eq!(orch.state(), RunState::Failed(Step::CreateMergeRequest));
        assert_eq!(
            orch.host().count_calls(|c| matches!(
                c,
                HostCall::ApproveMergeRequest(_)
                    | HostCall::MergeMergeRequest(_)
                    | HostCall::CreateTag { .. }
            )),
            0
        );
    }

    #[test]
    fn test_permission_denied_on_approval() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["feat: a"])
            .fail_with(Operation::ApproveMergeRequest, 401, "401 Unauthorized");
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Permission(_)));
        assert_eq!(orch.state(), RunState::Failed(Step::ApproveMergeRequest));
    }

    #[test]
    fn test_bootstrap_when_no_tags() {
        let host = MockGitHost::new().with_commits(["feat: first", "fix: typo"]);
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();
        assert_eq!(outcome.previous_tag, "v0.0.0");
        assert_eq!(outcome.new_tag, "v0.1.1");
        assert!(orch.host().calls().contains(&HostCall::ListCommits {
            since: None,
            branch: "development".to_string(),
        }));
        assert!(orch.reporter().warnings().contains(&&ReleaseWarning::NoPreviousTag {
            bootstrap_tag: "v0.0.0".to_string()
        }));
    }

    #[test]
    fn test_no_tags_without_bootstrap_fails() {
        let host = MockGitHost::new().with_tags(["nightly"]);
        let release = ReleaseConfig {
            bootstrap_tag: None,
            ..release_config()
        };
        let mut orch = ReleaseOrchestrator::new(
            host,
            RecordingReporter::new(),
            BranchesConfig::default(),
            release,
        );

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::NotFound(_)));
        assert_eq!(orch.state(), RunState::Failed(Step::FetchLatestTag));
        assert_eq!(orch.history(), &[RunState::Init, RunState::Failed(Step::FetchLatestTag)]);
    }

    #[test]
    fn test_unparsable_tags_are_skipped_with_warning() {
        let host = MockGitHost::new()
            .with_tags(["nightly", "v1.2.3", "v1.3.0-rc.1"])
            .with_commits(["fix: a"]);
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();
        assert_eq!(outcome.previous_tag, "v1.2.3");
        assert!(orch.reporter().warnings().contains(&&ReleaseWarning::UnparsableTags {
            tags: vec!["nightly".to_string(), "v1.3.0-rc.1".to_string()],
        }));
    }

    #[test]
    fn test_unchanged_version_fails_before_merge_request() {
        let host = MockGitHost::new()
            .with_tags(["v1.4.2"])
            .with_commits(["docs: readme"]);
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::TagCreation(_)));
        assert!(err.to_string().contains("no feat or fix commits since v1.4.2"));
        assert_eq!(orch.state(), RunState::Failed(Step::ComputeVersion));
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::CreateMergeRequest(_))),
            0
        );
    }

    #[test]
    fn test_no_new_commits_warns() {
        let host = MockGitHost::new().with_tags(["v1.0.0"]);
        let mut orch = orchestrator(host);

        assert!(orch.run().is_err());
        assert!(orch.reporter().warnings().contains(&&ReleaseWarning::NoNewCommits {
            latest_tag: "v1.0.0".to_string(),
            branch: "development".to_string(),
        }));
    }

    #[test]
    fn test_waits_for_preparation() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .with_unprepared_polls(3);
        let mut orch = orchestrator(host);

        orch.run().unwrap();
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::GetMergeRequestStatus(_))),
            4
        );
    }

    #[test]
    fn test_preparation_never_settles() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .with_unprepared_polls(100);
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Api { .. }));
        assert_eq!(orch.state(), RunState::Failed(Step::CheckConflicts));
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::GetMergeRequestStatus(_))),
            5
        );
    }

    #[test]
    fn test_waits_for_merged_state() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .with_merge_lag(2);
        let mut orch = orchestrator(host);

        orch.run().unwrap();
        assert_eq!(orch.state(), RunState::Done);
    }

    #[test]
    fn test_merge_refused() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .fail_with(Operation::MergeMergeRequest, 405, "405 Method Not Allowed");
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Merge(_)));
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::CreateTag { .. })),
            0
        );
    }

    #[test]
    fn test_merge_forbidden_is_merge_error() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .fail_with(Operation::MergeMergeRequest, 403, "403 Forbidden");
        let mut orch = orchestrator(host);

        let err = orch.run().unwrap_err();
        assert!(matches!(err, ReleaseError::Merge(_)));
        assert_eq!(orch.state(), RunState::Failed(Step::MergeMergeRequest));
        assert_eq!(
            orch.host()
                .count_calls(|c| matches!(c, HostCall::CreateTag { .. })),
            0
        );
    }

    #[test]
    fn test_tag_falls_back_to_target_branch() {
        let host = MockGitHost::new()
            .with_tags(["v1.0.0"])
            .with_commits(["fix: a"])
            .with_merge_commit_sha(None);
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();
        assert_eq!(outcome.tagged_ref, "main");
    }

    #[test]
    fn test_version_arithmetic_flows_through() {
        let host = MockGitHost::new()
            .with_tags(["v3.1.4"])
            .with_commits(["fix: a", "fix: b"]);
        let mut orch = orchestrator(host);

        let outcome = orch.run().unwrap();
        let expected = Version::new(3, 1, 6);
        assert_eq!(outcome.new_tag, format!("v{}", expected));
    }
}
