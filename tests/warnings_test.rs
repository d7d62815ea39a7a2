use gitlab_release::boundary::ReleaseWarning;
use gitlab_release::ui;

// ============================================================================
// ReleaseWarning Display Tests
// ============================================================================

#[test]
fn test_release_warning_no_previous_tag_display() {
    let warning = ReleaseWarning::NoPreviousTag {
        bootstrap_tag: "v0.0.0".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No release tag found"),
        "Message should contain 'No release tag found', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("v0.0.0"),
        "Message should contain the bootstrap tag, got: {}",
        display_msg
    );
}

#[test]
fn test_release_warning_unparsable_tags_display() {
    let warning = ReleaseWarning::UnparsableTags {
        tags: vec!["nightly".to_string(), "v1.0.0-rc.1".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Ignored 2 tag(s)"),
        "Message should count ignored tags, got: {}",
        display_msg
    );
    assert!(display_msg.contains("nightly"));
    assert!(display_msg.contains("v1.0.0-rc.1"));
}

#[test]
fn test_release_warning_unparsable_tags_truncates_list() {
    let tags: Vec<String> = (0..8).map(|i| format!("build-{}", i)).collect();
    let warning = ReleaseWarning::UnparsableTags { tags };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("build-4"));
    assert!(
        !display_msg.contains("build-5"),
        "Only the first five tags should be listed, got: {}",
        display_msg
    );
    assert!(display_msg.ends_with("and 3 more"));
}

#[test]
fn test_release_warning_no_new_commits_display() {
    let warning = ReleaseWarning::NoNewCommits {
        latest_tag: "v1.0.0".to_string(),
        branch: "development".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No new commits"),
        "Message should contain 'No new commits', got: {}",
        display_msg
    );
    assert!(display_msg.contains("v1.0.0"));
    assert!(display_msg.contains("development"));
}

#[test]
fn test_release_warning_emoji_display() {
    let warning = ReleaseWarning::EmojiAwardFailed {
        emoji: "thumbsup".to_string(),
        reason: "Not found: award emoji failed".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(display_msg.contains("thumbsup"));
    assert!(display_msg.contains("award emoji failed"));
}

#[test]
fn test_display_warning_does_not_panic() {
    let warning = ReleaseWarning::NoNewCommits {
        latest_tag: "v2.0.0".to_string(),
        branch: "main".to_string(),
    };

    ui::display_warning(&warning);
}
