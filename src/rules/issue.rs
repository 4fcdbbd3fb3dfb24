use log::debug;

use super::Policy;
use crate::{
    git::Commit,
    issue::{IssueKey, IssueTracker},
    report::YaccError,
};

/// Finds the issue keys a commit refers to.
///
/// When the commit message regex has a first capture group that took part in
/// the match, only that group is scanned, otherwise the whole message.
pub fn extract_issue_keys(policy: &Policy, commit: &Commit) -> Vec<IssueKey> {
    let text = policy
        .issue_capture
        .as_ref()
        .and_then(|p| p.regex().captures(&commit.message))
        .and_then(|caps| caps.get(1))
        .map_or(commit.message.as_str(), |m| m.as_str());

    let keys = IssueKey::parse_all(text);
    debug!("found issues {:?} in commit message: {}", keys, text);
    keys
}

/// Checks that the commit refers to existing issues.
///
/// Tracker failures come back as errors from the tracker itself, so this never
/// fails.
pub fn check_issues(policy: &Policy, commit: &Commit, tracker: &dyn IssueTracker) -> Vec<YaccError> {
    if !policy.require_issue {
        return vec![];
    }

    if !tracker.link_exists() {
        return vec![YaccError::other(
            "Unable to verify JIRA issue because JIRA Application Link does not exist",
        )];
    }

    let mut keys = extract_issue_keys(policy, commit);

    debug!("ignoreUnknownIssueProjectKeys={}", policy.ignore_unknown_project_keys);
    if policy.ignore_unknown_project_keys {
        keys.retain(|key| tracker.project_exists(key));
    }

    if keys.is_empty() {
        return vec![YaccError::other("No JIRA Issue found in commit message.")];
    }

    keys.iter()
        .flat_map(|key| check_issue(policy, key, tracker))
        .collect()
}

fn check_issue(policy: &Policy, key: &IssueKey, tracker: &dyn IssueTracker) -> Vec<YaccError> {
    debug!("checking issue {}", key);

    let errors = tracker.issue_exists(key);
    if !errors.is_empty() {
        return errors;
    }

    match policy.issue_query.as_deref() {
        Some(query) => tracker.issue_matches_query(query, key),
        None => errors,
    }
}
