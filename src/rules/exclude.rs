use log::debug;

use super::Policy;
use crate::{
    git::Commit,
    user::{Pusher, UserKind},
};

/// Whether the content rules should skip `commit`
pub fn is_commit_excluded(policy: &Policy, commit: &Commit, pusher: Option<&Pusher>) -> bool {
    if policy.exclude_merge_commits && commit.is_merge {
        debug!("skipping commit {} because it is a merge commit", commit.id);
        return true;
    }

    if let Some(pusher) = pusher {
        if policy.exclude_service_user_commits && pusher.kind == UserKind::Service {
            debug!("skipping commit {} pushed by service user {}", commit.id, pusher.name);
            return true;
        }

        if pusher.kind == UserKind::Normal && policy.exclude_users.iter().any(|u| *u == pusher.name) {
            debug!("skipping commit {} because user {} is excluded", commit.id, pusher.name);
            return true;
        }
    }

    if let Some(pattern) = policy.exclude_by.as_ref() {
        if pattern.is_match(&commit.message) {
            debug!("commit {} excluded because excludeByRegex={} matches", commit.id, pattern.as_str());
            return true;
        }
    }

    false
}

/// Whether the content rules should skip every commit on `branch`
pub fn is_branch_excluded(policy: &Policy, branch: &str) -> bool {
    match policy.exclude_branch.as_ref() {
        Some(pattern) if pattern.is_match(branch) => {
            debug!("branch {} is excluded by {}", branch, pattern.as_str());
            true
        }
        _ => false,
    }
}
