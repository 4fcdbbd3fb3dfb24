use log::debug;

use super::Policy;
use crate::{
    git::Commit,
    report::{ErrorType, YaccError},
};

/// Checks the short name of a newly created branch against `branchNameRegex`.
///
/// # Example
///
/// ```
/// # use yacc::{Config, rules::{self, Policy}};
/// let config = Config::from_settings([("branchNameRegex", "feature/.*")]).unwrap();
/// let policy = Policy::new(&config).unwrap();
/// assert!(rules::check_branch_name(&policy, "feature/login").is_empty());
/// assert_eq!(1, rules::check_branch_name(&policy, "master").len());
/// ```
pub fn check_branch_name(policy: &Policy, branch: &str) -> Vec<YaccError> {
    let pattern = match policy.branch_name.as_ref() {
        Some(p) => p,
        None => return vec![],
    };

    debug!("branch name check, branch={} regex={}", branch, pattern.as_str());

    if pattern.is_match(branch) {
        vec![]
    } else {
        vec![YaccError::new(
            ErrorType::BranchName,
            format!(
                "Invalid branch name. '{}' does not match regex '{}'",
                branch,
                pattern.as_str()
            ),
        )]
    }
}

/// Checks the whole commit message against `commitMessageRegex`. `^` and `$`
/// match at line boundaries.
pub fn check_message_regex(policy: &Policy, commit: &Commit) -> Vec<YaccError> {
    match policy.commit_message.as_ref() {
        Some(pattern) if !pattern.is_match(&commit.message) => {
            debug!("commit {} doesn't match {}", commit.id, pattern.as_str());
            vec![YaccError::new(
                ErrorType::CommitRegex,
                format!("commit message doesn't match regex: {}", pattern.as_str()),
            )]
        }
        _ => vec![],
    }
}
