//! The commit policy.
//!
//! Every rule is a function of a compiled [`Policy`] and its input that returns
//! the violations it found. Nothing here fails: bad configuration is caught
//! when the policy is built.

mod exclude;
mod identity;
mod issue;
mod message;

use log::debug;
use regex::{Regex, RegexBuilder};

pub use self::{
    exclude::{is_branch_excluded, is_commit_excluded},
    identity::{check_committer, remove_git_crud},
    issue::{check_issues, extract_issue_keys},
    message::{check_branch_name, check_message_regex},
};
use crate::{
    config::Config,
    error::{Error, Result},
    git::Commit,
    issue::IssueTracker,
    report::YaccError,
    user::Pusher,
};

/// A configured regular expression together with the text it was built from,
/// which is quoted back in error messages.
#[derive(Debug, Clone)]
pub struct Pattern {
    text: String,
    regex: Regex,
}

impl Pattern {
    /// Compiles `text` so that it has to match the whole input.
    fn full(setting: &'static str, text: &str, multi_line: bool) -> Result<Self> {
        let regex = RegexBuilder::new(&format!(r"\A(?:{text})\z"))
            .multi_line(multi_line)
            .build()
            .map_err(|source| Error::InvalidRegex { setting, source })?;

        Ok(Pattern {
            text: text.to_owned(),
            regex,
        })
    }

    /// Compiles `text` for a search anywhere in the input.
    fn partial(setting: &'static str, text: &str) -> Result<Self> {
        let regex = Regex::new(text).map_err(|source| Error::InvalidRegex { setting, source })?;

        Ok(Pattern {
            text: text.to_owned(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compiles a setting only when it is non-empty
fn optional<F>(text: &str, compile: F) -> Result<Option<Pattern>>
where
    F: FnOnce(&str) -> Result<Pattern>,
{
    if text.is_empty() {
        Ok(None)
    } else {
        compile(text).map(Some)
    }
}

/// The rule configuration with every regular expression compiled.
///
/// Build one per configuration and reuse it across pushes.
///
/// # Example
///
/// ```
/// # use yacc::{Config, rules::Policy};
/// let config = Config::from_settings([("commitMessageRegex", "[A-Z]+-[0-9]+: .*")]).unwrap();
/// let policy = Policy::new(&config).unwrap();
/// assert_eq!(Some("[A-Z]+-[0-9]+: .*"), policy.commit_message().map(|p| p.as_str()));
///
/// let broken = Config::from_settings([("excludeByRegex", "(unclosed")]).unwrap();
/// assert!(Policy::new(&broken).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Policy {
    pub(crate) branch_name: Option<Pattern>,
    pub(crate) commit_message: Option<Pattern>,
    /// The commit message regex without multi-line mode, used to pull issue
    /// keys out of capture group 1
    pub(crate) issue_capture: Option<Pattern>,
    pub(crate) committer_email: Option<Pattern>,
    pub(crate) exclude_by: Option<Pattern>,
    pub(crate) exclude_branch: Option<Pattern>,
    pub(crate) exclude_users: Vec<String>,
    pub(crate) require_matching_name: bool,
    pub(crate) require_matching_email: bool,
    pub(crate) exclude_merge_commits: bool,
    pub(crate) exclude_service_user_commits: bool,
    pub(crate) require_issue: bool,
    pub(crate) ignore_unknown_project_keys: bool,
    pub(crate) issue_query: Option<String>,
}

impl Policy {
    pub fn new(config: &Config) -> Result<Self> {
        let exclude_users = if config.exclude_users.trim().is_empty() {
            Vec::new()
        } else {
            config
                .exclude_users
                .split(',')
                .map(|u| u.trim().to_owned())
                .collect()
        };

        let policy = Policy {
            branch_name: optional(&config.branch_name_regex, |t| {
                Pattern::full("branchNameRegex", t, false)
            })?,
            commit_message: optional(&config.commit_message_regex, |t| {
                Pattern::full("commitMessageRegex", t, true)
            })?,
            issue_capture: optional(&config.commit_message_regex, |t| {
                Pattern::full("commitMessageRegex", t, false)
            })?,
            committer_email: optional(&config.committer_email_regex, |t| {
                Pattern::full("committerEmailRegex", t, true)
            })?,
            exclude_by: optional(&config.exclude_by_regex, |t| {
                Pattern::partial("excludeByRegex", t)
            })?,
            exclude_branch: optional(&config.exclude_branch_regex, |t| {
                Pattern::full("excludeBranchRegex", t, false)
            })?,
            exclude_users,
            require_matching_name: config.require_matching_author_name,
            require_matching_email: config.require_matching_author_email,
            exclude_merge_commits: config.exclude_merge_commits,
            exclude_service_user_commits: config.exclude_service_user_commits,
            require_issue: config.require_jira_issue,
            ignore_unknown_project_keys: config.ignore_unknown_issue_project_keys,
            issue_query: Some(config.issue_jql_matcher.clone()).filter(|q| !q.is_empty()),
        };

        debug!("compiled policy: {:?}", policy);
        Ok(policy)
    }

    pub fn branch_name(&self) -> Option<&Pattern> {
        self.branch_name.as_ref()
    }

    pub fn commit_message(&self) -> Option<&Pattern> {
        self.commit_message.as_ref()
    }
}

/// Runs every commit rule in order.
///
/// Identity errors always accumulate. The message regex and the issue rules
/// are skipped for excluded commits or branches, and the issue rules only run
/// when the message regex passed.
pub fn check_commit(
    policy: &Policy,
    commit: &Commit,
    branch: &str,
    pusher: Option<&Pusher>,
    tracker: &dyn IssueTracker,
) -> Vec<YaccError> {
    debug!(
        "checking commit id={} name={} email={} branch={}",
        commit.id, commit.committer.name, commit.committer.email, branch
    );

    let mut errors = check_committer(policy, commit, pusher);

    if !is_commit_excluded(policy, commit, pusher) && !is_branch_excluded(policy, branch) {
        let message_errors = check_message_regex(policy, commit);
        let message_ok = message_errors.is_empty();
        errors.extend(message_errors);

        // issue keys may come from a capture group of the message regex
        if message_ok {
            errors.extend(check_issues(policy, commit, tracker));
        }
    }

    errors
}
