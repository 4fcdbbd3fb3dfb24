use std::{fs, path::Path};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    report::ErrorType,
};

/// Resolved settings of one hook scope.
///
/// Every field is optional in the TOML file: strings default to empty (which
/// disables the corresponding rule) and booleans to `false`.
///
/// ```toml
/// commitMessageRegex = "[A-Z]+-[0-9]+: .*"
/// requireMatchingAuthorEmail = true
/// excludeUsers = "jenkins, release-bot"
///
/// [errorMessage]
/// COMMIT_REGEX = "Start the message with the issue key, e.g. 'ABC-123: fix parser'"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Config {
    pub branch_name_regex: String,
    pub commit_message_regex: String,
    pub committer_email_regex: String,
    pub require_matching_author_name: bool,
    pub require_matching_author_email: bool,
    pub exclude_merge_commits: bool,
    pub exclude_service_user_commits: bool,
    /// Comma separated user names
    pub exclude_users: String,
    pub exclude_by_regex: String,
    pub exclude_branch_regex: String,
    pub require_jira_issue: bool,
    pub ignore_unknown_issue_project_keys: bool,
    pub issue_jql_matcher: String,
    /// Extra text shown below errors of a type
    pub error_message: IndexMap<ErrorType, String>,
    pub error_message_header: String,
    pub error_message_footer: String,
}

impl Config {
    /// Reads settings from a TOML file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use yacc::Config;
    /// let config = Config::from_file("/srv/hooks/yacc.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        debug!("reading config file: {:?}", file.as_ref());
        let toml_s = fs::read_to_string(file.as_ref())?;
        toml::from_str(&toml_s).map_err(|e| Error::ConfigParse(file.as_ref().to_path_buf(), e))
    }

    /// Reads settings from a TOML string.
    pub fn from_toml(toml_s: &str) -> Result<Self> {
        toml::from_str(toml_s).map_err(Into::into)
    }

    /// Builds settings from the flat string map hosts usually store hook
    /// settings in. Booleans are `"true"` or anything else, per-type messages
    /// use `errorMessage.<TYPE>` keys.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::{Config, ErrorType};
    /// let config = Config::from_settings([
    ///     ("requireJiraIssue", "true"),
    ///     ("errorMessage.COMMIT_REGEX", "see the wiki"),
    /// ])
    /// .unwrap();
    /// assert!(config.require_jira_issue);
    /// assert_eq!(Some("see the wiki"), config.error_message_for(ErrorType::CommitRegex));
    /// ```
    pub fn from_settings<I, K, V>(settings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut cfg = Config::default();

        for (key, value) in settings {
            let key = key.as_ref();
            let value = value.into();
            let flag = value.trim().eq_ignore_ascii_case("true");

            match key {
                "branchNameRegex" => cfg.branch_name_regex = value,
                "commitMessageRegex" => cfg.commit_message_regex = value,
                "committerEmailRegex" => cfg.committer_email_regex = value,
                "requireMatchingAuthorName" => cfg.require_matching_author_name = flag,
                "requireMatchingAuthorEmail" => cfg.require_matching_author_email = flag,
                "excludeMergeCommits" => cfg.exclude_merge_commits = flag,
                "excludeServiceUserCommits" => cfg.exclude_service_user_commits = flag,
                "excludeUsers" => cfg.exclude_users = value,
                "excludeByRegex" => cfg.exclude_by_regex = value,
                "excludeBranchRegex" => cfg.exclude_branch_regex = value,
                "requireJiraIssue" => cfg.require_jira_issue = flag,
                "ignoreUnknownIssueProjectKeys" => cfg.ignore_unknown_issue_project_keys = flag,
                "issueJqlMatcher" => cfg.issue_jql_matcher = value,
                "errorMessageHeader" => cfg.error_message_header = value,
                "errorMessageFooter" => cfg.error_message_footer = value,
                _ => match key.strip_prefix("errorMessage.") {
                    Some(ty) => {
                        let ty = ty
                            .parse::<ErrorType>()
                            .map_err(|_| Error::ErrorType(ty.to_owned()))?;
                        cfg.error_message.insert(ty, value);
                    }
                    None => return Err(Error::UnknownSetting(key.to_owned())),
                },
            }
        }

        debug!("config from settings: {:?}", cfg);
        Ok(cfg)
    }

    /// The configured extra text for errors of `error_type`, if any
    pub fn error_message_for(&self, error_type: ErrorType) -> Option<&str> {
        self.error_message
            .get(&error_type)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Whether any rule or exclusion is switched on. Message texts don't count.
    ///
    /// Validation can take a while on large repositories, so a hook enabled
    /// globally only runs when this is true.
    pub fn has_enabled_settings(&self) -> bool {
        let strings = [
            &self.branch_name_regex,
            &self.commit_message_regex,
            &self.committer_email_regex,
            &self.exclude_users,
            &self.exclude_by_regex,
            &self.exclude_branch_regex,
            &self.issue_jql_matcher,
        ];
        let flags = [
            self.require_matching_author_name,
            self.require_matching_author_email,
            self.exclude_merge_commits,
            self.exclude_service_user_commits,
            self.require_jira_issue,
            self.ignore_unknown_issue_project_keys,
        ];

        strings.iter().any(|s| !s.trim().is_empty()) || flags.iter().any(|f| *f)
    }
}
