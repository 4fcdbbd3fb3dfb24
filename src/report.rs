use std::{fmt, result::Result as StdResult, str::FromStr};

use strum::{Display, EnumString};

use crate::issue::IssueKey;

/// Which rule a [`YaccError`] came from. Operators key their custom error texts
/// (`errorMessage.<TYPE>`) on the upper-case name.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum ErrorType {
    BranchName,
    CommitRegex,
    CommitterEmail,
    CommitterEmailRegex,
    CommitterName,
    IssueJql,
    Other,
}

impl<'de> serde::de::Deserialize<'de> for ErrorType {
    fn deserialize<D>(deserializer: D) -> StdResult<Self, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// A policy violation.
///
/// These are data, not failures: every rule returns them in a `Vec` and the
/// validator renders all of them into a single rejection message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YaccError {
    pub error_type: ErrorType,
    pub message: String,
}

impl YaccError {
    pub fn new<S: Into<String>>(error_type: ErrorType, message: S) -> Self {
        YaccError {
            error_type,
            message: message.into(),
        }
    }

    /// An error that doesn't belong to one of the typed rules
    pub fn other<S: Into<String>>(message: S) -> Self {
        YaccError::new(ErrorType::Other, message)
    }

    /// Returns a copy with `"<text>: "` put in front of the message.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::{ErrorType, YaccError};
    /// let err = YaccError::new(ErrorType::CommitRegex, "bad message").prepend_text("refs/heads/master");
    /// assert_eq!("refs/heads/master: bad message", err.message);
    /// ```
    pub fn prepend_text(&self, text: &str) -> Self {
        YaccError {
            error_type: self.error_type,
            message: format!("{text}: {}", self.message),
        }
    }

    /// The standard text for an issue the tracker doesn't know
    pub fn issue_not_found(key: &IssueKey) -> Self {
        YaccError::new(ErrorType::IssueJql, format!("{key}: JIRA Issue does not exist"))
    }

    /// The standard text for an issue that exists but fails `issueJqlMatcher`
    pub fn issue_query_mismatch(key: &IssueKey, query: &str) -> Self {
        YaccError::new(
            ErrorType::IssueJql,
            format!("{key}: JIRA Issue does not match JQL Query: {query}"),
        )
    }
}

impl fmt::Display for YaccError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}
