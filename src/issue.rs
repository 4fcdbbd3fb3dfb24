use std::{fmt, str::FromStr};

use crate::report::YaccError;

/// An issue tracker key such as `ABC-123`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueKey {
    /// The project part, `ABC`
    pub project: String,
    /// The issue number, `123`
    pub number: String,
}

impl IssueKey {
    pub fn new<S: Into<String>>(project: S, number: S) -> Self {
        IssueKey {
            project: project.into(),
            number: number.into(),
        }
    }

    /// Finds every issue key mentioned in `text`, in order of appearance.
    ///
    /// Project keys are upper-case letters, digits and underscores starting
    /// with a letter, so `abc-123` is not a key.
    ///
    /// # Example
    ///
    /// ```
    /// # use yacc::IssueKey;
    /// let keys = IssueKey::parse_all("ABC-123, ABC_D-4: fix");
    /// assert_eq!(vec![IssueKey::new("ABC", "123"), IssueKey::new("ABC_D", "4")], keys);
    /// ```
    pub fn parse_all(text: &str) -> Vec<IssueKey> {
        regex!(r"(?:^|[^A-Za-z0-9_])([A-Z][A-Z0-9_]*)-([0-9]+)")
            .captures_iter(text)
            .map(|caps| IssueKey::new(&caps[1], &caps[2]))
            .collect()
    }
}

impl FromStr for IssueKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match regex!(r"^([A-Z][A-Z0-9_]*)-([0-9]+)$").captures(s) {
            Some(caps) => Ok(IssueKey::new(&caps[1], &caps[2])),
            None => Err(format!("not an issue key: {s}")),
        }
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.project, self.number)
    }
}

/// The issue tracker the linkage rule asks about keys found in messages.
///
/// Implementations own the transport. Lookup problems (authentication, server
/// errors) are reported as [`YaccError`]s from the `Vec` returning methods so
/// that they end up in the rejection message next to everything else.
pub trait IssueTracker {
    /// Whether a tracker is configured at all
    fn link_exists(&self) -> bool;

    /// Errors when `key` doesn't name an existing issue
    fn issue_exists(&self, key: &IssueKey) -> Vec<YaccError>;

    /// Whether the project part of `key` exists
    fn project_exists(&self, key: &IssueKey) -> bool;

    /// Errors when the issue `key` isn't returned by `query`
    fn issue_matches_query(&self, query: &str, key: &IssueKey) -> Vec<YaccError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_extracted_in_order() {
        let keys = IssueKey::parse_all("these issue ids should be extracted: ABC-123, ABC_D-123, ABC2-123");
        assert_eq!(
            keys,
            vec![
                IssueKey::new("ABC", "123"),
                IssueKey::new("ABC_D", "123"),
                IssueKey::new("ABC2", "123"),
            ]
        );
    }

    #[test]
    fn lower_case_is_not_a_key() {
        assert!(IssueKey::parse_all("abc-123 is not a valid issue because it is lowercase.").is_empty());
    }

    #[test]
    fn keys_inside_words_are_ignored() {
        assert!(IssueKey::parse_all("xABC-1 and a_B-2").is_empty());
        assert_eq!(IssueKey::parse_all("(ABC-1)"), vec![IssueKey::new("ABC", "1")]);
        assert_eq!(
            IssueKey::parse_all("UTF-8 text"),
            vec![IssueKey::new("UTF", "8")]
        );
    }

    #[test]
    fn parse_and_display() {
        let key: IssueKey = "ABC_D-123".parse().unwrap();
        assert_eq!(key, IssueKey::new("ABC_D", "123"));
        assert_eq!(key.to_string(), "ABC_D-123");
        assert!("abc-1".parse::<IssueKey>().is_err());
        assert!("ABC-".parse::<IssueKey>().is_err());
    }

    #[test]
    fn project_key_is_case_sensitive() {
        assert_ne!(IssueKey::new("ABC", "1"), IssueKey::new("Abc", "1"));
    }
}
