use log::{debug, warn};

use super::Policy;
use crate::{
    git::Commit,
    report::{ErrorType, YaccError},
    user::{Pusher, UserKind},
};

/// Checks the committer of `commit` against the account doing the push.
///
/// Only normal accounts are checked: service accounts are named after their
/// key and have no e-mail. Without an authenticated pusher nothing is checked.
pub fn check_committer(policy: &Policy, commit: &Commit, pusher: Option<&Pusher>) -> Vec<YaccError> {
    let pusher = match pusher {
        Some(p) => p,
        None => {
            warn!("unauthenticated user is committing, skipping committer checks");
            return vec![];
        }
    };

    if pusher.kind != UserKind::Normal {
        return vec![];
    }

    let mut errors = check_committer_email(policy, commit, pusher);
    errors.extend(check_committer_name(policy, commit, pusher));
    errors
}

fn check_committer_email(policy: &Policy, commit: &Commit, pusher: &Pusher) -> Vec<YaccError> {
    let email = match pusher.email.as_deref() {
        Some(e) => e,
        None => {
            warn!("user {} has no email address, skipping email checks", pusher.name);
            return vec![];
        }
    };
    let found = &commit.committer.email;

    debug!(
        "requireMatchingAuthorEmail={} committer={} user={}",
        policy.require_matching_email, found, email
    );

    let mut errors = vec![];

    if policy.require_matching_email && found.to_lowercase() != email.to_lowercase() {
        errors.push(YaccError::new(
            ErrorType::CommitterEmail,
            format!("expected committer email '{email}' but found '{found}'"),
        ));
    }

    if let Some(pattern) = policy.committer_email.as_ref() {
        if !pattern.is_match(&found.to_lowercase()) {
            errors.push(YaccError::new(
                ErrorType::CommitterEmailRegex,
                format!(
                    "committer email regex '{}' does not match user email '{}'",
                    pattern.as_str(),
                    found
                ),
            ));
        }
    }

    errors
}

fn check_committer_name(policy: &Policy, commit: &Commit, pusher: &Pusher) -> Vec<YaccError> {
    if !policy.require_matching_name {
        return vec![];
    }

    let expected = remove_git_crud(&pusher.display_name);
    let found = &commit.committer.name;

    debug!("committer name={} user name={}", found, expected);

    if found.to_lowercase() == expected.to_lowercase() {
        vec![]
    } else {
        vec![YaccError::new(
            ErrorType::CommitterName,
            format!("expected committer name '{expected}' but found '{found}'"),
        )]
    }
}

/// Strips the characters git drops from `user.name` when it writes a commit.
///
/// `<`, `>` and newlines go wherever they are. Runs of `\ . , : ; " '` are only
/// removed from the ends, so `O'Brien` keeps its apostrophe.
///
/// # Example
///
/// ```
/// # use yacc::rules::remove_git_crud;
/// assert_eq!("John Smith", remove_git_crud(".,<John> Smith;'"));
/// assert_eq!("O'Brien", remove_git_crud("'O'Brien."));
/// ```
pub fn remove_git_crud(name: &str) -> String {
    let name: String = name.chars().filter(|c| !matches!(c, '<' | '>' | '\n')).collect();
    name.trim_matches(|c: char| matches!(c, '\\' | '.' | ',' | ':' | ';' | '"' | '\''))
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        git::Person,
        rules::tests::{commit, john, policy},
    };

    fn committed_by(name: &str, email: &str) -> Commit {
        let mut c = commit("msg");
        c.committer = Person::new(name, email);
        c
    }

    #[test]
    fn crud_is_removed() {
        assert_eq!(
            remove_git_crud(".,:;<>\"\\'John< >\nSMITH.,:;<>\"\\'"),
            "John SMITH"
        );
        assert_eq!(remove_git_crud("John Smith"), "John Smith");
        assert_eq!(remove_git_crud("J.R.R. Tolkien."), "J.R.R. Tolkien");
        assert_eq!(remove_git_crud(""), "");
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let p = policy(&[("requireMatchingAuthorName", "true")]);
        let admin = Pusher::new("admin", "Admin User", "admin@example.com");

        let errors = check_committer(&p, &committed_by("admin user", "admin@example.com"), Some(&admin));
        assert!(errors.is_empty());
    }

    #[test]
    fn name_mismatch() {
        let p = policy(&[("requireMatchingAuthorName", "true")]);
        let pusher = Pusher::new("jsmith", "\"John Smith.\"", "jsmith@example.com");

        let errors = check_committer(&p, &committed_by("Jane Doe", "jsmith@example.com"), Some(&pusher));
        assert_eq!(
            errors,
            vec![YaccError::new(
                ErrorType::CommitterName,
                "expected committer name 'John Smith' but found 'Jane Doe'"
            )]
        );
    }

    #[test]
    fn email_mismatch_and_regex() {
        let p = policy(&[
            ("requireMatchingAuthorEmail", "true"),
            ("committerEmailRegex", ".*@corp\\.com"),
        ]);

        let errors = check_committer(&p, &committed_by("John Smith", "JSmith@Example.com"), Some(&john()));
        assert_eq!(
            errors,
            vec![YaccError::new(
                ErrorType::CommitterEmailRegex,
                "committer email regex '.*@corp\\.com' does not match user email 'JSmith@Example.com'"
            )]
        );

        let errors = check_committer(&p, &committed_by("John Smith", "john@corp.com"), Some(&john()));
        assert_eq!(
            errors,
            vec![YaccError::new(
                ErrorType::CommitterEmail,
                "expected committer email 'jsmith@example.com' but found 'john@corp.com'"
            )]
        );
    }

    #[test]
    fn email_regex_sees_lower_case() {
        let p = policy(&[("committerEmailRegex", "[a-z]+@corp\\.com")]);
        let errors = check_committer(&p, &committed_by("John Smith", "JOHN@CORP.COM"), Some(&john()));
        assert!(errors.is_empty());
    }

    #[test]
    fn email_order_before_name() {
        let p = policy(&[
            ("requireMatchingAuthorName", "true"),
            ("requireMatchingAuthorEmail", "true"),
        ]);
        let errors = check_committer(&p, &committed_by("Jane", "jane@example.com"), Some(&john()));
        let types: Vec<_> = errors.iter().map(|e| e.error_type).collect();
        assert_eq!(types, vec![ErrorType::CommitterEmail, ErrorType::CommitterName]);
    }

    #[test]
    fn skipped_users() {
        let p = policy(&[
            ("requireMatchingAuthorName", "true"),
            ("requireMatchingAuthorEmail", "true"),
            ("committerEmailRegex", "nobody"),
        ]);
        let c = committed_by("Jane", "jane@example.com");

        assert!(check_committer(&p, &c, None).is_empty());
        assert!(check_committer(&p, &c, Some(&Pusher::service("deploy-key"))).is_empty());

        let mut no_email = john();
        no_email.email = None;
        let errors = check_committer(&p, &c, Some(&no_email));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, ErrorType::CommitterName);
    }
}
