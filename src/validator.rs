use log::{debug, info};

use crate::{
    command::CommandRunner,
    config::Config,
    error::Result,
    fmt,
    git::{ChangeKind, Commit, RefChange, RefKind, HEADS},
    issue::IssueTracker,
    report::YaccError,
    resolve,
    rules::{self, Policy},
    user::Pusher,
    Outcome,
};

/// Summary of a push rejected because a new branch is badly named
pub const PUSH_REJECTED: &str = "Push rejected by YACC";
/// Summary of a push rejected because of its commits
pub const COMMIT_REJECTED: &str = "Commit rejected by YACC";
/// Summary of a branch created outside a push with a bad name
pub const BRANCH_REJECTED: &str = "Branch name does not comply with repository requirements.";

/// Checks pushes against one configuration.
///
/// The collaborators are borrowed, so a validator is cheap to build per push
/// and holds no state between calls.
///
/// # Example
///
/// ```no_run
/// # use yacc::{Config, GitCli, IssueKey, IssueTracker, Outcome, Pusher, RefChange, Validator, YaccError};
/// struct NoTracker;
///
/// impl IssueTracker for NoTracker {
///     fn link_exists(&self) -> bool { false }
///     fn issue_exists(&self, _: &IssueKey) -> Vec<YaccError> { vec![] }
///     fn project_exists(&self, _: &IssueKey) -> bool { false }
///     fn issue_matches_query(&self, _: &str, _: &IssueKey) -> Vec<YaccError> { vec![] }
/// }
///
/// let config = Config::from_file("yacc.toml").unwrap();
/// let git = GitCli::new();
/// let pusher = Pusher::new("jsmith", "John Smith", "jsmith@example.com");
/// let validator = Validator::new(config, &git, &NoTracker, Some(pusher)).unwrap();
///
/// let change = RefChange::new(
///     "a293f806780249dc855ff560cb70f3c21c7f9c1e",
///     "9a1ced131648d5481e4a3f00b9c5522d466ec693",
///     "refs/heads/master",
/// );
/// if let Outcome::Rejected { message, .. } = validator.validate(&[change]).unwrap() {
///     eprintln!("{message}");
///     std::process::exit(1);
/// }
/// ```
pub struct Validator<'a> {
    config: Config,
    policy: Policy,
    runner: &'a dyn CommandRunner,
    tracker: &'a dyn IssueTracker,
    pusher: Option<Pusher>,
}

impl<'a> Validator<'a> {
    /// Fails when a configured regular expression doesn't compile.
    pub fn new(
        config: Config,
        runner: &'a dyn CommandRunner,
        tracker: &'a dyn IssueTracker,
        pusher: Option<Pusher>,
    ) -> Result<Self> {
        let policy = Policy::new(&config)?;

        Ok(Validator {
            config,
            policy,
            runner,
            tracker,
            pusher,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks every ref change of a push in order and renders all violations
    /// into one rejection.
    ///
    /// A ref change whose new branch name is rejected has its commits skipped.
    /// Errors are only returned for git output that can't be trusted.
    pub fn validate(&self, changes: &[RefChange]) -> Result<Outcome> {
        let mut errors = vec![];
        let mut bad_ref = false;

        for change in changes {
            debug!(
                "ref change: ref={} ref_kind={:?} change_kind={:?} from={} to={}",
                change.ref_id, change.ref_kind, change.change_kind, change.from_hash, change.to_hash
            );

            let ref_errors = self.check_ref_change(change);
            if !ref_errors.is_empty() {
                bad_ref = true;
                errors.extend(ref_errors);
                continue;
            }

            errors.extend(self.check_commits(change)?);
        }

        if errors.is_empty() {
            return Ok(Outcome::Accepted);
        }

        debug!("push rejected, errors={:?}", errors);
        let summary = if bad_ref { PUSH_REJECTED } else { COMMIT_REJECTED };

        Ok(Outcome::Rejected {
            summary: summary.to_owned(),
            message: fmt::error_message(&self.config, &errors)?,
        })
    }

    /// Ref level checks of one ref change, prefixed with the ref id
    pub fn check_ref_change(&self, change: &RefChange) -> Vec<YaccError> {
        if change.change_kind != ChangeKind::Add || change.ref_kind != RefKind::Branch {
            return vec![];
        }

        rules::check_branch_name(&self.policy, change.branch_name())
            .iter()
            .map(|e| e.prepend_text(&change.ref_id))
            .collect()
    }

    /// Resolves the commits `change` brings in and checks each of them,
    /// prefixing errors with the ref id and the commit id.
    pub fn check_commits(&self, change: &RefChange) -> Result<Vec<YaccError>> {
        let commits = resolve::new_commits(self.runner, change)?;

        let mut errors = vec![];
        for commit in &commits {
            let prefix = format!("{}: {}", change.ref_id, commit.id);
            errors.extend(
                self.check_commit(change, commit)
                    .iter()
                    .map(|e| e.prepend_text(&prefix)),
            );
        }

        Ok(errors)
    }

    fn check_commit(&self, change: &RefChange, commit: &Commit) -> Vec<YaccError> {
        if change.ref_kind == RefKind::Tag {
            info!("checking annotated tag {} tagged by {}", commit.id, commit.committer.name);
            return rules::check_committer(&self.policy, commit, self.pusher.as_ref());
        }

        rules::check_commit(
            &self.policy,
            commit,
            change.branch_name(),
            self.pusher.as_ref(),
            self.tracker,
        )
    }

    /// Checks a branch created without a push, i.e. from a web UI.
    ///
    /// Only the branch name rule applies. The rejection carries the first
    /// violation as its message.
    pub fn check_branch_creation(&self, ref_id: &str) -> Outcome {
        let branch = ref_id.strip_prefix(HEADS).unwrap_or(ref_id);
        debug!("branch creation: ref={} branch={}", ref_id, branch);

        match rules::check_branch_name(&self.policy, branch).into_iter().next() {
            Some(error) => Outcome::Rejected {
                summary: BRANCH_REJECTED.to_owned(),
                message: error.message,
            },
            None => Outcome::Accepted,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::{
        command::GitCommand,
        error::Error,
        git::ZERO_HASH,
        report::ErrorType,
        rules::tests::{john, FakeTracker},
    };

    const MASTER: &str = "a293f806780249dc855ff560cb70f3c21c7f9c1e";
    const NEW: &str = "9a1ced131648d5481e4a3f00b9c5522d466ec693";

    /// Answers rev-list by the included hash and cat-file by object
    #[derive(Default)]
    struct Repo {
        refs: String,
        rev_lists: HashMap<String, String>,
        objects: HashMap<String, String>,
    }

    impl CommandRunner for Repo {
        fn run(&self, command: &GitCommand) -> Result<String> {
            Ok(match command {
                GitCommand::ShowRef { .. } => self.refs.clone(),
                GitCommand::RevList { include, .. } => {
                    self.rev_lists.get(include).cloned().unwrap_or_default()
                }
                GitCommand::CatFile { object } => self.objects.get(object).cloned().unwrap_or_default(),
            })
        }
    }

    fn record(id: &str, name: &str, email: &str, message: &str) -> String {
        format!("commit {id}\n{id}\u{2}{MASTER}\u{2}{name}\u{2}{email}\n{message}\n\u{3}END\u{4}\n")
    }

    fn repo() -> Repo {
        let mut repo = Repo {
            refs: format!("{MASTER} refs/heads/master\n"),
            ..Repo::default()
        };
        repo.rev_lists.insert(
            NEW.to_owned(),
            record(NEW, "John Smith", "jsmith@example.com", "fixes bug"),
        );
        repo
    }

    fn validator<'a>(
        settings: &[(&str, &str)],
        repo: &'a Repo,
        tracker: &'a FakeTracker,
        pusher: Option<Pusher>,
    ) -> Validator<'a> {
        let config = Config::from_settings(settings.iter().copied()).unwrap();
        Validator::new(config, repo, tracker, pusher).unwrap()
    }

    fn rejection(outcome: Outcome) -> (String, String) {
        match outcome {
            Outcome::Rejected { summary, message } => (summary, message),
            Outcome::Accepted => panic!("push was accepted"),
        }
    }

    #[test]
    fn clean_push_is_accepted() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(&[("commitMessageRegex", ".*bug")], &repo, &tracker, Some(john()));

        let outcome = v.validate(&[RefChange::new(MASTER, NEW, "refs/heads/master")]).unwrap();
        assert_eq!(outcome, Outcome::Accepted);
    }

    #[test]
    fn commit_errors_are_prefixed() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(
            &[("commitMessageRegex", "[A-Z]+-[0-9]+: .*"), ("errorMessageHeader", "header")],
            &repo,
            &tracker,
            Some(john()),
        );

        let (summary, message) =
            rejection(v.validate(&[RefChange::new(MASTER, NEW, "refs/heads/master")]).unwrap());
        assert_eq!(summary, COMMIT_REJECTED);
        assert_eq!(
            message,
            format!("header\n\nrefs/heads/master: {NEW}: commit message doesn't match regex: [A-Z]+-[0-9]+: .*\n")
        );
    }

    #[test]
    fn bad_branch_name_skips_its_commits() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(
            &[("branchNameRegex", "feature/.*"), ("commitMessageRegex", "nope")],
            &repo,
            &tracker,
            Some(john()),
        );

        let change = RefChange::new(ZERO_HASH, NEW, "refs/heads/topic");
        assert_eq!(
            v.check_ref_change(&change),
            vec![YaccError::new(
                ErrorType::BranchName,
                "refs/heads/topic: Invalid branch name. 'topic' does not match regex 'feature/.*'"
            )]
        );

        let (summary, message) = rejection(v.validate(&[change]).unwrap());
        assert_eq!(summary, PUSH_REJECTED);
        assert!(message.contains("Invalid branch name"));
        assert!(!message.contains("commit message doesn't match"));
    }

    #[test]
    fn existing_branches_keep_their_names() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(&[("branchNameRegex", "feature/.*")], &repo, &tracker, Some(john()));

        assert!(v.check_ref_change(&RefChange::new(MASTER, NEW, "refs/heads/master")).is_empty());
        assert!(v.check_ref_change(&RefChange::new(ZERO_HASH, NEW, "refs/tags/v1")).is_empty());
    }

    #[test]
    fn errors_keep_ref_change_order() {
        let mut repo = repo();
        let other = "1060dc57a0c0b27fdd7aef1481ca914a1d7d084e";
        repo.rev_lists.insert(
            other.to_owned(),
            record(other, "John Smith", "jsmith@example.com", "also bad"),
        );
        let tracker = FakeTracker::default();
        let v = validator(&[("commitMessageRegex", "ok")], &repo, &tracker, Some(john()));

        let errors = [
            v.check_commits(&RefChange::new(MASTER, other, "refs/heads/b")).unwrap(),
            v.check_commits(&RefChange::new(MASTER, NEW, "refs/heads/a")).unwrap(),
        ]
        .concat();
        let (_, message) = rejection(
            v.validate(&[
                RefChange::new(MASTER, other, "refs/heads/b"),
                RefChange::new(MASTER, NEW, "refs/heads/a"),
            ])
            .unwrap(),
        );

        assert_eq!(errors.len(), 2);
        let b = message.find(&errors[0].message).unwrap();
        let a = message.find(&errors[1].message).unwrap();
        assert!(b < a);
    }

    #[test]
    fn tags_only_check_the_tagger() {
        let mut repo = repo();
        repo.objects.insert(
            NEW.to_owned(),
            format!("object {MASTER}\ntype commit\ntag v1\ntagger Jane Doe <jane@example.com> 1485751987 -0800\n\nno issue\n"),
        );
        let tracker = FakeTracker::default();
        let v = validator(
            &[
                ("requireMatchingAuthorEmail", "true"),
                ("commitMessageRegex", "[A-Z]+-[0-9]+: .*"),
            ],
            &repo,
            &tracker,
            Some(john()),
        );

        let errors = v.check_commits(&RefChange::new(ZERO_HASH, NEW, "refs/tags/v1")).unwrap();
        assert_eq!(
            errors,
            vec![YaccError::new(
                ErrorType::CommitterEmail,
                format!("refs/tags/v1: {NEW}: expected committer email 'jsmith@example.com' but found 'jane@example.com'")
            )]
        );
    }

    #[test]
    fn deletes_are_accepted() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(&[("commitMessageRegex", "nope")], &repo, &tracker, Some(john()));

        let outcome = v.validate(&[RefChange::new(MASTER, ZERO_HASH, "refs/heads/master")]).unwrap();
        assert_eq!(outcome, Outcome::Accepted);
    }

    #[test]
    fn structural_failures_abort() {
        let mut repo = repo();
        repo.rev_lists.insert(NEW.to_owned(), "garbage\n".to_owned());
        let tracker = FakeTracker::default();
        let v = validator(&[], &repo, &tracker, Some(john()));

        assert!(matches!(
            v.validate(&[RefChange::new(MASTER, NEW, "refs/heads/master")]),
            Err(Error::UnexpectedLine(_))
        ));
    }

    #[test]
    fn branch_creation() {
        let repo = repo();
        let tracker = FakeTracker::default();
        let v = validator(&[("branchNameRegex", "feature/.*")], &repo, &tracker, None);

        assert_eq!(v.check_branch_creation("refs/heads/feature/x"), Outcome::Accepted);
        assert_eq!(
            v.check_branch_creation("refs/heads/master"),
            Outcome::Rejected {
                summary: BRANCH_REJECTED.to_owned(),
                message: "Invalid branch name. 'master' does not match regex 'feature/.*'".to_owned(),
            }
        );
    }
}
