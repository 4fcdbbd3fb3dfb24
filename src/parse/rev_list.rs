use log::debug;

use crate::{
    error::{Error, Result},
    git::{Commit, Commits, Person},
};

/// The `--format` handed to `git rev-list`: hash, parents, committer name and
/// committer e-mail separated by `\x02`, then the raw body, then an end marker
/// that can't occur in a commit message.
pub const REV_LIST_FORMAT: &str = "%H%x02%P%x02%cN%x02%cE%n%B%n%x03END%x04";

/// Closes every record of [`REV_LIST_FORMAT`] output.
pub const OBJECT_END: &str = "\u{3}END\u{4}";

const FIELD_SEP: char = '\u{2}';

/// Parses `git rev-list --format=<REV_LIST_FORMAT>` output.
///
/// Every record starts with the `commit <hash>` line rev-list emits on its own,
/// followed by the formatted metadata line and the message. Message lines are
/// trimmed and the message loses its leading and trailing blank lines.
///
/// # Example
///
/// ```
/// # use yacc::parse::parse_rev_list;
/// let out = "commit 9a1ced1\n9a1ced1\u{2}a293f80\u{2}Name\u{2}name@example.com\nfix it\n\u{3}END\u{4}\n";
/// let commits = parse_rev_list(out).unwrap();
/// assert_eq!("fix it", commits[0].message);
/// ```
pub fn parse_rev_list(output: &str) -> Result<Commits> {
    let mut commits = vec![];
    let mut lines = output.lines();

    while let Some(line) = lines.next() {
        debug!("rev-list line: {:?}", line);

        if !line.starts_with("commit ") {
            return Err(Error::UnexpectedLine(line.to_owned()));
        }

        let meta = lines
            .next()
            .ok_or_else(|| Error::MalformedCommit(line.to_owned()))?;
        debug!("parsing metadata from line: {:?}", meta);

        let fields: Vec<&str> = meta.split(FIELD_SEP).collect();
        if fields.len() < 3 || fields[0].is_empty() {
            return Err(Error::MalformedCommit(meta.to_owned()));
        }

        let message = parse_message(&mut lines);

        commits.push(Commit {
            id: fields[0].to_owned(),
            committer: Person::new(fields[2], fields.get(3).copied().unwrap_or("")),
            message,
            is_merge: fields[1].split_whitespace().count() > 1,
        });
    }

    Ok(commits)
}

fn parse_message<'a, I: Iterator<Item = &'a str>>(lines: &mut I) -> String {
    let body: Vec<&str> = lines
        .take_while(|line| *line != OBJECT_END)
        .map(str::trim)
        .collect();

    body.join("\n").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str = "9a1ced131648d5481e4a3f00b9c5522d466ec693";
    const SECOND: &str = "1060dc57a0c0b27fdd7aef1481ca914a1d7d084e";
    const PARENT: &str = "a293f806780249dc855ff560cb70f3c21c7f9c1e";

    fn record(id: &str, parents: &str, name: &str, email: &str, body: &str) -> String {
        format!("commit {id}\n{id}\u{2}{parents}\u{2}{name}\u{2}{email}\n{body}\n\u{3}END\u{4}\n")
    }

    #[test]
    fn single_commit() {
        let out = record(FIRST, PARENT, "Commit Last", "some@email.com", "this is my commit message\n");
        let commits = parse_rev_list(&out).unwrap();

        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].id, FIRST);
        assert!(!commits[0].is_merge);
        assert_eq!(commits[0].committer, Person::new("Commit Last", "some@email.com"));
        assert_eq!(commits[0].message, "this is my commit message");
    }

    #[test]
    fn multiple_commits_keep_their_own_bodies() {
        let out = record(FIRST, PARENT, "Commit Last", "some@email.com", "first subject\n\nfirst body\n")
            + &record(SECOND, PARENT, "Commit Second", "second@email.com", "second subject\n\nsecond\nbody\n");
        let commits = parse_rev_list(&out).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].id, FIRST);
        assert_eq!(commits[0].message, "first subject\n\nfirst body");
        assert_eq!(commits[1].id, SECOND);
        assert_eq!(commits[1].committer, Person::new("Commit Second", "second@email.com"));
        assert_eq!(commits[1].message, "second subject\n\nsecond\nbody");
    }

    #[test]
    fn merge_commit() {
        let parents = format!("{PARENT} 2f4d8f6c46e0a8814ea447dcdc1ea5f3a1bba30f");
        let out = record(FIRST, &parents, "Commit Last", "some@email.com", "merge");
        assert!(parse_rev_list(&out).unwrap()[0].is_merge);
    }

    #[test]
    fn root_commit_is_not_a_merge() {
        let out = record(FIRST, "", "Commit Last", "some@email.com", "root");
        assert!(!parse_rev_list(&out).unwrap()[0].is_merge);
    }

    #[test]
    fn multi_line_message_is_de_indented_and_trimmed() {
        let out = record(FIRST, PARENT, "Commit Last", "a@b.c", "\n    Multiple\n\n    Lines  \n\n");
        assert_eq!(parse_rev_list(&out).unwrap()[0].message, "Multiple\n\nLines");
    }

    #[test]
    fn empty_email_allowed() {
        let out = format!("commit {FIRST}\n{FIRST}\u{2}{PARENT}\u{2}Commit Last\u{2}\nmessage\n\u{3}END\u{4}");
        let commits = parse_rev_list(&out).unwrap();
        assert_eq!(commits[0].committer.email, "");

        let out = format!("commit {FIRST}\n{FIRST}\u{2}{PARENT}\u{2}Commit Last\nmessage\n\u{3}END\u{4}");
        assert_eq!(parse_rev_list(&out).unwrap()[0].committer.email, "");
    }

    #[test]
    fn no_trailing_newline_in_message() {
        for body in ["subject\n", "subject\n\n\n", "subject\r\n"] {
            let out = record(FIRST, PARENT, "n", "e", body);
            assert_eq!(parse_rev_list(&out).unwrap()[0].message, "subject");
        }
    }

    #[test]
    fn empty_output_has_no_commits() {
        assert!(parse_rev_list("").unwrap().is_empty());
    }

    #[test]
    fn unexpected_line_is_fatal() {
        let out = format!("garbage\n{}", record(FIRST, PARENT, "n", "e", "m"));
        assert!(matches!(parse_rev_list(&out), Err(Error::UnexpectedLine(l)) if l == "garbage"));
    }

    #[test]
    fn missing_metadata_is_fatal() {
        let out = format!("commit {FIRST}\n");
        assert!(matches!(parse_rev_list(&out), Err(Error::MalformedCommit(_))));

        let out = format!("commit {FIRST}\n{FIRST} only one field\nmessage\n\u{3}END\u{4}\n");
        assert!(matches!(parse_rev_list(&out), Err(Error::MalformedCommit(_))));
    }
}
