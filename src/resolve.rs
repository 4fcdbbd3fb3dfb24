//! Works out which commits a ref change brings into the repository.

use log::debug;

use crate::{
    command::{CommandRunner, GitCommand},
    error::Result,
    git::{ChangeKind, Commits, RefChange, RefKind},
    parse::{parse_annotated_tag, parse_rev_list, parse_show_ref},
};

/// Returns the commits that are new because of `change`.
///
/// * deletes bring nothing in;
/// * tags are pointers, so only an annotated tag object itself is new, the
///   commits it points at came in through a branch and were checked there;
/// * everything else yields the commits reachable from the new tip but from
///   none of the refs that exist right now.
///
/// The existing refs are listed on every call. Two ref changes of one push
/// that share new commits therefore both see them, because in a pre-receive
/// hook no ref has moved yet.
pub fn new_commits(runner: &dyn CommandRunner, change: &RefChange) -> Result<Commits> {
    debug!(
        "new_commits, ref_id={} ref_kind={:?} change_kind={:?} to_hash={}",
        change.ref_id, change.ref_kind, change.change_kind, change.to_hash
    );

    if change.change_kind == ChangeKind::Delete {
        // Deletes don't leave anything to check
        return Ok(vec![]);
    }

    let commits = match change.ref_kind {
        RefKind::Tag => annotated_tag(runner, &change.to_hash)?,
        RefKind::Branch | RefKind::Other => unreachable_commits(runner, &change.to_hash)?,
    };

    debug!("found {} commits that need checking", commits.len());
    Ok(commits)
}

fn annotated_tag(runner: &dyn CommandRunner, hash: &str) -> Result<Commits> {
    let output = runner.run(&GitCommand::CatFile {
        object: hash.to_owned(),
    })?;

    Ok(parse_annotated_tag(hash, &output)?.into_iter().collect())
}

fn unreachable_commits(runner: &dyn CommandRunner, hash: &str) -> Result<Commits> {
    let tips = parse_show_ref(&runner.run(&GitCommand::ShowRef { pattern: None })?)?;
    debug!("finding commits reachable from {} but not {:?}", hash, tips);

    let output = runner.run(&GitCommand::RevList {
        include: hash.to_owned(),
        exclude: tips,
    })?;

    parse_rev_list(&output)
}
