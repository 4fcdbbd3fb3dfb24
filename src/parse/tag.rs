use log::debug;

use crate::{
    error::{Error, Result},
    git::{Commit, Person},
};

/// Parses `git cat-file -p <object>` output for an annotated tag.
///
/// Returns `Ok(None)` when the object isn't an annotated tag, which is what a
/// lightweight tag pointing straight at a commit looks like. The record gets
/// `object` as its id since the tag object's own hash isn't part of the output.
///
/// # Example
///
/// ```
/// # use yacc::parse::parse_annotated_tag;
/// let out = "object 1ba1cf7\ntype commit\ntag v1.0\ntagger Name <name@example.com> 1485751987 -0800\n\nrelease\n";
/// let tag = parse_annotated_tag("3f9e2a1", out).unwrap().unwrap();
/// assert_eq!("3f9e2a1", tag.id);
/// assert_eq!("release", tag.message);
/// ```
pub fn parse_annotated_tag(object: &str, output: &str) -> Result<Option<Commit>> {
    let mut lines = output.lines();

    let mut headers = vec![];
    for line in lines.by_ref() {
        debug!("cat-file line: {:?}", line);
        if line.is_empty() {
            break;
        }
        headers.push(line);
    }

    if !headers.iter().any(|h| h.starts_with("tag ")) {
        debug!("{} is not an annotated tag", object);
        return Ok(None);
    }

    let mut tagger = Person::default();
    for header in headers {
        match header.split_once(' ').map(|(k, _)| k) {
            Some("object") | Some("type") | Some("tag") => {}
            Some("tagger") => tagger = parse_tagger(header),
            _ => {
                return Err(Error::MalformedTagHeader {
                    object: object.to_owned(),
                    line: header.to_owned(),
                })
            }
        }
    }

    let message = lines.collect::<Vec<_>>().join("\n");

    Ok(Some(Commit {
        id: object.to_owned(),
        committer: tagger,
        message: message.trim_end_matches(|c: char| c == '\r' || c == '\n').to_owned(),
        is_merge: false,
    }))
}

// tagger <ident> <timestamp> <tz>
fn parse_tagger(line: &str) -> Person {
    match regex!(r"^tagger (.*<[^>]*>) .*$").captures(line) {
        Some(caps) => Person::from_ident(&caps[1]),
        None => Person::from_ident(line),
    }
}
