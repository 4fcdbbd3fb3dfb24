use log::debug;

use crate::error::{Error, Result};

/// Parses `git show-ref` output (`<hash> <refname>` per line) into the ref
/// names, in the order git listed them.
pub fn parse_show_ref(output: &str) -> Result<Vec<String>> {
    output
        .lines()
        .map(|line| {
            debug!("show-ref line: {:?}", line);
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next()) {
                (Some(_hash), Some(name)) => Ok(name.to_owned()),
                _ => Err(Error::MalformedRefLine(line.to_owned())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_names_in_order() {
        let out = "9a1ced131648d5481e4a3f00b9c5522d466ec693 refs/heads/master\n\
                   1060dc57a0c0b27fdd7aef1481ca914a1d7d084e refs/heads/feature\n\
                   a293f806780249dc855ff560cb70f3c21c7f9c1e refs/tags/v1.0\n";
        assert_eq!(
            parse_show_ref(out).unwrap(),
            vec!["refs/heads/master", "refs/heads/feature", "refs/tags/v1.0"]
        );
    }

    #[test]
    fn empty_listing() {
        assert!(parse_show_ref("").unwrap().is_empty());
    }

    #[test]
    fn single_token_line_is_fatal() {
        let out = "9a1ced131648d5481e4a3f00b9c5522d466ec693 refs/heads/master\nbroken\n";
        assert!(matches!(parse_show_ref(out), Err(Error::MalformedRefLine(l)) if l == "broken"));
    }

    #[test]
    fn blank_line_is_fatal() {
        assert!(parse_show_ref("a refs/heads/a\n\nb refs/heads/b\n").is_err());
    }
}
