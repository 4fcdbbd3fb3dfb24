//! Push validation for git servers.
//!
//! A pre-receive hook hands the engine the ref changes of a push. For each of
//! them the engine works out which commits (or annotated tag objects) are new
//! to the repository, checks them against a configurable policy (committer
//! identity, message format, issue tracker references, branch naming) and
//! returns either [`Outcome::Accepted`] or a single rejection listing every
//! violation.
//!
//! Git, the issue tracker and the identity of the pusher are supplied by the
//! host through [`CommandRunner`], [`IssueTracker`] and [`Pusher`].

extern crate indexmap;
extern crate regex;
extern crate toml;

#[macro_use]
mod macros;
pub mod command;
pub mod config;
pub mod error;
pub mod fmt;
pub mod git;
pub mod issue;
pub mod parse;
pub mod report;
pub mod resolve;
pub mod rules;
pub mod user;
pub mod validator;

pub use command::{CommandRunner, GitCli, GitCommand};
pub use config::Config;
pub use git::{Commit, Person, RefChange};
pub use issue::{IssueKey, IssueTracker};
pub use report::{ErrorType, YaccError};
pub use user::{Pusher, UserKind};
pub use validator::Validator;

/// The verdict on a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted,
    Rejected {
        /// One line shown by hosts that have room for a title
        summary: String,
        /// The full text listing every violation
        message: String,
    },
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }
}
