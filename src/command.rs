use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use log::debug;

use crate::{
    error::{Error, Result},
    parse::REV_LIST_FORMAT,
};

/// The git commands the resolver needs answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCommand {
    /// Commits reachable from `include` but from none of `exclude`, formatted
    /// with [`REV_LIST_FORMAT`]
    RevList {
        include: String,
        exclude: Vec<String>,
    },
    /// The pretty-printed contents of one object
    CatFile { object: String },
    /// Every ref, or only those matching `pattern`
    ShowRef { pattern: Option<String> },
}

impl GitCommand {
    /// The full git command line, every ref inline
    pub fn args(&self) -> Vec<String> {
        match self {
            GitCommand::RevList { include, exclude } => {
                let mut args = vec![
                    "rev-list".to_owned(),
                    format!("--format={REV_LIST_FORMAT}"),
                    include.clone(),
                ];
                if !exclude.is_empty() {
                    args.push("--not".to_owned());
                    args.extend(exclude.iter().cloned());
                }
                args
            }
            GitCommand::CatFile { object } => {
                vec!["cat-file".to_owned(), "-p".to_owned(), object.clone()]
            }
            GitCommand::ShowRef { pattern } => {
                let mut args = vec!["show-ref".to_owned()];
                args.extend(pattern.iter().cloned());
                args
            }
        }
    }

    /// The arguments [`GitCli`] passes. Exclusions of a rev-list go through
    /// [`stdin`](Self::stdin) since a repository can have more refs than fit on a
    /// command line.
    fn cli_args(&self) -> Vec<String> {
        match self {
            GitCommand::RevList { include, .. } => vec![
                "rev-list".to_owned(),
                format!("--format={REV_LIST_FORMAT}"),
                "--stdin".to_owned(),
                include.clone(),
            ],
            _ => self.args(),
        }
    }

    /// What [`GitCli`] writes to git's standard input, if anything
    fn stdin(&self) -> Option<String> {
        match self {
            GitCommand::RevList { exclude, .. } => {
                Some(exclude.iter().map(|tip| format!("^{tip}\n")).collect())
            }
            _ => None,
        }
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GitCommand::RevList { .. } => write!(f, "rev-list"),
            GitCommand::CatFile { .. } => write!(f, "cat-file"),
            GitCommand::ShowRef { .. } => write!(f, "show-ref"),
        }
    }
}

/// Runs git commands on behalf of the engine.
///
/// The engine never spawns processes itself. Hosts that already own a command
/// layer (timeouts, quarantine environments, sandboxing) implement this trait,
/// everyone else can use [`GitCli`].
pub trait CommandRunner {
    /// Runs `command` against the repository and returns its standard output.
    fn run(&self, command: &GitCommand) -> Result<String>;
}

/// A [`CommandRunner`] that shells out to the `git` binary.
///
/// Inside a pre-receive hook git has already exported `GIT_DIR` and the
/// quarantine object directories, so `GitCli::new()` is all that's needed there.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    /// The git dir passed as `--git-dir` (Defaults to git's own discovery)
    pub git_dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        GitCli::default()
    }

    /// Runs git against a specific repository.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use yacc::command::{CommandRunner, GitCli, GitCommand};
    /// let git = GitCli::with_git_dir("/srv/repos/project.git");
    /// let refs = git.run(&GitCommand::ShowRef { pattern: None }).unwrap();
    /// ```
    pub fn with_git_dir<P: AsRef<Path>>(git_dir: P) -> Self {
        GitCli {
            git_dir: Some(git_dir.as_ref().to_path_buf()),
        }
    }
}

impl CommandRunner for GitCli {
    fn run(&self, command: &GitCommand) -> Result<String> {
        let mut git = Command::new("git");
        if let Some(dir) = self.git_dir.as_ref() {
            git.arg("--git-dir").arg(dir);
        }
        git.args(command.cli_args());

        debug!("running {:?}", git);
        let output = match command.stdin() {
            Some(input) => {
                let mut child = git
                    .stdin(Stdio::piped())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .spawn()?;

                if let Some(mut stdin) = child.stdin.take() {
                    // git stops reading when it dies, its stderr says why
                    match stdin.write_all(input.as_bytes()) {
                        Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e.into()),
                        _ => {}
                    }
                }

                child.wait_with_output()?
            }
            None => git.output()?,
        };
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if output.status.success() {
            return Ok(stdout);
        }

        // show-ref exits with 1 when there is nothing to show
        if matches!(command, GitCommand::ShowRef { .. })
            && output.status.code() == Some(1)
            && stdout.trim().is_empty()
        {
            return Ok(String::new());
        }

        Err(Error::Git {
            command: command.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        })
    }
}
