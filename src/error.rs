use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// Structural failures that abort a validation pass.
///
/// Policy violations are never reported through this type, they are collected
/// as [`YaccError`](crate::YaccError) values instead. Everything here means the
/// engine could not trust the data it was looking at.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected line in rev-list output: {0:?}")]
    UnexpectedLine(String),

    #[error("malformed commit metadata: {0:?}")]
    MalformedCommit(String),

    #[error("malformed show-ref line: {0:?}")]
    MalformedRefLine(String),

    #[error("unexpected header in tag object {object}: {line:?}")]
    MalformedTagHeader { object: String, line: String },

    #[error("invalid regex for setting {setting}: {source}")]
    InvalidRegex {
        setting: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("failed to parse config file {0}: {1}")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("failed to parse config: {0}")]
    ConfigFormat(#[from] toml::de::Error),

    #[error("unrecognized setting: {0}")]
    UnknownSetting(String),

    #[error("failed to convert {0} to a valid error type")]
    ErrorType(String),

    #[error("git {command} exited with {status}: {stderr}")]
    Git {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("fatal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
