use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that can stop a session from being built.
///
/// Everything that can go wrong once a session is running (backspace at the
/// start of a word, typing past the end of a word, keys after the finish)
/// has defined behaviour in the engine and never surfaces here.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("the word list has no entries")]
    EmptyWordlist,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("cannot read word list {}: {source}", path.display())]
    WordlistRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write settings to {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
