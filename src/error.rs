use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures writing to a key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures loading a game config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Reasons a string is not a leaderboard name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name has {0} letters, at most 3 allowed")]
    TooLong(usize),
    #[error("name contains non-letter {0:?}")]
    NotAlphabetic(char),
}
