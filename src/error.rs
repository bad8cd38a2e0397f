use std::path::PathBuf;

use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from the terminal or log files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Missing or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failures reported by the search backend.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required credential was not provided by the environment or config file.
    #[error("missing {0}: set it in the environment or the [account] config section")]
    MissingCredential(&'static str),

    /// An explicitly requested config file could not be parsed.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Per-peer result errors. These only ever drop the offending result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultError {
    /// The peer advertised no files.
    #[error("{owner} returned no files")]
    EmptyResult { owner: String },

    /// A path with no usable segments or no file name.
    #[error("{owner} sent malformed path {path:?}")]
    MalformedPath { owner: String, path: String },
}

/// Errors from the search backend.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Login rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The offline result library could not be read.
    #[error("cannot load result library {}: {reason}", path.display())]
    Library { path: PathBuf, reason: String },

    /// A download could not be started or failed midway.
    #[error("transfer failed: {0}")]
    Transfer(String),
}
