//! Node error types.

use std::path::PathBuf;

use blockline_core::ConfigError;
use thiserror::Error;

/// Errors that stop the node from starting or running.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Reading a file or the console failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is unreadable or invalid.
    #[error("config {path}: {source}")]
    Config {
        /// File that failed.
        path: PathBuf,
        /// Why it failed.
        #[source]
        source: ConfigError,
    },

    /// The pair could not be built from valid configurations.
    #[error("cannot pair instruments: {0}")]
    Pair(#[from] ConfigError),
}

/// A console line that is not a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Blank line.
    #[error("empty command")]
    Empty,

    /// First word is not a known command.
    #[error("unknown command: {0}")]
    Unknown(String),

    /// Command needs an argument that was not given.
    #[error("{command} needs {argument}")]
    MissingArgument {
        /// Command name.
        command: &'static str,
        /// What is missing.
        argument: &'static str,
    },

    /// Argument did not parse.
    #[error("invalid {argument}: {value}")]
    InvalidArgument {
        /// What was expected.
        argument: &'static str,
        /// What was given.
        value: String,
    },

    /// Words left over after a complete command.
    #[error("unexpected {0}")]
    Trailing(String),
}
