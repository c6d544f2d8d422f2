use std::fmt;
use std::path::PathBuf;
use serde::Serialize;
use thiserror::Error;

/// The stage of per-file processing at which a non-permission failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Reading the content failed for a reason other than permissions.
    Read,
    /// Writing the replaced content back failed.
    Write,
    /// Restoring the captured owner, group or mode failed.
    Metadata,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Read => f.write_str("read"),
            FailureStage::Write => f.write_str("write"),
            FailureStage::Metadata => f.write_str("restore owner and mode of"),
        }
    }
}

/// The primary error type for all operations in `find_replace`.
///
/// Only request-level problems end up here. Files skipped for lack of
/// permission never do: they are counted in the summary instead.
#[derive(Error, Debug)]
pub enum Error {
    /// The root path is missing or is not a directory.
    #[error("Invalid root {path}: {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    /// The search term was empty.
    #[error("Search term must not be empty")]
    EmptyPattern,

    /// An error that occurred during regex compilation.
    #[error("Pattern compilation failed: {0}")]
    Regex(#[from] regex::Error),

    /// A file pattern is not a valid glob.
    #[error("Invalid file pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// An error related to I/O outside of per-file processing (e.g. progress output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An error related to JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A file that was already read could not be rewritten. Only returned
    /// when the scan runs in fail-fast mode.
    #[error("Failed to {stage} {path}: {source}")]
    FileWrite {
        path: PathBuf,
        stage: FailureStage,
        #[source]
        source: std::io::Error,
    },
}

/// A convenient type alias for `Result<T, find_replace::errors::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
