use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// How replaced content is written back to disk.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and rewrite the original file through the handle it was read from.
    #[default]
    InPlace,
    /// Write a temporary file next to the original and rename it over the original.
    Atomic,
}

/// A single find-and-replace invocation.
///
/// Built once, then handed to a [`Scanner`](crate::Scanner) which never mutates it.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// The directory to walk.
    pub root: PathBuf,
    /// The literal string or regex to search for.
    pub find: String,
    /// The replacement text. Capture references like `$1` are expanded in regex mode only.
    pub replace: String,
    /// Treat `find` as a regular expression.
    pub use_regex: bool,
    /// Filename globs such as `*.php`. Empty means every file.
    pub file_patterns: Vec<String>,
    /// How changed files are written.
    pub write_mode: WriteMode,
    /// Abort the scan on the first file that cannot be rewritten.
    pub fail_fast: bool,
}

impl ScanRequest {
    /// Creates a literal-mode request that matches every file.
    pub fn new(root: impl Into<PathBuf>, find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            find: find.into(),
            replace: replace.into(),
            use_regex: false,
            file_patterns: Vec::new(),
            write_mode: WriteMode::default(),
            fail_fast: false,
        }
    }

    pub fn regex(mut self, enabled: bool) -> Self {
        self.use_regex = enabled;
        self
    }

    pub fn file_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    pub fn fail_fast(mut self, enabled: bool) -> Self {
        self.fail_fast = enabled;
        self
    }

    /// Checks the request-level preconditions: a non-empty search term and
    /// a root that exists and is a directory.
    pub fn validate(&self) -> Result<()> {
        if self.find.is_empty() {
            return Err(Error::EmptyPattern);
        }
        check_root(&self.root)
    }
}

fn check_root(root: &Path) -> Result<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::InvalidRoot {
            path: root.to_path_buf(),
            reason: "not a directory".to_string(),
        }),
        Err(e) => Err(Error::InvalidRoot {
            path: root.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}
