//! `find_replace` performs recursive find-and-replace over a directory tree
//! while keeping each rewritten file's owner, group and permission bits.
//!
//! It provides the core logic for the `find_replace` command-line tool but can
//! also be used as a library. The main components are:
//!
//! - `walker`: lazily enumerates every regular file under a root.
//! - `patterns`: the filename glob filter and the literal/regex search term.
//! - `Replacer`: rewrites one file, restoring its metadata afterwards.
//! - `progress`: percentage and progress bar reporting.
//! - `Scanner`: ties the above together and accumulates a `ScanSummary`.
//!
//! Files are processed sequentially. A file that cannot be opened for
//! reading and writing is skipped and counted; it never aborts the scan.

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod patterns;
pub mod progress;
pub mod replacer;
pub mod scanner;
pub mod summary;
pub mod walker;

// Re-export main types for easier access by library users.
pub use config::{ScanRequest, WriteMode};
pub use errors::{Error, Result};
pub use replacer::{MetadataRestorer, Replacer, SubstitutionOutcome};
pub use scanner::{Scanner, scan};
pub use summary::{OutputFormat, ScanSummary};
