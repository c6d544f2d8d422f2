use crate::errors::{Error, Result};
use glob::{MatchOptions, Pattern};
use regex::bytes::{NoExpand, Regex};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Filename globs only ever see a base name, so `*` can never cross a separator.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// The compiled search term.
///
/// Both modes run on the same byte-level regex engine: literal terms are
/// escaped before compilation and their replacement is inserted verbatim,
/// so counting and substitution always agree on what a match is.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    literal: bool,
}

impl Matcher {
    /// Compiles `find` either as a regex or as an escaped literal.
    pub fn new(find: &str, use_regex: bool) -> Result<Self> {
        if find.is_empty() {
            return Err(Error::EmptyPattern);
        }
        let regex = if use_regex {
            Regex::new(find)?
        } else {
            Regex::new(&regex::escape(find))?
        };
        Ok(Self {
            regex,
            literal: !use_regex,
        })
    }

    /// Number of non-overlapping matches in `content`.
    pub fn count(&self, content: &[u8]) -> usize {
        self.regex.find_iter(content).count()
    }

    /// Replaces every match counted by [`Matcher::count`].
    pub fn replace_all<'a>(&self, content: &'a [u8], replacement: &[u8]) -> Cow<'a, [u8]> {
        if self.literal {
            self.regex.replace_all(content, NoExpand(replacement))
        } else {
            self.regex.replace_all(content, replacement)
        }
    }
}

/// A path found during traversal, tagged with whether it passed the filename filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub filtered_in: bool,
}

/// The eligibility filter: an ordered set of filename globs.
///
/// An empty set lets every file through, the same as a single `*`.
#[derive(Debug, Clone, Default)]
pub struct FilePatterns {
    globs: Vec<Pattern>,
}

impl FilePatterns {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let globs = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { globs })
    }

    /// `true` when no patterns were given.
    pub fn matches_everything(&self) -> bool {
        self.globs.is_empty()
    }

    /// Tests a bare file name against the patterns.
    pub fn matches_name(&self, name: &str) -> bool {
        self.matches_everything() || self.globs.iter().any(|g| g.matches_with(name, GLOB_OPTIONS))
    }

    /// Tests the base name of `path`. Non UTF-8 names are compared lossily.
    pub fn matches_path(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.matches_name(&name.to_string_lossy()),
            None => false,
        }
    }

    pub fn classify(&self, path: PathBuf) -> FileCandidate {
        let filtered_in = self.matches_path(&path);
        FileCandidate { path, filtered_in }
    }
}
