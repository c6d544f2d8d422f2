use crate::config::ScanRequest;
use crate::errors::{Error, Result};
use crate::patterns::{FilePatterns, Matcher};
use crate::progress::{PercentReporter, Progress};
use crate::replacer::{MetadataRestorer, Replacer, SubstitutionOutcome};
use crate::summary::{FileFailure, OutputFormat, ScanSummary};
use crate::walker;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Runs a validated [`ScanRequest`] over its directory tree.
///
/// Files are processed strictly one at a time. Every filtered-in path is
/// collected before the first one is touched so the total is known when
/// progress starts; the list holds one `PathBuf` per filtered-in file.
pub struct Scanner {
    request: ScanRequest,
    patterns: FilePatterns,
    replacer: Replacer,
}

impl Scanner {
    /// Validates the request and compiles its patterns.
    pub fn new(request: ScanRequest) -> Result<Self> {
        request.validate()?;
        let matcher = Matcher::new(&request.find, request.use_regex)?;
        let patterns = FilePatterns::new(request.file_patterns.as_slice())?;
        let replacer = Replacer::new(matcher, request.replace.clone(), request.write_mode);
        Ok(Self {
            request,
            patterns,
            replacer,
        })
    }

    /// Swaps how owner, group and mode are put back after a rewrite.
    pub fn with_metadata_restorer(mut self, restorer: impl MetadataRestorer + 'static) -> Self {
        self.replacer = self.replacer.with_restorer(restorer);
        self
    }

    /// Collects the filtered-in files, in walk order, and how many were excluded.
    fn collect_candidates(&self) -> (Vec<PathBuf>, usize) {
        let mut filtered = Vec::new();
        let mut excluded = 0;
        for candidate in walker::regular_files(&self.request.root).map(|p| self.patterns.classify(p)) {
            if candidate.filtered_in {
                filtered.push(candidate.path);
            } else {
                excluded += 1;
            }
        }
        (filtered, excluded)
    }

    /// Walks the tree, rewrites every matching file and reports progress.
    ///
    /// Per-file problems never abort the scan, except that in fail-fast
    /// mode the first post-read failure is returned as [`Error::FileWrite`].
    pub fn run(&self, progress: &mut dyn Progress) -> Result<ScanSummary> {
        info!(
            "Scanning {} for {:?} (regex: {})",
            self.request.root.display(),
            self.request.find,
            self.request.use_regex
        );

        let (files, excluded) = self.collect_candidates();
        let mut summary = ScanSummary {
            files_filtered: files.len(),
            files_excluded: excluded,
            ..Default::default()
        };

        progress.begin(files.len())?;
        for (idx, path) in files.into_iter().enumerate() {
            self.record(&mut summary, path)?;
            progress.advance(idx + 1)?;
        }
        progress.finish()?;

        info!(
            "Scan complete: {} occurrences in {} files, {} skipped, {} failed, {} searched",
            summary.total_occurrences,
            summary.files_changed,
            summary.files_skipped_permission,
            summary.failures.len(),
            summary.files_filtered
        );
        Ok(summary)
    }

    fn record(&self, summary: &mut ScanSummary, path: PathBuf) -> Result<()> {
        match self.replacer.process_file(&path) {
            SubstitutionOutcome::Unchanged => {
                debug!("No match in {}", path.display());
            }
            SubstitutionOutcome::Changed { occurrences } => {
                debug!("Modified {} ({} changes)", path.display(), occurrences);
                summary.total_occurrences += occurrences;
                summary.files_changed += 1;
            }
            SubstitutionOutcome::PermissionDenied => {
                debug!("Permission denied: {}", path.display());
                summary.files_skipped_permission += 1;
            }
            SubstitutionOutcome::Failed {
                stage,
                source,
                occurrences,
            } => {
                // The content already reached the file; only its metadata is off.
                if occurrences > 0 {
                    summary.total_occurrences += occurrences;
                    summary.files_changed += 1;
                }
                if self.request.fail_fast {
                    return Err(Error::FileWrite { path, stage, source });
                }
                warn!("Could not {} {}: {}", stage, path.display(), source);
                summary.failures.push(FileFailure::new(path, stage, &source));
            }
        }
        Ok(())
    }
}

/// Performs a whole find-and-replace run with console output.
///
/// Progress percentages and the closing summary block are streamed to
/// stdout. The summary is also returned; [`ScanSummary::counts`] gives
/// `(occurrences, skipped, filtered)`.
pub fn scan<I, S>(
    root: impl AsRef<Path>,
    find: &str,
    replace: &str,
    use_regex: bool,
    file_patterns: I,
) -> Result<ScanSummary>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = ScanRequest::new(root.as_ref(), find, replace)
        .regex(use_regex)
        .file_patterns(file_patterns);
    let scanner = Scanner::new(request)?;
    let summary = scanner.run(&mut PercentReporter::stdout())?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout)?;
    summary.write_to(&mut stdout, OutputFormat::Text)?;
    Ok(summary)
}
