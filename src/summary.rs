use crate::errors::{FailureStage, Result};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

/// Defines how the closing summary is rendered.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The human-readable summary block.
    #[default]
    Text,
    /// JSON, suitable for machine processing.
    Json,
}

/// A file that was readable and writable but could not be fully processed.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub message: String,
}

impl FileFailure {
    pub fn new(path: PathBuf, stage: FailureStage, source: &io::Error) -> Self {
        Self {
            path,
            stage,
            message: source.to_string(),
        }
    }
}

/// Aggregate statistics of one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanSummary {
    /// Matches substituted, summed over every changed file.
    pub total_occurrences: usize,
    /// Filtered-in files skipped because they could not be opened for reading and writing.
    pub files_skipped_permission: usize,
    /// Files that passed the filename filter, i.e. "files searched".
    pub files_filtered: usize,
    /// Files actually rewritten.
    pub files_changed: usize,
    /// Regular files seen during the walk that did not pass the filter.
    pub files_excluded: usize,
    /// Files that failed after the permission check. Never counted as skipped.
    pub failures: Vec<FileFailure>,
}

impl ScanSummary {
    /// The three headline numbers: `(occurrences, skipped, filtered)`.
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.total_occurrences,
            self.files_skipped_permission,
            self.files_filtered,
        )
    }

    /// Writes the summary block in the requested format.
    pub fn write_to<W: Write>(&self, writer: &mut W, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => self.write_text(writer)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *writer, self)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }

    fn write_text<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "Occurrences replaced: {}", self.total_occurrences)?;
        writeln!(
            writer,
            "Files skipped (Permission denied): {}",
            self.files_skipped_permission
        )?;
        writeln!(writer, "Total files searched: {}", self.files_filtered)?;
        if !self.failures.is_empty() {
            writeln!(writer, "Files failed: {}", self.failures.len())?;
            for failure in &self.failures {
                writeln!(
                    writer,
                    "  {} (could not {}: {})",
                    failure.path.display(),
                    failure.stage,
                    failure.message
                )?;
            }
        }
        Ok(())
    }
}
