use crate::config::WriteMode;
use crate::errors::FailureStage;
use crate::patterns::Matcher;
use std::fs::{self, File, Metadata, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Ownership and permission bits of a file, captured before a rewrite and
/// reapplied after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    #[cfg(unix)]
    pub uid: u32,
    #[cfg(unix)]
    pub gid: u32,
    #[cfg(unix)]
    pub mode: u32,
    #[cfg(not(unix))]
    pub readonly: bool,
}

impl FileStat {
    pub fn from_metadata(meta: &Metadata) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Self {
                uid: meta.uid(),
                gid: meta.gid(),
                mode: meta.mode() & 0o7777,
            }
        }
        #[cfg(not(unix))]
        {
            Self {
                readonly: meta.permissions().readonly(),
            }
        }
    }

    pub fn of(path: &Path) -> io::Result<Self> {
        Ok(Self::from_metadata(&fs::metadata(path)?))
    }

    /// Writes the captured owner, group and mode back onto `path`.
    ///
    /// Ownership goes first: `chown` may clear set-id bits, which the
    /// following `chmod` then restores.
    pub fn apply(&self, path: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::os::unix::fs::chown(path, Some(self.uid), Some(self.gid))?;
            fs::set_permissions(path, fs::Permissions::from_mode(self.mode))
        }
        #[cfg(not(unix))]
        {
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_readonly(self.readonly);
            fs::set_permissions(path, perms)
        }
    }
}

/// Puts captured ownership and permissions back onto a path.
pub trait MetadataRestorer {
    fn restore(&self, stat: &FileStat, path: &Path) -> io::Result<()>;
}

/// Restores through the real filesystem calls.
pub struct FsRestorer;

impl MetadataRestorer for FsRestorer {
    fn restore(&self, stat: &FileStat, path: &Path) -> io::Result<()> {
        stat.apply(path)
    }
}

/// What happened to one filtered-in file.
#[derive(Debug)]
pub enum SubstitutionOutcome {
    /// No match; the file was not touched.
    Unchanged,
    /// Every match was replaced and the metadata restored.
    Changed { occurrences: usize },
    /// The file could not be opened for reading and writing. Nothing was modified.
    PermissionDenied,
    /// The file was opened but processing failed afterwards.
    ///
    /// `occurrences` is non-zero only when the replaced content already
    /// reached the file, i.e. an in-place rewrite whose metadata could not
    /// be restored.
    Failed {
        stage: FailureStage,
        source: io::Error,
        occurrences: usize,
    },
}

/// A failure after the permission check, tagged with where it happened.
type StageResult<T> = std::result::Result<T, (FailureStage, io::Error)>;

fn at<T>(stage: FailureStage, result: io::Result<T>) -> StageResult<T> {
    result.map_err(|e| (stage, e))
}

/// The per-file substitution engine.
pub struct Replacer {
    matcher: Matcher,
    replacement: Vec<u8>,
    write_mode: WriteMode,
    restorer: Box<dyn MetadataRestorer>,
}

impl Replacer {
    pub fn new(matcher: Matcher, replacement: impl Into<String>, write_mode: WriteMode) -> Self {
        Self {
            matcher,
            replacement: replacement.into().into_bytes(),
            write_mode,
            restorer: Box::new(FsRestorer),
        }
    }

    /// Replaces the way captured metadata is put back after a rewrite.
    pub fn with_restorer(mut self, restorer: impl MetadataRestorer + 'static) -> Self {
        self.restorer = Box::new(restorer);
        self
    }

    /// Processes a single file:
    /// 1. It is opened for reading and writing. A permission error here skips the file.
    /// 2. The whole content is read and the matches counted.
    /// 3. With no match the file is left alone.
    /// 4. Otherwise owner, group and mode are captured and the replaced content
    ///    is written. In place, the metadata is reapplied to the file afterwards;
    ///    atomically, it is applied to the temp file before the rename, so a
    ///    failure leaves the original untouched.
    pub fn process_file(&self, path: &Path) -> SubstitutionOutcome {
        match self.try_process(path) {
            Ok(outcome) => outcome,
            Err((stage, source)) => SubstitutionOutcome::Failed {
                stage,
                source,
                occurrences: 0,
            },
        }
    }

    fn try_process(&self, path: &Path) -> StageResult<SubstitutionOutcome> {
        let mut file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Ok(SubstitutionOutcome::PermissionDenied);
            }
            Err(e) => return Err((FailureStage::Read, e)),
        };

        let mut content = Vec::new();
        at(FailureStage::Read, file.read_to_end(&mut content))?;

        let occurrences = self.matcher.count(&content);
        if occurrences == 0 {
            return Ok(SubstitutionOutcome::Unchanged);
        }

        let stat = FileStat::from_metadata(&at(FailureStage::Metadata, file.metadata())?);
        let new_content = self.matcher.replace_all(&content, &self.replacement);
        match self.write_mode {
            WriteMode::InPlace => {
                at(FailureStage::Write, overwrite(&mut file, &new_content))?;
                drop(file);
                if let Err(source) = self.restorer.restore(&stat, path) {
                    return Ok(SubstitutionOutcome::Failed {
                        stage: FailureStage::Metadata,
                        source,
                        occurrences,
                    });
                }
            }
            WriteMode::Atomic => {
                drop(file);
                let temp_file = at(FailureStage::Write, write_temp(path, &new_content))?;
                // On error the temp file is dropped and removed; the original is untouched.
                at(FailureStage::Metadata, self.restorer.restore(&stat, temp_file.path()))?;
                at(FailureStage::Write, temp_file.persist(path).map_err(|e| e.error))?;
            }
        }

        Ok(SubstitutionOutcome::Changed { occurrences })
    }
}

fn overwrite(file: &mut File, content: &[u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(content)?;
    file.flush()
}

/// Writes `content` to a new temp file in the same directory as `path`.
fn write_temp(path: &Path, content: &[u8]) -> io::Result<NamedTempFile> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.flush()?;
    Ok(temp_file)
}
