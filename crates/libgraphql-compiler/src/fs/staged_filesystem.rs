use crate::fs::AddedRemovedFiles;
use crate::fs::CodegenFilesystem;
use crate::fs::CommitError;
use crate::fs::ContractViolationError;
use crate::fs::FileStat;
use crate::fs::FilesystemError;
use crate::fs::SourceControl;
use inherent::inherent;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, FilesystemError>;

/// A buffered effect on one path. Untouched paths have no entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StagedEntry {
    Write(String),
    Delete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StagedState {
    Open,
    Staging,
    Committed,
}

#[derive(Debug)]
struct StagedInner {
    state: StagedState,
    entries: BTreeMap<PathBuf, StagedEntry>,
    directories: BTreeSet<PathBuf>,
    committed: AddedRemovedFiles,
}

/// Buffers the filesystem effects of one run and applies them together in
/// [`commit`](Self::commit).
///
/// Reads see staged content first and fall back to the real filesystem. A
/// path staged for deletion reads as [`FilesystemError::NotFound`] and does
/// not [`exist`](Self::exists), even if it is still on disk.
///
/// `commit` only physically writes files whose content differs from what is
/// on disk at commit time, and processes paths in sorted order. Once
/// committed, only [`added_removed_files`](Self::added_removed_files) may be
/// called: every other operation, including a second `commit`, fails with
/// [`FilesystemError::ContractViolation`].
///
/// Dropping a `StagedFilesystem` without committing discards everything it
/// buffered.
#[derive(Debug)]
pub struct StagedFilesystem {
    inner: Mutex<StagedInner>,
}
impl StagedFilesystem {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StagedInner {
                state: StagedState::Open,
                entries: BTreeMap::new(),
                directories: BTreeSet::new(),
                committed: AddedRemovedFiles::default(),
            }),
        }
    }

    pub fn state(&self) -> StagedState {
        self.inner.lock().state
    }

    /// The currently buffered entry for `path`, if any.
    pub fn staged_entry(&self, path: &Path) -> Option<StagedEntry> {
        self.inner.lock().entries.get(path).cloned()
    }

    /// Moves `Open` to `Staging`, or fails if already committed.
    fn begin(
        inner: &mut StagedInner,
        operation: &'static str,
    ) -> std::result::Result<(), ContractViolationError> {
        match inner.state {
            StagedState::Committed => {
                tracing::error!(
                    "Contract violation: `{operation}` called on a committed staged filesystem",
                );
                Err(ContractViolationError { operation })
            },
            StagedState::Open | StagedState::Staging => {
                inner.state = StagedState::Staging;
                Ok(())
            },
        }
    }
}
impl Default for StagedFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

#[inherent]
impl CodegenFilesystem for StagedFilesystem {
    pub fn exists(&self, path: &Path) -> Result<bool> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "exists")?;
        Ok(match inner.entries.get(path) {
            Some(StagedEntry::Write(_)) => true,
            Some(StagedEntry::Delete) => false,
            None => inner.directories.contains(path) || path.exists(),
        })
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "read_file")?;
        match inner.entries.get(path) {
            Some(StagedEntry::Write(content)) => Ok(content.clone()),
            Some(StagedEntry::Delete) => Err(FilesystemError::NotFound(path.to_path_buf())),
            None => std::fs::read_to_string(path).map_err(|err| FilesystemError::from_io(path, err)),
        }
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "write_file")?;
        inner.entries.insert(path.to_path_buf(), StagedEntry::Write(content.to_string()));
        Ok(())
    }

    pub fn unlink(&self, path: &Path) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "unlink")?;
        inner.entries.insert(path.to_path_buf(), StagedEntry::Delete);
        Ok(())
    }

    pub fn stat(&self, path: &Path) -> Result<FileStat> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "stat")?;
        match inner.entries.get(path) {
            Some(StagedEntry::Write(_)) => Ok(FileStat { is_directory: false }),
            Some(StagedEntry::Delete) => Err(FilesystemError::NotFound(path.to_path_buf())),
            None if inner.directories.contains(path) => Ok(FileStat { is_directory: true }),
            None => {
                let metadata = std::fs::metadata(path)
                    .map_err(|err| FilesystemError::from_io(path, err))?;
                Ok(FileStat {
                    is_directory: metadata.is_dir(),
                })
            },
        }
    }

    pub fn mkdir(&self, path: &Path) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "mkdir")?;
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    pub fn commit(&self, source_control: Option<&dyn SourceControl>) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "commit")?;
        inner.state = StagedState::Committed;

        let mut added = vec![];
        let mut removed = vec![];
        for directory in &inner.directories {
            std::fs::create_dir_all(directory).map_err(|error| CommitError::Io {
                action: "create directory",
                path: directory.clone(),
                error,
            })?;
        }
        for (path, entry) in &inner.entries {
            match entry {
                StagedEntry::Write(content) => {
                    // Read fresh: the file may have changed since it was staged.
                    let previous = match std::fs::read(path) {
                        Ok(previous) => Some(previous),
                        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                        Err(error) => return Err(CommitError::Io {
                            action: "read",
                            path: path.clone(),
                            error,
                        }.into()),
                    };
                    if previous.as_deref() == Some(content.as_bytes()) {
                        tracing::trace!(path = %path.display(), "unchanged, skipping write");
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).map_err(|error| CommitError::Io {
                            action: "create directory",
                            path: parent.to_path_buf(),
                            error,
                        })?;
                    }
                    std::fs::write(path, content).map_err(|error| CommitError::Io {
                        action: "write",
                        path: path.clone(),
                        error,
                    })?;
                    if previous.is_none() {
                        added.push(path.clone());
                    }
                },
                StagedEntry::Delete => match std::fs::remove_file(path) {
                    Ok(()) => removed.push(path.clone()),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => (),
                    Err(error) => return Err(CommitError::Io {
                        action: "delete",
                        path: path.clone(),
                        error,
                    }.into()),
                },
            }
        }
        tracing::debug!(
            "Committed staged filesystem: {} added, {} removed",
            added.len(),
            removed.len(),
        );

        inner.committed = AddedRemovedFiles { added, removed };
        if let Some(source_control) = source_control {
            source_control.add_remove(&inner.committed.added, &inner.committed.removed)
                .map_err(CommitError::from)?;
        }
        Ok(())
    }

    pub fn has_changes(&self) -> Result<bool> {
        let mut inner = self.inner.lock();
        Self::begin(&mut inner, "has_changes")?;
        Ok(!inner.entries.is_empty() || !inner.directories.is_empty())
    }

    /// Paths the commit created and deleted. Empty before commit.
    pub fn added_removed_files(&self) -> AddedRemovedFiles {
        self.inner.lock().committed.clone()
    }
}
