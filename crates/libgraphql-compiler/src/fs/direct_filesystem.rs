use crate::fs::AddedRemovedFiles;
use crate::fs::CodegenFilesystem;
use crate::fs::CommitError;
use crate::fs::FileStat;
use crate::fs::FilesystemError;
use crate::fs::SourceControl;
use inherent::inherent;
use parking_lot::Mutex;
use std::path::Path;

type Result<T> = std::result::Result<T, FilesystemError>;

/// Applies every operation to the real filesystem immediately, keeping
/// track of created and deleted paths for [`commit`](Self::commit).
#[derive(Debug, Default)]
pub struct DirectFilesystem {
    changes: Mutex<AddedRemovedFiles>,
}
impl DirectFilesystem {
    pub fn new() -> Self {
        Self::default()
    }
}

#[inherent]
impl CodegenFilesystem for DirectFilesystem {
    pub fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.exists())
    }

    pub fn read_file(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|err| FilesystemError::from_io(path, err))
    }

    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        let existed = path.exists();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| FilesystemError::from_io(parent, err))?;
        }
        std::fs::write(path, content).map_err(|err| FilesystemError::from_io(path, err))?;
        if !existed {
            self.changes.lock().added.push(path.to_path_buf());
        }
        Ok(())
    }

    pub fn unlink(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|err| FilesystemError::from_io(path, err))?;
        self.changes.lock().removed.push(path.to_path_buf());
        Ok(())
    }

    pub fn stat(&self, path: &Path) -> Result<FileStat> {
        let metadata = std::fs::metadata(path).map_err(|err| FilesystemError::from_io(path, err))?;
        Ok(FileStat {
            is_directory: metadata.is_dir(),
        })
    }

    pub fn mkdir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path).map_err(|err| FilesystemError::from_io(path, err))
    }

    /// Everything is already on disk; only notifies `source_control`.
    pub fn commit(&self, source_control: Option<&dyn SourceControl>) -> Result<()> {
        let changes = self.added_removed_files();
        if let Some(source_control) = source_control {
            source_control.add_remove(&changes.added, &changes.removed)
                .map_err(CommitError::from)?;
        }
        Ok(())
    }

    pub fn has_changes(&self) -> Result<bool> {
        let changes = self.changes.lock();
        Ok(!changes.added.is_empty() || !changes.removed.is_empty())
    }

    pub fn added_removed_files(&self) -> AddedRemovedFiles {
        let mut changes = self.changes.lock().clone();
        changes.added.sort();
        changes.removed.sort();
        changes
    }
}
