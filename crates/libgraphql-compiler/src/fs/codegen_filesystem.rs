use crate::fs::FilesystemError;
use crate::fs::SourceControl;
use std::path::Path;
use std::path::PathBuf;

type Result<T> = std::result::Result<T, FilesystemError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub is_directory: bool,
}

/// Paths a commit created and deleted, each in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddedRemovedFiles {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// The filesystem operations the codegen runner performs. Callers are
/// written against this trait only, so effects can be applied directly
/// ([`DirectFilesystem`](crate::fs::DirectFilesystem)) or buffered and
/// applied as one unit ([`StagedFilesystem`](crate::fs::StagedFilesystem)).
pub trait CodegenFilesystem: Send + Sync {
    fn exists(&self, path: &Path) -> Result<bool>;

    fn read_file(&self, path: &Path) -> Result<String>;

    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    fn unlink(&self, path: &Path) -> Result<()>;

    fn stat(&self, path: &Path) -> Result<FileStat>;

    fn mkdir(&self, path: &Path) -> Result<()>;

    /// Applies any buffered changes and passes the resulting added/removed
    /// paths to `source_control`.
    fn commit(&self, source_control: Option<&dyn SourceControl>) -> Result<()>;

    fn has_changes(&self) -> Result<bool>;

    fn added_removed_files(&self) -> AddedRemovedFiles;
}
