use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileChangeKind {
    Added,
    Changed,
    Removed,
}

/// One file-system event relevant to a rebuild.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: FileChangeKind,
}
impl FileChange {
    pub fn added(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), kind: FileChangeKind::Added }
    }

    pub fn changed(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), kind: FileChangeKind::Changed }
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), kind: FileChangeKind::Removed }
    }
}
