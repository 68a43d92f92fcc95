use crate::compiler_error::CompilerError;
use crate::fs::AddedRemovedFiles;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Where an error came from: a source file, a named definition, or the
/// schema.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorOrigin {
    Definition(String),
    Path(PathBuf),
    Schema,
}
impl std::fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Definition(name) => write!(f, "`{name}`"),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// The outcome of one codegen run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Definitions that went through the transform pipeline this run.
    pub compiled: BTreeSet<String>,
    pub created: Vec<PathBuf>,
    pub updated: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    /// Writes and deletions staged this run, including the manifest.
    pub staged_changes: usize,
    pub errors: BTreeMap<ErrorOrigin, Vec<CompilerError>>,
    /// Paths the commit created.
    pub added: Vec<PathBuf>,
    /// Paths the commit deleted.
    pub removed: Vec<PathBuf>,
}
impl RunReport {
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(crate) fn push_error(&mut self, origin: ErrorOrigin, error: impl Into<CompilerError>) {
        self.errors.entry(origin).or_default().push(error.into());
    }

    pub(crate) fn set_committed(&mut self, files: AddedRemovedFiles) {
        self.added = files.added;
        self.removed = files.removed;
    }
}
