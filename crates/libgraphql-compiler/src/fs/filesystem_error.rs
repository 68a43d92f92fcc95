use crate::fs::SourceControlError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilesystemError {
    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    ContractViolation(#[from] ContractViolationError),

    #[error("I/O error on `{}`: {error}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("No such file: `{}`", .0.display())]
    NotFound(PathBuf),
}
impl FilesystemError {
    pub(crate) fn from_io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        let path = path.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, error }
        }
    }
}

/// An operation attempted on a [`StagedFilesystem`](crate::fs::StagedFilesystem)
/// after it was committed. Always a bug in the caller.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("`{operation}` called on a staged filesystem that was already committed")]
pub struct ContractViolationError {
    pub operation: &'static str,
}

/// A failure while applying staged changes. Fatal to the run.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("Failed to {action} `{}` during commit: {error}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error(transparent)]
    SourceControl(#[from] SourceControlError),
}
