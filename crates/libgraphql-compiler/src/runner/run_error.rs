use crate::fs::CommitError;
use crate::fs::ContractViolationError;
use crate::fs::FilesystemError;
use thiserror::Error;

/// An error that aborts a whole run. Everything else is collected in the
/// [`RunReport`](crate::runner::RunReport).
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Run cancelled before commit")]
    Cancelled,

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error(transparent)]
    ContractViolation(#[from] ContractViolationError),
}
impl From<FilesystemError> for RunError {
    fn from(err: FilesystemError) -> Self {
        match err {
            FilesystemError::Commit(err) => Self::Commit(err),
            FilesystemError::ContractViolation(err) => Self::ContractViolation(err),
            FilesystemError::Io { path, error } => Self::Commit(CommitError::Io {
                action: "access",
                path,
                error,
            }),
            FilesystemError::NotFound(path) => Self::Commit(CommitError::Io {
                action: "access",
                path,
                error: std::io::ErrorKind::NotFound.into(),
            }),
        }
    }
}
