use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

/// Registers the files a commit created or deleted with a version control
/// system. Invoked once per commit.
pub trait SourceControl: Debug + Send + Sync {
    fn add_remove(&self, added: &[PathBuf], removed: &[PathBuf]) -> Result<(), SourceControlError>;
}

#[derive(Debug, Error)]
pub enum SourceControlError {
    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to run source control command: {0}")]
    Io(#[from] std::io::Error),
}
