use crate::file_reader::ReadContentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] ReadContentError),

    #[error("`extensions` must name at least one source file extension")]
    NoExtensions,

    #[error("Invalid config {path:?}: {message}")]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
}
