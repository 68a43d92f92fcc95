use crate::file_reader;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaBuildError {
    #[error("Type `{type_name}` is defined more than once")]
    DuplicateTypeDefinition {
        file_path: Option<PathBuf>,
        type_name: String,
    },

    #[error("Extension of undefined type `{type_name}`")]
    ExtensionOfUndefinedType {
        file_path: Option<PathBuf>,
        type_name: String,
    },

    #[error("Failed to read schema file: {0}")]
    FileReadError(#[from] file_reader::ReadContentError),

    #[error("Error parsing schema document {file_path:?}: {message}")]
    ParseError {
        file_path: Option<PathBuf>,
        message: String,
    },

    #[error("Root operation type `{type_name}` is not defined")]
    UndefinedRootOperationType {
        type_name: String,
    },
}
