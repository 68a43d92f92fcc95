use crate::codegen::GenerationError;
use crate::context::ValidationError;
use crate::file_reader::ReadContentError;
use crate::fs::FilesystemError;
use crate::parser::ParseError;
use crate::schema::SchemaBuildError;
use crate::transform::PipelineError;
use thiserror::Error;

/// Any error a run reports without aborting.
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error(transparent)]
    Discovery(#[from] walkdir::Error),

    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Read(#[from] ReadContentError),

    #[error(transparent)]
    Schema(#[from] SchemaBuildError),

    #[error(transparent)]
    Transform(#[from] PipelineError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
