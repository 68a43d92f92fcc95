use crate::codegen::EmitterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Failed to render artifact for `{name}`: {error}")]
    Emitter {
        name: String,
        #[source]
        error: EmitterError,
    },

    #[error(
        "Cannot place a colocated artifact for `{name}`: its source file is unknown. \
        Configure an artifact directory instead."
    )]
    UnknownSourceFile {
        name: String,
    },
}
impl GenerationError {
    pub fn definition(&self) -> &str {
        match self {
            Self::Emitter { name, .. } | Self::UnknownSourceFile { name } => name.as_str(),
        }
    }
}
