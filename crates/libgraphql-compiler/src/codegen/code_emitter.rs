use crate::codegen::ArtifactSource;
use std::fmt::Debug;
use thiserror::Error;

/// Renders artifacts in some target language. Implementations must be
/// deterministic: structurally identical sources render to identical bytes.
pub trait CodeEmitter: Debug + Send + Sync {
    /// Extension (without the leading `.`) of the files this emitter
    /// produces.
    fn file_extension(&self) -> &str;

    fn render(&self, source: &ArtifactSource<'_>) -> Result<String, EmitterError>;
}

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("Failed to serialize artifact: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Unsupported(String),
}
