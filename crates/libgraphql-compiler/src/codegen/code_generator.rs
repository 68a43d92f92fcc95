use crate::codegen::ArtifactSource;
use crate::codegen::CodeEmitter;
use crate::codegen::GeneratedArtifact;
use crate::codegen::GenerationError;
use crate::content_hash::ContentHash;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// Name of the directory colocated artifacts are written to, next to the
/// file their definition came from.
pub const GENERATED_DIRECTORY_NAME: &str = "__generated__";

/// Where artifacts are placed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArtifactOutput {
    /// Every artifact in one directory.
    Directory(PathBuf),
    /// Each artifact in a `__generated__` directory next to its source file.
    Colocated,
}

/// Turns final IR into [`GeneratedArtifact`]s. Deterministic and free of I/O:
/// writing is up to the caller.
#[derive(Clone, Debug)]
pub struct CodeGenerator {
    emitter: Arc<dyn CodeEmitter>,
    output: ArtifactOutput,
}
impl CodeGenerator {
    pub fn new(emitter: Arc<dyn CodeEmitter>, output: ArtifactOutput) -> Self {
        Self {
            emitter,
            output,
        }
    }

    pub fn generate(&self, source: &ArtifactSource<'_>) -> Result<GeneratedArtifact, GenerationError> {
        let name = source.name();
        let content = self.emitter.render(source)
            .map_err(|error| GenerationError::Emitter {
                name: name.to_string(),
                error,
            })?;
        let path = self.artifact_path(name, source.source_file())?;

        Ok(GeneratedArtifact {
            path,
            content_hash: ContentHash::of(&content),
            content,
            kind: source.kind(),
            name: name.to_string(),
            owners: source.owners(),
        })
    }

    /// Path of the artifact for definition `name` declared in `source_file`.
    pub fn artifact_path(
        &self,
        name: &str,
        source_file: Option<&Path>,
    ) -> Result<PathBuf, GenerationError> {
        let file_name = format!("{name}.{}", self.emitter.file_extension());
        match &self.output {
            ArtifactOutput::Directory(directory) => Ok(directory.join(file_name)),
            ArtifactOutput::Colocated => {
                let Some(source_dir) = source_file.and_then(Path::parent) else {
                    return Err(GenerationError::UnknownSourceFile {
                        name: name.to_string(),
                    });
                };
                Ok(source_dir.join(GENERATED_DIRECTORY_NAME).join(file_name))
            },
        }
    }

    pub fn output(&self) -> &ArtifactOutput {
        &self.output
    }
}
