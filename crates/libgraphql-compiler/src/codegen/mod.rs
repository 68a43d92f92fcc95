//! Renders final IR into artifact files.

mod artifact_kind;
mod artifact_source;
mod code_emitter;
mod code_generator;
mod generated_artifact;
mod generation_error;
mod json_emitter;

pub use artifact_kind::ArtifactKind;
pub use artifact_source::ArtifactSource;
pub use code_emitter::CodeEmitter;
pub use code_emitter::EmitterError;
pub use code_generator::ArtifactOutput;
pub use code_generator::CodeGenerator;
pub use code_generator::GENERATED_DIRECTORY_NAME;
pub use generated_artifact::GeneratedArtifact;
pub use generation_error::GenerationError;
pub use json_emitter::JsonEmitter;
