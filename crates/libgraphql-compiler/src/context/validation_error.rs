use crate::dependency_graph::CyclicDependencyError;
use crate::loc::SourceLocation;
use thiserror::Error;

/// A violation of the [`CompilationContext`](crate::context::CompilationContext)
/// invariants. Fatal to the definitions involved, never to the whole run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error(transparent)]
    CyclicDependency(#[from] CyclicDependencyError),

    #[error(
        "Duplicate definition: `{name}` is defined at {first_location} and \
        again at {second_location}"
    )]
    DuplicateDefinition {
        name: String,
        first_location: SourceLocation,
        second_location: SourceLocation,
    },

    #[error("`{definition}` depends on `{dependency}`, which failed validation")]
    InvalidDependency {
        definition: String,
        dependency: String,
    },

    #[error("`{definition}` references undefined fragment `{fragment}` at {location}")]
    MissingFragment {
        definition: String,
        fragment: String,
        location: SourceLocation,
    },

    #[error("No definition named `{0}`")]
    NotFound(String),
}
impl ValidationError {
    /// The definition whose compilation this error prevents.
    pub fn definition_name(&self) -> &str {
        match self {
            Self::CyclicDependency(err) => err.first_member(),
            Self::DuplicateDefinition { name, .. } => name.as_str(),
            Self::InvalidDependency { definition, .. }
            | Self::MissingFragment { definition, .. } => definition.as_str(),
            Self::NotFound(name) => name.as_str(),
        }
    }
}
