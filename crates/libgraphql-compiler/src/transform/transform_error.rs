use crate::loc::SourceLocation;
use thiserror::Error;

/// A problem found by a transform. Fatal to the named definition (and,
/// through the pipeline, to everything spreading it), never to the run.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TransformError {
    #[error("`{definition}` contains a cycle of fragment spreads through `{fragment}`")]
    CyclicFragment {
        definition: String,
        fragment: String,
        location: SourceLocation,
    },

    #[error("`{definition}` depends on `{dependency}`, which failed to compile")]
    DependencyFailed {
        definition: String,
        dependency: String,
    },

    #[error("Selection on `{parent_type}` in `{definition}` is empty at {location}")]
    EmptySelection {
        definition: String,
        parent_type: String,
        location: SourceLocation,
    },

    #[error("Field `{field}` of type `{field_type}` in `{definition}` needs a selection at {location}")]
    MissingSelection {
        definition: String,
        field: String,
        field_type: String,
        location: SourceLocation,
    },

    #[error("`{definition}` spreads undefined fragment `{fragment}` at {location}")]
    MissingFragment {
        definition: String,
        fragment: String,
        location: SourceLocation,
    },

    #[error(
        "Split operation `{name}` generated for `{definition}` conflicts with an existing \
        definition of the same name"
    )]
    SplitOperationConflict {
        definition: String,
        name: String,
    },

    #[error("Field `{field}` of type `{field_type}` in `{definition}` cannot have a selection at {location}")]
    UnexpectedSelection {
        definition: String,
        field: String,
        field_type: String,
        location: SourceLocation,
    },

    #[error("Fragment spread `...{fragment}` was not inlined in `{definition}` at {location}")]
    UnflattenedFragmentSpread {
        definition: String,
        fragment: String,
        location: SourceLocation,
    },

    #[error("Inline fragment on `{type_name}` was not flattened in `{definition}` at {location}")]
    UnflattenedInlineFragment {
        definition: String,
        type_name: String,
        location: SourceLocation,
    },

    #[error("Type `{parent_type}` has no field `{field}` (in `{definition}` at {location})")]
    UnknownField {
        definition: String,
        parent_type: String,
        field: String,
        location: SourceLocation,
    },

    #[error("Unknown type `{type_name}` in `{definition}` at {location}")]
    UnknownType {
        definition: String,
        type_name: String,
        location: SourceLocation,
    },
}
impl TransformError {
    /// The definition this error makes fail.
    pub fn definition(&self) -> &str {
        match self {
            Self::CyclicFragment { definition, .. }
            | Self::DependencyFailed { definition, .. }
            | Self::EmptySelection { definition, .. }
            | Self::MissingSelection { definition, .. }
            | Self::MissingFragment { definition, .. }
            | Self::SplitOperationConflict { definition, .. }
            | Self::UnexpectedSelection { definition, .. }
            | Self::UnflattenedFragmentSpread { definition, .. }
            | Self::UnflattenedInlineFragment { definition, .. }
            | Self::UnknownField { definition, .. }
            | Self::UnknownType { definition, .. } => definition.as_str(),
        }
    }
}
