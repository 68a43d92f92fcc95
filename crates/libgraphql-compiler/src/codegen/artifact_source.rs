use crate::codegen::ArtifactKind;
use crate::ir::Definition;
use crate::ir::DefinitionKind;
use std::collections::BTreeSet;
use std::path::Path;

/// The final transformed form(s) of one definition that an artifact is
/// generated from.
#[derive(Clone, Copy, Debug)]
pub enum ArtifactSource<'a> {
    /// An operation: what its root component reads, and the normalization
    /// form used to process the server response.
    Request {
        reader: &'a Definition,
        normalization: &'a Definition,
    },
    Fragment {
        reader: &'a Definition,
    },
    SplitOperation {
        normalization: &'a Definition,
    },
}
impl<'a> ArtifactSource<'a> {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Fragment { .. } => ArtifactKind::Fragment,
            Self::Request { .. } => ArtifactKind::Request,
            Self::SplitOperation { .. } => ArtifactKind::SplitOperation,
        }
    }

    /// The definition whose name and source location identify the artifact.
    pub fn definition(&self) -> &'a Definition {
        match self {
            Self::Fragment { reader } | Self::Request { reader, .. } => reader,
            Self::SplitOperation { normalization } => normalization,
        }
    }

    pub fn name(&self) -> &'a str {
        self.definition().name()
    }

    /// Names of the definitions responsible for the artifact: the definition
    /// itself, or for a split operation every operation that imports it.
    pub fn owners(&self) -> BTreeSet<String> {
        match self.definition().kind() {
            DefinitionKind::SplitOperation { parent_operations } =>
                parent_operations.iter().cloned().collect(),
            DefinitionKind::Fragment | DefinitionKind::Operation { .. } =>
                BTreeSet::from([self.name().to_string()]),
        }
    }

    pub fn source_file(&self) -> Option<&'a Path> {
        self.definition().location().file.as_deref()
    }
}
