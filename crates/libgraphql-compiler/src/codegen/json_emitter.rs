use crate::codegen::ArtifactKind;
use crate::codegen::ArtifactSource;
use crate::codegen::CodeEmitter;
use crate::codegen::EmitterError;
use crate::content_hash::ContentHash;
use crate::ir::Definition;
use crate::ir::DefinitionKind;
use crate::ir::OperationKind;
use inherent::inherent;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactDocument<'a> {
    kind: ArtifactKind,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation_kind: Option<OperationKind>,
    hash: &'a ContentHash,
    #[serde(skip_serializing_if = "Option::is_none")]
    fragment: Option<&'a Definition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<&'a Definition>,
}

/// Emits each artifact as a pretty-printed JSON document.
#[derive(Clone, Debug, Default)]
pub struct JsonEmitter;
impl JsonEmitter {
    pub fn new() -> Self {
        Self
    }
}

#[inherent]
impl CodeEmitter for JsonEmitter {
    pub fn file_extension(&self) -> &str {
        "json"
    }

    pub fn render(&self, source: &ArtifactSource<'_>) -> Result<String, EmitterError> {
        let definition = source.definition();
        let (fragment, operation) = match *source {
            ArtifactSource::Fragment { reader } => (Some(reader), None),
            ArtifactSource::Request { reader, normalization } => (Some(reader), Some(normalization)),
            ArtifactSource::SplitOperation { normalization } => (None, Some(normalization)),
        };
        let operation_kind = match definition.kind() {
            DefinitionKind::Operation { operation } => Some(*operation),
            DefinitionKind::Fragment | DefinitionKind::SplitOperation { .. } => None,
        };
        let document = ArtifactDocument {
            kind: source.kind(),
            name: definition.name(),
            operation_kind,
            hash: definition.source_hash(),
            fragment,
            operation,
        };

        let mut rendered = serde_json::to_string_pretty(&document)?;
        rendered.push('\n');
        Ok(rendered)
    }
}
