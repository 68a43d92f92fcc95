use crate::codegen::ArtifactKind;
use crate::content_hash::ContentHash;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A rendered artifact, not yet written anywhere.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub content: String,
    pub content_hash: ContentHash,
    pub kind: ArtifactKind,
    /// Name of the definition the artifact was generated from.
    pub name: String,
    pub owners: BTreeSet<String>,
}
