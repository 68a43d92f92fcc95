use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Hex-encoded SHA-256 digest of some content.
///
/// Used both as the cache key for source text (see
/// [`DocumentStore`](crate::document_store::DocumentStore)) and as the
/// fingerprint of generated artifacts recorded in the
/// [`ArtifactManifest`](crate::manifest::ArtifactManifest).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(String);
impl ContentHash {
    pub fn of(content: impl AsRef<[u8]>) -> Self {
        Self(hex::encode(Sha256::digest(content.as_ref())))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
