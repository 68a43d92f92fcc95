use crate::content_hash::ContentHash;
use crate::fs::CodegenFilesystem;
use crate::fs::FilesystemError;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

/// What the manifest remembers about one artifact on disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub content_hash: ContentHash,
    /// Definitions that produced the artifact.
    pub owners: BTreeSet<String>,
}

/// Persisted `artifact path -> content hash` map from the previous run,
/// used to skip writing artifacts whose content has not changed.
///
/// Paths are relative to the project root so that the manifest survives the
/// project being moved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    version: u32,
    artifacts: BTreeMap<PathBuf, ManifestEntry>,
}
impl ArtifactManifest {
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            artifacts: BTreeMap::new(),
        }
    }

    /// Loads the manifest at `path`. A missing, unreadable, or outdated
    /// manifest yields an empty one: every artifact is then regenerated and
    /// diffed against the disk, which is slower but never wrong.
    pub fn load(fs: &dyn CodegenFilesystem, path: &Path) -> Self {
        let content = match fs.read_file(path) {
            Ok(content) => content,
            Err(FilesystemError::NotFound(_)) => {
                tracing::debug!("No artifact manifest at `{}`.", path.display());
                return Self::new();
            },
            Err(err) => {
                tracing::warn!("Ignoring unreadable artifact manifest: {err}");
                return Self::new();
            },
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(manifest) if manifest.version == Self::VERSION => manifest,
            Ok(manifest) => {
                tracing::warn!(
                    "Ignoring artifact manifest `{}` with unsupported version {}.",
                    path.display(),
                    manifest.version,
                );
                Self::new()
            },
            Err(err) => {
                tracing::warn!(
                    "Ignoring corrupt artifact manifest `{}`: {err}",
                    path.display(),
                );
                Self::new()
            },
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&Path, &ManifestEntry)> {
        self.artifacts.iter().map(|(path, entry)| (path.as_path(), entry))
    }

    pub fn get(&self, path: &Path) -> Option<&ManifestEntry> {
        self.artifacts.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, entry: ManifestEntry) {
        self.artifacts.insert(path, entry);
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn remove(&mut self, path: &Path) -> Option<ManifestEntry> {
        self.artifacts.remove(path)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
impl Default for ArtifactManifest {
    fn default() -> Self {
        Self::new()
    }
}
