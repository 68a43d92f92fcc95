use crate::config::CompilerConfig;
use crate::runner::CodegenRunner;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

pub(crate) const SCHEMA: &str = "
    type Query { viewer: User, story(id: ID): Story }
    type User { id: ID!, name: String, bestFriend: User }
    type Story { id: ID!, title: String, author: User }
";

/// A throwaway project on disk: `schema.graphql` at the root, sources under
/// `src/`.
pub(crate) struct TestProject {
    dir: TempDir,
    artifact_directory: Option<&'static str>,
}
impl TestProject {
    pub(crate) fn new() -> Self {
        Self::with_artifact_directory(Some("generated"))
    }

    pub(crate) fn with_artifact_directory(artifact_directory: Option<&'static str>) -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
            artifact_directory,
        };
        project.write("schema.graphql", SCHEMA);
        std::fs::create_dir_all(project.root().join("src")).unwrap();
        project
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn config(&self) -> CompilerConfig {
        let mut toml = "src = \"src\"\nschema = [\"schema.graphql\"]\n".to_string();
        if let Some(directory) = self.artifact_directory {
            toml.push_str(&format!("artifact_directory = \"{directory}\"\n"));
        }
        CompilerConfig::from_toml_str(&toml, self.root()).unwrap()
    }

    pub(crate) fn runner(&self) -> CodegenRunner {
        CodegenRunner::new(self.config())
    }

    pub(crate) fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub(crate) fn remove(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        std::fs::remove_file(&path).unwrap();
        path
    }

    pub(crate) fn artifact(&self, name: &str) -> PathBuf {
        let directory = self.artifact_directory.unwrap_or("src/__generated__");
        self.root().join(directory).join(format!("{name}.json"))
    }

    pub(crate) fn read_artifact(&self, name: &str) -> String {
        std::fs::read_to_string(self.artifact(name)).unwrap()
    }

    pub(crate) fn manifest_path(&self) -> PathBuf {
        self.config().manifest_path()
    }
}
