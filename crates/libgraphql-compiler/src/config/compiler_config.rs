use crate::codegen::ArtifactOutput;
use crate::codegen::CodeEmitter;
use crate::codegen::JsonEmitter;
use crate::config::ConfigError;
use crate::file_reader;
use crate::parser::GraphQLDocumentParser;
use crate::parser::ParserPlugin;
use crate::parser::TaggedTemplateParser;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

pub const CONFIG_FILE_NAME: &str = "graphql-compiler.toml";

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmitterKind {
    #[default]
    Json,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SourceControlKind {
    Git,
}

/// Project configuration, read from `graphql-compiler.toml`.
///
/// ```toml
/// src = "src"
/// schema = ["schema/schema.graphql"]
/// artifact_directory = "src/__generated__"
/// excludes = ["node_modules", "__generated__", "vendor"]
/// source_control = "git"
/// ```
///
/// Relative paths are resolved against the directory containing the config
/// file ([`root`](Self::root)).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    #[serde(skip)]
    pub root: PathBuf,

    /// Directory searched for source documents.
    #[serde(default = "default_src")]
    pub src: PathBuf,

    /// SDL files making up the schema.
    #[serde(default)]
    pub schema: Vec<PathBuf>,

    /// Where artifacts are written. When unset, each artifact goes to a
    /// `__generated__` directory next to its source file.
    #[serde(default)]
    pub artifact_directory: Option<PathBuf>,

    /// File extensions (without the leading `.`) of source documents.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped during source discovery.
    #[serde(default = "default_excludes")]
    pub excludes: Vec<String>,

    /// Location of the persisted artifact manifest.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    #[serde(default)]
    pub source_control: Option<SourceControlKind>,

    #[serde(default)]
    pub emitter: EmitterKind,
}
impl CompilerConfig {
    /// The configuration used when a project has no config file.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            src: default_src(),
            schema: vec![],
            artifact_directory: None,
            extensions: default_extensions(),
            excludes: default_excludes(),
            manifest: default_manifest(),
            source_control: None,
            emitter: EmitterKind::default(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = file_reader::read_content(path)?;
        let root = path.parent().unwrap_or(Path::new("."));
        Self::from_toml_str(&content, root).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            err => err,
        })
    }

    pub fn from_toml_str(content: &str, root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })?;
        config.root = root.into();
        if config.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        Ok(config)
    }

    /// Looks for `graphql-compiler.toml` in `root`, falling back to
    /// [`for_root`](Self::for_root) when there is none.
    pub fn load(root: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let root = root.as_ref();
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Self::from_file(config_path)
        } else {
            Ok(Self::for_root(root))
        }
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root.join(&self.src)
    }

    pub fn schema_paths(&self) -> Vec<PathBuf> {
        self.schema.iter().map(|path| self.root.join(path)).collect()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(&self.manifest)
    }

    pub fn artifact_output(&self) -> ArtifactOutput {
        match &self.artifact_directory {
            Some(directory) => ArtifactOutput::Directory(self.root.join(directory)),
            None => ArtifactOutput::Colocated,
        }
    }

    pub fn emitter(&self) -> Arc<dyn CodeEmitter> {
        match self.emitter {
            EmitterKind::Json => Arc::new(JsonEmitter::new()),
        }
    }

    pub fn parser_plugins(&self) -> Vec<Arc<dyn ParserPlugin>> {
        vec![
            Arc::new(GraphQLDocumentParser::new()),
            Arc::new(TaggedTemplateParser::new()),
        ]
    }

    /// Whether `path` has one of the configured source extensions.
    pub fn is_source_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|configured| configured == ext))
    }

    pub fn is_excluded_dir_name(&self, name: &std::ffi::OsStr) -> bool {
        name.to_str().is_some_and(|name| self.excludes.iter().any(|excluded| excluded == name))
    }

    /// Whether `path` lies inside an excluded directory (relative to
    /// [`root`](Self::root)).
    pub fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative.parent()
            .into_iter()
            .flat_map(Path::components)
            .any(|component| self.is_excluded_dir_name(component.as_os_str()))
    }
}

fn default_src() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    ["graphql", "gql", "js", "jsx", "ts", "tsx"].into_iter().map(String::from).collect()
}

fn default_excludes() -> Vec<String> {
    ["node_modules", "__generated__", ".git"].into_iter().map(String::from).collect()
}

fn default_manifest() -> PathBuf {
    PathBuf::from(".graphql-compiler-manifest.json")
}
