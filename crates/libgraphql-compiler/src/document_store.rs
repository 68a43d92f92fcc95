use crate::content_hash::ContentHash;
use crate::ir::Definition;
use crate::parser::ParseError;
use crate::parser::ParserPlugin;
use rayon::prelude::IntoParallelIterator;
use rayon::prelude::ParallelIterator;
use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

type Result<T> = std::result::Result<T, Vec<ParseError>>;

#[derive(Clone, Debug)]
struct CachedDocument {
    file_hash: ContentHash,
    definitions: Vec<Arc<Definition>>,
    errors: Vec<ParseError>,
    /// While the document fails to parse, the names it declared when it last
    /// parsed cleanly.
    last_parsed_names: Vec<String>,
}
impl CachedDocument {
    fn carry_over_names(&mut self, previous: &CachedDocument) {
        if self.errors.is_empty() {
            return;
        }
        self.last_parsed_names = if previous.errors.is_empty() {
            previous.definitions.iter().map(|def| def.name().to_string()).collect()
        } else {
            previous.last_parsed_names.clone()
        };
    }
}

/// Parses source files into [`Definition`]s and caches the results by
/// `(path, content hash)`.
///
/// A cache hit skips parsing entirely. Whether a cached definition still needs
/// to be recompiled (because something it depends on changed) is decided
/// downstream by the
/// [`DependencyGraph`](crate::dependency_graph::DependencyGraph).
#[derive(Clone, Debug)]
pub struct DocumentStore {
    plugins: Vec<Arc<dyn ParserPlugin>>,
    documents: BTreeMap<PathBuf, CachedDocument>,
}
impl DocumentStore {
    pub fn new(plugins: Vec<Arc<dyn ParserPlugin>>) -> Self {
        Self {
            plugins,
            documents: BTreeMap::new(),
        }
    }

    /// Every cached definition, ordered by path and then by position within
    /// the document.
    pub fn definitions(&self) -> impl Iterator<Item = &Arc<Definition>> {
        self.documents.values().flat_map(|doc| doc.definitions.iter())
    }

    /// Definitions parsed from `path`, in document order.
    pub fn definitions_in(&self, path: &Path) -> &[Arc<Definition>] {
        self.documents.get(path).map(|doc| doc.definitions.as_slice()).unwrap_or_default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ParseError> {
        self.documents.values().flat_map(|doc| doc.errors.iter())
    }

    /// Names of definitions whose documents currently fail to parse, as of
    /// the last time those documents parsed cleanly.
    pub fn unparsed_definition_names(&self) -> impl Iterator<Item = &str> {
        self.documents.values().flat_map(|doc| doc.last_parsed_names.iter().map(String::as_str))
    }

    pub fn is_unchanged(&self, path: &Path, file_hash: &ContentHash) -> bool {
        self.documents.get(path).is_some_and(|doc| &doc.file_hash == file_hash)
    }

    /// Parses `text` as the content of `path`, reusing the cached result when
    /// the content is unchanged.
    pub fn parse(&mut self, path: &Path, text: &str) -> Result<Vec<Arc<Definition>>> {
        let file_hash = ContentHash::of(text);
        if self.is_unchanged(path, &file_hash) {
            tracing::trace!(path = %path.display(), "document cache hit");
        } else {
            let doc = parse_document(&self.plugins, path, text, file_hash);
            self.insert(path.to_path_buf(), doc);
        }

        let doc = &self.documents[path];
        if doc.errors.is_empty() {
            Ok(doc.definitions.clone())
        } else {
            Err(doc.errors.clone())
        }
    }

    /// Parses many sources at once. Cache misses are parsed in parallel; the
    /// merged result is independent of the order in which workers finish.
    pub fn parse_all(&mut self, sources: Vec<(PathBuf, String)>) {
        let misses: Vec<_> = sources.into_iter()
            .filter_map(|(path, text)| {
                let file_hash = ContentHash::of(&text);
                if self.is_unchanged(&path, &file_hash) {
                    tracing::trace!(path = %path.display(), "document cache hit");
                    None
                } else {
                    Some((path, text, file_hash))
                }
            })
            .collect();
        tracing::debug!("Parsing {} changed documents.", misses.len());

        let plugins = &self.plugins;
        let mut parsed: Vec<(PathBuf, CachedDocument)> = misses.into_par_iter()
            .map(|(path, text, file_hash)| {
                let doc = parse_document(plugins, &path, &text, file_hash);
                (path, doc)
            })
            .collect();
        parsed.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (path, doc) in parsed {
            self.insert(path, doc);
        }
    }

    fn insert(&mut self, path: PathBuf, mut doc: CachedDocument) {
        if let Some(previous) = self.documents.get(&path) {
            doc.carry_over_names(previous);
        }
        self.documents.insert(path, doc);
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.documents.keys().map(PathBuf::as_path)
    }

    pub fn recognizes(&self, path: &Path) -> bool {
        self.plugins.iter().any(|plugin| plugin.recognize(path))
    }

    /// Forgets a path. Returns `true` if it was cached.
    pub fn remove(&mut self, path: &Path) -> bool {
        self.documents.remove(path).is_some()
    }

    /// Forgets `dir` and every path beneath it. Returns the forgotten paths.
    pub fn remove_under(&mut self, dir: &Path) -> Vec<PathBuf> {
        let removed: Vec<PathBuf> = self.documents.keys()
            .filter(|path| path.starts_with(dir))
            .cloned()
            .collect();
        for path in &removed {
            self.documents.remove(path);
        }
        removed
    }
}

fn parse_document(
    plugins: &[Arc<dyn ParserPlugin>],
    path: &Path,
    text: &str,
    file_hash: ContentHash,
) -> CachedDocument {
    let Some(plugin) = plugins.iter().find(|plugin| plugin.recognize(path)) else {
        return CachedDocument {
            file_hash,
            definitions: vec![],
            errors: vec![ParseError::new(path, None, "No parser plugin recognizes this file.")],
            last_parsed_names: vec![],
        };
    };

    match plugin.parse(path, text) {
        Ok(definitions) => CachedDocument {
            file_hash,
            definitions: definitions.into_iter().map(Arc::new).collect(),
            errors: vec![],
            last_parsed_names: vec![],
        },
        Err(errors) => {
            tracing::debug!(
                path = %path.display(),
                "Failed to parse document ({} errors).",
                errors.len(),
            );
            CachedDocument {
                file_hash,
                definitions: vec![],
                errors,
                last_parsed_names: vec![],
            }
        },
    }
}
