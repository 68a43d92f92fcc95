use crate::ir::Definition;
use crate::parser::ParseError;
use std::path::Path;

/// A source-language front end. The
/// [`DocumentStore`](crate::document_store::DocumentStore) selects the first
/// registered plugin that recognizes a given path.
pub trait ParserPlugin: std::fmt::Debug + Send + Sync {
    fn recognize(&self, path: &Path) -> bool;

    fn parse(
        &self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<Definition>, Vec<ParseError>>;
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|candidate| candidate == ext))
}
