use crate::ir::Definition;
use crate::parser::ParseError;
use crate::parser::ParserPlugin;
use crate::parser::lowering;
use crate::parser::parser_plugin::has_extension;
use inherent::inherent;
use std::path::Path;

/// Parses standalone GraphQL executable documents (`.graphql`, `.gql`).
#[derive(Clone, Debug)]
pub struct GraphQLDocumentParser {
    extensions: Vec<String>,
}
impl GraphQLDocumentParser {
    pub fn new() -> Self {
        Self::with_extensions(["graphql", "gql"])
    }

    pub fn with_extensions<S: Into<String>>(extensions: impl IntoIterator<Item = S>) -> Self {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }
}
impl Default for GraphQLDocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

#[inherent]
impl ParserPlugin for GraphQLDocumentParser {
    pub fn recognize(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }

    pub fn parse(
        &self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<Definition>, Vec<ParseError>> {
        lowering::lower_document(path, text, 0)
    }
}
