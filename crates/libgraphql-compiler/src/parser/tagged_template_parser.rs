use crate::ir::Definition;
use crate::loc::SourceLocation;
use crate::parser::ParseError;
use crate::parser::ParserPlugin;
use crate::parser::lowering;
use crate::parser::parser_plugin::has_extension;
use inherent::inherent;
use std::path::Path;

const GRAPHQL_TAG: &str = "graphql`";

/// Extracts GraphQL documents embedded as ``graphql`...` `` tagged template
/// literals in JavaScript/TypeScript modules.
///
/// Template interpolation (`${...}`) is rejected: embedded documents must be
/// statically analyzable.
#[derive(Clone, Debug)]
pub struct TaggedTemplateParser {
    extensions: Vec<String>,
}
impl TaggedTemplateParser {
    pub fn new() -> Self {
        Self {
            extensions: ["cjs", "js", "jsx", "mjs", "ts", "tsx"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
impl Default for TaggedTemplateParser {
    fn default() -> Self {
        Self::new()
    }
}

#[inherent]
impl ParserPlugin for TaggedTemplateParser {
    pub fn recognize(&self, path: &Path) -> bool {
        has_extension(path, &self.extensions)
    }

    pub fn parse(
        &self,
        path: &Path,
        text: &str,
    ) -> Result<Vec<Definition>, Vec<ParseError>> {
        let mut definitions = vec![];
        let mut errors = vec![];
        for template in extract_templates(path, text) {
            match template {
                Ok(EmbeddedDocument { text, line_offset }) => {
                    match lowering::lower_document(path, text, line_offset) {
                        Ok(mut defs) => definitions.append(&mut defs),
                        Err(mut errs) => errors.append(&mut errs),
                    }
                },
                Err(err) => errors.push(err),
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(definitions)
    }
}

#[derive(Debug, PartialEq)]
struct EmbeddedDocument<'a> {
    text: &'a str,
    /// Number of lines in the host file preceding the template's first line.
    line_offset: usize,
}

fn extract_templates<'a>(
    path: &Path,
    text: &'a str,
) -> Vec<Result<EmbeddedDocument<'a>, ParseError>> {
    let mut templates = vec![];
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find(GRAPHQL_TAG) {
        let tag_start = cursor + found;
        let body_start = tag_start + GRAPHQL_TAG.len();
        let line_offset = text[..body_start].matches('\n').count();
        let tag_location = || SourceLocation::new(
            Some(path),
            line_offset + 1,
            tag_start - text[..tag_start].rfind('\n').map_or(0, |nl| nl + 1) + 1,
        );

        // `graphql` must be a standalone identifier, not e.g. `mygraphql`.
        let preceded_by_ident = text[..tag_start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$');
        if preceded_by_ident {
            cursor = body_start;
            continue;
        }

        match find_template_end(&text[body_start..]) {
            TemplateEnd::Closed(len) => {
                templates.push(Ok(EmbeddedDocument {
                    text: &text[body_start..body_start + len],
                    line_offset,
                }));
                cursor = body_start + len + 1;
            },
            TemplateEnd::Interpolation => {
                templates.push(Err(ParseError::new(
                    path,
                    Some(tag_location()),
                    "graphql tagged templates must not contain interpolations.",
                )));
                cursor = body_start;
            },
            TemplateEnd::Unterminated => {
                templates.push(Err(ParseError::new(
                    path,
                    Some(tag_location()),
                    "Unterminated graphql tagged template.",
                )));
                break;
            },
        }
    }
    templates
}

enum TemplateEnd {
    Closed(usize),
    Interpolation,
    Unterminated,
}

fn find_template_end(body: &str) -> TemplateEnd {
    let mut escaped = false;
    let mut chars = body.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '`' => return TemplateEnd::Closed(idx),
            '$' if chars.peek().is_some_and(|(_, next)| *next == '{') =>
                return TemplateEnd::Interpolation,
            _ => (),
        }
    }
    TemplateEnd::Unterminated
}
