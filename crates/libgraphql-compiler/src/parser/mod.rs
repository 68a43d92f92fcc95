mod graphql_document_parser;
mod lowering;
mod parse_error;
mod parser_plugin;
mod tagged_template_parser;

pub use graphql_document_parser::GraphQLDocumentParser;
pub use parse_error::ParseError;
pub use parser_plugin::ParserPlugin;
pub use tagged_template_parser::TaggedTemplateParser;

#[cfg(test)]
mod tests;
