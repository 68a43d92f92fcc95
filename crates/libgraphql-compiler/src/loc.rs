use std::path::Path;
use std::path::PathBuf;

/// A position within a source file.
///
/// Very similar to graphql_parser's [Pos](graphql_parser::Pos), except it
/// includes the path of the file (when known). Locations never participate in
/// the structural identity of IR nodes; they exist purely for error reporting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file: Option<PathBuf>,
    pub line: usize,
    pub column: usize,
}
impl SourceLocation {
    pub fn new(file: Option<&Path>, line: usize, column: usize) -> Self {
        Self {
            file: file.map(|f| f.to_path_buf()),
            line,
            column,
        }
    }

    /// `line_offset` is non-zero when the GraphQL text was extracted from a
    /// larger host file (e.g. a tagged template literal in a JS module).
    pub(crate) fn from_pos(
        file: Option<&Path>,
        pos: graphql_parser::Pos,
        line_offset: usize,
    ) -> Self {
        Self::new(file, pos.line + line_offset, pos.column)
    }
}
impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}:{}", file.display(), self.line, self.column),
            None => write!(f, "<unknown>:{}:{}", self.line, self.column),
        }
    }
}
