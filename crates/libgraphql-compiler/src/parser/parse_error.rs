use crate::loc::SourceLocation;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// A syntax (or lowering) error in one source file. Parse errors are
/// reported per path and never abort processing of other paths.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{}: {message}", self.display_location())]
pub struct ParseError {
    pub(crate) path: PathBuf,
    pub(crate) location: Option<SourceLocation>,
    pub(crate) message: String,
}
impl ParseError {
    pub fn new(
        path: impl AsRef<Path>,
        location: Option<SourceLocation>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            location,
            message: message.into(),
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    fn display_location(&self) -> String {
        match &self.location {
            Some(location) => location.to_string(),
            None => self.path.display().to_string(),
        }
    }
}
