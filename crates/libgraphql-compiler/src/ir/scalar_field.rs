use crate::ir::Argument;
use crate::ir::Directive;
use crate::loc::SourceLocation;
use serde::Serialize;

/// A field selection without a sub-selection (e.g. `id` or `name(lang: EN)`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScalarField {
    pub(crate) alias: Option<String>,
    pub(crate) name: String,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) directives: Vec<Directive>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl ScalarField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: vec![],
            directives: vec![],
            location: SourceLocation::default(),
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// If an alias was specified for this selection, return the alias.
    /// Otherwise return the name of the field.
    pub fn selected_name(&self) -> &str {
        self.alias().unwrap_or(self.name.as_str())
    }
}
