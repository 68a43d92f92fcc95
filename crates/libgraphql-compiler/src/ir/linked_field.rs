use crate::ir::Argument;
use crate::ir::Directive;
use crate::ir::Selection;
use crate::loc::SourceLocation;
use serde::Serialize;

/// A field selection with a sub-selection (e.g. `author { name }`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinkedField {
    pub(crate) alias: Option<String>,
    pub(crate) name: String,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) directives: Vec<Directive>,
    /// Schema type of the field, with list/non-null wrappers removed. Only
    /// populated once the `resolve_types` transform has run.
    pub(crate) type_name: Option<String>,
    pub(crate) selections: Vec<Selection>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl LinkedField {
    pub fn new(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Self {
            alias: None,
            name: name.into(),
            arguments: vec![],
            directives: vec![],
            type_name: None,
            selections,
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

    pub fn selected_name(&self) -> &str {
        self.alias().unwrap_or(self.name.as_str())
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub(crate) fn with_selections(&self, selections: Vec<Selection>) -> Self {
        Self {
            alias: self.alias.clone(),
            name: self.name.clone(),
            arguments: self.arguments.clone(),
            directives: self.directives.clone(),
            type_name: self.type_name.clone(),
            selections,
            location: self.location.clone(),
        }
    }
}
