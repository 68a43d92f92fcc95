use crate::ir::Directive;
use crate::ir::Selection;
use crate::loc::SourceLocation;
use serde::Serialize;

/// An anonymous `... on Type { ... }` (or `... { ... }`) selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InlineFragment {
    pub(crate) type_condition: Option<String>,
    pub(crate) directives: Vec<Directive>,
    pub(crate) selections: Vec<Selection>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl InlineFragment {
    pub fn new(type_condition: Option<String>, selections: Vec<Selection>) -> Self {
        Self {
            type_condition,
            directives: vec![],
            selections,
            location: SourceLocation::default(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn type_condition(&self) -> Option<&str> {
        self.type_condition.as_deref()
    }

    pub(crate) fn with_selections(&self, selections: Vec<Selection>) -> Self {
        Self {
            type_condition: self.type_condition.clone(),
            directives: self.directives.clone(),
            selections,
            location: self.location.clone(),
        }
    }
}
