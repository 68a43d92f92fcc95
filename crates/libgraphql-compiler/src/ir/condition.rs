use crate::ir::Selection;
use crate::loc::SourceLocation;
use serde::Serialize;

/// Selections guarded by a boolean variable, lowered from `@include(if: $var)`
/// (`passing_value: true`) or `@skip(if: $var)` (`passing_value: false`).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Condition {
    pub(crate) variable: String,
    pub(crate) passing_value: bool,
    pub(crate) selections: Vec<Selection>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl Condition {
    pub fn new(
        variable: impl Into<String>,
        passing_value: bool,
        selections: Vec<Selection>,
    ) -> Self {
        Self {
            variable: variable.into(),
            passing_value,
            selections,
            location: SourceLocation::default(),
        }
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn passing_value(&self) -> bool {
        self.passing_value
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn variable(&self) -> &str {
        self.variable.as_str()
    }

    pub(crate) fn with_selections(&self, selections: Vec<Selection>) -> Self {
        Self {
            variable: self.variable.clone(),
            passing_value: self.passing_value,
            selections,
            location: self.location.clone(),
        }
    }
}
