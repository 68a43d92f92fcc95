use crate::ir::Selection;
use crate::loc::SourceLocation;
use serde::Serialize;

/// A fragment spread annotated with `@module(name: "...")`: the fragment's
/// data is loaded together with a separately shipped code module, so its
/// normalization selections are split out into their own
/// [`SplitOperation`](crate::ir::DefinitionKind::SplitOperation).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModuleImport {
    pub(crate) fragment_name: String,
    pub(crate) module_name: String,
    /// Type condition of the imported fragment; populated by the
    /// `inline_named_fragments` transform.
    pub(crate) fragment_type: Option<String>,
    pub(crate) selections: Vec<Selection>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl ModuleImport {
    pub fn new(
        fragment_name: impl Into<String>,
        module_name: impl Into<String>,
        selections: Vec<Selection>,
    ) -> Self {
        Self {
            fragment_name: fragment_name.into(),
            module_name: module_name.into(),
            fragment_type: None,
            selections,
            location: SourceLocation::default(),
        }
    }

    pub fn fragment_name(&self) -> &str {
        self.fragment_name.as_str()
    }

    pub fn fragment_type(&self) -> Option<&str> {
        self.fragment_type.as_deref()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn module_name(&self) -> &str {
        self.module_name.as_str()
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Name of the [`SplitOperation`](crate::ir::DefinitionKind::SplitOperation)
    /// generated for this import.
    pub fn split_operation_name(&self) -> String {
        format!("{}$normalization", self.fragment_name)
    }

    pub(crate) fn with_selections(&self, selections: Vec<Selection>) -> Self {
        Self {
            fragment_name: self.fragment_name.clone(),
            module_name: self.module_name.clone(),
            fragment_type: self.fragment_type.clone(),
            selections,
            location: self.location.clone(),
        }
    }
}
