use crate::ir::Directive;
use crate::loc::SourceLocation;
use serde::Serialize;

/// A `...FragmentName` reference to a named fragment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FragmentSpread {
    pub(crate) fragment_name: String,
    pub(crate) directives: Vec<Directive>,
    #[serde(skip)]
    pub(crate) location: SourceLocation,
}
impl FragmentSpread {
    pub fn new(fragment_name: impl Into<String>) -> Self {
        Self {
            fragment_name: fragment_name.into(),
            directives: vec![],
            location: SourceLocation::default(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn fragment_name(&self) -> &str {
        self.fragment_name.as_str()
    }

    pub fn location(&self) -> &SourceLocation {
        &self.location
    }
}
