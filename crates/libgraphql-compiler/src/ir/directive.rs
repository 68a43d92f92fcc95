use crate::ir::Argument;
use serde::Serialize;

/// A directive annotation (e.g. `@connection(key: "Feed_items")`) that
/// survives lowering. Directives the compiler understands itself (`@include`,
/// `@skip`, `@module`) are lowered into dedicated [`Selection`](crate::ir::Selection)
/// variants instead and never appear as a `Directive`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Directive {
    pub(crate) name: String,
    pub(crate) arguments: Vec<Argument>,
}
impl Directive {
    pub fn new(name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
