use crate::ir::Value;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariableDefinition {
    pub(crate) name: String,
    /// The type annotation as written, e.g. `[ID!]!`.
    pub(crate) type_annotation: String,
    pub(crate) default_value: Option<Value>,
}
impl VariableDefinition {
    pub fn new(
        name: impl Into<String>,
        type_annotation: impl Into<String>,
        default_value: Option<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            type_annotation: type_annotation.into(),
            default_value,
        }
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn type_annotation(&self) -> &str {
        self.type_annotation.as_str()
    }
}
