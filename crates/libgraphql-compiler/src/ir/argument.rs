use crate::ir::Value;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Argument {
    pub(crate) name: String,
    pub(crate) value: Value,
}
impl Argument {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn from_ast_list<'a>(
        ast_args: &[(String, graphql_parser::query::Value<'a, String>)],
    ) -> Vec<Self> {
        ast_args.iter()
            .map(|(name, value)| Self::new(name.clone(), Value::from_ast(value)))
            .collect()
    }
}
