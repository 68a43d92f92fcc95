use serde::Serialize;

/// A literal or variable-reference value appearing in an argument position.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum Value {
    Boolean(bool),
    Enum(String),
    Float(f64),
    Int(i64),
    List(Vec<Value>),
    Null,
    /// Object fields keep the order in which they were written.
    Object(Vec<(String, Value)>),
    String(String),
    Variable(String),
}
impl Value {
    pub(crate) fn from_ast<'a>(
        ast_value: &graphql_parser::query::Value<'a, String>,
    ) -> Self {
        use graphql_parser::query::Value as AstValue;
        match ast_value {
            AstValue::Boolean(value) => Self::Boolean(*value),
            AstValue::Enum(value) => Self::Enum(value.clone()),
            AstValue::Float(value) => Self::Float(*value),
            // graphql_parser rejects integer literals that overflow an i64
            // while parsing, so `as_i64()` is always populated here.
            AstValue::Int(number) =>
                number.as_i64().map_or(Self::Null, Self::Int),
            AstValue::List(values) =>
                Self::List(values.iter().map(Self::from_ast).collect()),
            AstValue::Null => Self::Null,
            AstValue::Object(fields) => Self::Object(
                fields.iter()
                    .map(|(name, value)| (name.clone(), Self::from_ast(value)))
                    .collect(),
            ),
            AstValue::String(value) => Self::String(value.clone()),
            AstValue::Variable(name) => Self::Variable(name.clone()),
        }
    }

    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Self::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }
}
