//! The compiler's intermediate representation: [`Definition`]s made of
//! [`Selection`] trees.

mod argument;
mod condition;
mod definition;
mod directive;
mod fragment_spread;
mod inline_fragment;
mod linked_field;
mod module_import;
mod operation_kind;
mod scalar_field;
pub(crate) mod selection;
mod value;
mod variable_definition;

pub use argument::Argument;
pub use condition::Condition;
pub use definition::Definition;
pub use definition::DefinitionKind;
pub use directive::Directive;
pub use fragment_spread::FragmentSpread;
pub use inline_fragment::InlineFragment;
pub use linked_field::LinkedField;
pub use module_import::ModuleImport;
pub use operation_kind::OperationKind;
pub use scalar_field::ScalarField;
pub use selection::Selection;
pub use value::Value;
pub use variable_definition::VariableDefinition;

#[cfg(test)]
mod tests;

fn structural_key<T: serde::Serialize>(node: &T) -> String {
    // IR nodes only contain strings, numbers, sequences and string-keyed
    // structs, none of which can fail to serialize.
    serde_json::to_string(node)
        .unwrap_or_else(|err| unreachable!("IR node failed to serialize: {err}"))
}
