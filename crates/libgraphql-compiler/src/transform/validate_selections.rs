use crate::context::CompilationContext;
use crate::ir::Definition;
use crate::ir::Selection;
use crate::schema::Schema;
use crate::transform::TransformError;
use crate::transform::TransformOutput;
use crate::transform::transform::rewrite_definitions;

/// Checks every selection against the schema: fields exist on their parent
/// type, scalar fields have no sub-selection, composite fields have one, and
/// type conditions name known composite types. Never rewrites.
pub fn validate_selections(context: &CompilationContext) -> TransformOutput {
    let schema = context.schema();
    rewrite_definitions(context, |definition| {
        let mut errors = vec![];
        match definition.parent_type(schema) {
            Some(parent_type) if schema.is_composite(parent_type) => {
                validate(definition, definition.selections(), parent_type, schema, &mut errors);
            },
            parent_type => errors.push(TransformError::UnknownType {
                definition: definition.name().to_string(),
                type_name: parent_type.unwrap_or("<root>").to_string(),
                location: definition.location().clone(),
            }),
        }
        if errors.is_empty() {
            Ok(None)
        } else {
            Err(errors)
        }
    })
}

fn validate(
    definition: &Definition,
    selections: &[Selection],
    parent_type: &str,
    schema: &Schema,
    errors: &mut Vec<TransformError>,
) {
    for selection in selections {
        match selection {
            Selection::ScalarField(field) => {
                let Some(field_type) = schema.field_type(parent_type, field.name()) else {
                    errors.push(unknown_field(definition, parent_type, field.name(), selection));
                    continue;
                };
                if schema.is_composite(field_type) {
                    errors.push(TransformError::MissingSelection {
                        definition: definition.name().to_string(),
                        field: field.name().to_string(),
                        field_type: field_type.to_string(),
                        location: field.location().clone(),
                    });
                }
            },
            Selection::LinkedField(field) => {
                let Some(field_type) = schema.field_type(parent_type, field.name()) else {
                    errors.push(unknown_field(definition, parent_type, field.name(), selection));
                    continue;
                };
                if !schema.is_composite(field_type) {
                    errors.push(TransformError::UnexpectedSelection {
                        definition: definition.name().to_string(),
                        field: field.name().to_string(),
                        field_type: field_type.to_string(),
                        location: field.location().clone(),
                    });
                    continue;
                }
                validate(definition, field.selections(), field_type, schema, errors);
            },
            Selection::InlineFragment(inline) => {
                let inner_type = inline.type_condition().unwrap_or(parent_type);
                if !schema.is_composite(inner_type) {
                    errors.push(TransformError::UnknownType {
                        definition: definition.name().to_string(),
                        type_name: inner_type.to_string(),
                        location: inline.location().clone(),
                    });
                    continue;
                }
                validate(definition, inline.selections(), inner_type, schema, errors);
            },
            Selection::Condition(condition) => {
                validate(definition, condition.selections(), parent_type, schema, errors);
            },
            Selection::ModuleImport(module) => {
                let inner_type = module.fragment_type().unwrap_or(parent_type);
                validate(definition, module.selections(), inner_type, schema, errors);
            },
            // Spread fragments are validated on their own.
            Selection::FragmentSpread(_) => (),
        }
    }
}

fn unknown_field(
    definition: &Definition,
    parent_type: &str,
    field: &str,
    selection: &Selection,
) -> TransformError {
    TransformError::UnknownField {
        definition: definition.name().to_string(),
        parent_type: parent_type.to_string(),
        field: field.to_string(),
        location: selection.location().clone(),
    }
}
