use crate::context::CompilationContext;
use crate::ir::Selection;
use crate::schema::Schema;
use crate::transform::TransformOutput;
use crate::transform::transform::rewrite_definitions;

/// Annotates every [`LinkedField`](crate::ir::LinkedField) with the named
/// schema type it returns.
pub fn resolve_types(context: &CompilationContext) -> TransformOutput {
    let schema = context.schema();
    rewrite_definitions(context, |definition| {
        let Some(parent_type) = definition.parent_type(schema) else {
            return Ok(None);
        };
        let selections = resolve(definition.selections(), parent_type, schema);
        Ok(Some(definition.with_selections(selections)))
    })
}

fn resolve(selections: &[Selection], parent_type: &str, schema: &Schema) -> Vec<Selection> {
    selections.iter()
        .map(|selection| match selection {
            Selection::LinkedField(field) => {
                let field_type = schema.field_type(parent_type, field.name());
                let children = match field_type {
                    Some(field_type) => resolve(field.selections(), field_type, schema),
                    None => field.selections().to_vec(),
                };
                let mut resolved = field.with_selections(children);
                resolved.type_name = field_type.map(str::to_string);
                Selection::LinkedField(resolved)
            },
            Selection::InlineFragment(inline) => {
                let inner_type = inline.type_condition().unwrap_or(parent_type);
                selection.with_children(resolve(inline.selections(), inner_type, schema))
            },
            Selection::ModuleImport(module) => {
                let inner_type = module.fragment_type().unwrap_or(parent_type);
                selection.with_children(resolve(module.selections(), inner_type, schema))
            },
            Selection::Condition(condition) =>
                selection.with_children(resolve(condition.selections(), parent_type, schema)),
            Selection::FragmentSpread(_) | Selection::ScalarField(_) => selection.clone(),
        })
        .collect()
}
