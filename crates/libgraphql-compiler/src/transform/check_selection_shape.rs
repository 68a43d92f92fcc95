use crate::context::CompilationContext;
use crate::ir::Definition;
use crate::ir::Selection;
use crate::transform::TransformError;
use crate::transform::TransformOutput;
use crate::transform::transform::rewrite_definitions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShapeRules {
    Reader,
    Normalization,
}

/// Reader shape: no container selection is empty.
pub fn check_selection_shape_reader(context: &CompilationContext) -> TransformOutput {
    check_selection_shape(context, ShapeRules::Reader)
}

/// Normalization shape: the reader rules, plus no fragment spread survives
/// and no inline fragment remains that should have been flattened into its
/// parent.
pub fn check_selection_shape_normalization(context: &CompilationContext) -> TransformOutput {
    check_selection_shape(context, ShapeRules::Normalization)
}

fn check_selection_shape(context: &CompilationContext, rules: ShapeRules) -> TransformOutput {
    let schema = context.schema();
    rewrite_definitions(context, |definition| {
        let parent_type = definition.parent_type(schema).unwrap_or_default();
        let mut errors = vec![];
        check(definition, definition.selections(), parent_type, rules, &mut errors);
        if errors.is_empty() {
            Ok(None)
        } else {
            Err(errors)
        }
    })
}

fn check(
    definition: &Definition,
    selections: &[Selection],
    parent_type: &str,
    rules: ShapeRules,
    errors: &mut Vec<TransformError>,
) {
    for selection in selections {
        let inner_type = match selection {
            Selection::LinkedField(field) => field.type_name().unwrap_or_default(),
            Selection::InlineFragment(inline) => inline.type_condition().unwrap_or(parent_type),
            Selection::ModuleImport(module) => module.fragment_type().unwrap_or(parent_type),
            Selection::Condition(_) => parent_type,
            Selection::FragmentSpread(spread) => {
                if rules == ShapeRules::Normalization {
                    errors.push(TransformError::UnflattenedFragmentSpread {
                        definition: definition.name().to_string(),
                        fragment: spread.fragment_name().to_string(),
                        location: spread.location().clone(),
                    });
                }
                continue;
            },
            Selection::ScalarField(_) => continue,
        };

        if selection.children().is_empty() {
            errors.push(TransformError::EmptySelection {
                definition: definition.name().to_string(),
                parent_type: inner_type.to_string(),
                location: selection.location().clone(),
            });
            continue;
        }

        if rules == ShapeRules::Normalization
            && let Selection::InlineFragment(inline) = selection
            && inline.directives().is_empty()
            && inline.type_condition().is_none_or(|tc| tc == parent_type) {
            errors.push(TransformError::UnflattenedInlineFragment {
                definition: definition.name().to_string(),
                type_name: inner_type.to_string(),
                location: inline.location().clone(),
            });
        }

        check(definition, selection.children(), inner_type, rules, errors);
    }
}
