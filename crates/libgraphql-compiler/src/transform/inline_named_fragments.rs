use crate::context::CompilationContext;
use crate::ir::Definition;
use crate::ir::InlineFragment;
use crate::ir::Selection;
use crate::transform::TransformError;
use crate::transform::TransformOutput;
use crate::transform::transform::rewrite_definitions;
use std::collections::BTreeSet;

/// Replaces every fragment spread with an inline fragment on the fragment's
/// type condition holding the fragment's (recursively inlined) selections.
/// Module imports keep their node but have their spread inlined and their
/// `fragment_type` filled in.
///
/// Named fragments have no normalization form of their own, so they are
/// removed from the output context.
pub fn inline_named_fragments(context: &CompilationContext) -> TransformOutput {
    let fragments: BTreeSet<String> = context.documents()
        .filter(|definition| definition.is_fragment())
        .map(|definition| definition.name().to_string())
        .collect();

    let mut output = rewrite_definitions(context, |definition| {
        if definition.is_fragment() {
            return Ok(None);
        }
        let mut errors = vec![];
        let mut visiting = vec![];
        let selections = inline(
            context,
            definition,
            definition.selections(),
            &mut visiting,
            &mut errors,
        );
        if errors.is_empty() {
            Ok(Some(definition.with_selections(selections)))
        } else {
            Err(errors)
        }
    });
    output.context = output.context.without_definitions(&fragments);
    output
}

fn inline(
    context: &CompilationContext,
    definition: &Definition,
    selections: &[Selection],
    visiting: &mut Vec<String>,
    errors: &mut Vec<TransformError>,
) -> Vec<Selection> {
    let mut inlined = Vec::with_capacity(selections.len());
    for selection in selections {
        match selection {
            Selection::FragmentSpread(spread) => {
                let fragment_name = spread.fragment_name();
                if visiting.iter().any(|name| name == fragment_name) {
                    errors.push(TransformError::CyclicFragment {
                        definition: definition.name().to_string(),
                        fragment: fragment_name.to_string(),
                        location: spread.location().clone(),
                    });
                    continue;
                }
                let Some(fragment) = context.get(fragment_name).ok()
                    .filter(|fragment| fragment.is_fragment()) else {
                    errors.push(TransformError::MissingFragment {
                        definition: definition.name().to_string(),
                        fragment: fragment_name.to_string(),
                        location: spread.location().clone(),
                    });
                    continue;
                };

                visiting.push(fragment_name.to_string());
                let children = inline(context, definition, fragment.selections(), visiting, errors);
                visiting.pop();

                let mut inline_fragment = InlineFragment::new(
                    fragment.type_condition().map(str::to_string),
                    children,
                );
                inline_fragment.directives = spread.directives().to_vec();
                inline_fragment.location = spread.location().clone();
                inlined.push(Selection::InlineFragment(inline_fragment));
            },
            Selection::ModuleImport(module) => {
                let children = inline(context, definition, module.selections(), visiting, errors);
                let mut module = module.with_selections(children);
                module.fragment_type = context.get(module.fragment_name()).ok()
                    .and_then(|fragment| fragment.type_condition())
                    .map(str::to_string);
                inlined.push(Selection::ModuleImport(module));
            },
            Selection::Condition(_)
            | Selection::InlineFragment(_)
            | Selection::LinkedField(_) => {
                let children = inline(context, definition, selection.children(), visiting, errors);
                inlined.push(selection.with_children(children));
            },
            Selection::ScalarField(_) => inlined.push(selection.clone()),
        }
    }
    inlined
}
