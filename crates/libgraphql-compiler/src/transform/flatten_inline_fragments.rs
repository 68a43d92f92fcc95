use crate::context::CompilationContext;
use crate::ir::Selection;
use crate::transform::TransformOutput;
use crate::transform::transform::rewrite_definitions;
use std::collections::HashSet;

/// Which track a mode-dependent transform runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlattenMode {
    Reader,
    /// Also drops selections that are structurally identical to an earlier
    /// sibling once inline fragments have been merged.
    Normalization,
}

pub fn flatten_inline_fragments_reader(context: &CompilationContext) -> TransformOutput {
    flatten_inline_fragments(context, FlattenMode::Reader)
}

pub fn flatten_inline_fragments_normalization(context: &CompilationContext) -> TransformOutput {
    flatten_inline_fragments(context, FlattenMode::Normalization)
}

/// Merges each inline fragment that has no directives and whose type
/// condition is absent or equal to its parent type into the parent
/// selection list.
pub fn flatten_inline_fragments(context: &CompilationContext, mode: FlattenMode) -> TransformOutput {
    let schema = context.schema();
    rewrite_definitions(context, |definition| {
        let Some(parent_type) = definition.parent_type(schema) else {
            return Ok(None);
        };
        let selections = flatten(definition.selections(), parent_type, mode);
        Ok(Some(definition.with_selections(selections)))
    })
}

fn flatten(selections: &[Selection], parent_type: &str, mode: FlattenMode) -> Vec<Selection> {
    let mut flattened = vec![];
    for selection in selections {
        match selection {
            Selection::InlineFragment(inline)
                if inline.directives().is_empty()
                    && inline.type_condition().is_none_or(|tc| tc == parent_type) => {
                flattened.extend(flatten(inline.selections(), parent_type, mode));
            },
            Selection::InlineFragment(inline) => {
                let inner_type = inline.type_condition().unwrap_or(parent_type);
                flattened.push(selection.with_children(flatten(inline.selections(), inner_type, mode)));
            },
            Selection::LinkedField(field) => {
                // Unresolved fields keep their children as-is.
                let children = match field.type_name() {
                    Some(field_type) => flatten(field.selections(), field_type, mode),
                    None => field.selections().to_vec(),
                };
                flattened.push(selection.with_children(children));
            },
            Selection::ModuleImport(module) => {
                let inner_type = module.fragment_type().unwrap_or(parent_type);
                flattened.push(selection.with_children(flatten(module.selections(), inner_type, mode)));
            },
            Selection::Condition(condition) => {
                flattened.push(selection.with_children(flatten(condition.selections(), parent_type, mode)));
            },
            Selection::FragmentSpread(_) | Selection::ScalarField(_) => flattened.push(selection.clone()),
        }
    }

    if mode == FlattenMode::Normalization {
        let mut seen = HashSet::new();
        flattened.retain(|selection| seen.insert(selection.structural_key()));
    }
    flattened
}
