use crate::context::CompilationContext;
use crate::ir::Definition;
use crate::ir::Selection;
use crate::transform::TransformError;
use crate::transform::TransformOutput;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;

struct PendingSplit {
    type_condition: Option<String>,
    selections: Vec<Selection>,
    structural_key: String,
    parents: BTreeSet<String>,
}

/// Derives a standalone `<Fragment>$normalization` split operation from every
/// module import. Operations whose imports produce structurally identical
/// splits share one; a split that differs from one already produced, or whose
/// name is taken by another definition, fails the importing operation.
pub fn split_module_imports(context: &CompilationContext) -> TransformOutput {
    let mut splits: IndexMap<String, PendingSplit> = IndexMap::new();
    let mut errors = vec![];
    let mut failed = BTreeSet::new();

    for definition in context.documents() {
        if !definition.is_operation() {
            continue;
        }
        let mut modules = vec![];
        collect_module_imports(definition.selections(), &mut modules);

        for (name, type_condition, selections) in modules {
            let conflict = if context.contains(&name) {
                true
            } else if let Some(existing) = splits.get_mut(&name) {
                if existing.structural_key == split_key(&name, type_condition.as_deref(), &selections) {
                    existing.parents.insert(definition.name().to_string());
                    false
                } else {
                    true
                }
            } else {
                let structural_key = split_key(&name, type_condition.as_deref(), &selections);
                splits.insert(name.clone(), PendingSplit {
                    type_condition,
                    selections,
                    structural_key,
                    parents: BTreeSet::from([definition.name().to_string()]),
                });
                false
            };

            if conflict {
                failed.insert(definition.name().to_string());
                errors.push(TransformError::SplitOperationConflict {
                    definition: definition.name().to_string(),
                    name,
                });
            }
        }
    }

    // A split whose every parent failed is dropped along with them.
    let split_definitions = splits.into_iter()
        .filter_map(|(name, split)| {
            let parents: Vec<String> = split.parents.into_iter()
                .filter(|parent| !failed.contains(parent))
                .collect();
            if parents.is_empty() {
                return None;
            }
            Some(Arc::new(Definition::split_operation(
                name,
                parents,
                split.type_condition,
                split.selections,
            )))
        })
        .collect::<Vec<_>>();

    let base = context.without_definitions(&failed);
    let context = match base.add(split_definitions) {
        Ok(context) => context,
        Err(err) => {
            // Split names are checked against the context above.
            tracing::error!("Failed to add split operations: {err}");
            base
        },
    };
    TransformOutput {
        context,
        errors,
    }
}

fn collect_module_imports(
    selections: &[Selection],
    modules: &mut Vec<(String, Option<String>, Vec<Selection>)>,
) {
    for selection in selections {
        if let Selection::ModuleImport(module) = selection {
            modules.push((
                module.split_operation_name(),
                module.fragment_type().map(str::to_string),
                module.selections().to_vec(),
            ));
        }
        collect_module_imports(selection.children(), modules);
    }
}

fn split_key(name: &str, type_condition: Option<&str>, selections: &[Selection]) -> String {
    Definition::split_operation(name, vec![], type_condition.map(str::to_string), selections.to_vec())
        .structural_key()
}
