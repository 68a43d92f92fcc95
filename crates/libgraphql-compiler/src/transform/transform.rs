use crate::context::CompilationContext;
use crate::ir::Definition;
use crate::transform::TransformError;
use std::collections::BTreeSet;

/// One named, pure step of a [`TransformPipeline`](crate::transform::TransformPipeline)
/// track.
#[derive(Clone, Copy)]
pub struct Transform {
    pub name: &'static str,
    pub apply: fn(&CompilationContext) -> TransformOutput,
}
impl std::fmt::Debug for Transform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

#[derive(Debug)]
pub struct TransformOutput {
    pub context: CompilationContext,
    pub errors: Vec<TransformError>,
}

/// Applies `rewrite` to every definition of `context`. `Ok(None)` keeps the
/// definition as-is; a failed definition is dropped from the output context
/// and its errors are collected.
pub(crate) fn rewrite_definitions(
    context: &CompilationContext,
    mut rewrite: impl FnMut(&Definition) -> Result<Option<Definition>, Vec<TransformError>>,
) -> TransformOutput {
    let mut errors = vec![];
    let mut failed = BTreeSet::new();
    let mut rewritten = vec![];
    for definition in context.documents() {
        match rewrite(definition) {
            Ok(Some(definition)) => rewritten.push(definition),
            Ok(None) => (),
            Err(mut definition_errors) => {
                failed.insert(definition.name().to_string());
                errors.append(&mut definition_errors);
            },
        }
    }
    TransformOutput {
        context: context.with_definitions_replaced(rewritten).without_definitions(&failed),
        errors,
    }
}
