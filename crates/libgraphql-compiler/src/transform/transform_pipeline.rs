use crate::context::CompilationContext;
use crate::transform::Transform;
use crate::transform::TransformError;
use crate::transform::TransformOutput;
use crate::transform::check_selection_shape_normalization;
use crate::transform::check_selection_shape_reader;
use crate::transform::flatten_inline_fragments_normalization;
use crate::transform::flatten_inline_fragments_reader;
use crate::transform::inline_named_fragments;
use crate::transform::resolve_types;
use crate::transform::split_module_imports;
use crate::transform::validate_selections;
use std::collections::BTreeSet;
use thiserror::Error;

/// Transforms producing the reader form: what a component reads, with
/// fragment spreads left in place.
pub const READER_TRANSFORMS: &[Transform] = &[
    Transform { name: "validate_selections", apply: validate_selections },
    Transform { name: "resolve_types", apply: resolve_types },
    Transform { name: "flatten_inline_fragments", apply: flatten_inline_fragments_reader },
    Transform { name: "check_selection_shape", apply: check_selection_shape_reader },
];

/// Transforms producing the normalization form: the fully inlined shape of
/// a server response.
pub const NORMALIZATION_TRANSFORMS: &[Transform] = &[
    Transform { name: "validate_selections", apply: validate_selections },
    Transform { name: "inline_named_fragments", apply: inline_named_fragments },
    Transform { name: "resolve_types", apply: resolve_types },
    Transform { name: "flatten_inline_fragments", apply: flatten_inline_fragments_normalization },
    Transform { name: "split_module_imports", apply: split_module_imports },
    Transform { name: "check_selection_shape", apply: check_selection_shape_normalization },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Track {
    Reader,
    Normalization,
}
impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reader => write!(f, "reader"),
            Self::Normalization => write!(f, "normalization"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
#[error("[{track}] {transform}: {error}")]
pub struct PipelineError {
    pub track: Track,
    pub transform: &'static str,
    pub error: TransformError,
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub reader: CompilationContext,
    pub normalization: CompilationContext,
    pub errors: Vec<PipelineError>,
}

/// Runs the reader and normalization tracks over the same input context.
///
/// Within a track, a definition that fails a transform is dropped from that
/// track together with every definition spreading it; the remaining
/// definitions continue through the rest of the track.
#[derive(Clone, Copy, Debug)]
pub struct TransformPipeline {
    reader: &'static [Transform],
    normalization: &'static [Transform],
}
impl TransformPipeline {
    pub const fn new() -> Self {
        Self::with_tracks(READER_TRANSFORMS, NORMALIZATION_TRANSFORMS)
    }

    pub const fn with_tracks(
        reader: &'static [Transform],
        normalization: &'static [Transform],
    ) -> Self {
        Self {
            reader,
            normalization,
        }
    }

    pub fn reader_transforms(&self) -> &'static [Transform] {
        self.reader
    }

    pub fn normalization_transforms(&self) -> &'static [Transform] {
        self.normalization
    }

    pub fn run(&self, context: &CompilationContext) -> PipelineOutput {
        let ((reader, mut errors), (normalization, normalization_errors)) = rayon::join(
            || run_track(context, Track::Reader, self.reader),
            || run_track(context, Track::Normalization, self.normalization),
        );
        errors.extend(normalization_errors);
        PipelineOutput {
            reader,
            normalization,
            errors,
        }
    }
}
impl Default for TransformPipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn run_track(
    context: &CompilationContext,
    track: Track,
    transforms: &[Transform],
) -> (CompilationContext, Vec<PipelineError>) {
    let mut context = context.clone();
    let mut errors = vec![];
    for transform in transforms {
        let TransformOutput {
            context: output_context,
            errors: output_errors,
        } = (transform.apply)(&context);
        tracing::debug!(
            "{track} transform `{}`: {} definitions, {} errors",
            transform.name,
            output_context.len(),
            output_errors.len(),
        );

        let failed: BTreeSet<String> = output_errors.iter()
            .map(|err| err.definition().to_string())
            .collect();
        errors.extend(output_errors.into_iter().map(|error| PipelineError {
            track,
            transform: transform.name,
            error,
        }));

        // Dependents are looked up in the input context: the output may
        // already have dropped the failed definitions.
        let dependents = context.dependents_of(&failed);
        for dependent in dependents.difference(&failed) {
            if !output_context.contains(dependent) {
                continue;
            }
            let dependency = context.get(dependent).ok()
                .and_then(|definition| {
                    definition.referenced_fragments().iter()
                        .find(|fragment| failed.contains(*fragment) || dependents.contains(*fragment))
                })
                .cloned()
                .unwrap_or_default();
            errors.push(PipelineError {
                track,
                transform: transform.name,
                error: TransformError::DependencyFailed {
                    definition: dependent.clone(),
                    dependency,
                },
            });
        }

        let mut removed = failed;
        removed.extend(dependents);
        context = output_context.without_definitions(&removed);
    }
    (context, errors)
}
