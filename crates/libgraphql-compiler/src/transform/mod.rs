//! Pure `CompilationContext -> CompilationContext` rewrites, grouped into the
//! reader and normalization tracks of a [`TransformPipeline`].

mod check_selection_shape;
mod flatten_inline_fragments;
mod inline_named_fragments;
mod resolve_types;
mod split_module_imports;
mod transform;
mod transform_error;
mod transform_pipeline;
mod validate_selections;

pub use check_selection_shape::check_selection_shape_normalization;
pub use check_selection_shape::check_selection_shape_reader;
pub use flatten_inline_fragments::FlattenMode;
pub use flatten_inline_fragments::flatten_inline_fragments;
pub use flatten_inline_fragments::flatten_inline_fragments_normalization;
pub use flatten_inline_fragments::flatten_inline_fragments_reader;
pub use inline_named_fragments::inline_named_fragments;
pub use resolve_types::resolve_types;
pub use split_module_imports::split_module_imports;
pub use transform::Transform;
pub use transform::TransformOutput;
pub use transform_error::TransformError;
pub use transform_pipeline::NORMALIZATION_TRANSFORMS;
pub use transform_pipeline::PipelineError;
pub use transform_pipeline::PipelineOutput;
pub use transform_pipeline::READER_TRANSFORMS;
pub use transform_pipeline::Track;
pub use transform_pipeline::TransformPipeline;
pub use validate_selections::validate_selections;
