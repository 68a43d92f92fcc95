//! The immutable, validated set of definitions a compilation operates on.

mod compilation_context;
mod compilation_context_builder;
mod validation_error;

pub use compilation_context::CompilationContext;
pub use compilation_context::DefinitionId;
pub use compilation_context_builder::CompilationContextBuilder;
pub use compilation_context_builder::ValidatedContext;
pub use validation_error::ValidationError;

#[cfg(test)]
mod tests;
