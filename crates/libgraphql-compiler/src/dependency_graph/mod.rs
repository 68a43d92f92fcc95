//! Tracks which definitions depend on which fragments and schema types, to
//! decide what an incremental build must recompile.

mod cyclic_dependency_error;
mod dependency_graph;

pub use cyclic_dependency_error::CyclicDependencyError;
pub use dependency_graph::DependencyGraph;
