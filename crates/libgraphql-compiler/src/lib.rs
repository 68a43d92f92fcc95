//! An incremental, build-time compiler from GraphQL operations and fragments
//! to generated artifacts.
//!
//! A run parses source documents ([`document_store`]), merges their
//! definitions into a validated [`context::CompilationContext`], lowers them
//! through the reader and normalization [`transform`] tracks, renders the
//! results with [`codegen`], and writes them through a
//! [`fs::StagedFilesystem`] so that a run's output lands all at once or not
//! at all. [`runner::CodegenRunner`] ties these together and, using the
//! [`dependency_graph`], recompiles only what a change can affect.

pub mod codegen;
mod compiler_error;
pub mod config;
pub mod content_hash;
pub mod context;
pub mod dependency_graph;
pub mod document_store;
pub mod file_reader;
pub mod fs;
pub mod ir;
pub mod loc;
pub mod manifest;
pub mod parser;
pub mod runner;
pub mod schema;
pub mod transform;
pub mod watch;

pub use compiler_error::CompilerError;

#[cfg(test)]
mod test_project;
