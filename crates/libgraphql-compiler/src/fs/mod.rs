//! Filesystem access for artifact output: a direct implementation and a
//! staged one that buffers a run's effects until commit.

mod codegen_filesystem;
mod direct_filesystem;
mod filesystem_error;
mod source_control;
mod staged_filesystem;

pub use codegen_filesystem::AddedRemovedFiles;
pub use codegen_filesystem::CodegenFilesystem;
pub use codegen_filesystem::FileStat;
pub use direct_filesystem::DirectFilesystem;
pub use filesystem_error::CommitError;
pub use filesystem_error::ContractViolationError;
pub use filesystem_error::FilesystemError;
pub use source_control::SourceControl;
pub use source_control::SourceControlError;
pub use staged_filesystem::StagedEntry;
pub use staged_filesystem::StagedFilesystem;
pub use staged_filesystem::StagedState;

#[cfg(test)]
mod tests;
