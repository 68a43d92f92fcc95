//! Orchestration of codegen runs, full and incremental.

mod codegen_runner;
mod file_change;
mod run_error;
mod run_report;
mod source_discovery;

pub use codegen_runner::CodegenRunner;
pub use file_change::FileChange;
pub use file_change::FileChangeKind;
pub use run_error::RunError;
pub use run_report::ErrorOrigin;
pub use run_report::RunReport;

#[cfg(test)]
mod tests;
