use libgraphql_compiler::fs::SourceControl;
use libgraphql_compiler::fs::SourceControlError;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

/// Stages created artifacts with `git add` and untracks deleted ones with
/// `git rm --cached`.
#[derive(Debug)]
pub(crate) struct GitSourceControl {
    work_tree: PathBuf,
}
impl GitSourceControl {
    pub(crate) fn new(work_tree: impl Into<PathBuf>) -> Self {
        Self {
            work_tree: work_tree.into(),
        }
    }

    fn git(&self, args: &[&str], paths: &[PathBuf]) -> Result<(), SourceControlError> {
        let command = format!("git {}", args.join(" "));
        log::debug!("Running `{command}` for {} paths.", paths.len());
        let output = Command::new("git")
            .current_dir(&self.work_tree)
            .args(args)
            .args(paths)
            .output()?;
        if !output.status.success() {
            return Err(SourceControlError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    pub(crate) fn work_tree(&self) -> &Path {
        &self.work_tree
    }
}
impl SourceControl for GitSourceControl {
    fn add_remove(&self, added: &[PathBuf], removed: &[PathBuf]) -> Result<(), SourceControlError> {
        if !added.is_empty() {
            self.git(&["add", "--"], added)?;
        }
        if !removed.is_empty() {
            self.git(&["rm", "--cached", "--quiet", "--ignore-unmatch", "--"], removed)?;
        }
        Ok(())
    }
}
