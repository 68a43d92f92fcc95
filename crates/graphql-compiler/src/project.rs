use crate::git_source_control::GitSourceControl;
use anyhow::Context;
use libgraphql_compiler::config::CompilerConfig;
use libgraphql_compiler::config::SourceControlKind;
use libgraphql_compiler::runner::CodegenRunner;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, clap::Args)]
pub(crate) struct ProjectArgs {
    #[arg(
        default_value=".",
        help="Project root: the directory containing `graphql-compiler.toml`.",
        name="PROJECT_ROOT",
    )]
    root: PathBuf,
}
impl ProjectArgs {
    /// Loads the project's config and builds a runner for it.
    pub(crate) fn load_runner(&self) -> anyhow::Result<CodegenRunner> {
        let root = std::fs::canonicalize(&self.root)
            .with_context(|| format!("Project root {:?} does not exist", self.root))?;
        let config = CompilerConfig::load(&root)?;
        log::debug!("Loaded config for project at {root:?}: {config:#?}");

        let source_control = config.source_control;
        let runner = CodegenRunner::new(config);
        Ok(match source_control {
            Some(SourceControlKind::Git) => {
                let git = GitSourceControl::new(root);
                log::debug!("Reporting artifact changes to git in {:?}.", git.work_tree());
                runner.with_source_control(Arc::new(git))
            },
            None => runner,
        })
    }
}
