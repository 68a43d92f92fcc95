use crate::notify_watch_source;
use crate::output_utils;
use crate::project::ProjectArgs;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libgraphql_compiler::runner::RunError;
use libgraphql_compiler::runner::RunReport;
use libgraphql_compiler::watch::ChannelWatchSource;
use libgraphql_compiler::watch::run_watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, clap::Args)]
pub(crate) struct WatchCmd {
    #[command(flatten)]
    project: ProjectArgs,
}

#[inherent::inherent]
impl RunnableCommand for WatchCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let runner = match self.project.load_runner() {
            Ok(runner) => runner,
            Err(err) => return CommandResult::stderr(format_args!(
                "{} Failed to load the project: {err:#}",
                output_utils::RED_X,
            )),
        };

        let mut watched = vec![runner.config().src_dir()];
        watched.extend(runner.config().schema_paths());
        let (sender, source) = ChannelWatchSource::channel();
        let _watcher = match notify_watch_source::watch_paths(&watched, sender) {
            Ok(watcher) => watcher,
            Err(err) => return CommandResult::stderr(format_args!(
                "{} Failed to watch {watched:?}: {err}",
                output_utils::RED_X,
            )),
        };

        let shutdown = CancellationToken::new();
        tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.cancel();
                }
            }
        });

        log::info!("Watching {} paths for changes. Press Ctrl-C to stop.", watched.len());
        match run_watch(runner, source, shutdown, log_run).await {
            Ok(_) => CommandResult::stdout(format_args!(
                "{} Stopped watching.",
                output_utils::GREEN_CHECK,
            )),
            Err(err) => CommandResult::stderr(format_args!(
                "{} Watch mode stopped unexpectedly: {err}",
                output_utils::RED_X,
            )),
        }
    }
}

fn log_run(result: &Result<RunReport, RunError>) {
    match result {
        Ok(report) if report.has_errors() => log::error!(
            "{} {} errors:\n{}",
            output_utils::RED_X,
            report.error_count(),
            output_utils::format_errors(report),
        ),
        Ok(report) => log::info!(
            "{} Compiled {} definitions ({} artifacts written, {} deleted).",
            output_utils::GREEN_CHECK,
            report.compiled.len(),
            report.created.len() + report.updated.len(),
            report.deleted.len(),
        ),
        Err(RunError::Cancelled) => log::info!("Run cancelled."),
        Err(err) => log::error!("{} Codegen run failed: {err}", output_utils::RED_X),
    }
}
