use crate::output_utils;
use crate::project::ProjectArgs;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use tokio_util::sync::CancellationToken;

#[derive(Debug, clap::Args)]
pub(crate) struct CompileCmd {
    #[command(flatten)]
    project: ProjectArgs,
}

#[inherent::inherent]
impl RunnableCommand for CompileCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let mut runner = match self.project.load_runner() {
            Ok(runner) => runner,
            Err(err) => return CommandResult::stderr(format_args!(
                "{} Failed to load the project: {err:#}",
                output_utils::RED_X,
            )),
        };

        // Ctrl-C abandons the run before anything is committed.
        let cancel = CancellationToken::new();
        let interrupt = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Interrupted; cancelling the run...");
                    cancel.cancel();
                }
            }
        });

        let run = tokio::task::spawn_blocking(move || runner.run_full(&cancel)).await;
        interrupt.abort();

        let report = match run {
            Ok(Ok(report)) => report,
            Ok(Err(err)) => return CommandResult::stderr(format_args!(
                "{} Codegen run failed: {err}",
                output_utils::RED_X,
            )),
            Err(err) => return CommandResult::stderr(format_args!(
                "{} Codegen run did not complete: {err}",
                output_utils::RED_X,
            )),
        };

        if report.has_errors() {
            return CommandResult::stderr(format_args!(
                "{} {} errors:\n{}\n{}",
                output_utils::RED_X,
                report.error_count(),
                output_utils::format_errors(&report),
                output_utils::format_summary(&report),
            ));
        }

        CommandResult::stdout(format_args!(
            "{} Compiled successfully:\n{}",
            output_utils::GREEN_CHECK,
            output_utils::format_summary(&report),
        ))
    }
}
