use crate::runner::CodegenRunner;
use crate::runner::FileChange;
use crate::runner::RunError;
use crate::runner::RunReport;
use crate::watch::RebuildScheduler;
use crate::watch::WatchError;
use crate::watch::WatchSource;
use tokio::task::JoinError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

type RunOutcome = (CodegenRunner, Option<Vec<FileChange>>, Result<RunReport, RunError>);

/// Runs a full build, then keeps `runner` up to date with the changes
/// `source` delivers until `shutdown` is cancelled or the source ends.
///
/// Rebuilds run one at a time on the blocking thread pool; changes arriving
/// mid-run are coalesced into a single follow-up (see [`RebuildScheduler`]).
/// On shutdown the in-flight run is cancelled, so nothing it staged is
/// committed. The changes of a run that fails are handed to the next rebuild
/// again. `on_run` sees the outcome of every run.
///
/// Returns the runner once watching stops.
pub async fn run_watch<S: WatchSource>(
    runner: CodegenRunner,
    mut source: S,
    shutdown: CancellationToken,
    mut on_run: impl FnMut(&Result<RunReport, RunError>),
) -> Result<CodegenRunner, WatchError> {
    let scheduler = RebuildScheduler::new();
    scheduler.begin();
    let mut in_flight = Some(spawn_run(runner, None, shutdown.child_token()));
    let mut idle_runner = None;
    let mut source_open = true;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("Shutting down watch mode...");
                if let Some(handle) = in_flight.take() {
                    let (runner, _, result) = handle.await?;
                    on_run(&result);
                    idle_runner = Some(runner);
                }
                break;
            },

            batch = source.next_batch(), if source_open => {
                let Some(changes) = batch else {
                    tracing::debug!("Watch source closed.");
                    source_open = false;
                    if in_flight.is_none() {
                        break;
                    }
                    continue;
                };
                tracing::debug!("Received {} file changes.", changes.len());
                if let Some(changes) = scheduler.record(changes)
                    && let Some(runner) = idle_runner.take() {
                    in_flight = Some(spawn_run(runner, Some(changes), shutdown.child_token()));
                }
            },

            joined = join_in_flight(&mut in_flight) => {
                in_flight = None;
                let (runner, changes, result) = joined?;
                on_run(&result);
                if result.is_err()
                    && let Some(changes) = changes {
                    tracing::debug!("Rebuild failed; retrying {} changes with the next one.", changes.len());
                    scheduler.requeue(changes);
                }
                match scheduler.finish() {
                    Some(changes) => {
                        tracing::debug!("Starting follow-up rebuild for {} changes.", changes.len());
                        in_flight = Some(spawn_run(runner, Some(changes), shutdown.child_token()));
                    },
                    None if !source_open => {
                        idle_runner = Some(runner);
                        break;
                    },
                    None => idle_runner = Some(runner),
                }
            },
        }
    }

    match idle_runner {
        Some(runner) => Ok(runner),
        None => unreachable!("the watch loop only exits once the runner is idle"),
    }
}

fn spawn_run(
    mut runner: CodegenRunner,
    changes: Option<Vec<FileChange>>,
    cancel: CancellationToken,
) -> JoinHandle<RunOutcome> {
    tokio::task::spawn_blocking(move || {
        let result = match &changes {
            Some(changes) => runner.run_incremental(changes, &cancel),
            None => runner.run_full(&cancel),
        };
        (runner, changes, result)
    })
}

async fn join_in_flight(in_flight: &mut Option<JoinHandle<RunOutcome>>) -> Result<RunOutcome, JoinError> {
    match in_flight {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}
