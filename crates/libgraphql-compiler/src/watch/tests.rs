use crate::fs::SourceControl;
use crate::fs::SourceControlError;
use crate::runner::FileChange;
use crate::runner::FileChangeKind;
use crate::runner::RunError;
use crate::test_project::TestProject;
use crate::watch::ChannelWatchSource;
use crate::watch::RebuildScheduler;
use crate::watch::run_watch;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use tokio_util::sync::CancellationToken;

#[test]
fn changes_during_a_rebuild_collapse_into_one_follow_up() {
    let scheduler = RebuildScheduler::new();

    let first = scheduler.record(vec![FileChange::changed("a.graphql")]);
    assert_eq!(first, Some(vec![FileChange::changed("a.graphql")]));
    assert!(scheduler.is_running());

    assert_eq!(scheduler.record(vec![FileChange::added("b.graphql")]), None);
    assert_eq!(scheduler.record(vec![FileChange::changed("b.graphql")]), None);
    assert_eq!(scheduler.record(vec![FileChange::removed("c.graphql")]), None);
    assert_eq!(scheduler.pending_changes(), 2);

    assert_eq!(scheduler.finish(), Some(vec![
        FileChange { path: PathBuf::from("b.graphql"), kind: FileChangeKind::Changed },
        FileChange::removed("c.graphql"),
    ]));
    assert!(scheduler.is_running());

    assert_eq!(scheduler.finish(), None);
    assert!(!scheduler.is_running());
}

#[test]
fn begin_is_single_flight() {
    let scheduler = RebuildScheduler::new();
    assert!(scheduler.begin());
    assert!(!scheduler.begin());

    assert_eq!(scheduler.record(vec![FileChange::changed("a.graphql")]), None);
    assert_eq!(scheduler.finish(), Some(vec![FileChange::changed("a.graphql")]));
    assert_eq!(scheduler.finish(), None);
    assert!(scheduler.begin());
}

#[test]
fn requeued_changes_wait_for_the_next_rebuild() {
    let scheduler = RebuildScheduler::new();
    assert!(scheduler.begin());

    scheduler.requeue(vec![FileChange::changed("a.graphql"), FileChange::changed("b.graphql")]);
    assert_eq!(scheduler.finish(), None);
    assert_eq!(scheduler.pending_changes(), 2);

    assert_eq!(scheduler.record(vec![FileChange::removed("b.graphql")]), Some(vec![
        FileChange::changed("a.graphql"),
        FileChange::removed("b.graphql"),
    ]));
}

#[derive(Debug, Default)]
struct FailsOnSecondCommit {
    calls: AtomicUsize,
}
impl SourceControl for FailsOnSecondCommit {
    fn add_remove(&self, _added: &[PathBuf], _removed: &[PathBuf]) -> Result<(), SourceControlError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 1 {
            return Err(SourceControlError::CommandFailed {
                command: "git add".to_string(),
                status: "exit status: 128".to_string(),
                stderr: "index.lock exists".to_string(),
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn changes_of_a_failed_rebuild_are_retried_with_the_next_one() {
    let project = TestProject::new();
    project.write("src/a.graphql", "fragment A on User { id }");
    project.write("src/b.graphql", "fragment B on User { id }");
    let runner = project.runner().with_source_control(Arc::new(FailsOnSecondCommit::default()));
    let (sender, source) = ChannelWatchSource::channel();

    let mut sender = Some(sender);
    let mut compiled: Vec<Option<BTreeSet<String>>> = vec![];
    run_watch(runner, source, CancellationToken::new(), |result| {
        compiled.push(result.as_ref().ok().map(|report| report.compiled.clone()));
        match compiled.len() {
            1 => {
                let a = project.write("src/a.graphql", "fragment A on User { id name }");
                sender.as_ref().unwrap().send(vec![FileChange::changed(a)]).unwrap();
            },
            2 => {
                let b = project.write("src/b.graphql", "fragment B on User { id name }");
                sender.take().unwrap().send(vec![FileChange::changed(b)]).unwrap();
            },
            _ => (),
        }
    })
    .await
    .unwrap();

    let both = BTreeSet::from(["A".to_string(), "B".to_string()]);
    assert_eq!(compiled, vec![Some(both.clone()), None, Some(both)]);
}

#[tokio::test]
async fn watch_rebuilds_until_the_source_closes() {
    let project = TestProject::new();
    project.write("src/user.graphql", "fragment UserFields on User { id }");
    let (sender, source) = ChannelWatchSource::channel();

    let added = project.write("src/viewer.graphql", "query Viewer { viewer { ...UserFields } }");
    sender.send(vec![FileChange::added(added)]).unwrap();
    drop(sender);

    let mut outcomes = vec![];
    let runner = run_watch(project.runner(), source, CancellationToken::new(), |result| {
        outcomes.push(result.as_ref().map(|report| report.error_count()).map_err(|err| err.to_string()));
    })
    .await
    .unwrap();

    assert_eq!(outcomes, vec![Ok(0), Ok(0)]);
    assert!(project.artifact("Viewer").is_file());
    assert!(runner.failed_definitions().is_empty());
}

#[tokio::test]
async fn shutdown_cancels_the_in_flight_run() {
    let project = TestProject::new();
    project.write("src/user.graphql", "fragment UserFields on User { id }");
    let (_sender, source) = ChannelWatchSource::channel();
    let shutdown = CancellationToken::new();
    shutdown.cancel();

    let mut cancelled = vec![];
    run_watch(project.runner(), source, shutdown, |result| {
        cancelled.push(matches!(result, Err(RunError::Cancelled)));
    })
    .await
    .unwrap();

    assert_eq!(cancelled, vec![true]);
    assert!(!project.artifact("UserFields").exists());
    assert!(!project.manifest_path().exists());
}
