use libgraphql_compiler::runner::FileChange;
use libgraphql_compiler::runner::FileChangeKind;
use notify_debouncer_full::DebounceEventResult;
use notify_debouncer_full::Debouncer;
use notify_debouncer_full::RecommendedCache;
use notify_debouncer_full::new_debouncer;
use notify_debouncer_full::notify;
use notify_debouncer_full::notify::EventKind;
use notify_debouncer_full::notify::RecommendedWatcher;
use notify_debouncer_full::notify::RecursiveMode;
use notify_debouncer_full::notify::event::ModifyKind;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

const DEBOUNCE_DURATION: Duration = Duration::from_millis(200);

/// Keeps delivering batches to the sender until dropped.
pub(crate) type SourceWatcher = Debouncer<RecommendedWatcher, RecommendedCache>;

/// Watches `paths` recursively, sending each debounced batch of relevant
/// changes to `sender`.
pub(crate) fn watch_paths(
    paths: &[PathBuf],
    sender: UnboundedSender<Vec<FileChange>>,
) -> Result<SourceWatcher, notify::Error> {
    let mut debouncer = new_debouncer(DEBOUNCE_DURATION, None, move |result: DebounceEventResult| {
        let events = match result {
            Ok(events) => events,
            Err(errors) => {
                for err in errors {
                    log::warn!("File watcher error: {err}");
                }
                return;
            },
        };

        let changes: Vec<FileChange> = events.iter()
            .flat_map(|event| file_changes(&event.kind, &event.paths))
            .collect();
        if changes.is_empty() {
            return;
        }
        log::trace!("Watcher delivered {} changes.", changes.len());
        if sender.send(changes).is_err() {
            log::debug!("Watch loop has stopped; dropping file changes.");
        }
    })?;

    for path in paths {
        let mode = if path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        log::debug!("Watching {path:?}.");
        debouncer.watch(path, mode)?;
    }
    Ok(debouncer)
}

/// The [`FileChange`]s a notify event amounts to. Renames are reported as an
/// addition or removal depending on whether the path still exists.
fn file_changes(kind: &EventKind, paths: &[PathBuf]) -> Vec<FileChange> {
    paths.iter()
        .filter_map(|path| {
            let kind = match kind {
                EventKind::Create(_) => FileChangeKind::Added,
                EventKind::Modify(ModifyKind::Name(_)) => renamed(path),
                EventKind::Modify(_) => FileChangeKind::Changed,
                EventKind::Remove(_) => FileChangeKind::Removed,
                _ => return None,
            };
            Some(FileChange { path: path.clone(), kind })
        })
        .collect()
}

fn renamed(path: &Path) -> FileChangeKind {
    if path.exists() {
        FileChangeKind::Added
    } else {
        FileChangeKind::Removed
    }
}
