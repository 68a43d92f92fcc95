use crate::runner::FileChange;
use crate::runner::FileChangeKind;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
struct SchedulerState {
    running: bool,
    /// Set when changes arrive mid-run; at most one follow-up run is owed.
    pending: bool,
    changes: BTreeMap<PathBuf, FileChangeKind>,
}
impl SchedulerState {
    fn take_changes(&mut self) -> Vec<FileChange> {
        std::mem::take(&mut self.changes)
            .into_iter()
            .map(|(path, kind)| FileChange { path, kind })
            .collect()
    }
}

/// Single-flight rebuild scheduling: never more than one rebuild at a time,
/// and any number of changes arriving during a rebuild collapse into exactly
/// one follow-up.
///
/// ```
/// use libgraphql_compiler::runner::FileChange;
/// use libgraphql_compiler::watch::RebuildScheduler;
///
/// let scheduler = RebuildScheduler::new();
/// let first = scheduler.record(vec![FileChange::changed("a.graphql")]);
/// assert_eq!(first.map(|changes| changes.len()), Some(1));
///
/// // A rebuild is running, so these are held back.
/// assert!(scheduler.record(vec![FileChange::changed("b.graphql")]).is_none());
/// assert!(scheduler.record(vec![FileChange::changed("c.graphql")]).is_none());
///
/// let follow_up = scheduler.finish().unwrap();
/// assert_eq!(follow_up.len(), 2);
/// assert!(scheduler.finish().is_none());
/// ```
#[derive(Debug, Default)]
pub struct RebuildScheduler {
    state: Mutex<SchedulerState>,
}
impl RebuildScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a rebuild as started if none is running. Returns `false` if one
    /// already is.
    pub fn begin(&self) -> bool {
        let mut state = self.state.lock();
        if state.running {
            return false;
        }
        state.running = true;
        true
    }

    /// Records `changes`. When idle, starts a rebuild and returns everything
    /// it should process; otherwise holds the changes for the follow-up run
    /// and returns `None`.
    pub fn record(&self, changes: Vec<FileChange>) -> Option<Vec<FileChange>> {
        let mut state = self.state.lock();
        for change in changes {
            state.changes.insert(change.path, change.kind);
        }

        if state.running {
            state.pending = true;
            tracing::debug!("Rebuild in progress; {} changes pending.", state.changes.len());
            return None;
        }
        state.running = true;
        state.pending = false;
        Some(state.take_changes())
    }

    /// Marks the running rebuild as finished. Returns the changes for the
    /// one follow-up rebuild if any arrived meanwhile, leaving the scheduler
    /// running; otherwise goes idle and returns `None`.
    pub fn finish(&self) -> Option<Vec<FileChange>> {
        let mut state = self.state.lock();
        if state.pending {
            state.pending = false;
            return Some(state.take_changes());
        }
        state.running = false;
        None
    }

    /// Holds on to the changes of a rebuild that failed, so the next rebuild
    /// processes them again. Changes recorded since then take precedence.
    /// Does not start a rebuild by itself.
    pub fn requeue(&self, changes: Vec<FileChange>) {
        let mut state = self.state.lock();
        for change in changes {
            state.changes.entry(change.path).or_insert(change.kind);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    pub fn pending_changes(&self) -> usize {
        self.state.lock().changes.len()
    }
}
