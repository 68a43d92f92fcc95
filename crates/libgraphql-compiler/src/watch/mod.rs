//! Watch mode: single-flight, coalesced rebuilds driven by file changes.

mod rebuild_scheduler;
mod watch_driver;
mod watch_error;
mod watch_source;

pub use rebuild_scheduler::RebuildScheduler;
pub use watch_driver::run_watch;
pub use watch_error::WatchError;
pub use watch_source::ChannelWatchSource;
pub use watch_source::WatchSource;

#[cfg(test)]
mod tests;
