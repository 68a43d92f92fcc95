use crate::runner::FileChange;
use std::future::Future;
use tokio::sync::mpsc;

/// A stream of file-change batches driving watch mode.
pub trait WatchSource: Send {
    /// The next batch of changes, or `None` once the source has shut down.
    fn next_batch(&mut self) -> impl Future<Output = Option<Vec<FileChange>>> + Send;
}

/// A [`WatchSource`] fed through a channel, for backends that deliver events
/// on their own threads.
#[derive(Debug)]
pub struct ChannelWatchSource {
    receiver: mpsc::UnboundedReceiver<Vec<FileChange>>,
}
impl ChannelWatchSource {
    pub fn channel() -> (mpsc::UnboundedSender<Vec<FileChange>>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (sender, Self { receiver })
    }
}
impl WatchSource for ChannelWatchSource {
    async fn next_batch(&mut self) -> Option<Vec<FileChange>> {
        self.receiver.recv().await
    }
}
