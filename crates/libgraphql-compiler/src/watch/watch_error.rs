use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Codegen run did not complete: {0}")]
    RunAborted(#[from] tokio::task::JoinError),
}
