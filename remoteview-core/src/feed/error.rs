use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to bind feed on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read feed address: {0}")]
    LocalAddr(#[source] std::io::Error),
}
