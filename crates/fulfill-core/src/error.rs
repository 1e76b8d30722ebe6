use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FulfillError {
    #[error("output sink unavailable at {path}: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output sink write failed: {0}")]
    SinkWrite(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("coordinator is shut down")]
    Closed,
}

pub type Result<T> = std::result::Result<T, FulfillError>;
