use std::io;
use thiserror::Error;

/// Failures of the on-disk key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures of a task store mutation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task store mutated before a change listener was registered")]
    NoListener,
    #[error("no task id left above {0}")]
    IdsExhausted(u64),
    #[error("failed to persist tasks: {0}")]
    Storage(#[from] StorageError),
}

/// Top-level application error returned from `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(String),
}
