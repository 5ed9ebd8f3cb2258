use thiserror::Error;

/// Errors produced by [`crate::store::Store`] operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid todo item json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("item with id {0} doesn't exist")]
    NotFound(i64),
    #[error("item with id {0} already exists")]
    Duplicate(i64),
}

pub type Result<T> = std::result::Result<T, StoreError>;
