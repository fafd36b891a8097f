use crate::domain::models::RowCollection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid planner config: {0}")]
    InvalidConfig(String),
    /// `index` is zero-based; the message numbers rows from 1 like row problems do.
    #[error("{} {} does not exist ({len} rows)", .collection.label(), .index + 1)]
    RowIndexOutOfRange {
        collection: RowCollection,
        index: usize,
        len: usize,
    },
    #[error("Logging setup failed: {0}")]
    Logging(String),
}
