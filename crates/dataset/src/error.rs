use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("An error occurred during JSON deserialization: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Row {0} has no '{1}' field")]
    MissingIndicatorName(usize, &'static str),

    #[error("Row {0} is not a JSON object")]
    InvalidRow(usize),
}
