use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Insufficient data: window needs {required} daily records, got {available}")]
    InsufficientData { available: usize, required: usize },

    #[error("Invalid profile count: {requested} (must be > 0)")]
    InvalidProfileCount { requested: i64 },

    #[error("Degenerate feature vector at row {row}: non-finite value after standardization")]
    DegenerateVector { row: usize },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DatasetResult<T> = Result<T, DatasetError>;
