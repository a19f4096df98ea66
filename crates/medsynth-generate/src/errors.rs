use thiserror::Error;

/// Errors emitted while generating or encoding datasets.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("core error: {0}")]
    Core(#[from] medsynth_core::Error),
    #[error("cannot reference patients: patient set is empty")]
    NoPatients,
    #[error("unique identifier source exhausted after {attempts} attempts")]
    IdentifierExhausted { attempts: u32 },
    #[error("{collection} cannot be encoded as {format}")]
    UnsupportedFormat {
        collection: &'static str,
        format: &'static str,
    },
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("invalid value in column '{column}': {message}")]
    InvalidColumn { column: &'static str, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
