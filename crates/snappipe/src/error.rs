// Error types for the export-and-query pipeline
use snapstore::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("encoding failed: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("encoding failed: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("record source error: {0}")]
    Source(String),

    #[error("query execution failed: {0}")]
    QueryExecution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        PipelineError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        PipelineError::NotFound(message.into())
    }

    /// True when the failure should surface as a not-found condition rather
    /// than a server-side fault.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PipelineError::NotFound(_) | PipelineError::Store(StoreError::NotFound(_))
        )
    }
}
