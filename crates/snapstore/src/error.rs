// Error types for snapshot storage operations
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot not found: {0}")]
    NotFound(String),

    #[error("invalid snapshot name: '{0}'")]
    InvalidName(String),

    #[error("storage write failed for '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("storage read failed for '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("storage listing failed: {0}")]
    List(#[source] io::Error),

    #[error("storage configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn write(name: impl Into<String>, source: io::Error) -> Self {
        StoreError::Write {
            name: name.into(),
            source,
        }
    }

    pub fn read(name: impl Into<String>, source: io::Error) -> Self {
        StoreError::Read {
            name: name.into(),
            source,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        StoreError::NotFound(name.into())
    }
}
