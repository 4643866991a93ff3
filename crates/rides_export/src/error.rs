use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Watermark file could not be read, parsed or written.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to access state file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {key} in {path}: {value:?}, expected YYYY-MM-DD")]
    MalformedDate {
        path: PathBuf,
        key: &'static str,
        value: String,
    },
}
