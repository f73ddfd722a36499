use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by loading, discovery, and export.
///
/// Only structural failures are errors. Cells that cannot be coerced to a number or a date never
/// produce an error; they become [`crate::types::Value::Null`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Excel ingestion error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read or write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The raw-input directory does not exist.
    #[error("raw directory not found: {}", path.display())]
    DirectoryMissing { path: PathBuf },

    /// The raw-input directory exists but holds no file with a supported extension.
    #[error("no file with extensions {extensions:?} found in {}", dir.display())]
    NoCompatibleFile {
        dir: PathBuf,
        extensions: Vec<String>,
    },

    /// The selected file's extension is not one of the supported formats.
    #[error("unsupported format '{extension}' for path ({})", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The input cannot be read as a table (no header row, empty workbook, invalid rules, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}
