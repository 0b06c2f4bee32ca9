use std::path::PathBuf;
use thiserror::Error;

/// The main error type for kortext operations.
#[derive(Debug, Error)]
pub enum KortextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse annotation document {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write ground truth to {path}: {message}")]
    GroundTruthWrite { path: PathBuf, message: String },

    #[error("Failed to traverse {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    #[error("Conversion failed for {failed} of {total} document(s)")]
    ConversionFailed { failed: usize, total: usize },

    #[error("Failed to write manifest for {path}: {message}")]
    ManifestFailed { path: PathBuf, message: String },

    #[error("Invalid split parameters: {message}")]
    InvalidSplitParams { message: String },

    #[error("Dataset split failed: {message}")]
    SplitFailed { message: String },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[source] serde_json::Error),
}
