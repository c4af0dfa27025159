use std::path::PathBuf;

use crate::store::TaxpayerId;

#[derive(Debug, thiserror::Error)]
pub enum SinsoError {
    #[error("document extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to load bracket table from {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("invalid bracket table: {0}")]
    TableInvalid(String),

    #[error("taxpayer {0} not found")]
    TaxpayerNotFound(TaxpayerId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
