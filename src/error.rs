//! Error handling for spreadsheet loading and export operations.
//!
//! The quality scan itself never fails; these errors only surface at the
//! edges: opening files, decoding workbooks, reading configuration and
//! writing exports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QualityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported file format: {path} (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)")]
    UnsupportedFormat { path: PathBuf },

    #[error("File too large: {path} is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Failed to read workbook: {path} - {reason}")]
    Workbook { path: PathBuf, reason: String },

    #[error("Workbook contains no sheets: {path}")]
    EmptyWorkbook { path: PathBuf },

    #[error("Sheet not found: {name} (available: {available})")]
    SheetNotFound { name: String, available: String },

    #[error("File not registered in session: id = {id}")]
    FileNotRegistered { id: u32 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl QualityError {
    /// Create a workbook decoding error with context
    pub fn workbook(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Workbook {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QualityError>;
