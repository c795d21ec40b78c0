//! Configuration management and validation.
//!
//! Controls which quality rules run, the column keywords that switch on
//! the keyword-driven rules, the accepted input size and the page size
//! used when listing issues.

use crate::constants::{
    DEFAULT_AGE_KEYWORD, DEFAULT_EMAIL_KEYWORD, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_PAGE_SIZE,
    MAX_PAGE_SIZE,
};
use crate::error::{QualityError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings for loading and scanning spreadsheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Column name keyword (case-insensitive substring) enabling the email check
    pub email_keyword: String,

    /// Column name keyword (case-insensitive substring) enabling the negative value check
    pub age_keyword: String,

    /// Report empty cells
    pub check_empty: bool,

    /// Report repeated values within a column
    pub check_duplicates: bool,

    /// Report malformed email addresses
    pub check_email_format: bool,

    /// Report negative values in age columns
    pub check_negative_values: bool,

    /// Largest input file accepted, in bytes
    pub max_file_size_bytes: u64,

    /// Issues shown per page
    pub page_size: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            email_keyword: DEFAULT_EMAIL_KEYWORD.to_string(),
            age_keyword: DEFAULT_AGE_KEYWORD.to_string(),
            check_empty: true,
            check_duplicates: true,
            check_email_format: true,
            check_negative_values: true,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QualityConfig {
    /// Load configuration from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(QualityError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check the configuration for values the scanner cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.check_email_format && self.email_keyword.trim().is_empty() {
            return Err(QualityError::configuration(
                "email_keyword must not be empty when the email check is enabled",
            ));
        }

        if self.check_negative_values && self.age_keyword.trim().is_empty() {
            return Err(QualityError::configuration(
                "age_keyword must not be empty when the negative value check is enabled",
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(QualityError::configuration(
                "max_file_size_bytes must be greater than zero",
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(QualityError::configuration(format!(
                "page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.page_size
            )));
        }

        Ok(())
    }

    /// Set the email column keyword
    pub fn with_email_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.email_keyword = keyword.into();
        self
    }

    /// Set the age column keyword
    pub fn with_age_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.age_keyword = keyword.into();
        self
    }

    /// Disable the empty cell check
    pub fn without_empty_check(mut self) -> Self {
        self.check_empty = false;
        self
    }

    /// Disable the duplicate value check
    pub fn without_duplicate_check(mut self) -> Self {
        self.check_duplicates = false;
        self
    }

    /// Disable the email format check
    pub fn without_email_check(mut self) -> Self {
        self.check_email_format = false;
        self
    }

    /// Disable the negative value check
    pub fn without_negative_value_check(mut self) -> Self {
        self.check_negative_values = false;
        self
    }

    /// Set the maximum accepted file size
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size_bytes = bytes;
        self
    }

    /// Set the number of issues per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}
