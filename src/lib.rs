//! Sheet Quality Library
//!
//! A Rust library for finding data-quality problems in spreadsheet data:
//! empty cells, repeated values, malformed email addresses and negative
//! ages.
//!
//! This library provides tools for:
//! - Loading workbooks (xlsx, xls, ods) and CSV files into cell grids
//! - Scanning a grid cell by cell with a fixed, deterministic rule order
//! - Filtering, paginating and selecting the resulting issues
//! - Exporting issues and datasets as quoted CSV or JSON
//! - Tracking loaded files in an in-memory session

pub mod cli;
pub mod config;
pub mod constants;
pub mod detectors;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod samples;
pub mod scanner;
pub mod session;
pub mod view;
pub mod workbook;

// Re-export commonly used types
pub use config::QualityConfig;
pub use error::{QualityError, Result};
pub use models::{Cell, Dataset, Issue, IssueType, PageWindow, RowPage, ScanSummary, Severity};
pub use scanner::{QualityScanner, scan_dataset};
pub use session::Session;
pub use view::{IssueFilter, IssueView, SeverityFilter, TypeFilter};
pub use workbook::{Sheet, Workbook};
