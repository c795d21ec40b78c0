//! Application constants for the sheet quality checker
//!
//! Fixed issue texts, export layout, file limits and defaults used
//! throughout the crate.

// =============================================================================
// Issue Texts
// =============================================================================

/// Description and suggested fix for each detector
pub mod issue_text {
    pub const EMPTY_DESCRIPTION: &str = "Empty cell detected";
    pub const EMPTY_FIX: &str = "Fill with appropriate value or mark as N/A";

    /// Prefix of the duplicate description; the value is appended in quotes
    pub const DUPLICATE_DESCRIPTION_PREFIX: &str = "Duplicate value: ";
    pub const DUPLICATE_FIX: &str = "Review if duplicate is intentional or needs correction";

    pub const INVALID_EMAIL_DESCRIPTION: &str = "Invalid email format";
    pub const INVALID_EMAIL_FIX: &str = "Correct email format (example@domain.com)";

    pub const NEGATIVE_AGE_DESCRIPTION: &str = "Negative age value";
    pub const NEGATIVE_AGE_FIX: &str = "Verify age value is correct";
}

// =============================================================================
// Detector Defaults
// =============================================================================

/// Column name keyword that enables the email format check
pub const DEFAULT_EMAIL_KEYWORD: &str = "email";

/// Column name keyword that enables the negative value check
pub const DEFAULT_AGE_KEYWORD: &str = "age";

/// Basic email shape: one `@`, no whitespace, a dot in the domain part
pub const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// Prefix for header cells that are blank (`Column 1`, `Column 2`, ...)
pub const PLACEHOLDER_COLUMN_PREFIX: &str = "Column ";

/// Offset from a data-row position to its 1-based row in the source file
/// (one for the header row, one for 1-based numbering)
pub const SOURCE_ROW_OFFSET: usize = 2;

// =============================================================================
// Export Layout
// =============================================================================

/// Header row of the issue export
pub const ISSUE_EXPORT_HEADER: [&str; 6] = [
    "Row",
    "Column",
    "Issue Type",
    "Severity",
    "Description",
    "Suggested Fix",
];

/// Filename prefix of the issue export (`data_quality_issues_<sheet>.csv`)
pub const ISSUE_EXPORT_PREFIX: &str = "data_quality_issues_";

/// Key prefix for blank headers in the JSON dataset export (`Column_1`, ...)
pub const JSON_PLACEHOLDER_PREFIX: &str = "Column_";

/// Fallback label when a dataset export has no sheet name
pub const DEFAULT_EXPORT_LABEL: &str = "data";

// =============================================================================
// File Loading
// =============================================================================

/// Maximum accepted input file size (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Extensions decoded through calamine
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Extensions decoded as delimited text
pub const CSV_EXTENSIONS: &[&str] = &["csv"];

// =============================================================================
// Paging
// =============================================================================

/// Default number of issues or rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Upper bound accepted for the page size
pub const MAX_PAGE_SIZE: usize = 1000;
