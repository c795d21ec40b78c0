//! Core data structures for quality scanning.
//!
//! Defines the cell and dataset grid consumed by the scanner, the issue
//! records it produces, and the summary counts reported alongside them.

use crate::constants::{PLACEHOLDER_COLUMN_PREFIX, SOURCE_ROW_OFFSET};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// One spreadsheet cell as delivered by the file decoder
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// Header row plus data rows, aligned by column index
///
/// Rows may be ragged; a cell beyond the end of its row is treated as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    /// Create a dataset from raw rows, row 0 being the header
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// Build a dataset from a header and data rows of anything convertible to cells
    pub fn from_rows<H, R, C>(header: H, data: impl IntoIterator<Item = R>) -> Self
    where
        H: IntoIterator<Item = C>,
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut rows = vec![header.into_iter().map(Into::into).collect::<Vec<_>>()];
        rows.extend(
            data.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect()),
        );
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows including the header
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// The header row, empty when the dataset has no rows
    pub fn header(&self) -> &[Cell] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Data rows, excluding the header
    pub fn data_rows(&self) -> &[Vec<Cell>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.data_rows().len()
    }

    /// Widest row in the grid, header included
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Header text for a column, or `Column {n}` when the header cell is blank
    pub fn column_name(&self, column_index: usize) -> String {
        let header = self
            .header()
            .get(column_index)
            .map(crate::normalize::canonical_string)
            .unwrap_or_default();

        if header.is_empty() {
            format!("{}{}", PLACEHOLDER_COLUMN_PREFIX, column_index + 1)
        } else {
            header
        }
    }

    /// One page of data rows with the column names to show above them
    pub fn page(&self, page: usize, page_size: usize) -> RowPage<'_> {
        let window = PageWindow::new(page, page_size, self.row_count());

        RowPage {
            requested_page: window.requested_page,
            page: window.page,
            page_size: window.page_size,
            total_pages: window.total_pages,
            total_rows: window.total_items,
            start_index: window.start_index,
            columns: (0..self.column_count())
                .map(|index| self.column_name(index))
                .collect(),
            rows: &self.data_rows()[window.range()],
        }
    }
}

/// Position of one page within a list
///
/// Page numbers are 1-based. Zero and numbers past the last page fall back
/// to the first page, and a zero page size is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub requested_page: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageWindow {
    pub fn new(requested_page: usize, page_size: usize, total_items: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_items.div_ceil(page_size);
        let page = if requested_page == 0 || requested_page > total_pages {
            1
        } else {
            requested_page
        };
        let start_index = ((page - 1) * page_size).min(total_items);
        let end_index = (start_index + page_size).min(total_items);

        Self {
            requested_page,
            page,
            page_size,
            total_pages,
            total_items,
            start_index,
            end_index,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    /// True when the requested page did not exist and page 1 was used instead
    pub fn is_fallback(&self) -> bool {
        self.requested_page != self.page
    }
}

/// One page of a dataset's data rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPage<'a> {
    #[serde(skip)]
    pub requested_page: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    /// Position of the first row among the data rows
    pub start_index: usize,
    pub columns: Vec<String>,
    pub rows: &'a [Vec<Cell>],
}

impl<'a> RowPage<'a> {
    pub fn is_fallback(&self) -> bool {
        self.requested_page != self.page
    }

    /// Source-file row number of the first row on the page
    pub fn first_row_number(&self) -> usize {
        self.start_index + SOURCE_ROW_OFFSET
    }
}

/// Kind of quality finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Empty,
    InvalidFormat,
    Outlier,
    Duplicate,
}

impl IssueType {
    pub const ALL: [IssueType; 4] = [
        IssueType::Empty,
        IssueType::InvalidFormat,
        IssueType::Outlier,
        IssueType::Duplicate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Empty => "empty",
            IssueType::InvalidFormat => "invalid_format",
            IssueType::Outlier => "outlier",
            IssueType::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity assigned by the detector that raised an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One quality finding at a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// 1-based row in the source file (header is row 1)
    pub row_index: usize,
    /// 0-based column position
    pub column_index: usize,
    pub column_name: String,
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub suggested_fix: String,
}

/// Issue counts reported with a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_issues: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub empty: usize,
    pub invalid_format: usize,
    pub outlier: usize,
    pub duplicate: usize,
    pub rows_scanned: usize,
    pub cells_scanned: usize,
}

impl ScanSummary {
    /// Count issues by severity and type; row and cell totals stay zero
    pub fn from_issues<'a>(issues: impl IntoIterator<Item = &'a Issue>) -> Self {
        let mut summary = Self::default();
        for issue in issues {
            summary.record(issue);
        }
        summary
    }

    pub fn record(&mut self, issue: &Issue) {
        self.total_issues += 1;
        match issue.severity {
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
        match issue.issue_type {
            IssueType::Empty => self.empty += 1,
            IssueType::InvalidFormat => self.invalid_format += 1,
            IssueType::Outlier => self.outlier += 1,
            IssueType::Duplicate => self.duplicate += 1,
        }
    }

    pub fn count_for_severity(&self, severity: Severity) -> usize {
        match severity {
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn count_for_type(&self, issue_type: IssueType) -> usize {
        match issue_type {
            IssueType::Empty => self.empty,
            IssueType::InvalidFormat => self.invalid_format,
            IssueType::Outlier => self.outlier,
            IssueType::Duplicate => self.duplicate,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.total_issues == 0
    }
}
