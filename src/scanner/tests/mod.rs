//! Scanner test suite
//!
//! Covers rule detection on small hand-built datasets and the ordering and
//! determinism guarantees of a full scan.


use crate::models::{Cell, Dataset, Issue, IssueType};

/// Build a dataset from string cells; `""` becomes an empty text cell
pub(crate) fn text_dataset(header: &[&str], rows: &[&[&str]]) -> Dataset {
    Dataset::from_rows(
        header.iter().copied(),
        rows.iter().map(|row| row.iter().copied()),
    )
}

/// Single-column dataset
pub(crate) fn column_dataset(name: &str, values: &[&str]) -> Dataset {
    Dataset::from_rows(
        [Cell::from(name)],
        values.iter().map(|value| [Cell::from(*value)]),
    )
}

pub(crate) fn types_of(issues: &[Issue]) -> Vec<IssueType> {
    issues.iter().map(|issue| issue.issue_type).collect()
}
