//! Single-pass quality scan over a dataset.
//!
//! Walks the data rows in order and each row's columns in order, keeps one
//! [`ColumnState`] per column for the lifetime of the scan, and collects the
//! issues raised by the detector registry. The scan is synchronous, shares
//! nothing between calls and always produces the same output for the same
//! dataset.

use crate::config::QualityConfig;
use crate::constants::SOURCE_ROW_OFFSET;
use crate::detectors::{CellContext, ColumnState, DetectorRegistry, Rule, evaluate_cell};
use crate::models::{Dataset, Issue, ScanSummary};
use crate::normalize::normalize;
use serde::Serialize;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// Issues found by a scan together with their counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub issues: Vec<Issue>,
    pub summary: ScanSummary,
}

/// Column-scoped data kept for one scan
struct ColumnScan {
    name: String,
    rules: Vec<Rule>,
    state: ColumnState,
}

/// Runs the detector registry over datasets
#[derive(Debug, Clone, Default)]
pub struct QualityScanner {
    registry: DetectorRegistry,
}

impl QualityScanner {
    /// Scanner with the standard rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner using the checks enabled in a configuration
    pub fn from_config(config: &QualityConfig) -> Self {
        Self::with_registry(DetectorRegistry::from_config(config))
    }

    /// Scanner with a custom registry
    pub fn with_registry(registry: DetectorRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &DetectorRegistry {
        &self.registry
    }

    /// Scan a dataset and return its issues in row, column, rule order
    ///
    /// A missing or empty dataset yields no issues.
    pub fn scan(&self, dataset: Option<&Dataset>) -> Vec<Issue> {
        self.scan_report(dataset).issues
    }

    /// Scan a dataset and also count rows, cells and issues
    pub fn scan_report(&self, dataset: Option<&Dataset>) -> ScanReport {
        let Some(dataset) = dataset.filter(|dataset| !dataset.is_empty()) else {
            debug!("No dataset to scan");
            return ScanReport::default();
        };

        let start_time = Instant::now();
        let header_width = dataset.header().len();
        let mut columns: HashMap<usize, ColumnScan> = HashMap::new();
        let mut issues = Vec::new();
        let mut cells_scanned = 0usize;

        for (data_index, row) in dataset.data_rows().iter().enumerate() {
            let row_index = data_index + SOURCE_ROW_OFFSET;

            for column_index in 0..row.len().max(header_width) {
                let column = columns.entry(column_index).or_insert_with(|| {
                    let name = dataset.column_name(column_index);
                    ColumnScan {
                        rules: self.registry.rules_for_column(&name),
                        name,
                        state: ColumnState::default(),
                    }
                });

                let value = normalize(row.get(column_index));
                let cell = CellContext {
                    row_index,
                    column_index,
                    column_name: &column.name,
                    value: &value,
                };
                evaluate_cell(&column.rules, &cell, &mut column.state, &mut issues);
                cells_scanned += 1;
            }
        }

        let mut summary = ScanSummary::from_issues(&issues);
        summary.rows_scanned = dataset.row_count();
        summary.cells_scanned = cells_scanned;

        debug!(
            "Scanned {} rows ({} cells, {} columns) in {}ms: {} issues",
            summary.rows_scanned,
            cells_scanned,
            columns.len(),
            start_time.elapsed().as_millis(),
            summary.total_issues
        );

        ScanReport { issues, summary }
    }
}

/// Scan a dataset with the standard rule set
pub fn scan_dataset(dataset: &Dataset) -> Vec<Issue> {
    QualityScanner::new().scan(Some(dataset))
}

#[cfg(test)]
mod tests;
