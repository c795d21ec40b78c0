//! Filterable, selectable view over the issues of one scan.
//!
//! The view keeps the full issue list, the current severity and type
//! filters, and a selection of positions in the filtered list. Selection is
//! positional: changing the filter keeps the selected positions as they are,
//! so they may then refer to different issues or fall past the end of the
//! new list. Positions past the end are ignored when reading the selection.

use crate::error::Result;
use crate::export::{ExportFile, export_issues};
use crate::models::{Issue, IssueType, PageWindow, ScanSummary, Severity};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Severity facet of the issue filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    Low,
    Medium,
    High,
}

impl SeverityFilter {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Low => severity == Severity::Low,
            SeverityFilter::Medium => severity == Severity::Medium,
            SeverityFilter::High => severity == Severity::High,
        }
    }
}

impl From<Severity> for SeverityFilter {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Low => SeverityFilter::Low,
            Severity::Medium => SeverityFilter::Medium,
            Severity::High => SeverityFilter::High,
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::All => f.write_str("all"),
            SeverityFilter::Low => f.write_str("low"),
            SeverityFilter::Medium => f.write_str("medium"),
            SeverityFilter::High => f.write_str("high"),
        }
    }
}

/// Issue type facet of the issue filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Empty,
    #[value(name = "invalid_format", alias = "invalid-format")]
    InvalidFormat,
    Outlier,
    Duplicate,
}

impl TypeFilter {
    pub fn matches(&self, issue_type: IssueType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Empty => issue_type == IssueType::Empty,
            TypeFilter::InvalidFormat => issue_type == IssueType::InvalidFormat,
            TypeFilter::Outlier => issue_type == IssueType::Outlier,
            TypeFilter::Duplicate => issue_type == IssueType::Duplicate,
        }
    }
}

impl From<IssueType> for TypeFilter {
    fn from(issue_type: IssueType) -> Self {
        match issue_type {
            IssueType::Empty => TypeFilter::Empty,
            IssueType::InvalidFormat => TypeFilter::InvalidFormat,
            IssueType::Outlier => TypeFilter::Outlier,
            IssueType::Duplicate => TypeFilter::Duplicate,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Empty => f.write_str("empty"),
            TypeFilter::InvalidFormat => f.write_str("invalid_format"),
            TypeFilter::Outlier => f.write_str("outlier"),
            TypeFilter::Duplicate => f.write_str("duplicate"),
        }
    }
}

/// Both filter facets; an issue must match each of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueFilter {
    pub severity: SeverityFilter,
    pub issue_type: TypeFilter,
}

impl IssueFilter {
    pub fn new(severity: SeverityFilter, issue_type: TypeFilter) -> Self {
        Self {
            severity,
            issue_type,
        }
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        self.severity.matches(issue.severity) && self.issue_type.matches(issue.issue_type)
    }
}

/// One page of the filtered issue list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuePage<'a> {
    #[serde(skip)]
    pub requested_page: usize,
    /// 1-based page number actually returned
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Position of the first item within the filtered list
    pub start_index: usize,
    pub items: Vec<&'a Issue>,
}

impl<'a> IssuePage<'a> {
    /// True when the requested page did not exist and page 1 was used instead
    pub fn is_fallback(&self) -> bool {
        self.requested_page != self.page
    }
}

/// Issue list with filter and selection state for one displayed scan
#[derive(Debug, Clone, Default)]
pub struct IssueView {
    issues: Vec<Issue>,
    filter: IssueFilter,
    /// Indices into `issues` that pass the filter, in scan order
    filtered: Vec<usize>,
    /// Positions in `filtered`
    selection: BTreeSet<usize>,
}

impl IssueView {
    pub fn new(issues: Vec<Issue>) -> Self {
        let filtered = (0..issues.len()).collect();
        Self {
            issues,
            filter: IssueFilter::default(),
            filtered,
            selection: BTreeSet::new(),
        }
    }

    /// Every issue from the scan, unfiltered
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn filter(&self) -> IssueFilter {
        self.filter
    }

    /// Replace both filter facets and recompute the filtered list
    ///
    /// The selection is left untouched.
    pub fn set_filter(&mut self, severity: SeverityFilter, issue_type: TypeFilter) {
        self.filter = IssueFilter::new(severity, issue_type);
        self.filtered = self
            .issues
            .iter()
            .enumerate()
            .filter(|(_, issue)| self.filter.matches(issue))
            .map(|(index, _)| index)
            .collect();

        debug!(
            "Filter severity={} type={}: {} of {} issues",
            severity,
            issue_type,
            self.filtered.len(),
            self.issues.len()
        );
    }

    /// Issues passing the current filter, in scan order
    pub fn filtered_issues(&self) -> Vec<&Issue> {
        self.filtered.iter().map(|&index| &self.issues[index]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// Issue at a position in the filtered list
    pub fn filtered_issue(&self, filtered_index: usize) -> Option<&Issue> {
        self.filtered
            .get(filtered_index)
            .map(|&index| &self.issues[index])
    }

    /// Add or remove a filtered position from the selection
    ///
    /// Positions outside the filtered list are ignored.
    pub fn toggle_select(&mut self, filtered_index: usize) {
        if filtered_index >= self.filtered.len() {
            return;
        }
        if !self.selection.remove(&filtered_index) {
            self.selection.insert(filtered_index);
        }
    }

    /// Select every filtered position, or clear the selection when its size
    /// already equals the filtered list's size
    pub fn select_all(&mut self) {
        if self.selection.len() == self.filtered.len() {
            self.selection.clear();
        } else {
            self.selection = (0..self.filtered.len()).collect();
        }
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, filtered_index: usize) -> bool {
        self.selection.contains(&filtered_index)
    }

    /// Number of selected positions, including any left stale by a filter change
    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Selected positions in ascending order
    pub fn selected_positions(&self) -> Vec<usize> {
        self.selection.iter().copied().collect()
    }

    /// Issues at the selected positions of the current filtered list, in
    /// filtered-list order
    pub fn selected_issues(&self) -> Vec<&Issue> {
        self.selection
            .iter()
            .filter_map(|&position| self.filtered_issue(position))
            .collect()
    }

    /// Export the selected issues for a sheet
    pub fn export_selected(&self, sheet_label: &str) -> Result<ExportFile> {
        let selected = self.selected_issues();
        debug!(
            "Exporting {} selected issues for sheet {}",
            selected.len(),
            sheet_label
        );
        export_issues(selected, sheet_label)
    }

    /// A page of the filtered list
    ///
    /// Page numbers are 1-based; zero and numbers past the end fall back to
    /// the first page, and a zero page size is treated as one.
    pub fn page(&self, page: usize, page_size: usize) -> IssuePage<'_> {
        let window = PageWindow::new(page, page_size, self.filtered.len());

        IssuePage {
            requested_page: window.requested_page,
            page: window.page,
            page_size: window.page_size,
            total_pages: window.total_pages,
            total_items: window.total_items,
            start_index: window.start_index,
            items: self.filtered[window.range()]
                .iter()
                .map(|&index| &self.issues[index])
                .collect(),
        }
    }

    /// Counts over the filtered list
    pub fn summary(&self) -> ScanSummary {
        ScanSummary::from_issues(self.filtered_issues())
    }
}

impl From<Vec<Issue>> for IssueView {
    fn from(issues: Vec<Issue>) -> Self {
        Self::new(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(row_index: usize, issue_type: IssueType, severity: Severity) -> Issue {
        Issue {
            row_index,
            column_index: 0,
            column_name: "Col".to_string(),
            issue_type,
            severity,
            description: format!("{} at {}", issue_type, row_index),
            suggested_fix: "Fix".to_string(),
        }
    }

    fn mixed_view() -> IssueView {
        IssueView::new(vec![
            issue(2, IssueType::Empty, Severity::Medium),
            issue(3, IssueType::InvalidFormat, Severity::High),
            issue(4, IssueType::Duplicate, Severity::Low),
            issue(5, IssueType::Outlier, Severity::High),
            issue(6, IssueType::Duplicate, Severity::Low),
        ])
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let view = mixed_view();
        assert_eq!(view.filtered_len(), 5);
        assert_eq!(view.filter(), IssueFilter::default());
    }

    #[test]
    fn test_severity_filter_only() {
        let mut view = mixed_view();
        view.set_filter(SeverityFilter::High, TypeFilter::All);

        let filtered = view.filtered_issues();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|issue| issue.severity == Severity::High));
        assert_eq!(filtered[0].issue_type, IssueType::InvalidFormat);
        assert_eq!(filtered[1].issue_type, IssueType::Outlier);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let mut view = mixed_view();
        view.set_filter(SeverityFilter::High, TypeFilter::Outlier);
        assert_eq!(view.filtered_len(), 1);

        view.set_filter(SeverityFilter::Low, TypeFilter::Outlier);
        assert_eq!(view.filtered_len(), 0);

        view.set_filter(SeverityFilter::All, TypeFilter::Duplicate);
        let rows: Vec<usize> = view.filtered_issues().iter().map(|i| i.row_index).collect();
        assert_eq!(rows, vec![4, 6]);
    }

    #[test]
    fn test_toggle_select_ignores_out_of_range() {
        let mut view = mixed_view();
        view.toggle_select(1);
        view.toggle_select(99);
        assert_eq!(view.selected_positions(), vec![1]);

        view.toggle_select(1);
        assert_eq!(view.selection_len(), 0);
    }

    #[test]
    fn test_select_all_toggles() {
        let mut view = mixed_view();
        view.toggle_select(0);
        view.deselect_all();
        assert_eq!(view.selection_len(), 0);

        view.select_all();
        assert_eq!(view.selection_len(), 5);
        view.select_all();
        assert_eq!(view.selection_len(), 0);
    }

    #[test]
    fn test_select_all_from_partial_selection_selects_everything() {
        let mut view = mixed_view();
        view.toggle_select(2);
        view.select_all();
        assert_eq!(view.selected_positions(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_selection_is_positional_across_filter_changes() {
        let mut view = mixed_view();
        view.toggle_select(0);
        view.toggle_select(4);

        view.set_filter(SeverityFilter::High, TypeFilter::All);

        // Position 0 now refers to the first high issue; position 4 is stale
        assert_eq!(view.selection_len(), 2);
        let selected = view.selected_issues();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].row_index, 3);
    }

    #[test]
    fn test_export_selected_in_filtered_order() {
        let mut view = mixed_view();
        view.set_filter(SeverityFilter::All, TypeFilter::Duplicate);
        view.toggle_select(1);
        view.toggle_select(0);

        let export = view.export_selected("Sheet1").unwrap();
        assert_eq!(export.filename, "data_quality_issues_Sheet1.csv");

        let lines: Vec<&str> = export.content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("\"4\""));
        assert!(lines[2].starts_with("\"6\""));
    }

    #[test]
    fn test_paging_applies_after_filtering() {
        let mut view = mixed_view();
        view.set_filter(SeverityFilter::All, TypeFilter::All);

        let page = view.page(2, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.start_index, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].row_index, 4);

        let last = view.page(3, 2);
        assert_eq!(last.items.len(), 1);

        view.set_filter(SeverityFilter::High, TypeFilter::All);
        let page = view.page(1, 10);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.total_items, 2);
    }

    #[test]
    fn test_paging_out_of_range_falls_back_to_first_page() {
        let view = mixed_view();
        assert_eq!(view.page(0, 2).page, 1);
        assert_eq!(view.page(9, 2).page, 1);
        assert!(view.page(9, 2).is_fallback());
        assert!(!view.page(3, 2).is_fallback());
        assert_eq!(view.page(1, 0).page_size, 1);

        let empty = IssueView::new(Vec::new());
        let page = empty.page(1, 10);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_summary_follows_filter() {
        let mut view = mixed_view();
        view.set_filter(SeverityFilter::Low, TypeFilter::All);
        let summary = view.summary();
        assert_eq!(summary.total_issues, 2);
        assert_eq!(summary.duplicate, 2);
    }

    #[test]
    fn test_filter_value_names() {
        assert_eq!(
            TypeFilter::from_str("invalid_format", true).unwrap(),
            TypeFilter::InvalidFormat
        );
        assert_eq!(
            TypeFilter::from_str("invalid-format", true).unwrap(),
            TypeFilter::InvalidFormat
        );
        assert_eq!(
            SeverityFilter::from_str("HIGH", true).unwrap(),
            SeverityFilter::High
        );
        assert_eq!(SeverityFilter::from(Severity::Low), SeverityFilter::Low);
        assert_eq!(TypeFilter::from(IssueType::Outlier).to_string(), "outlier");
    }
}
