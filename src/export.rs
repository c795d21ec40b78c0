//! Delimited-text and JSON exports.
//!
//! Issue exports and dataset CSV exports wrap every field in double quotes
//! and double any embedded quote. Fields are joined by commas and records by
//! `\n`, with no newline after the last record.

use crate::constants::{
    DEFAULT_EXPORT_LABEL, ISSUE_EXPORT_HEADER, ISSUE_EXPORT_PREFIX, JSON_PLACEHOLDER_PREFIX,
};
use crate::error::{QualityError, Result};
use crate::models::{Cell, Dataset, Issue};
use crate::normalize::canonical_string;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Text produced by an export together with its suggested filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content: String,
}

impl ExportFile {
    /// Write the content into `dir` under the suggested filename
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.content.as_bytes())?;
        debug!("Wrote {} bytes to {}", self.content.len(), path.display());
        Ok(path)
    }
}

/// Filename for an issue export of the given sheet
pub fn issue_export_filename(sheet_label: &str) -> String {
    format!("{}{}.csv", ISSUE_EXPORT_PREFIX, sheet_label)
}

/// Export issues as quoted CSV with the fixed header row
pub fn export_issues<'a>(
    issues: impl IntoIterator<Item = &'a Issue>,
    sheet_label: &str,
) -> Result<ExportFile> {
    let mut records: Vec<Vec<String>> =
        vec![ISSUE_EXPORT_HEADER.iter().map(|s| s.to_string()).collect()];
    records.extend(issues.into_iter().map(|issue| {
        vec![
            issue.row_index.to_string(),
            issue.column_name.clone(),
            issue.issue_type.to_string(),
            issue.severity.to_string(),
            issue.description.clone(),
            issue.suggested_fix.clone(),
        ]
    }));

    Ok(ExportFile {
        filename: issue_export_filename(sheet_label),
        content: quoted_csv(&records)?,
    })
}

/// Export a whole dataset, header included, as quoted CSV
///
/// Cells are written in their canonical string form.
pub fn export_dataset_csv(dataset: &Dataset, sheet_name: Option<&str>) -> Result<ExportFile> {
    let records: Vec<Vec<String>> = dataset
        .rows()
        .iter()
        .map(|row| row.iter().map(canonical_string).collect())
        .collect();

    Ok(ExportFile {
        filename: format!("{}.csv", export_label(sheet_name)),
        content: quoted_csv(&records)?,
    })
}

/// Export data rows as a JSON array of objects keyed by header text
///
/// Blank headers become `Column_{n}`; missing cells become `""`. When two
/// headers share a name the rightmost column wins.
pub fn export_dataset_json(dataset: &Dataset, sheet_name: Option<&str>) -> Result<ExportFile> {
    let keys: Vec<String> = dataset
        .header()
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let name = canonical_string(cell);
            if name.is_empty() {
                format!("{}{}", JSON_PLACEHOLDER_PREFIX, index + 1)
            } else {
                name
            }
        })
        .collect();

    let objects: Vec<Value> = dataset
        .data_rows()
        .iter()
        .map(|row| {
            let mut object = Map::new();
            for (index, key) in keys.iter().enumerate() {
                object.insert(key.clone(), cell_to_json(row.get(index)));
            }
            Value::Object(object)
        })
        .collect();

    Ok(ExportFile {
        filename: format!("{}.json", export_label(sheet_name)),
        content: serde_json::to_string_pretty(&objects)?,
    })
}

fn export_label(sheet_name: Option<&str>) -> &str {
    sheet_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_EXPORT_LABEL)
}

fn cell_to_json(cell: Option<&Cell>) -> Value {
    match cell {
        None | Some(Cell::Empty) => Value::String(String::new()),
        Some(Cell::Text(text)) => Value::String(text.clone()),
        Some(Cell::Bool(value)) => Value::Bool(*value),
        Some(Cell::Number(value)) => serde_json::Number::from_f64(*value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string())),
    }
}

/// Serialize records with every field quoted
fn quoted_csv(records: &[Vec<String>]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for record in records {
        writer.write_record(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| QualityError::Io(e.into_error()))?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| QualityError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IssueType, Severity};

    fn issue(row_index: usize, column_name: &str, description: &str) -> Issue {
        Issue {
            row_index,
            column_index: 0,
            column_name: column_name.to_string(),
            issue_type: IssueType::Duplicate,
            severity: Severity::Low,
            description: description.to_string(),
            suggested_fix: "Review".to_string(),
        }
    }

    #[test]
    fn test_issue_export_layout() {
        let issues = [issue(3, "Name", "Duplicate value: \"A\"")];
        let export = export_issues(&issues, "Sheet1").unwrap();

        assert_eq!(export.filename, "data_quality_issues_Sheet1.csv");
        assert_eq!(
            export.content,
            "\"Row\",\"Column\",\"Issue Type\",\"Severity\",\"Description\",\"Suggested Fix\"\n\
             \"3\",\"Name\",\"duplicate\",\"low\",\"Duplicate value: \"\"A\"\"\",\"Review\""
        );
    }

    #[test]
    fn test_issue_export_with_no_issues_has_header_only() {
        let export = export_issues(std::iter::empty(), "Empty").unwrap();
        assert_eq!(export.content.lines().count(), 1);
        assert!(!export.content.ends_with('\n'));
    }

    #[test]
    fn test_dataset_csv_export() {
        let dataset = Dataset::new(vec![
            vec![Cell::from("Name"), Cell::from("Score")],
            vec![Cell::from("Say \"hi\""), Cell::Number(2.5)],
            vec![Cell::Empty, Cell::Bool(true)],
        ]);
        let export = export_dataset_csv(&dataset, Some("Results")).unwrap();

        assert_eq!(export.filename, "Results.csv");
        assert_eq!(
            export.content,
            "\"Name\",\"Score\"\n\"Say \"\"hi\"\"\",\"2.5\"\n\"\",\"true\""
        );
    }

    #[test]
    fn test_dataset_json_export() {
        let dataset = Dataset::new(vec![
            vec![Cell::from("Name"), Cell::Empty, Cell::from("Active")],
            vec![Cell::from("Ann"), Cell::Number(3.0), Cell::Bool(true)],
            vec![Cell::from("Bob")],
        ]);
        let export = export_dataset_json(&dataset, None).unwrap();
        assert_eq!(export.filename, "data.json");

        let parsed: Value = serde_json::from_str(&export.content).unwrap();
        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "Ann");
        assert_eq!(rows[0]["Column_2"], 3.0);
        assert_eq!(rows[0]["Active"], true);
        assert_eq!(rows[1]["Column_2"], "");

        // Key order follows the header
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Name", "Column_2", "Active"]);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let export = export_issues(std::iter::empty(), "S").unwrap();
        let path = export.write_to_dir(&dir.path().join("out")).unwrap();

        assert_eq!(path.file_name().unwrap(), "data_quality_issues_S.csv");
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.content);
    }
}
