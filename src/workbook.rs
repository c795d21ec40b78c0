//! Spreadsheet loading.
//!
//! Decodes workbook formats through calamine and delimited text through the
//! csv crate, turning every sheet into a [`Dataset`] grid. Size and
//! extension checks happen before any decoding.

use crate::config::QualityConfig;
use crate::constants::{CSV_EXTENSIONS, WORKBOOK_EXTENSIONS};
use crate::error::{QualityError, Result};
use crate::models::{Cell, Dataset};
use calamine::{Data, Reader, open_workbook_auto};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One named sheet of a workbook
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub dataset: Dataset,
}

impl Sheet {
    pub fn new(name: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            name: name.into(),
            dataset,
        }
    }

    /// Data rows, excluding the header
    pub fn row_count(&self) -> usize {
        self.dataset.row_count()
    }

    pub fn column_count(&self) -> usize {
        self.dataset.column_count()
    }
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Workbook,
    Csv,
}

impl FileFormat {
    /// Detect the format from the file extension, ignoring case
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();

        if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Some(FileFormat::Workbook)
        } else if CSV_EXTENSIONS.contains(&extension.as_str()) {
            Some(FileFormat::Csv)
        } else {
            None
        }
    }
}

/// All sheets decoded from one file
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub source: PathBuf,
    pub size_bytes: u64,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Build a workbook from sheets already in memory
    pub fn from_sheets(source: impl Into<PathBuf>, sheets: Vec<Sheet>) -> Self {
        Self {
            source: source.into(),
            size_bytes: 0,
            sheets,
        }
    }

    /// Open and decode a spreadsheet file
    pub fn open(path: &Path, config: &QualityConfig) -> Result<Self> {
        if !path.exists() {
            return Err(QualityError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let format = FileFormat::from_path(path).ok_or_else(|| QualityError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;

        let size_bytes = std::fs::metadata(path)?.len();
        if size_bytes > config.max_file_size_bytes {
            return Err(QualityError::FileTooLarge {
                path: path.to_path_buf(),
                size: size_bytes,
                limit: config.max_file_size_bytes,
            });
        }

        let sheets = match format {
            FileFormat::Workbook => read_workbook_sheets(path)?,
            FileFormat::Csv => vec![read_csv_sheet(path)?],
        };

        if sheets.is_empty() {
            return Err(QualityError::EmptyWorkbook {
                path: path.to_path_buf(),
            });
        }

        debug!(
            "Loaded {} sheets from {} ({} bytes)",
            sheets.len(),
            path.display(),
            size_bytes
        );

        Ok(Self {
            source: path.to_path_buf(),
            size_bytes,
            sheets,
        })
    }

    /// File name of the source, without directories
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    /// Look up a sheet by exact name
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .iter()
            .find(|sheet| sheet.name == name)
            .ok_or_else(|| QualityError::SheetNotFound {
                name: name.to_string(),
                available: self.sheet_names().join(", "),
            })
    }

    /// The named sheet, or the first sheet when no name is given
    pub fn sheet_or_first(&self, name: Option<&str>) -> Result<&Sheet> {
        match name {
            Some(name) => self.sheet(name),
            None => self.first_sheet().ok_or_else(|| QualityError::EmptyWorkbook {
                path: self.source.clone(),
            }),
        }
    }
}

fn read_workbook_sheets(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| QualityError::workbook(path, e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                warn!("Skipping unreadable sheet '{}' in {}: {}", name, path.display(), e);
                continue;
            }
        };

        let rows: Vec<Vec<Cell>> = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        debug!("Sheet '{}': {} rows", name, rows.len());
        sheets.push(Sheet::new(name, Dataset::new(rows)));
    }

    Ok(sheets)
}

fn read_csv_sheet(path: &Path) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::from(field)
                    }
                })
                .collect(),
        );
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "Sheet1".to_string());

    Ok(Sheet::new(name, Dataset::new(rows)))
}

/// Map a decoded workbook cell onto the scanner's cell type
///
/// Dates stay as their serial number, matching what the spreadsheet stores.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(text) => Cell::Text(text.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::Number(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        Data::Error(error) => Cell::Text(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path(Path::new("a.XLSX")), Some(FileFormat::Workbook));
        assert_eq!(FileFormat::from_path(Path::new("a.xls")), Some(FileFormat::Workbook));
        assert_eq!(FileFormat::from_path(Path::new("a.ods")), Some(FileFormat::Workbook));
        assert_eq!(FileFormat::from_path(Path::new("a.csv")), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_path(Path::new("a.txt")), None);
        assert_eq!(FileFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_open_csv() {
        let file = write_csv("Name,Email,Age\nAnn,ann@example.com,30\nBob,,\n");
        let workbook = Workbook::open(file.path(), &QualityConfig::default()).unwrap();

        assert_eq!(workbook.sheets().len(), 1);
        let sheet = workbook.first_sheet().unwrap();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.column_count(), 3);
        assert_eq!(sheet.dataset.data_rows()[1][1], Cell::Empty);
        assert_eq!(sheet.dataset.data_rows()[0][2], Cell::from("30"));
        assert!(workbook.size_bytes > 0);
    }

    #[test]
    fn test_open_csv_with_ragged_rows() {
        let file = write_csv("A,B,C\n1\n1,2,3,4\n");
        let workbook = Workbook::open(file.path(), &QualityConfig::default()).unwrap();
        let dataset = &workbook.first_sheet().unwrap().dataset;

        assert_eq!(dataset.data_rows()[0].len(), 1);
        assert_eq!(dataset.data_rows()[1].len(), 4);
    }

    #[test]
    fn test_open_missing_file() {
        let result = Workbook::open(Path::new("/nonexistent/data.xlsx"), &QualityConfig::default());
        assert!(matches!(result, Err(QualityError::FileNotFound { .. })));
    }

    #[test]
    fn test_open_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let result = Workbook::open(&path, &QualityConfig::default());
        assert!(matches!(result, Err(QualityError::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_open_rejects_large_file() {
        let file = write_csv("Name\nAnn\nBob\n");
        let config = QualityConfig::default().with_max_file_size(4);

        let result = Workbook::open(file.path(), &config);
        assert!(matches!(result, Err(QualityError::FileTooLarge { limit: 4, .. })));
    }

    #[test]
    fn test_open_corrupt_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"this is not a zip archive").unwrap();

        let result = Workbook::open(&path, &QualityConfig::default());
        assert!(matches!(result, Err(QualityError::Workbook { .. })));
    }

    #[test]
    fn test_sheet_lookup() {
        let workbook = Workbook::from_sheets(
            "memory.xlsx",
            vec![
                Sheet::new("First", Dataset::default()),
                Sheet::new("Second", Dataset::default()),
            ],
        );

        assert_eq!(workbook.sheet_names(), vec!["First", "Second"]);
        assert_eq!(workbook.sheet_or_first(None).unwrap().name, "First");
        assert_eq!(workbook.sheet("Second").unwrap().name, "Second");

        match workbook.sheet("Third") {
            Err(QualityError::SheetNotFound { available, .. }) => {
                assert_eq!(available, "First, Second")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_cell_from_data() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(cell_from_data(&Data::Float(-1.5)), Cell::Number(-1.5));
        assert_eq!(cell_from_data(&Data::Bool(true)), Cell::Bool(true));
        assert_eq!(
            cell_from_data(&Data::String("x".to_string())),
            Cell::from("x")
        );
    }
}
