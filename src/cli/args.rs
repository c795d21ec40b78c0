//! Command-line argument definitions for the sheet quality checker
//!
//! Defines the CLI interface using the clap derive API.

use crate::constants::MAX_PAGE_SIZE;
use crate::error::{QualityError, Result};
use crate::samples::SampleKind;
use crate::view::{SeverityFilter, TypeFilter};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the spreadsheet data-quality checker
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sheet-quality",
    version,
    about = "Find empty cells, duplicates, bad emails and negative ages in spreadsheets",
    long_about = "Scans Excel, OpenDocument and CSV files cell by cell and reports data-quality \
                  issues with a severity and a suggested fix. Issues can be filtered, paged, \
                  selected and exported as CSV."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Scan a sheet and list its data-quality issues
    Scan(ScanArgs),
    /// List the sheets of a file with their sizes
    Sheets(SheetsArgs),
    /// Show a page of a sheet's rows
    Preview(PreviewArgs),
    /// Export a sheet's data as CSV or JSON
    Export(ExportArgs),
    /// Write a built-in sample dataset to disk
    Sample(SampleArgs),
}

/// Logging flags shared by every command
#[derive(Debug, Clone, Default, clap::Args)]
pub struct LogArgs {
    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl LogArgs {
    /// Get the log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Arguments for the scan command
#[derive(Debug, Clone, Parser)]
pub struct ScanArgs {
    /// Spreadsheet to scan (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sheet to scan; defaults to the first sheet
    #[arg(short = 's', long = "sheet", value_name = "NAME", conflicts_with = "all_sheets")]
    pub sheet: Option<String>,

    /// Scan every sheet in the file
    #[arg(long = "all-sheets", help = "Scan every sheet in the file")]
    pub all_sheets: bool,

    /// Show only issues of this severity
    #[arg(long = "severity", value_enum, default_value_t = SeverityFilter::All)]
    pub severity: SeverityFilter,

    /// Show only issues of this type
    #[arg(long = "issue-type", value_enum, default_value_t = TypeFilter::All)]
    pub issue_type: TypeFilter,

    /// Page of the filtered issue list to show (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Issues per page; overrides the configured page size
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Issue numbers to select, as shown in the listing (comma-separated)
    #[arg(long = "select", value_name = "LIST", conflicts_with = "select_all")]
    pub select: Option<SelectionList>,

    /// Select every issue in the filtered list
    #[arg(long = "select-all")]
    pub select_all: bool,

    /// Write the selected issues as CSV into this directory
    #[arg(short = 'e', long = "export-dir", value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Column keyword that enables the email check; overrides the config file
    #[arg(long = "email-keyword", value_name = "TEXT")]
    pub email_keyword: Option<String>,

    /// Column keyword that enables the negative value check; overrides the config file
    #[arg(long = "age-keyword", value_name = "TEXT")]
    pub age_keyword: Option<String>,

    /// Output format for the results
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments for the sheets command
#[derive(Debug, Clone, Parser)]
pub struct SheetsArgs {
    /// Spreadsheet to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output format for the sheet listing
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments for the preview command
#[derive(Debug, Clone, Parser)]
pub struct PreviewArgs {
    /// Spreadsheet to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sheet to preview; defaults to the first sheet
    #[arg(short = 's', long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Page of data rows to show (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", default_value_t = 1)]
    pub page: usize,

    /// Rows per page; overrides the configured page size
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Output format for the rows
    #[arg(long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Spreadsheet to export from
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sheet to export; defaults to the first sheet
    #[arg(short = 's', long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// Format of the exported data
    #[arg(long = "format", value_enum)]
    pub format: DatasetFormat,

    /// Directory for the exported file
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Path to a JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Arguments for the sample command
#[derive(Debug, Clone, Parser)]
pub struct SampleArgs {
    /// Which sample dataset to write
    #[arg(value_enum)]
    pub kind: SampleKind,

    /// Directory for the sample file
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[command(flatten)]
    pub log: LogArgs,
}

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Format for dataset exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DatasetFormat {
    /// Every field quoted, header row first
    Csv,
    /// Array of objects keyed by header
    Json,
}

/// Comma-separated list of 1-based issue numbers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionList {
    pub numbers: Vec<usize>,
}

impl SelectionList {
    /// 0-based positions in the filtered list
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.numbers.iter().map(|number| number - 1)
    }
}

impl FromStr for SelectionList {
    type Err = QualityError;

    fn from_str(s: &str) -> Result<Self> {
        let mut numbers = Vec::new();
        for part in s.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let number: usize = part.parse().map_err(|_| {
                QualityError::configuration(format!("Invalid issue number '{}'", part))
            })?;
            if number == 0 {
                return Err(QualityError::configuration(
                    "Issue numbers start at 1".to_string(),
                ));
            }
            numbers.push(number);
        }

        if numbers.is_empty() {
            return Err(QualityError::configuration(
                "Selection list cannot be empty".to_string(),
            ));
        }

        Ok(SelectionList { numbers })
    }
}

impl Args {
    /// Logging flags of the chosen command
    pub fn log_args(&self) -> LogArgs {
        match &self.command {
            Some(Commands::Scan(args)) => args.log.clone(),
            Some(Commands::Sheets(args)) => args.log.clone(),
            Some(Commands::Preview(args)) => args.log.clone(),
            Some(Commands::Export(args)) => args.log.clone(),
            Some(Commands::Sample(args)) => args.log.clone(),
            None => LogArgs::default(),
        }
    }
}

/// Page numbers start at 1 and page sizes stay within the configured bound
fn validate_paging(page: usize, page_size: Option<usize>) -> Result<()> {
    if let Some(page_size) = page_size {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QualityError::configuration(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
    }

    if page == 0 {
        return Err(QualityError::configuration(
            "Page numbers start at 1".to_string(),
        ));
    }

    Ok(())
}

impl ScanArgs {
    /// Validate the scan arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_paging(self.page, self.page_size)?;

        if let Some(export_dir) = &self.export_dir {
            if export_dir.is_file() {
                return Err(QualityError::configuration(format!(
                    "Export path is a file, not a directory: {}",
                    export_dir.display()
                )));
            }
        }

        Ok(())
    }
}

impl PreviewArgs {
    /// Validate the preview arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_paging(self.page, self.page_size)
    }
}
