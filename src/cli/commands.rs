//! Command implementations for the sheet quality CLI
//!
//! Each subcommand loads its configuration, does its work through the
//! library API and reports results on stdout. Logs go to stderr.

use crate::cli::args::{
    Args, Commands, DatasetFormat, ExportArgs, LogArgs, OutputFormat, PreviewArgs, SampleArgs,
    ScanArgs, SheetsArgs,
};
use crate::config::QualityConfig;
use crate::export::{ExportFile, export_dataset_csv, export_dataset_json};
use crate::normalize::canonical_string;
use crate::models::{Issue, IssueType, RowPage, ScanSummary, Severity};
use crate::samples::sample_dataset;
use crate::session::Session;
use crate::view::{IssueFilter, IssuePage, IssueView};
use crate::workbook::Workbook;
use anyhow::{Context, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Main command runner
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args.log_args());
    debug!("Command line arguments: {:?}", args);

    match args.command {
        Some(Commands::Scan(scan)) => run_scan(scan),
        Some(Commands::Sheets(sheets)) => run_sheets(sheets),
        Some(Commands::Preview(preview)) => run_preview(preview),
        Some(Commands::Export(export)) => run_export(export),
        Some(Commands::Sample(sample)) => run_sample(sample),
        None => Ok(()),
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(log: &LogArgs) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = log.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sheet_quality={}", log_level)));

    // A subscriber may already be installed when running inside tests
    let installed = if log.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}

/// Load the JSON configuration file if one was given, else the defaults
fn load_configuration(config_file: Option<&Path>) -> Result<QualityConfig> {
    match config_file {
        Some(path) => QualityConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(QualityConfig::default()),
    }
}

/// Everything reported for one scanned sheet
#[derive(Debug, Serialize)]
struct SheetReport<'a> {
    file: String,
    sheet: &'a str,
    rows: usize,
    columns: usize,
    summary: ScanSummary,
    filter: IssueFilter,
    page: IssuePage<'a>,
    /// 1-based issue numbers in the filtered list
    selected: Vec<usize>,
    export_path: Option<&'a Path>,
}

struct ScannedSheet {
    name: String,
    rows: usize,
    columns: usize,
    view: IssueView,
    export_path: Option<PathBuf>,
}

/// Scan one or all sheets of a file and report the issues
pub fn run_scan(args: ScanArgs) -> Result<()> {
    let start_time = Instant::now();
    info!("Starting scan of {}", args.file.display());

    args.validate()?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    if let Some(keyword) = &args.email_keyword {
        config = config.with_email_keyword(keyword.clone());
    }
    if let Some(keyword) = &args.age_keyword {
        config = config.with_age_keyword(keyword.clone());
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    config.validate()?;
    let page_size = config.page_size;

    let mut session = Session::new(config);
    let id = session
        .register(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let file = session
        .get(id)
        .context("Loaded file is missing from the session")?;
    let workbook = file
        .workbook()
        .context("Loaded file has no decoded workbook")?;

    let sheet_names: Vec<String> = if args.all_sheets {
        file.sheets.clone()
    } else {
        vec![workbook.sheet_or_first(args.sheet.as_deref())?.name.clone()]
    };

    let progress_bar = if args.all_sheets
        && args.log.show_progress()
        && args.output_format == OutputFormat::Human
        && sheet_names.len() > 1
    {
        let pb = ProgressBar::new(sheet_names.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut scanned = Vec::with_capacity(sheet_names.len());
    for (i, name) in sheet_names.iter().enumerate() {
        if let Some(pb) = &progress_bar {
            pb.set_position(i as u64);
            pb.set_message(format!("Scanning {}", name));
        }

        let sheet = workbook.sheet(name)?;
        let mut view = session.analyze(id, Some(name))?;
        view.set_filter(args.severity, args.issue_type);
        apply_selection(&args, &mut view);

        let export_path = match &args.export_dir {
            Some(dir) if view.selection_len() > 0 => {
                let path = view
                    .export_selected(name)?
                    .write_to_dir(dir)
                    .with_context(|| format!("Failed to write issue export to {}", dir.display()))?;
                info!("Exported {} issues to {}", view.selection_len(), path.display());
                Some(path)
            }
            Some(_) => {
                warn!("No issues selected in sheet {}; nothing exported", name);
                None
            }
            None => None,
        };

        scanned.push(ScannedSheet {
            name: name.clone(),
            rows: sheet.row_count(),
            columns: sheet.column_count(),
            view,
            export_path,
        });
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message("Scan complete");
    }

    let file_name = workbook.file_name();
    let reports: Vec<SheetReport<'_>> = scanned
        .iter()
        .map(|sheet| SheetReport {
            file: file_name.clone(),
            sheet: &sheet.name,
            rows: sheet.rows,
            columns: sheet.columns,
            summary: ScanSummary::from_issues(sheet.view.issues()),
            filter: sheet.view.filter(),
            page: sheet.view.page(args.page, page_size),
            selected: sheet
                .view
                .selected_positions()
                .into_iter()
                .map(|position| position + 1)
                .collect(),
            export_path: sheet.export_path.as_deref(),
        })
        .collect();

    for report in &reports {
        if report.page.is_fallback() {
            warn!(
                "Page {} of sheet {} is out of range (only {} pages); showing page 1",
                report.page.requested_page, report.sheet, report.page.total_pages
            );
        }
    }

    match args.output_format {
        OutputFormat::Json if args.all_sheets => {
            println!("{}", serde_json::to_string_pretty(&reports)?)
        }
        OutputFormat::Json => {
            if let Some(report) = reports.first() {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
        }
        OutputFormat::Human => {
            for (sheet, report) in scanned.iter().zip(&reports) {
                print_sheet_report(report, &sheet.view);
            }
        }
    }

    info!("Scan completed in {}", HumanDuration(start_time.elapsed()));
    Ok(())
}

/// Apply `--select` / `--select-all` to the filtered list
fn apply_selection(args: &ScanArgs, view: &mut IssueView) {
    if args.select_all {
        view.select_all();
        return;
    }

    let Some(selection) = &args.select else {
        return;
    };

    let positions: BTreeSet<usize> = selection.positions().collect();
    for position in positions {
        if position >= view.filtered_len() {
            warn!(
                "Issue number {} is out of range (only {} issues listed)",
                position + 1,
                view.filtered_len()
            );
            continue;
        }
        view.toggle_select(position);
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let text = format!("{:<6}", severity.as_str());
    match severity {
        Severity::High => text.bright_red().bold(),
        Severity::Medium => text.bright_yellow(),
        Severity::Low => text.bright_blue(),
    }
}

/// "2 high, 0 medium, 1 low" with each count in its severity colour
fn severity_breakdown(summary: &ScanSummary) -> String {
    Severity::ALL
        .iter()
        .map(|&severity| {
            let count = summary.count_for_severity(severity).to_string();
            let count = match severity {
                Severity::High => count.bright_red(),
                Severity::Medium => count.bright_yellow(),
                Severity::Low => count.bright_blue(),
            };
            format!("{} {}", count, severity)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn type_breakdown(summary: &ScanSummary) -> String {
    IssueType::ALL
        .iter()
        .map(|&issue_type| {
            format!(
                "{} {}",
                issue_type.as_str(),
                summary.count_for_type(issue_type)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_issue(number: usize, issue: &Issue, selected: bool) {
    let marker = if selected { "*".bright_green().bold() } else { " ".normal() };
    println!(
        "{} {:>4}. Row {:<5} {:<20} {} {:<14} {}",
        marker,
        number,
        issue.row_index,
        issue.column_name,
        severity_label(issue.severity),
        issue.issue_type.as_str(),
        issue.description
    );
    println!("{}", format!("{:13}Fix: {}", "", issue.suggested_fix).bright_black());
}

fn print_sheet_report(report: &SheetReport<'_>, view: &IssueView) {
    let summary = &report.summary;

    println!();
    println!(
        "{} {} {}",
        report.file.bright_cyan().bold(),
        format!("[{}]", report.sheet).bright_white().bold(),
        format!("({} rows, {} columns)", report.rows, report.columns).bright_black()
    );

    if summary.is_clean() {
        println!("  {}", "No data quality issues found".bright_green().bold());
        return;
    }

    println!(
        "  {} issues: {}",
        summary.total_issues.to_string().bright_white().bold(),
        severity_breakdown(summary)
    );
    println!("  {}", type_breakdown(summary));
    println!(
        "  Showing {} of {} issues (severity: {}, type: {})",
        report.page.total_items,
        summary.total_issues,
        report.filter.severity,
        report.filter.issue_type
    );

    if report.page.items.is_empty() {
        println!("  {}", "No issues match the current filter".bright_yellow());
        return;
    }

    println!(
        "  {}",
        format!(
            "Page {} of {} ({} per page)",
            report.page.page, report.page.total_pages, report.page.page_size
        )
        .bright_black()
    );
    println!();

    for (offset, issue) in report.page.items.iter().enumerate() {
        let position = report.page.start_index + offset;
        print_issue(position + 1, issue, view.is_selected(position));
    }

    if !report.selected.is_empty() {
        println!();
        println!(
            "  {} {} issues selected",
            "*".bright_green().bold(),
            report.selected.len()
        );
    }
    if let Some(path) = report.export_path {
        println!(
            "  {} {}",
            "Exported selected issues to".bright_green(),
            path.display()
        );
    }
}

/// Open a file with the configured size limit
fn open_workbook(file: &Path, config_file: Option<&Path>) -> Result<Workbook> {
    let config = load_configuration(config_file)?;
    Workbook::open(file, &config).with_context(|| format!("Failed to load {}", file.display()))
}

/// List sheet names with row and column counts
pub fn run_sheets(args: SheetsArgs) -> Result<()> {
    let workbook = open_workbook(&args.file, args.config_file.as_deref())?;

    match args.output_format {
        OutputFormat::Json => {
            let sheets: Vec<serde_json::Value> = workbook
                .sheets()
                .iter()
                .map(|sheet| {
                    serde_json::json!({
                        "name": sheet.name,
                        "rows": sheet.row_count(),
                        "columns": sheet.column_count(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&sheets)?);
        }
        OutputFormat::Human => {
            println!("{}", workbook.file_name().bright_cyan().bold());
            for (i, sheet) in workbook.sheets().iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    (i + 1).to_string().bright_yellow().bold(),
                    sheet.name.bright_white(),
                    format!("({} rows, {} columns)", sheet.row_count(), sheet.column_count())
                        .bright_black()
                );
            }
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct PreviewReport<'a> {
    file: String,
    sheet: &'a str,
    page: RowPage<'a>,
}

/// Show one page of a sheet's data rows
pub fn run_preview(args: PreviewArgs) -> Result<()> {
    args.validate()?;

    let mut config = load_configuration(args.config_file.as_deref())?;
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    config.validate()?;

    let workbook = Workbook::open(&args.file, &config)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let sheet = workbook.sheet_or_first(args.sheet.as_deref())?;

    let page = sheet.dataset.page(args.page, config.page_size);
    if page.is_fallback() {
        warn!(
            "Page {} is out of range (only {} pages); showing page 1",
            page.requested_page, page.total_pages
        );
    }

    match args.output_format {
        OutputFormat::Json => {
            let preview = PreviewReport {
                file: workbook.file_name(),
                sheet: &sheet.name,
                page,
            };
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        OutputFormat::Human => print_row_page(&workbook.file_name(), &sheet.name, &page),
    }

    Ok(())
}

fn print_row_page(file: &str, sheet: &str, page: &RowPage<'_>) {
    println!();
    println!(
        "{} {} {}",
        file.bright_cyan().bold(),
        format!("[{}]", sheet).bright_white().bold(),
        format!("({} rows, {} columns)", page.total_rows, page.columns.len()).bright_black()
    );

    if page.rows.is_empty() {
        println!("  {}", "Sheet has no data rows".bright_yellow());
        return;
    }

    println!(
        "  {}",
        format!(
            "Page {} of {} ({} per page)",
            page.page, page.total_pages, page.page_size
        )
        .bright_black()
    );
    println!();

    let header: Vec<String> = page.columns.iter().map(|c| format!("{:<16}", c)).collect();
    println!("  {:>5}  {}", "Row".bold(), header.join(" ").bold());

    for (offset, row) in page.rows.iter().enumerate() {
        let cells: Vec<String> = (0..page.columns.len().max(row.len()))
            .map(|i| {
                let text = row.get(i).map(canonical_string).unwrap_or_default();
                format!("{:<16}", text)
            })
            .collect();
        println!(
            "  {:>5}  {}",
            (page.first_row_number() + offset).to_string().bright_black(),
            cells.join(" ")
        );
    }
}

/// Export a sheet's data as CSV or JSON
pub fn run_export(args: ExportArgs) -> Result<()> {
    let workbook = open_workbook(&args.file, args.config_file.as_deref())?;
    let sheet = workbook.sheet_or_first(args.sheet.as_deref())?;

    let export = match args.format {
        DatasetFormat::Csv => export_dataset_csv(&sheet.dataset, Some(&sheet.name))?,
        DatasetFormat::Json => export_dataset_json(&sheet.dataset, Some(&sheet.name))?,
    };

    let path = export
        .write_to_dir(&args.output_dir)
        .with_context(|| format!("Failed to write export to {}", args.output_dir.display()))?;

    info!("Exported sheet {} to {}", sheet.name, path.display());
    println!("{} {}", "Exported".bright_green().bold(), path.display());
    Ok(())
}

/// Write a built-in sample dataset as CSV
pub fn run_sample(args: SampleArgs) -> Result<()> {
    let dataset = sample_dataset(args.kind);
    let export = ExportFile {
        filename: args.kind.file_name(),
        content: export_dataset_csv(&dataset, None)?.content,
    };

    let path = export
        .write_to_dir(&args.output_dir)
        .with_context(|| format!("Failed to write sample to {}", args.output_dir.display()))?;

    println!(
        "{} {} {}",
        "Wrote".bright_green().bold(),
        args.kind.title(),
        format!("sample to {}", path.display()).bright_black()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::SelectionList;
    use clap::Parser;
    use tempfile::TempDir;

    fn scan_args(extra: &[&str]) -> ScanArgs {
        let mut argv = vec!["sheet-quality", "scan", "data.csv"];
        argv.extend_from_slice(extra);
        match Args::try_parse_from(argv).unwrap().command {
            Some(Commands::Scan(scan)) => scan,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn issue_view() -> IssueView {
        let dataset = crate::models::Dataset::new(vec![
            vec!["Name".into()],
            vec!["A".into()],
            vec!["A".into()],
            vec!["A".into()],
        ]);
        IssueView::new(crate::scan_dataset(&dataset))
    }

    #[test]
    fn test_apply_selection_ignores_out_of_range() {
        let mut args = scan_args(&[]);
        args.select = Some("2,9".parse::<SelectionList>().unwrap());

        let mut view = issue_view();
        apply_selection(&args, &mut view);
        assert_eq!(view.selected_positions(), vec![1]);
    }

    #[test]
    fn test_apply_selection_deduplicates_numbers() {
        let mut args = scan_args(&[]);
        args.select = Some("1,1".parse::<SelectionList>().unwrap());

        let mut view = issue_view();
        apply_selection(&args, &mut view);
        assert_eq!(view.selected_positions(), vec![0]);
    }

    #[test]
    fn test_select_all() {
        let args = scan_args(&["--select-all"]);
        let mut view = issue_view();
        apply_selection(&args, &mut view);
        assert_eq!(view.selection_len(), 2);
    }

    #[test]
    fn test_sample_and_export_commands() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().to_str().unwrap();

        let args = Args::try_parse_from(["sheet-quality", "sample", "sales", "-o", out, "-q"])
            .unwrap();
        run(args).unwrap();

        let sample_path = dir.path().join("sales_data_sample.csv");
        assert!(sample_path.exists());

        let args = Args::try_parse_from([
            "sheet-quality",
            "export",
            sample_path.to_str().unwrap(),
            "--format",
            "json",
            "-o",
            out,
            "-q",
        ])
        .unwrap();
        run(args).unwrap();

        let json = std::fs::read_to_string(dir.path().join("sales_data_sample.json")).unwrap();
        let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 10);
        assert_eq!(rows[0]["Product"], "Laptop Pro");
    }

    #[test]
    fn test_scan_command_writes_export() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("people.csv");
        std::fs::write(&input, "Name,Email\nAnn,bad\nAnn,\n").unwrap();
        let export_dir = dir.path().join("out");

        let args = Args::try_parse_from([
            "sheet-quality",
            "scan",
            input.to_str().unwrap(),
            "--select-all",
            "--export-dir",
            export_dir.to_str().unwrap(),
            "--format",
            "json",
            "-q",
        ])
        .unwrap();
        run(args).unwrap();

        let content =
            std::fs::read_to_string(export_dir.join("data_quality_issues_people.csv")).unwrap();
        // Header plus invalid email, duplicate name and empty email
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_preview_command() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("people.csv");
        std::fs::write(&input, "Name,Email\nAnn,a@b.io\nBob,b@c.io\nCy,c@d.io\n").unwrap();

        for page in ["2", "7"] {
            let args = Args::try_parse_from([
                "sheet-quality",
                "preview",
                input.to_str().unwrap(),
                "--page",
                page,
                "--page-size",
                "2",
                "--format",
                "json",
                "-q",
            ])
            .unwrap();
            run(args).unwrap();
        }

        let args = Args::try_parse_from([
            "sheet-quality",
            "preview",
            input.to_str().unwrap(),
            "--page-size",
            "0",
        ])
        .unwrap();
        assert!(run(args).is_err());
    }

    #[test]
    fn test_summary_breakdowns_cover_every_kind() {
        colored::control::set_override(false);
        let view = issue_view();
        let summary = view.summary();

        assert_eq!(severity_breakdown(&summary), "0 high, 0 medium, 2 low");
        assert_eq!(
            type_breakdown(&summary),
            "empty 0, invalid_format 0, outlier 0, duplicate 2"
        );
    }
}
