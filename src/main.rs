use clap::Parser;
use sheet_quality::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match commands::run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Sheet Quality - Spreadsheet Data Quality Checker");
    println!("================================================");
    println!();
    println!("Scan Excel, OpenDocument and CSV files for empty cells, duplicate values,");
    println!("malformed email addresses and negative ages.");
    println!();
    println!("USAGE:");
    println!("    sheet-quality <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    scan        Scan a sheet and list its data-quality issues (main command)");
    println!("    sheets      List the sheets of a file with their sizes");
    println!("    preview     Show a page of a sheet's data rows");
    println!("    export      Export a sheet's data as CSV or JSON");
    println!("    sample      Write a built-in sample dataset to disk");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Scan the first sheet of a workbook:");
    println!("    sheet-quality scan customers.xlsx");
    println!();
    println!("    # Show only high-severity issues, 20 per page:");
    println!("    sheet-quality scan customers.xlsx --severity high --page-size 20");
    println!();
    println!("    # Export issues 1, 4 and 5 of the Contacts sheet as CSV:");
    println!("    sheet-quality scan customers.xlsx --sheet Contacts --select 1,4,5 \\");
    println!("                       --export-dir reports");
    println!();
    println!("    # Try it on built-in data:");
    println!("    sheet-quality sample employees && sheet-quality scan employee_records_sample.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    sheet-quality <COMMAND> --help");
}
