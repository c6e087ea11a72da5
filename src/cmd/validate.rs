//! Validate command - surface data quality issues without building a package

use crate::cmd::read_snapshot;
use crate::core::validate::{validate_rows, ValidationIssue, ValidationReport};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// JSON file containing the raw row snapshot (or "-" for stdin)
    #[arg(short, long)]
    rows: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let rows = read_snapshot(&self.rows)?;
        let report = validate_rows(&rows);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_text(&report);
        }

        // Blocking errors gate the strict export formats; reflect that in
        // the exit code so callers can branch on it.
        if !report.is_valid {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(report: &ValidationReport) {
    println!();
    println!("VALIDATION RESULTS");
    println!();
    println!(
        "  {} row(s) checked: {} error(s), {} warning(s)",
        report.summary.rows_checked, report.summary.error_count, report.summary.warning_count
    );
    println!();

    if report.errors.is_empty() && report.warnings.is_empty() {
        println!("\u{2713} No issues found.");
        println!();
        return;
    }

    if !report.errors.is_empty() {
        println!("ERRORS (block tax-software exports)");
        for issue in &report.errors {
            print_issue(issue);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("WARNINGS");
        for issue in &report.warnings {
            print_issue(issue);
        }
        println!();
    }
}

fn print_issue(issue: &ValidationIssue) {
    println!(
        "  [{:?}] {} {}: {}",
        issue.kind, issue.row_kind, issue.row_id, issue.message
    );
}
