//! Summary command - Schedule C totals and rollups as terminal tables

use crate::cmd::PackageArgs;
use crate::core::package::TaxExportPackage;
use clap::Args;
use rust_decimal::Decimal;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SummaryCommand {
    #[command(flatten)]
    package: PackageArgs,
}

impl SummaryCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let package = self.package.build()?;
        print_summary(&package);
        Ok(())
    }
}

/// Render totals already present on the package. Nothing is recomputed here.
fn print_summary(package: &TaxExportPackage) {
    let metadata = &package.metadata;
    let schedule = &package.schedule_c;

    println!();
    println!(
        "TAX EXPORT SUMMARY ({}, {} to {}, cash basis)",
        metadata.tax_year, metadata.date_start, metadata.date_end
    );
    println!();

    println!("SCHEDULE C LINES");
    let line_rows: Vec<LineRow> = package
        .schedule_c_line_items
        .iter()
        .map(|item| LineRow {
            line: item.ref_number.clone(),
            name: item.line_name.clone(),
            description: item.description.clone(),
            entry: format_usd(item.amount_for_entry),
        })
        .collect();
    if line_rows.is_empty() {
        println!("  (no non-zero lines)");
    } else {
        let table = Table::new(line_rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }
    println!();
    println!("NET PROFIT: {}", format_usd_signed(schedule.net_profit));
    println!();

    if !package.payer_summary_rows.is_empty() {
        println!("PAYERS");
        let payer_rows: Vec<PayerRow> = package
            .payer_summary_rows
            .iter()
            .map(|row| PayerRow {
                payer: row.payer.clone(),
                payments: row.payments_count,
                gross: format_usd(row.gross),
                fees: format_usd(row.fees),
                net: format_usd(row.net),
                first: row.first_payment_date.to_string(),
                last: row.last_payment_date.to_string(),
            })
            .collect();
        let table = Table::new(payer_rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        println!();
    }

    let mileage = &package.mileage_summary;
    if mileage.entries_count > 0 {
        println!(
            "MILEAGE: {} mile(s) over {} trip(s), deduction {} at ${}/mile",
            mileage.total_business_miles,
            mileage.entries_count,
            format_usd(mileage.mileage_deduction_amount),
            mileage.standard_rate_used
        );
        println!();
    }

    for warning in &schedule.warnings {
        println!("\u{26A0} {}", warning);
    }
    println!();
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Line")]
    line: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Entry")]
    entry: String,
}

#[derive(Tabled)]
struct PayerRow {
    #[tabled(rename = "Payer")]
    payer: String,
    #[tabled(rename = "Payments")]
    payments: usize,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Fees")]
    fees: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "First")]
    first: String,
    #[tabled(rename = "Last")]
    last: String,
}

fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount)
}

fn format_usd_signed(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}
