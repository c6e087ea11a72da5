//! Rows command - export package row-level detail as CSV

use crate::cmd::PackageArgs;
use crate::utils::write_csv;
use clap::{Args, ValueEnum};
use std::io;

#[derive(Args, Debug)]
pub struct RowsCommand {
    #[command(flatten)]
    package: PackageArgs,

    /// Which row collection to export
    #[arg(short, long, value_enum, default_value_t = RowKind::Income)]
    kind: RowKind,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RowKind {
    Income,
    Expenses,
    Mileage,
    Invoices,
    Payouts,
    Payers,
    LineItems,
}

impl RowsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        // Renderers read fields already present on the package; nothing is
        // recomputed on the way out.
        let package = self.package.build()?;
        let stdout = io::stdout();
        match self.kind {
            RowKind::Income => write_csv(&package.income_rows, stdout.lock()),
            RowKind::Expenses => write_csv(&package.expense_rows, stdout.lock()),
            RowKind::Mileage => write_csv(&package.mileage_rows, stdout.lock()),
            RowKind::Invoices => write_csv(&package.invoice_rows, stdout.lock()),
            RowKind::Payouts => write_csv(&package.subcontractor_payout_rows, stdout.lock()),
            RowKind::Payers => write_csv(&package.payer_summary_rows, stdout.lock()),
            RowKind::LineItems => write_csv(&package.schedule_c_line_items, stdout.lock()),
        }
    }
}
