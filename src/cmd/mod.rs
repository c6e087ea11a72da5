pub mod build;
pub mod rates;
pub mod rows;
pub mod schema;
pub mod summary;
pub mod validate;

use crate::core::builder::{build_package, BuildOptions};
use crate::core::config::BuilderConfig;
use crate::core::package::TaxExportPackage;
use crate::core::rows::{read_input, ExportInput};
use anyhow::Context;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clap::Args;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Read a raw row snapshot from a JSON file (or stdin with "-").
pub fn read_snapshot(path: &Path) -> anyhow::Result<ExportInput> {
    if path.as_os_str() == "-" {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin.lock());
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
        }
        read_input(io::Cursor::new(buffer)).context("parsing rows from stdin")
    } else {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        read_input(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))
    }
}

/// Options shared by every command that builds a package.
#[derive(Args, Debug)]
pub struct PackageArgs {
    /// JSON file containing the raw row snapshot (or "-" for stdin)
    #[arg(short, long)]
    pub rows: PathBuf,

    /// Tax year to build (e.g. 2024)
    #[arg(short, long)]
    pub year: i32,

    /// IANA timezone recorded in package metadata
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Start of the covered range (defaults to Jan 1 of the tax year)
    #[arg(long)]
    pub date_start: Option<NaiveDate>,

    /// End of the covered range (defaults to Dec 31 of the tax year)
    #[arg(long)]
    pub date_end: Option<NaiveDate>,

    /// Include tips in gross receipts
    #[arg(long)]
    pub include_tips: bool,

    /// Route processor fees into a dedicated deduction line instead of
    /// returns and allowances
    #[arg(long)]
    pub fees_as_deduction: bool,

    /// Accounting basis; only "cash" is supported
    #[arg(long, default_value = "cash")]
    pub basis: String,

    /// Requesting owner; must match the snapshot owner when both are set
    #[arg(long)]
    pub owner: Option<String>,

    /// Fixed created-at timestamp (RFC3339) for reproducible output
    #[arg(long)]
    pub created_at: Option<DateTime<FixedOffset>>,
}

impl PackageArgs {
    pub fn build(&self) -> anyhow::Result<TaxExportPackage> {
        let rows = read_snapshot(&self.rows)?;
        let package = build_package(&rows, &self.options(), &BuilderConfig::default())?;
        Ok(package)
    }

    fn options(&self) -> BuildOptions {
        BuildOptions {
            tax_year: self.year,
            date_start: self.date_start,
            date_end: self.date_end,
            timezone: self.timezone.clone(),
            basis: self.basis.clone(),
            include_tips: self.include_tips,
            include_fees_as_deduction: self.fees_as_deduction,
            requested_by: self.owner.clone(),
            created_at: self
                .created_at
                .unwrap_or_else(|| Utc::now().fixed_offset()),
        }
    }
}
