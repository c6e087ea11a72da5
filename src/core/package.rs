use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Accounting basis. Cash is the only supported value; a non-cash request
/// is rejected before building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum Basis {
    #[default]
    #[serde(rename = "cash")]
    Cash,
}

/// Rounding contract stamped on the package so renderers never re-round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoundingSpec {
    pub mode: String,
    pub precision: u32,
}

impl Default for RoundingSpec {
    fn default() -> Self {
        RoundingSpec {
            mode: "half-away-from-zero".to_string(),
            precision: crate::core::rounding::CENT_PRECISION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackageMetadata {
    pub tax_year: i32,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    /// Supplied by the caller, not read from a clock, so identical inputs
    /// rebuild byte-identically
    #[schemars(with = "String")]
    pub created_at: DateTime<FixedOffset>,
    pub timezone: String,
    pub basis: Basis,
    pub currency: String,
    pub rounding: RoundingSpec,
    pub schema_version: u32,
}

/// Where an income row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum IncomeSource {
    Gig,
    InvoicePayment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeRow {
    pub source_row_id: String,
    pub date: NaiveDate,
    pub source: IncomeSource,
    /// App label for gig rows; None for invoice payments
    #[serde(default)]
    pub app_label: Option<String>,
    #[serde(default)]
    pub payer: Option<String>,
    pub description: String,
    #[schemars(with = "f64")]
    pub gross: Decimal,
    #[schemars(with = "f64")]
    pub fees: Decimal,
    #[schemars(with = "f64")]
    pub net: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseRow {
    pub source_row_id: String,
    pub date: NaiveDate,
    pub source_label: String,
    /// Original category string as entered
    pub category: String,
    pub ref_number: String,
    pub line_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[schemars(with = "f64")]
    pub deductible_percent: Decimal,
    #[schemars(with = "f64")]
    pub deductible_amount: Decimal,
    pub potential_asset_review: bool,
    #[serde(default)]
    pub asset_review_reason: Option<String>,
    #[serde(default)]
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MileageRow {
    pub source_row_id: String,
    pub date: NaiveDate,
    #[schemars(with = "f64")]
    pub miles: Decimal,
    #[schemars(with = "f64")]
    pub rate: Decimal,
    #[schemars(with = "f64")]
    pub deduction: Decimal,
    /// Always true: only the standard mileage method is supported
    pub is_estimate: bool,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceRow {
    pub source_row_id: String,
    pub client: String,
    #[serde(default)]
    pub number: Option<String>,
    pub payments_count: usize,
    #[schemars(with = "f64")]
    pub total_paid: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubcontractorPayoutRow {
    pub source_row_id: String,
    pub date: NaiveDate,
    pub payee: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PayerSummaryRow {
    pub payer: String,
    #[serde(default)]
    pub tax_id: Option<String>,
    pub payments_count: usize,
    #[schemars(with = "f64")]
    pub gross: Decimal,
    #[schemars(with = "f64")]
    pub fees: Decimal,
    #[schemars(with = "f64")]
    pub net: Decimal,
    pub first_payment_date: NaiveDate,
    pub last_payment_date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MileageSummary {
    pub tax_year: i32,
    #[schemars(with = "f64")]
    pub total_business_miles: Decimal,
    #[schemars(with = "f64")]
    pub standard_rate_used: Decimal,
    #[schemars(with = "f64")]
    pub mileage_deduction_amount: Decimal,
    pub entries_count: usize,
    pub is_estimate_any: bool,
    pub notes: Vec<String>,
}

/// One itemized bucket of the Other Expenses line, keyed
/// `"<source>: <category>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OtherExpenseItem {
    pub name: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleC {
    #[schemars(with = "f64")]
    pub gross_receipts: Decimal,
    #[schemars(with = "f64")]
    pub returns_allowances: Decimal,
    #[schemars(with = "f64")]
    pub cogs: Decimal,
    #[schemars(with = "f64")]
    pub other_income: Decimal,
    /// Deductible totals keyed by Schedule C line ref number
    #[schemars(with = "BTreeMap<String, f64>")]
    pub expense_totals_by_ref: BTreeMap<String, Decimal>,
    pub other_expenses_breakdown: Vec<OtherExpenseItem>,
    #[schemars(with = "f64")]
    pub net_profit: Decimal,
    pub warnings: Vec<String>,
}

impl ScheduleC {
    /// Sum over every per-ref bucket. Already cent-exact; no re-rounding.
    pub fn expenses_total(&self) -> Decimal {
        self.expense_totals_by_ref.values().sum()
    }
}

/// A line ready to be typed into tax software by hand. Expense lines carry
/// a negative raw amount but a positive entry amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScheduleCLineItem {
    pub ref_number: String,
    pub line_name: String,
    pub description: String,
    #[schemars(with = "f64")]
    pub raw_signed_amount: Decimal,
    #[schemars(with = "f64")]
    pub amount_for_entry: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReceiptRef {
    pub transaction_id: String,
    pub receipt_url: String,
    pub kind: String,
}

/// The single artifact of the core. Immutable once built; every downstream
/// output format reads fields from here and recomputes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxExportPackage {
    pub metadata: PackageMetadata,
    pub schedule_c: ScheduleC,
    pub schedule_c_line_items: Vec<ScheduleCLineItem>,
    pub income_rows: Vec<IncomeRow>,
    pub expense_rows: Vec<ExpenseRow>,
    pub mileage_rows: Vec<MileageRow>,
    pub invoice_rows: Vec<InvoiceRow>,
    pub subcontractor_payout_rows: Vec<SubcontractorPayoutRow>,
    pub payer_summary_rows: Vec<PayerSummaryRow>,
    pub mileage_summary: MileageSummary,
    pub receipts_manifest: Vec<ReceiptRef>,
}

impl TaxExportPackage {
    /// Canonical JSON: struct field order plus BTreeMap key order make this
    /// stable across rebuilds from identical inputs.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// SHA-256 over the canonical JSON, hex encoded. Two builds from the
    /// same snapshot and options produce the same fingerprint.
    pub fn fingerprint(&self) -> serde_json::Result<String> {
        let json = self.to_canonical_json()?;
        let digest = Sha256::digest(json.as_bytes());
        Ok(hex::encode(digest))
    }
}
