use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

fn default_currency() -> String {
    crate::core::config::PACKAGE_CURRENCY.to_string()
}

/// Input root: one owner's raw rows for a date range, as fetched by the
/// external store layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExportInput {
    /// Owner the snapshot was scoped to server-side
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub gigs: Vec<GigRecord>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub mileage: Vec<MileageRecord>,
    #[serde(default)]
    pub invoices: Vec<InvoiceRecord>,
    #[serde(default)]
    pub subcontractor_payments: Vec<SubcontractorPaymentRecord>,
    #[serde(default)]
    pub payers: Vec<PayerRecord>,
}

/// A unit of gig income (a shift, booking or job) from a connected app.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GigRecord {
    pub id: String,
    /// Payment date, YYYY-MM-DD
    pub date: String,
    /// App or platform label (e.g. "Rideshare", "Manual")
    pub source: String,
    /// Payer identifier for 1099 reconciliation
    #[serde(default)]
    pub payer: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[schemars(with = "f64")]
    pub base_amount: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub tips: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub per_diem: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub other_income: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub fees: Decimal,
    /// Only paid gigs contribute income; unpaid rows are excluded entirely
    pub paid: bool,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// A standalone business expense.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: String,
    /// Free-form category; the mapper resolves it to a tax line
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Per-row deductible fraction override (e.g. a stored meals percentage)
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub deductible_percent: Option<Decimal>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    /// App label used to key the other-expenses breakdown
    #[serde(default)]
    pub source: Option<String>,
}

/// A business mileage trip.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MileageRecord {
    pub id: String,
    pub date: String,
    #[schemars(with = "f64")]
    pub miles: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Deduction already computed upstream; wins over the rate table
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub deduction: Option<Decimal>,
}

/// An issued invoice and the payments received against it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceRecord {
    pub id: String,
    pub client: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub payments: Vec<InvoicePayment>,
}

/// A single payment against an invoice. Amounts are net by construction;
/// no fee is assumed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvoicePayment {
    pub id: String,
    pub date: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// A payment made to a subcontractor (1099-NEC reference detail).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubcontractorPaymentRecord {
    pub id: String,
    pub date: String,
    pub payee: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
}

/// A known payer, keyed from gig rows by id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PayerRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tax_id: Option<String>,
}

/// Parse a raw row date (date-only, `YYYY-MM-DD`).
pub fn parse_row_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
}

/// Read an input snapshot from JSON.
pub fn read_input<R: Read>(reader: R) -> serde_json::Result<ExportInput> {
    serde_json::from_reader(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_minimal_input() {
        let json = r#"{
            "gigs": [
                {
                    "id": "gig-1",
                    "date": "2024-03-01",
                    "source": "Rideshare",
                    "base_amount": 120.50,
                    "tips": 14.25,
                    "fees": 8.10,
                    "paid": true
                }
            ],
            "expenses": [
                {
                    "id": "exp-1",
                    "date": "2024-03-02",
                    "category": "Supplies",
                    "amount": 42.00
                }
            ]
        }"#;

        let input = read_input(json.as_bytes()).unwrap();
        assert_eq!(input.gigs.len(), 1);
        assert_eq!(input.expenses.len(), 1);
        assert!(input.invoices.is_empty());

        let gig = &input.gigs[0];
        assert_eq!(gig.base_amount, dec!(120.50));
        assert_eq!(gig.currency, "USD");
        assert_eq!(gig.per_diem, Decimal::ZERO);
        assert!(gig.payer.is_none());

        let expense = &input.expenses[0];
        assert!(expense.deductible_percent.is_none());
        assert!(expense.source.is_none());
    }

    #[test]
    fn parse_invoice_with_payments() {
        let json = r#"{
            "invoices": [
                {
                    "id": "inv-1",
                    "client": "Acme Co",
                    "number": "2024-007",
                    "payments": [
                        {"id": "pay-1", "date": "2024-05-01", "amount": 1500.00},
                        {"id": "pay-2", "date": "2024-06-01", "amount": 500.00, "currency": "USD"}
                    ]
                }
            ]
        }"#;

        let input = read_input(json.as_bytes()).unwrap();
        let invoice = &input.invoices[0];
        assert_eq!(invoice.payments.len(), 2);
        assert_eq!(invoice.payments[0].currency, "USD");
        assert_eq!(invoice.payments[1].amount, dec!(500.00));
    }

    #[test]
    fn row_dates_parse_date_only() {
        assert_eq!(
            parse_row_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_row_date("03/01/2024").is_err());
        assert!(parse_row_date("not-a-date").is_err());
    }
}
