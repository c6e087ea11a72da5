use crate::core::category::{
    line_name_for_ref, map_category, ExpenseCategory, CAR_AND_TRUCK_REF, COGS_REF,
    COMMISSIONS_AND_FEES_REF, GROSS_RECEIPTS_REF, OTHER_EXPENSES_REF, OTHER_INCOME_REF,
    RETURNS_ALLOWANCES_REF,
};
use crate::core::config::{BuilderConfig, PACKAGE_CURRENCY};
use crate::core::describe::resolve_income_description;
use crate::core::error::BuildError;
use crate::core::package::{
    Basis, ExpenseRow, IncomeRow, IncomeSource, InvoiceRow, MileageRow, MileageSummary,
    OtherExpenseItem, PackageMetadata, PayerSummaryRow, ReceiptRef, RoundingSpec, ScheduleC,
    ScheduleCLineItem, SubcontractorPayoutRow, TaxExportPackage,
};
use crate::core::rounding::round_cents;
use crate::core::rows::{parse_row_date, ExportInput, PayerRecord};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Bucket label for gig income with no payer on record.
const UNKNOWN_PAYER_LABEL: &str = "Unknown payer";

/// Per-request build options. `created_at` is an input so the whole build
/// stays a pure function of its arguments.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub tax_year: i32,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub timezone: String,
    /// Requested accounting basis; anything but "cash" is rejected
    pub basis: String,
    pub include_tips: bool,
    pub include_fees_as_deduction: bool,
    /// Requester identity, checked against the snapshot owner when both are set
    pub requested_by: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl BuildOptions {
    pub fn for_year(tax_year: i32, created_at: DateTime<FixedOffset>) -> Self {
        BuildOptions {
            tax_year,
            date_start: None,
            date_end: None,
            timezone: "UTC".to_string(),
            basis: "cash".to_string(),
            include_tips: true,
            include_fees_as_deduction: false,
            requested_by: None,
            created_at,
        }
    }

    /// Covered date range, defaulting to the full calendar tax year.
    fn range(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .date_start
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.tax_year, 1, 1).unwrap());
        let end = self
            .date_end
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(self.tax_year, 12, 31).unwrap());
        (start, end)
    }
}

/// Build one canonical tax export package from a fixed snapshot of raw rows.
///
/// All-or-nothing: any currency, basis or ownership violation aborts before
/// a package exists. A degraded package would misstate tax totals, so there
/// is no partial output.
pub fn build_package(
    rows: &ExportInput,
    options: &BuildOptions,
    config: &BuilderConfig,
) -> Result<TaxExportPackage, BuildError> {
    if options.basis != "cash" {
        return Err(BuildError::Unsupported(format!(
            "accounting basis '{}' (only cash basis is supported)",
            options.basis
        )));
    }
    if let (Some(requested_by), Some(owner)) = (&options.requested_by, &rows.owner) {
        if requested_by != owner {
            return Err(BuildError::NotAuthorized {
                requested_by: requested_by.clone(),
                owner: owner.clone(),
            });
        }
    }
    check_currencies(rows)?;

    let (date_start, date_end) = options.range();

    // Income: paid gigs, then invoice payments. Unpaid gigs are absent from
    // the package, not zeroed.
    let mut income_rows: Vec<IncomeRow> = Vec::new();
    for gig in &rows.gigs {
        if !gig.paid {
            log::debug!("excluding unpaid gig {}", gig.id);
            continue;
        }
        let date = parse_date(&gig.date, "gig", &gig.id)?;
        let tips = if options.include_tips {
            gig.tips
        } else {
            Decimal::ZERO
        };
        let gross = round_cents(gig.base_amount + tips + gig.per_diem + gig.other_income);
        let fees = round_cents(gig.fees);
        let net = round_cents(gross - fees);
        income_rows.push(IncomeRow {
            source_row_id: gig.id.clone(),
            date,
            source: IncomeSource::Gig,
            app_label: Some(gig.source.clone()),
            payer: gig.payer.clone(),
            description: resolve_income_description(
                gig.title.as_deref(),
                gig.venue.as_deref(),
                gig.note.as_deref(),
                gig.city.as_deref(),
            ),
            gross,
            fees,
            net,
            currency: gig.currency.clone(),
        });
    }

    let mut invoice_rows: Vec<InvoiceRow> = Vec::new();
    for invoice in &rows.invoices {
        let mut total_paid = Decimal::ZERO;
        for payment in &invoice.payments {
            let date = parse_date(&payment.date, "invoice payment", &payment.id)?;
            let amount = round_cents(payment.amount);
            total_paid += amount;
            let description = match &invoice.number {
                Some(number) => format!("Invoice {} payment from {}", number, invoice.client),
                None => format!("Invoice payment from {}", invoice.client),
            };
            income_rows.push(IncomeRow {
                source_row_id: payment.id.clone(),
                date,
                source: IncomeSource::InvoicePayment,
                app_label: None,
                payer: None,
                description,
                gross: amount,
                fees: Decimal::ZERO,
                net: amount,
                currency: payment.currency.clone(),
            });
        }
        invoice_rows.push(InvoiceRow {
            source_row_id: invoice.id.clone(),
            client: invoice.client.clone(),
            number: invoice.number.clone(),
            payments_count: invoice.payments.len(),
            total_paid: round_cents(total_paid),
            currency: invoice.currency.clone(),
        });
    }
    income_rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.source_row_id.cmp(&b.source_row_id))
    });

    // Expenses through the category mapper.
    let mut expense_rows: Vec<ExpenseRow> = Vec::new();
    let mut receipts_manifest: Vec<ReceiptRef> = Vec::new();
    let mut meals_limited = false;
    for expense in &rows.expenses {
        let date = parse_date(&expense.date, "expense", &expense.id)?;
        let mapping = map_category(&expense.category, expense.deductible_percent, config);
        let category = ExpenseCategory::parse(&expense.category);
        let amount = round_cents(expense.amount);
        let deductible_amount = round_cents(expense.amount * mapping.deductible_percent);
        if category.is_meals() && mapping.deductible_percent != Decimal::ONE {
            meals_limited = true;
        }
        let (potential_asset_review, asset_review_reason) =
            asset_review(&category, amount, config);
        if let Some(receipt_url) = &expense.receipt_url {
            receipts_manifest.push(ReceiptRef {
                transaction_id: expense.id.clone(),
                receipt_url: receipt_url.clone(),
                kind: "expense".to_string(),
            });
        }
        expense_rows.push(ExpenseRow {
            source_row_id: expense.id.clone(),
            date,
            source_label: expense
                .source
                .clone()
                .unwrap_or_else(|| "Manual".to_string()),
            category: expense.category.clone(),
            ref_number: mapping.ref_number,
            line_name: mapping.line_name,
            description: expense.description.clone(),
            amount,
            deductible_percent: mapping.deductible_percent,
            deductible_amount,
            potential_asset_review,
            asset_review_reason,
            receipt_url: expense.receipt_url.clone(),
        });
    }
    expense_rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.source_row_id.cmp(&b.source_row_id))
    });

    // Mileage at the requested year's standard rate. Every row is an
    // estimate; the actual-expense method is not supported.
    let standard_rate = config.mileage_rates.rate_for_year(options.tax_year);
    let mut mileage_rows: Vec<MileageRow> = Vec::new();
    for trip in &rows.mileage {
        let date = parse_date(&trip.date, "mileage trip", &trip.id)?;
        let deduction = match trip.deduction {
            Some(precomputed) => round_cents(precomputed),
            None => round_cents(trip.miles * standard_rate),
        };
        mileage_rows.push(MileageRow {
            source_row_id: trip.id.clone(),
            date,
            miles: trip.miles,
            rate: standard_rate,
            deduction,
            is_estimate: true,
            purpose: trip.purpose.clone(),
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
        });
    }
    mileage_rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.source_row_id.cmp(&b.source_row_id))
    });

    let mut subcontractor_payout_rows: Vec<SubcontractorPayoutRow> = Vec::new();
    for payment in &rows.subcontractor_payments {
        let date = parse_date(&payment.date, "subcontractor payment", &payment.id)?;
        subcontractor_payout_rows.push(SubcontractorPayoutRow {
            source_row_id: payment.id.clone(),
            date,
            payee: payment.payee.clone(),
            amount: round_cents(payment.amount),
            purpose: payment.purpose.clone(),
        });
    }
    subcontractor_payout_rows.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.source_row_id.cmp(&b.source_row_id))
    });

    // Aggregation into per-ref totals plus the itemized Other breakdown.
    let mut expense_totals: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut breakdown: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in &expense_rows {
        *expense_totals
            .entry(row.ref_number.clone())
            .or_insert(Decimal::ZERO) += row.deductible_amount;
        if row.ref_number == OTHER_EXPENSES_REF {
            let key = format!("{}: {}", row.source_label, row.category);
            *breakdown.entry(key).or_insert(Decimal::ZERO) += row.deductible_amount;
        }
    }

    let mut warnings: Vec<String> = Vec::new();

    let mileage_total: Decimal = mileage_rows.iter().map(|row| row.deduction).sum();
    if !mileage_total.is_zero() {
        *expense_totals
            .entry(CAR_AND_TRUCK_REF.to_string())
            .or_insert(Decimal::ZERO) += mileage_total;
        warnings.push(format!(
            "Mileage deduction of ${} uses the {} standard mileage rate (${}/mile); \
             actual vehicle expenses are not included.",
            mileage_total, options.tax_year, standard_rate
        ));
    }

    if meals_limited {
        warnings.push(format!(
            "Meals expenses were deducted at a limited percentage (default {}%); \
             the non-deductible remainder is excluded from every total.",
            (config.default_meals_percent * dec!(100)).normalize()
        ));
    }

    // Fee treatment is exclusive: either fees become their own deduction
    // line, or they populate returns and allowances. Never both.
    let fees_total: Decimal = income_rows
        .iter()
        .filter(|row| row.source == IncomeSource::Gig)
        .map(|row| row.fees)
        .sum();
    let returns_allowances = if options.include_fees_as_deduction {
        if !fees_total.is_zero() {
            *expense_totals
                .entry(COMMISSIONS_AND_FEES_REF.to_string())
                .or_insert(Decimal::ZERO) += fees_total;
        }
        round_cents(Decimal::ZERO)
    } else {
        round_cents(fees_total)
    };

    let gross_receipts = round_cents(income_rows.iter().map(|row| row.gross).sum());
    // No raw-row source exists for either of these in this snapshot shape;
    // they stay zero but keep their place in the net-profit formula.
    let cogs = round_cents(Decimal::ZERO);
    let other_income = round_cents(Decimal::ZERO);
    let expenses_total: Decimal = expense_totals.values().copied().sum();
    let net_profit =
        round_cents(gross_receipts - returns_allowances - cogs - expenses_total + other_income);
    log::debug!(
        "totals: gross={} returns={} expenses={} net={}",
        gross_receipts,
        returns_allowances,
        expenses_total,
        net_profit
    );

    let payer_summary_rows = summarize_payers(&income_rows, &rows.payers, date_start);

    let mileage_summary = MileageSummary {
        tax_year: options.tax_year,
        total_business_miles: mileage_rows.iter().map(|row| row.miles).sum(),
        standard_rate_used: standard_rate,
        mileage_deduction_amount: round_cents(mileage_total),
        entries_count: mileage_rows.len(),
        is_estimate_any: mileage_rows.iter().any(|row| row.is_estimate),
        notes: if mileage_rows.is_empty() {
            Vec::new()
        } else {
            vec![
                "Computed with the standard mileage method; actual vehicle costs are not tracked."
                    .to_string(),
            ]
        },
    };

    let other_expenses_breakdown: Vec<OtherExpenseItem> = breakdown
        .into_iter()
        .map(|(name, amount)| OtherExpenseItem { name, amount })
        .collect();

    let schedule_c_line_items = build_line_items(
        options.tax_year,
        gross_receipts,
        returns_allowances,
        cogs,
        other_income,
        &expense_totals,
        &other_expenses_breakdown,
    );

    let schedule_c = ScheduleC {
        gross_receipts,
        returns_allowances,
        cogs,
        other_income,
        expense_totals_by_ref: expense_totals,
        other_expenses_breakdown,
        net_profit,
        warnings,
    };

    let metadata = PackageMetadata {
        tax_year: options.tax_year,
        date_start,
        date_end,
        created_at: options.created_at,
        timezone: options.timezone.clone(),
        basis: Basis::Cash,
        currency: PACKAGE_CURRENCY.to_string(),
        rounding: RoundingSpec::default(),
        schema_version: config.schema_version,
    };

    Ok(TaxExportPackage {
        metadata,
        schedule_c,
        schedule_c_line_items,
        income_rows,
        expense_rows,
        mileage_rows,
        invoice_rows,
        subcontractor_payout_rows,
        payer_summary_rows,
        mileage_summary,
        receipts_manifest,
    })
}

/// Scan every invoice-bearing row before any assembly. One mismatch fails
/// the whole build.
fn check_currencies(rows: &ExportInput) -> Result<(), BuildError> {
    for gig in &rows.gigs {
        if gig.currency != PACKAGE_CURRENCY {
            return Err(BuildError::NonUsdCurrency {
                row_kind: "gig",
                row_id: gig.id.clone(),
                currency: gig.currency.clone(),
            });
        }
    }
    for invoice in &rows.invoices {
        if invoice.currency != PACKAGE_CURRENCY {
            return Err(BuildError::NonUsdCurrency {
                row_kind: "invoice",
                row_id: invoice.id.clone(),
                currency: invoice.currency.clone(),
            });
        }
        for payment in &invoice.payments {
            if payment.currency != PACKAGE_CURRENCY {
                return Err(BuildError::NonUsdCurrency {
                    row_kind: "invoice payment",
                    row_id: payment.id.clone(),
                    currency: payment.currency.clone(),
                });
            }
        }
    }
    Ok(())
}

fn parse_date(raw: &str, row_kind: &str, row_id: &str) -> Result<NaiveDate, BuildError> {
    parse_row_date(raw).map_err(|_| {
        BuildError::DataLoadFailed(format!(
            "invalid date '{}' on {} {}",
            raw, row_kind, row_id
        ))
    })
}

/// Asset-review flag with mutually exclusive reasons: the equipment/gear
/// category wins over the large-amount threshold.
fn asset_review(
    category: &ExpenseCategory,
    amount: Decimal,
    config: &BuilderConfig,
) -> (bool, Option<String>) {
    if category.is_equipment() {
        (
            true,
            Some("Equipment/gear purchase; review for depreciation.".to_string()),
        )
    } else if amount >= config.asset_review_threshold {
        (
            true,
            Some(format!(
                "Amount of ${} meets the ${} capitalization threshold; review for depreciation.",
                amount, config.asset_review_threshold
            )),
        )
    } else {
        (false, None)
    }
}

struct PayerAccumulator {
    tax_id: Option<String>,
    count: usize,
    gross: Decimal,
    fees: Decimal,
    net: Decimal,
    dates: Vec<NaiveDate>,
    note: Option<String>,
}

/// Per-payer rollups over gig income rows. Invoice payments carry no payer
/// and are excluded.
fn summarize_payers(
    income_rows: &[IncomeRow],
    payers: &[PayerRecord],
    fallback_date: NaiveDate,
) -> Vec<PayerSummaryRow> {
    let payer_records: BTreeMap<&str, &PayerRecord> =
        payers.iter().map(|payer| (payer.id.as_str(), payer)).collect();

    let mut accumulators: BTreeMap<String, PayerAccumulator> = BTreeMap::new();
    for row in income_rows
        .iter()
        .filter(|row| row.source == IncomeSource::Gig)
    {
        let (key, tax_id, note) = match &row.payer {
            Some(payer_id) => match payer_records.get(payer_id.as_str()) {
                Some(record) => (record.name.clone(), record.tax_id.clone(), None),
                None => (payer_id.clone(), None, None),
            },
            None => (
                UNKNOWN_PAYER_LABEL.to_string(),
                None,
                Some("No payer on record; review before 1099 reconciliation.".to_string()),
            ),
        };
        let acc = accumulators
            .entry(key)
            .or_insert_with(|| PayerAccumulator {
                tax_id,
                count: 0,
                gross: Decimal::ZERO,
                fees: Decimal::ZERO,
                net: Decimal::ZERO,
                dates: Vec::new(),
                note,
            });
        acc.count += 1;
        acc.gross += row.gross;
        acc.fees += row.fees;
        acc.net += row.net;
        acc.dates.push(row.date);
    }

    accumulators
        .into_iter()
        .map(|(payer, mut acc)| {
            acc.dates.sort();
            PayerSummaryRow {
                payer,
                tax_id: acc.tax_id,
                payments_count: acc.count,
                gross: round_cents(acc.gross),
                fees: round_cents(acc.fees),
                net: round_cents(acc.net),
                first_payment_date: acc.dates.first().copied().unwrap_or(fallback_date),
                last_payment_date: acc.dates.last().copied().unwrap_or(fallback_date),
                note: acc.note,
            }
        })
        .collect()
}

/// Manual-entry lines: non-zero top-level income categories first, then one
/// line per non-zero expense ref, then the itemized Other entries.
fn build_line_items(
    tax_year: i32,
    gross_receipts: Decimal,
    returns_allowances: Decimal,
    cogs: Decimal,
    other_income: Decimal,
    expense_totals: &BTreeMap<String, Decimal>,
    other_breakdown: &[OtherExpenseItem],
) -> Vec<ScheduleCLineItem> {
    let mut items = Vec::new();

    let top_level = [
        (
            GROSS_RECEIPTS_REF,
            gross_receipts,
            format!("Gross receipts for {}", tax_year),
        ),
        (
            RETURNS_ALLOWANCES_REF,
            returns_allowances,
            "Processor and platform fees".to_string(),
        ),
        (COGS_REF, cogs, "Cost of goods sold".to_string()),
        (OTHER_INCOME_REF, other_income, "Other business income".to_string()),
    ];
    for (ref_number, amount, description) in top_level {
        if amount.is_zero() {
            continue;
        }
        items.push(ScheduleCLineItem {
            ref_number: ref_number.to_string(),
            line_name: line_name_for_ref(ref_number).to_string(),
            description,
            raw_signed_amount: amount,
            amount_for_entry: amount,
            notes: None,
        });
    }

    for (ref_number, amount) in expense_totals {
        if amount.is_zero() {
            continue;
        }
        let line_name = line_name_for_ref(ref_number);
        items.push(ScheduleCLineItem {
            ref_number: ref_number.clone(),
            line_name: line_name.to_string(),
            description: format!("{} total", line_name),
            raw_signed_amount: -*amount,
            amount_for_entry: *amount,
            notes: None,
        });
    }

    for item in other_breakdown {
        if item.amount.is_zero() {
            continue;
        }
        items.push(ScheduleCLineItem {
            ref_number: OTHER_EXPENSES_REF.to_string(),
            line_name: line_name_for_ref(OTHER_EXPENSES_REF).to_string(),
            description: item.name.clone(),
            raw_signed_amount: -item.amount,
            amount_for_entry: item.amount,
            notes: Some(format!("Part of the line {} total", OTHER_EXPENSES_REF)),
        });
    }

    items
}
