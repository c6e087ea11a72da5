use crate::core::category::ExpenseCategory;
use crate::core::rows::{parse_row_date, ExportInput};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What a validation issue is about. Blocking kinds gate tax-software-ready
/// exports; warning kinds are surfaced but never block anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum IssueKind {
    MissingCategory,
    NegativeAmount,
    MalformedDate,
    MissingPayer,
    MissingPayerTaxId,
    MissingMealsPercent,
    MissingMileageContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Which row collection the issue belongs to (e.g. "gig", "expense")
    pub row_kind: String,
    pub row_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationSummary {
    pub rows_checked: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Result of the pre-pass. Advisory only: it never mutates rows and never
/// blocks package construction, only the offering of strict export formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub summary: ValidationSummary,
}

/// Row-level validation over a raw snapshot, independent of the builder.
pub fn validate_rows(rows: &ExportInput) -> ValidationReport {
    let mut errors: Vec<ValidationIssue> = Vec::new();
    let mut warnings: Vec<ValidationIssue> = Vec::new();
    let mut rows_checked = 0usize;

    for gig in &rows.gigs {
        rows_checked += 1;
        check_date(&mut errors, "gig", &gig.id, &gig.date);
        let amounts = [
            ("base amount", gig.base_amount),
            ("tips", gig.tips),
            ("per diem", gig.per_diem),
            ("other income", gig.other_income),
            ("fees", gig.fees),
        ];
        for (field, amount) in amounts {
            check_amount(&mut errors, "gig", &gig.id, field, amount);
        }
        if gig.paid {
            match &gig.payer {
                None => warnings.push(issue(
                    IssueKind::MissingPayer,
                    "gig",
                    &gig.id,
                    "paid gig has no payer on record".to_string(),
                )),
                Some(payer_id) => {
                    let has_tax_id = rows
                        .payers
                        .iter()
                        .any(|payer| &payer.id == payer_id && payer.tax_id.is_some());
                    if !has_tax_id {
                        warnings.push(issue(
                            IssueKind::MissingPayerTaxId,
                            "gig",
                            &gig.id,
                            format!("payer '{}' has no tax ID on record", payer_id),
                        ));
                    }
                }
            }
        }
    }

    for expense in &rows.expenses {
        rows_checked += 1;
        check_date(&mut errors, "expense", &expense.id, &expense.date);
        if expense.category.trim().is_empty() {
            errors.push(issue(
                IssueKind::MissingCategory,
                "expense",
                &expense.id,
                "expense has no category; a tax line cannot be assigned".to_string(),
            ));
        }
        check_amount(&mut errors, "expense", &expense.id, "amount", expense.amount);
        if ExpenseCategory::parse(&expense.category).is_meals()
            && expense.deductible_percent.is_none()
        {
            warnings.push(issue(
                IssueKind::MissingMealsPercent,
                "expense",
                &expense.id,
                "no meals deduction percentage stored; the 50% default applies".to_string(),
            ));
        }
    }

    for trip in &rows.mileage {
        rows_checked += 1;
        check_date(&mut errors, "mileage trip", &trip.id, &trip.date);
        check_amount(&mut errors, "mileage trip", &trip.id, "miles", trip.miles);
        let mut missing: Vec<&str> = Vec::new();
        if is_blank(&trip.purpose) {
            missing.push("purpose");
        }
        if is_blank(&trip.origin) {
            missing.push("origin");
        }
        if is_blank(&trip.destination) {
            missing.push("destination");
        }
        if !missing.is_empty() {
            warnings.push(issue(
                IssueKind::MissingMileageContext,
                "mileage trip",
                &trip.id,
                format!("missing {}", missing.join(", ")),
            ));
        }
    }

    for invoice in &rows.invoices {
        rows_checked += 1;
        for payment in &invoice.payments {
            rows_checked += 1;
            check_date(&mut errors, "invoice payment", &payment.id, &payment.date);
            check_amount(
                &mut errors,
                "invoice payment",
                &payment.id,
                "amount",
                payment.amount,
            );
        }
    }

    for payment in &rows.subcontractor_payments {
        rows_checked += 1;
        check_date(&mut errors, "subcontractor payment", &payment.id, &payment.date);
        check_amount(
            &mut errors,
            "subcontractor payment",
            &payment.id,
            "amount",
            payment.amount,
        );
    }

    let summary = ValidationSummary {
        rows_checked,
        error_count: errors.len(),
        warning_count: warnings.len(),
    };
    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        summary,
    }
}

fn issue(kind: IssueKind, row_kind: &str, row_id: &str, message: String) -> ValidationIssue {
    ValidationIssue {
        kind,
        row_kind: row_kind.to_string(),
        row_id: row_id.to_string(),
        message,
    }
}

fn check_date(errors: &mut Vec<ValidationIssue>, row_kind: &str, row_id: &str, raw: &str) {
    if parse_row_date(raw).is_err() {
        errors.push(issue(
            IssueKind::MalformedDate,
            row_kind,
            row_id,
            format!("date '{}' is not YYYY-MM-DD", raw),
        ));
    }
}

fn check_amount(
    errors: &mut Vec<ValidationIssue>,
    row_kind: &str,
    row_id: &str,
    field: &str,
    amount: Decimal,
) {
    if amount < Decimal::ZERO {
        errors.push(issue(
            IssueKind::NegativeAmount,
            row_kind,
            row_id,
            format!("{} is negative ({})", field, amount),
        ));
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rows::{ExpenseRecord, GigRecord, MileageRecord, PayerRecord};
    use rust_decimal_macros::dec;

    fn gig(id: &str, paid: bool) -> GigRecord {
        GigRecord {
            id: id.to_string(),
            date: "2024-03-01".to_string(),
            source: "Rideshare".to_string(),
            payer: None,
            title: None,
            venue: None,
            note: None,
            city: None,
            base_amount: dec!(100),
            tips: Decimal::ZERO,
            per_diem: Decimal::ZERO,
            other_income: Decimal::ZERO,
            fees: Decimal::ZERO,
            paid,
            currency: "USD".to_string(),
        }
    }

    fn expense(id: &str, category: &str, amount: Decimal) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            date: "2024-04-01".to_string(),
            category: category.to_string(),
            description: None,
            amount,
            deductible_percent: None,
            receipt_url: None,
            source: None,
        }
    }

    #[test]
    fn clean_rows_are_valid() {
        let mut paid = gig("gig-1", true);
        paid.payer = Some("payer-1".to_string());
        let input = ExportInput {
            gigs: vec![paid],
            expenses: vec![expense("exp-1", "Supplies", dec!(50))],
            payers: vec![PayerRecord {
                id: "payer-1".to_string(),
                name: "Venue".to_string(),
                tax_id: Some("12-3456789".to_string()),
            }],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
        assert_eq!(report.summary.rows_checked, 2);
    }

    #[test]
    fn blank_category_is_blocking() {
        let input = ExportInput {
            expenses: vec![expense("exp-1", "   ", dec!(50))],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].kind, IssueKind::MissingCategory);
    }

    #[test]
    fn negative_amounts_are_blocking() {
        let mut bad_gig = gig("gig-1", false);
        bad_gig.fees = dec!(-5);
        let input = ExportInput {
            gigs: vec![bad_gig],
            expenses: vec![expense("exp-1", "Supplies", dec!(-10))],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert_eq!(report.errors.len(), 2);
        assert!(report
            .errors
            .iter()
            .all(|issue| issue.kind == IssueKind::NegativeAmount));
    }

    #[test]
    fn malformed_date_is_blocking() {
        let mut bad = gig("gig-1", false);
        bad.date = "01/03/2024".to_string();
        let input = ExportInput {
            gigs: vec![bad],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].kind, IssueKind::MalformedDate);
    }

    #[test]
    fn paid_gig_without_payer_warns_only() {
        let input = ExportInput {
            gigs: vec![gig("gig-1", true)],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.is_valid);
        assert_eq!(report.warnings[0].kind, IssueKind::MissingPayer);
    }

    #[test]
    fn unpaid_gig_without_payer_not_flagged() {
        let input = ExportInput {
            gigs: vec![gig("gig-1", false)],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn payer_without_tax_id_warns() {
        let mut paid = gig("gig-1", true);
        paid.payer = Some("payer-1".to_string());
        let input = ExportInput {
            gigs: vec![paid],
            payers: vec![PayerRecord {
                id: "payer-1".to_string(),
                name: "Venue".to_string(),
                tax_id: None,
            }],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.is_valid);
        assert_eq!(report.warnings[0].kind, IssueKind::MissingPayerTaxId);
    }

    #[test]
    fn meals_without_stored_percent_warns() {
        let input = ExportInput {
            expenses: vec![expense("exp-1", "Meals & Entertainment", dec!(80))],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.is_valid);
        assert_eq!(report.warnings[0].kind, IssueKind::MissingMealsPercent);
        assert!(report.warnings[0].message.contains("50%"));
    }

    #[test]
    fn mileage_missing_context_warns_with_field_names() {
        let input = ExportInput {
            mileage: vec![MileageRecord {
                id: "trip-1".to_string(),
                date: "2024-07-01".to_string(),
                miles: dec!(12),
                purpose: None,
                origin: Some("Home".to_string()),
                destination: None,
                deduction: None,
            }],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert!(report.is_valid);
        let warning = &report.warnings[0];
        assert_eq!(warning.kind, IssueKind::MissingMileageContext);
        assert!(warning.message.contains("purpose"));
        assert!(warning.message.contains("destination"));
        assert!(!warning.message.contains("origin"));
    }

    #[test]
    fn summary_counts_match() {
        let mut bad = gig("gig-1", true);
        bad.date = "bad".to_string();
        let input = ExportInput {
            gigs: vec![bad],
            expenses: vec![expense("exp-1", "Meals", dec!(80))],
            ..ExportInput::default()
        };

        let report = validate_rows(&input);
        assert_eq!(report.summary.rows_checked, 2);
        assert_eq!(report.summary.error_count, report.errors.len());
        assert_eq!(report.summary.warning_count, report.warnings.len());
    }
}
