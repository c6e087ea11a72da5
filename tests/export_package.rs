//! E2E tests for the build, validate, summary and rows commands

use std::process::{Command, Output};

const FIXED_CREATED_AT: &str = "2025-01-15T00:00:00+00:00";

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn build_args<'a>(fixture: &'a str, extra: &[&'a str]) -> Vec<&'a str> {
    let mut args = vec![
        "build",
        "--rows",
        fixture,
        "--year",
        "2024",
        "--include-tips",
        "--created-at",
        FIXED_CREATED_AT,
    ];
    args.extend_from_slice(extra);
    args
}

#[test]
fn build_full_package() {
    let output = run(&build_args("tests/data/rows_2024.json", &[]));
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);

    // gross = (1000 + 100 tips) gig + 1500 invoice payment = 2600
    // expenses = 100 meals + 300 equipment + 25 other + 67 mileage = 492
    // returns = 50 gig fees; net = 2600 - 50 - 492 = 2058
    assert!(stdout.contains("\"gross_receipts\": \"2600.00\""));
    assert!(stdout.contains("\"returns_allowances\": \"50.00\""));
    assert!(stdout.contains("\"net_profit\": \"2058.00\""));

    // Unpaid gig is absent, not zeroed.
    assert!(!stdout.contains("gig-2"));

    // Mileage injected under the car-and-truck ref at the 2024 rate.
    assert!(stdout.contains("\"9\": \"67.00\""));
    assert!(stdout.contains("standard mileage rate"));

    // Other-expenses breakdown keyed "<source>: <category>".
    assert!(stdout.contains("Manual: Pet Grooming"));

    // Receipts manifest carries the expense receipt.
    assert!(stdout.contains("https://receipts.example/exp-1.pdf"));

    // Payer rollup enriched from the payer record.
    assert!(stdout.contains("Big Venue LLC"));
    assert!(stdout.contains("12-3456789"));
}

#[test]
fn build_is_deterministic() {
    let first = run(&build_args("tests/data/rows_2024.json", &[]));
    let second = run(&build_args("tests/data/rows_2024.json", &[]));
    assert!(first.status.success());
    assert!(second.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn fingerprint_is_stable() {
    let first = run(&build_args("tests/data/rows_2024.json", &["--fingerprint"]));
    let second = run(&build_args("tests/data/rows_2024.json", &["--fingerprint"]));
    assert!(first.status.success());

    let fingerprint = String::from_utf8_lossy(&first.stdout);
    let fingerprint = fingerprint.trim();
    assert_eq!(fingerprint.len(), 64, "expected a hex SHA-256: {}", fingerprint);
    assert!(fingerprint.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn fees_as_deduction_changes_treatment_not_profit() {
    let output = run(&build_args(
        "tests/data/rows_2024.json",
        &["--fees-as-deduction"],
    ));
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"returns_allowances\": \"0.00\""));
    assert!(stdout.contains("\"10\": \"50.00\""));
    assert!(stdout.contains("\"net_profit\": \"2058.00\""));
}

#[test]
fn non_usd_row_fails_the_whole_build() {
    let output = run(&build_args("tests/data/rows_eur.json", &[]));
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("non-USD"), "stderr: {}", stderr);
    assert!(stderr.contains("EUR"));

    // No partial package on stdout.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("net_profit"));
}

#[test]
fn validate_exits_nonzero_on_blocking_issues() {
    let output = run(&["validate", "--rows", "tests/data/rows_invalid.json"]);
    assert!(!output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("VALIDATION RESULTS"));
    assert!(stdout.contains("ERRORS"));
    assert!(stdout.contains("MalformedDate"));
    assert!(stdout.contains("MissingCategory"));
    assert!(stdout.contains("NegativeAmount"));
}

#[test]
fn validate_passes_clean_rows_with_warnings() {
    let output = run(&["validate", "--rows", "tests/data/rows_2024.json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("VALIDATION RESULTS"));
    // The meals expense has no stored percentage: warned, not blocked.
    assert!(stdout.contains("MissingMealsPercent"));
}

#[test]
fn validate_json_output() {
    let output = run(&[
        "validate",
        "--rows",
        "tests/data/rows_2024.json",
        "--json",
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"is_valid\": true"));
    assert!(stdout.contains("\"summary\""));
}

#[test]
fn summary_renders_tables() {
    let mut args = vec!["summary"];
    args.extend_from_slice(&[
        "--rows",
        "tests/data/rows_2024.json",
        "--year",
        "2024",
        "--include-tips",
        "--created-at",
        FIXED_CREATED_AT,
    ]);
    let output = run(&args);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TAX EXPORT SUMMARY"));
    assert!(stdout.contains("SCHEDULE C LINES"));
    assert!(stdout.contains("NET PROFIT: $2058.00"));
    assert!(stdout.contains("Big Venue LLC"));
    assert!(stdout.contains("MILEAGE"));
}

#[test]
fn rows_exports_expense_csv() {
    let mut args = vec!["rows"];
    args.extend_from_slice(&[
        "--rows",
        "tests/data/rows_2024.json",
        "--year",
        "2024",
        "--created-at",
        FIXED_CREATED_AT,
        "--kind",
        "expenses",
    ]);
    let output = run(&args);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ref_number"));
    assert!(stdout.contains("deductible_amount"));
    assert!(stdout.contains("24b"));
    assert!(stdout.contains("exp-1"));
}

#[test]
fn rates_table_shows_published_years() {
    let output = run(&["rates"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Tax Year"));
    assert!(stdout.contains("2024"));
    assert!(stdout.contains("0.67"));
}

#[test]
fn schema_outputs_input_shape() {
    let output = run(&["schema"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"gigs\""));
    assert!(stdout.contains("\"expenses\""));

    let example = run(&["schema", "example"]);
    assert!(example.status.success());
    let stdout = String::from_utf8_lossy(&example.stdout);
    assert!(stdout.contains("\"payers\""));
}
