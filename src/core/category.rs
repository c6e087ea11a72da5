use crate::core::config::BuilderConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Schedule C reference numbers for income-side lines.
pub const GROSS_RECEIPTS_REF: &str = "1";
pub const RETURNS_ALLOWANCES_REF: &str = "2";
pub const COGS_REF: &str = "4";
pub const OTHER_INCOME_REF: &str = "6";

/// Expense-side lines the mapper can land on.
pub const CAR_AND_TRUCK_REF: &str = "9";
pub const COMMISSIONS_AND_FEES_REF: &str = "10";
pub const OTHER_EXPENSES_REF: &str = "27a";

/// Known expense categories. `Other` carries the original string so that
/// unmapped categories are tagged, never dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseCategory {
    Advertising,
    CarAndTruck,
    CommissionsAndFees,
    ContractLabor,
    Depreciation,
    EquipmentGear,
    Insurance,
    Interest,
    LegalAndProfessional,
    MealsAndEntertainment,
    OfficeExpense,
    PhoneAndInternet,
    RentOrLease,
    RepairsAndMaintenance,
    SoftwareAndSubscriptions,
    Supplies,
    TaxesAndLicenses,
    Travel,
    Utilities,
    Wages,
    Other(String),
}

impl ExpenseCategory {
    /// Total parse: every input maps to some category. Matching is
    /// case-insensitive and ignores punctuation and whitespace, so
    /// "Meals & Entertainment", "meals and entertainment" and "Meals"
    /// all land on the same variant.
    pub fn parse(raw: &str) -> ExpenseCategory {
        let key: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match key.as_str() {
            "advertising" | "marketing" => ExpenseCategory::Advertising,
            "carandtruck" | "cartruck" | "vehicle" => ExpenseCategory::CarAndTruck,
            "commissionsandfees" | "commissionsfees" | "commissions" => {
                ExpenseCategory::CommissionsAndFees
            }
            "contractlabor" | "contractors" => ExpenseCategory::ContractLabor,
            "depreciation" => ExpenseCategory::Depreciation,
            "equipmentgear" | "equipment" | "gear" => ExpenseCategory::EquipmentGear,
            "insurance" => ExpenseCategory::Insurance,
            "interest" => ExpenseCategory::Interest,
            "legalandprofessional" | "legalprofessional" | "professionalservices" => {
                ExpenseCategory::LegalAndProfessional
            }
            "mealsandentertainment" | "mealsentertainment" | "meals" => {
                ExpenseCategory::MealsAndEntertainment
            }
            "officeexpense" | "officesupplies" | "office" => ExpenseCategory::OfficeExpense,
            "phoneandinternet" | "phoneinternet" | "phone" | "internet" => {
                ExpenseCategory::PhoneAndInternet
            }
            "rentorlease" | "rentlease" | "rent" => ExpenseCategory::RentOrLease,
            "repairsandmaintenance" | "repairsmaintenance" | "repairs" => {
                ExpenseCategory::RepairsAndMaintenance
            }
            "softwareandsubscriptions" | "softwaresubscriptions" | "software"
            | "subscriptions" => ExpenseCategory::SoftwareAndSubscriptions,
            "supplies" => ExpenseCategory::Supplies,
            "taxesandlicenses" | "taxeslicenses" | "licenses" => ExpenseCategory::TaxesAndLicenses,
            "travel" => ExpenseCategory::Travel,
            "utilities" => ExpenseCategory::Utilities,
            "wages" | "payroll" => ExpenseCategory::Wages,
            _ => ExpenseCategory::Other(raw.to_string()),
        }
    }

    /// Equipment/gear purchases are depreciation candidates regardless of
    /// amount.
    pub fn is_equipment(&self) -> bool {
        matches!(self, ExpenseCategory::EquipmentGear)
    }

    pub fn is_meals(&self) -> bool {
        matches!(self, ExpenseCategory::MealsAndEntertainment)
    }
}

/// Result of mapping a raw category string onto a Schedule C line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMapping {
    pub ref_number: String,
    pub line_name: String,
    /// Deductible fraction, 1.0 = fully deductible.
    pub deductible_percent: Decimal,
    /// Set only for the Other line: the tag downstream consumers itemize by.
    pub other_description: Option<String>,
}

/// Map a free-form category (plus an optional per-row override percent) to a
/// tax line and deductible fraction. Deterministic, pure and total: unknown
/// categories land on the Other line with the literal category as their tag.
pub fn map_category(
    raw: &str,
    override_percent: Option<Decimal>,
    config: &BuilderConfig,
) -> CategoryMapping {
    let category = ExpenseCategory::parse(raw);

    let (ref_number, line_name, default_percent, other_description) = match &category {
        ExpenseCategory::Advertising => ("8", "Advertising", dec!(1), None),
        ExpenseCategory::CarAndTruck => (CAR_AND_TRUCK_REF, "Car and truck expenses", dec!(1), None),
        ExpenseCategory::CommissionsAndFees => {
            (COMMISSIONS_AND_FEES_REF, "Commissions and fees", dec!(1), None)
        }
        ExpenseCategory::ContractLabor => ("11", "Contract labor", dec!(1), None),
        ExpenseCategory::Depreciation => ("13", "Depreciation and section 179", dec!(1), None),
        // Deducted as supplies; the asset-review flag carries the
        // depreciation question.
        ExpenseCategory::EquipmentGear => ("22", "Supplies", dec!(1), None),
        ExpenseCategory::Insurance => ("15", "Insurance (other than health)", dec!(1), None),
        ExpenseCategory::Interest => ("16", "Interest", dec!(1), None),
        ExpenseCategory::LegalAndProfessional => {
            ("17", "Legal and professional services", dec!(1), None)
        }
        ExpenseCategory::MealsAndEntertainment => {
            ("24b", "Deductible meals", config.default_meals_percent, None)
        }
        ExpenseCategory::OfficeExpense => ("18", "Office expense", dec!(1), None),
        ExpenseCategory::PhoneAndInternet => ("25", "Utilities", dec!(1), None),
        ExpenseCategory::RentOrLease => ("20", "Rent or lease", dec!(1), None),
        ExpenseCategory::RepairsAndMaintenance => ("21", "Repairs and maintenance", dec!(1), None),
        ExpenseCategory::SoftwareAndSubscriptions => ("18", "Office expense", dec!(1), None),
        ExpenseCategory::Supplies => ("22", "Supplies", dec!(1), None),
        ExpenseCategory::TaxesAndLicenses => ("23", "Taxes and licenses", dec!(1), None),
        ExpenseCategory::Travel => ("24a", "Travel", dec!(1), None),
        ExpenseCategory::Utilities => ("25", "Utilities", dec!(1), None),
        ExpenseCategory::Wages => ("26", "Wages", dec!(1), None),
        ExpenseCategory::Other(original) => (
            OTHER_EXPENSES_REF,
            "Other expenses",
            dec!(1),
            Some(original.clone()),
        ),
    };

    CategoryMapping {
        ref_number: ref_number.to_string(),
        line_name: line_name.to_string(),
        deductible_percent: override_percent.unwrap_or(default_percent),
        other_description,
    }
}

/// Display name for any ref number the builder can emit, including the
/// income-side lines that never pass through the mapper.
pub fn line_name_for_ref(ref_number: &str) -> &'static str {
    match ref_number {
        "1" => "Gross receipts or sales",
        "2" => "Returns and allowances",
        "4" => "Cost of goods sold",
        "6" => "Other income",
        "8" => "Advertising",
        "9" => "Car and truck expenses",
        "10" => "Commissions and fees",
        "11" => "Contract labor",
        "13" => "Depreciation and section 179",
        "15" => "Insurance (other than health)",
        "16" => "Interest",
        "17" => "Legal and professional services",
        "18" => "Office expense",
        "20" => "Rent or lease",
        "21" => "Repairs and maintenance",
        "22" => "Supplies",
        "23" => "Taxes and licenses",
        "24a" => "Travel",
        "24b" => "Deductible meals",
        "25" => "Utilities",
        "26" => "Wages",
        "27a" => "Other expenses",
        _ => "Other expenses",
    }
}
