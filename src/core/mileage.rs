use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// IRS standard mileage rates (dollars per business mile) by tax year.
///
/// The lookup is total: years beyond the table fall back to the most recent
/// published rate, years before it to the earliest. Mileage deductions must
/// always be computable; rows priced this way remain flagged as estimates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MileageRateTable {
    /// (year, rate) pairs, sorted ascending by year
    #[schemars(with = "Vec<(i32, f64)>")]
    rates: Vec<(i32, Decimal)>,
}

impl MileageRateTable {
    /// Published standard rates, 2019 through 2025.
    pub fn standard() -> Self {
        Self::from_rates(vec![
            (2019, dec!(0.58)),
            (2020, dec!(0.575)),
            (2021, dec!(0.56)),
            (2022, dec!(0.585)),
            (2023, dec!(0.655)),
            (2024, dec!(0.67)),
            (2025, dec!(0.70)),
        ])
    }

    /// Build a table from arbitrary (year, rate) pairs. Empty tables are not
    /// meaningful; callers construct from at least one entry.
    pub fn from_rates(mut rates: Vec<(i32, Decimal)>) -> Self {
        rates.sort_by_key(|(year, _)| *year);
        MileageRateTable { rates }
    }

    /// Per-mile rate for a tax year, clamped to the table's range.
    pub fn rate_for_year(&self, year: i32) -> Decimal {
        let mut rate = self.rates.first().map(|(_, r)| *r).unwrap_or(Decimal::ZERO);
        for (y, r) in &self.rates {
            if *y > year {
                break;
            }
            rate = *r;
        }
        rate
    }

    /// Latest year the table has a published rate for.
    pub fn latest_year(&self) -> Option<i32> {
        self.rates.last().map(|(year, _)| *year)
    }

    pub fn entries(&self) -> &[(i32, Decimal)] {
        &self.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_years_exact() {
        let table = MileageRateTable::standard();
        assert_eq!(table.rate_for_year(2024), dec!(0.67));
        assert_eq!(table.rate_for_year(2023), dec!(0.655));
        assert_eq!(table.rate_for_year(2019), dec!(0.58));
    }

    #[test]
    fn future_years_use_latest_rate() {
        let table = MileageRateTable::standard();
        assert_eq!(table.rate_for_year(2026), dec!(0.70));
        assert_eq!(table.rate_for_year(2099), dec!(0.70));
    }

    #[test]
    fn years_before_table_use_earliest_rate() {
        let table = MileageRateTable::standard();
        assert_eq!(table.rate_for_year(2010), dec!(0.58));
    }

    #[test]
    fn custom_table_sorted_on_construction() {
        let table = MileageRateTable::from_rates(vec![(2024, dec!(0.70)), (2022, dec!(0.50))]);
        assert_eq!(table.rate_for_year(2022), dec!(0.50));
        assert_eq!(table.rate_for_year(2023), dec!(0.50));
        assert_eq!(table.rate_for_year(2024), dec!(0.70));
        assert_eq!(table.latest_year(), Some(2024));
    }
}
