use crate::core::mileage::MileageRateTable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Version stamped into package metadata so downstream renderers can detect
/// shape changes.
pub const SCHEMA_VERSION: u32 = 3;

/// The only reporting currency this core supports.
pub const PACKAGE_CURRENCY: &str = "USD";

/// Numeric constants the builder depends on, as an injectable table rather
/// than module-level literals. Test suites swap in alternate tables without
/// touching the algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BuilderConfig {
    pub mileage_rates: MileageRateTable,
    /// Raw amount at or above which a non-equipment expense is flagged for
    /// capitalization review.
    #[schemars(with = "f64")]
    pub asset_review_threshold: Decimal,
    /// Deductible fraction applied to meals when no per-row override exists.
    #[schemars(with = "f64")]
    pub default_meals_percent: Decimal,
    pub schema_version: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        BuilderConfig {
            mileage_rates: MileageRateTable::standard(),
            asset_review_threshold: dec!(2500),
            default_meals_percent: dec!(0.50),
            schema_version: SCHEMA_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_constants() {
        let config = BuilderConfig::default();
        assert_eq!(config.asset_review_threshold, dec!(2500));
        assert_eq!(config.default_meals_percent, dec!(0.50));
        assert_eq!(config.mileage_rates.rate_for_year(2024), dec!(0.67));
    }
}
