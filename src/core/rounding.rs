use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places for the reporting currency's minor unit.
pub const CENT_PRECISION: u32 = 2;

/// Round to whole cents, half away from zero, normalized to two decimal
/// places so every stored amount serializes the same way.
///
/// Every monetary value stored on a package or row passes through this
/// exactly once at the point it is computed. Totals are sums of already
/// rounded values, so re-applying is the identity:
/// `round_cents(round_cents(x)) == round_cents(x)`.
pub fn round_cents(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(CENT_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CENT_PRECISION);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_cents(dec!(2.005)), dec!(2.01));
        assert_eq!(round_cents(dec!(2.004)), dec!(2.00));
        assert_eq!(round_cents(dec!(-2.005)), dec!(-2.01));
        assert_eq!(round_cents(dec!(-2.004)), dec!(-2.00));
        assert_eq!(round_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(round_cents(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn exact_cents_unchanged() {
        assert_eq!(round_cents(dec!(10.00)), dec!(10.00));
        assert_eq!(round_cents(dec!(-3.33)), dec!(-3.33));
        assert_eq!(round_cents(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn idempotent_over_sample_values() {
        let samples = [
            dec!(0.001),
            dec!(0.005),
            dec!(0.0049999),
            dec!(1.23456789),
            dec!(-1.23456789),
            dec!(-0.005),
            dec!(99999999.999),
            dec!(-99999999.999),
        ];
        for x in samples {
            let once = round_cents(x);
            assert_eq!(round_cents(once), once, "not idempotent for {}", x);
        }
    }

    #[test]
    fn normalizes_display_scale() {
        assert_eq!(round_cents(dec!(1000)).to_string(), "1000.00");
        assert_eq!(round_cents(dec!(2.5)).to_string(), "2.50");
        assert_eq!(round_cents(Decimal::ZERO).to_string(), "0.00");
    }

    #[test]
    fn sub_cent_values() {
        assert_eq!(round_cents(dec!(0.004)), dec!(0.00));
        assert_eq!(round_cents(dec!(0.005)), dec!(0.01));
        assert_eq!(round_cents(dec!(-0.0051)), dec!(-0.01));
    }
}
