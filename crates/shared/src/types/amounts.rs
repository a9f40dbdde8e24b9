//! Monetary amount helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` and rounded to 2 decimal places.

use rust_decimal::Decimal;

/// Maximum absolute difference between total debits and total credits
/// for an entry to count as balanced.
///
/// Amounts entered through upstream systems may carry rounding residue;
/// anything within one cent is accepted as balanced.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if total debits and total credits agree within
/// [`BALANCE_TOLERANCE`].
#[must_use]
pub fn is_balanced(debit_total: Decimal, credit_total: Decimal) -> bool {
    (debit_total - credit_total).abs() <= BALANCE_TOLERANCE
}

/// Rounds a monetary amount to 2 decimal places (banker's rounding).
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tolerance_is_one_cent() {
        assert_eq!(BALANCE_TOLERANCE, dec!(0.01));
    }

    #[rstest]
    #[case(dec!(100.00), dec!(100.00), true)]
    #[case(dec!(100.00), dec!(99.99), true)]
    #[case(dec!(99.99), dec!(100.00), true)]
    #[case(dec!(100.00), dec!(99.98), false)]
    #[case(dec!(0), dec!(0), true)]
    #[case(dec!(500.005), dec!(500.00), true)]
    fn test_is_balanced(
        #[case] debit: Decimal,
        #[case] credit: Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(is_balanced(debit, credit), expected);
    }

    #[rstest]
    #[case(dec!(10.005), dec!(10.00))]
    #[case(dec!(10.015), dec!(10.02))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(dec!(10.006), dec!(10.01))]
    #[case(dec!(-10.005), dec!(-10.00))]
    fn test_round_amount_bankers(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_amount(input), expected);
    }
}
