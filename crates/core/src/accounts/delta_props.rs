//! Property-based tests for the signed balance delta rule.
//!
//! Posting determinism rests on this rule: an account's balance after
//! posting must equal the sum of signed deltas over its lines, in any
//! order.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::AccountNature;

/// Strategy for a non-negative line amount with 2 decimal places.
fn line_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a (debit, credit) pair as it appears on a journal line.
fn line_pair() -> impl Strategy<Value = (Decimal, Decimal)> {
    (line_amount(), line_amount())
}

/// Strategy for a sequence of line pairs.
fn line_pairs(max_len: usize) -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec(line_pair(), 1..=max_len)
}

fn nature_strategy() -> impl Strategy<Value = AccountNature> {
    prop_oneof![Just(AccountNature::Debit), Just(AccountNature::Credit)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* line, the delta under debit nature is the negation of
    /// the delta under credit nature.
    #[test]
    fn prop_natures_are_mirror_images(
        (debit, credit) in line_pair(),
    ) {
        prop_assert_eq!(
            AccountNature::Debit.signed_delta(debit, credit),
            -AccountNature::Credit.signed_delta(debit, credit),
        );
    }

    /// *For any* line carrying an amount on only the increasing side,
    /// the delta is non-negative.
    #[test]
    fn prop_increasing_side_never_decreases(
        amount in line_amount(),
        nature in nature_strategy(),
    ) {
        let delta = match nature {
            AccountNature::Debit => nature.signed_delta(amount, Decimal::ZERO),
            AccountNature::Credit => nature.signed_delta(Decimal::ZERO, amount),
        };
        prop_assert!(delta >= Decimal::ZERO);
    }

    /// *For any* set of lines, the total delta is independent of
    /// application order (posting is commutative).
    #[test]
    fn prop_delta_sum_is_order_independent(
        lines in line_pairs(20),
        nature in nature_strategy(),
    ) {
        let forward: Decimal = lines
            .iter()
            .map(|(d, c)| nature.signed_delta(*d, *c))
            .sum();
        let reverse: Decimal = lines
            .iter()
            .rev()
            .map(|(d, c)| nature.signed_delta(*d, *c))
            .sum();

        prop_assert_eq!(forward, reverse);
    }

    /// *For any* set of lines, replaying deltas one at a time onto a
    /// running balance ends at the same value as a single summed
    /// application.
    #[test]
    fn prop_replay_equals_sum(
        lines in line_pairs(20),
        nature in nature_strategy(),
    ) {
        let mut running = Decimal::ZERO;
        for (debit, credit) in &lines {
            running += nature.signed_delta(*debit, *credit);
        }

        let total: Decimal = lines
            .iter()
            .map(|(d, c)| nature.signed_delta(*d, *c))
            .sum();

        prop_assert_eq!(running, total);
    }

    /// *For any* line, delta is exactly debit - credit or credit - debit
    /// depending on nature; the two sides always differ by the same
    /// absolute value.
    #[test]
    fn prop_delta_magnitude_matches_imbalance(
        (debit, credit) in line_pair(),
        nature in nature_strategy(),
    ) {
        let delta = nature.signed_delta(debit, credit);
        prop_assert_eq!(delta.abs(), (debit - credit).abs());
    }
}
