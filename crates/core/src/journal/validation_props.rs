//! Property-based tests for journal line validation.

use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::types::{AccountId, BALANCE_TOLERANCE};

use super::error::JournalError;
use super::types::JournalLineInput;
use super::validation::validate_lines;

/// Positive line amounts as cents, up to one hundred million.
fn amount_cents() -> impl Strategy<Value = i64> {
    1..=10_000_000_000i64
}

fn amount_from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Builds a balanced entry: each amount appears as one debit line
/// and one credit line against fresh accounts.
fn balanced_lines(amounts: &[i64]) -> Vec<JournalLineInput> {
    let mut lines = Vec::with_capacity(amounts.len() * 2);
    for &cents in amounts {
        let amount = amount_from_cents(cents);
        lines.push(JournalLineInput::debit(AccountId::new(), amount));
        lines.push(JournalLineInput::credit(AccountId::new(), amount));
    }
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* entry built from mirrored debit/credit pairs,
    /// validation accepts it and reports equal totals.
    #[test]
    fn prop_balanced_entries_accepted(
        amounts in proptest::collection::vec(amount_cents(), 1..10),
    ) {
        let lines = balanced_lines(&amounts);
        let totals = validate_lines(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit_total, totals.credit_total);
    }

    /// *For any* balanced entry with one side inflated beyond the
    /// rounding tolerance, validation rejects it as unbalanced.
    #[test]
    fn prop_unbalanced_entries_rejected(
        amounts in proptest::collection::vec(amount_cents(), 1..10),
        excess_cents in 2..=1_000_000i64,
    ) {
        let mut lines = balanced_lines(&amounts);
        lines.push(JournalLineInput::debit(
            AccountId::new(),
            amount_from_cents(excess_cents),
        ));

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::Unbalanced { .. })),
            "assertion failed: matches!(result, Err(JournalError::Unbalanced {{ .. }}))"
        );
    }

    /// *For any* imbalance within the tolerance, validation still
    /// accepts the entry.
    #[test]
    fn prop_within_tolerance_accepted(
        amounts in proptest::collection::vec(amount_cents(), 1..10),
    ) {
        let mut lines = balanced_lines(&amounts);
        lines.push(JournalLineInput::debit(AccountId::new(), BALANCE_TOLERANCE));

        let totals = validate_lines(&lines).unwrap();
        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.difference(), BALANCE_TOLERANCE);
    }

    /// *For any* entry containing a negative amount, validation
    /// rejects it naming the offending line.
    #[test]
    fn prop_negative_amounts_rejected(
        amounts in proptest::collection::vec(amount_cents(), 1..5),
        negative_cents in 1..=1_000_000i64,
    ) {
        let mut lines = balanced_lines(&amounts);
        lines.push(JournalLineInput::debit(
            AccountId::new(),
            -amount_from_cents(negative_cents),
        ));

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::NegativeAmount { .. })),
            "assertion failed: matches!(result, Err(JournalError::NegativeAmount {{ .. }}))"
        );
    }

    /// *For any* line carrying both a debit and a credit amount,
    /// validation rejects the entry.
    #[test]
    fn prop_both_sides_rejected(
        debit_cents in amount_cents(),
        credit_cents in amount_cents(),
    ) {
        let lines = vec![JournalLineInput {
            account_id: AccountId::new(),
            debit_amount: amount_from_cents(debit_cents),
            credit_amount: amount_from_cents(credit_cents),
            description: None,
        }];

        let result = validate_lines(&lines);
        prop_assert!(
            matches!(result, Err(JournalError::BothSidesNonZero { .. })),
            "assertion failed: matches!(result, Err(JournalError::BothSidesNonZero {{ .. }}))"
        );
    }

    /// *For any* accepted entry, the reported totals equal the sums
    /// of the individual line amounts.
    #[test]
    fn prop_totals_match_line_sums(
        amounts in proptest::collection::vec(amount_cents(), 1..10),
    ) {
        let lines = balanced_lines(&amounts);
        let totals = validate_lines(&lines).unwrap();

        let debit_sum: Decimal = lines.iter().map(|l| l.debit_amount).sum();
        let credit_sum: Decimal = lines.iter().map(|l| l.credit_amount).sum();
        prop_assert_eq!(totals.debit_total, debit_sum);
        prop_assert_eq!(totals.credit_total, credit_sum);
    }
}
