//! Property-based tests for match scoring.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::types::{BankTransactionId, JournalEntryId};

use super::matching::{
    score_candidate, suggest_matches, BankTransactionInfo, CandidateEntry, MIN_CONFIDENCE,
};

fn day(offset: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .unwrap()
        .checked_add_days(chrono::Days::new(u64::from(offset)))
        .unwrap()
}

fn transaction(offset: u32, cents: i64) -> BankTransactionInfo {
    BankTransactionInfo {
        id: BankTransactionId::new(),
        transaction_date: day(offset),
        amount: Decimal::new(cents, 2),
        description: "Bank line".to_string(),
    }
}

fn candidate(number: u32, offset: u32, cents: i64) -> CandidateEntry {
    CandidateEntry {
        id: JournalEntryId::new(),
        entry_number: format!("JE-2026-{number:05}"),
        entry_date: day(offset),
        amount: Decimal::new(cents, 2),
        description: "Posted entry".to_string(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* scored pair, the confidence lies between the floor
    /// and 1.00 inclusive.
    #[test]
    fn prop_scores_within_bounds(
        txn_offset in 0u32..28,
        entry_offset in 0u32..28,
        txn_cents in 1i64..1_000_000_000,
        entry_cents in 1i64..1_000_000_000,
    ) {
        let txn = transaction(txn_offset, txn_cents);
        let entry = candidate(1, entry_offset, entry_cents);

        if let Some(score) = score_candidate(&txn, &entry) {
            prop_assert!(score >= MIN_CONFIDENCE);
            prop_assert!(score <= Decimal::ONE);
        }
    }

    /// *For any* amount, an exact match on the same day scores the
    /// maximum confidence.
    #[test]
    fn prop_exact_same_day_scores_max(
        offset in 0u32..28,
        cents in 1i64..1_000_000_000,
    ) {
        let txn = transaction(offset, cents);
        let entry = candidate(1, offset, cents);

        prop_assert_eq!(score_candidate(&txn, &entry), Some(Decimal::ONE));
    }

    /// *For any* pair of candidates with the same amount, widening
    /// the date gap never increases the score.
    #[test]
    fn prop_score_decreases_with_gap(
        cents in 1i64..1_000_000_000,
        near_gap in 0u32..7,
        extra in 1u32..7,
    ) {
        let txn = transaction(14, cents);
        let near = candidate(1, 14 - near_gap, cents);
        let far_offset = 14u32.saturating_sub(near_gap + extra);
        let far = candidate(2, far_offset, cents);

        let near_score = score_candidate(&txn, &near);
        let far_score = score_candidate(&txn, &far);
        if let (Some(near_score), Some(far_score)) = (near_score, far_score) {
            prop_assert!(far_score <= near_score);
        }
    }

    /// *For any* input set, no journal entry and no bank transaction
    /// appears in more than one suggestion.
    #[test]
    fn prop_suggestions_are_unique(
        txns in proptest::collection::vec((0u32..28, 1i64..100_000), 0..10),
        entries in proptest::collection::vec((0u32..28, 1i64..100_000), 0..10),
    ) {
        let transactions: Vec<BankTransactionInfo> = txns
            .into_iter()
            .map(|(offset, cents)| transaction(offset, cents))
            .collect();
        let candidates: Vec<CandidateEntry> = entries
            .into_iter()
            .enumerate()
            .map(|(i, (offset, cents))| {
                candidate(u32::try_from(i).unwrap_or(0) + 1, offset, cents)
            })
            .collect();

        let suggestions = suggest_matches(&transactions, &candidates);

        let mut entry_ids: Vec<_> = suggestions.iter().map(|s| s.journal_entry_id).collect();
        entry_ids.sort_by_key(|id| id.into_inner());
        entry_ids.dedup();
        prop_assert_eq!(entry_ids.len(), suggestions.len());

        let mut txn_ids: Vec<_> = suggestions.iter().map(|s| s.bank_transaction_id).collect();
        txn_ids.sort_by_key(|id| id.into_inner());
        txn_ids.dedup();
        prop_assert_eq!(txn_ids.len(), suggestions.len());
    }
}
