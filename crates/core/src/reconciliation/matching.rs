//! Bank transaction matching and confidence scoring.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{BankTransactionId, JournalEntryId};

/// Maximum date gap, in days, between a bank transaction and a
/// candidate entry.
pub const DATE_WINDOW_DAYS: i64 = 7;

/// Candidates scoring below this confidence are not suggested.
pub const MIN_CONFIDENCE: Decimal = Decimal::from_parts(50, 0, 0, false, 2);

/// Score for an exact amount match on the same day.
const EXACT_BASE: Decimal = Decimal::from_parts(100, 0, 0, false, 2);
/// Base score for an amount match within the relative tolerance.
const NEAR_BASE: Decimal = Decimal::from_parts(80, 0, 0, false, 2);
/// Confidence deducted per day of date gap.
const GAP_PENALTY: Decimal = Decimal::from_parts(5, 0, 0, false, 2);
/// Relative amount tolerance for a near match (1%).
const AMOUNT_TOLERANCE_RATIO: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// How a reconciliation match came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Created by an automated rule without review.
    Auto,
    /// Created by a human.
    Manual,
    /// Confirmed from a suggestion.
    Suggested,
}

impl MatchType {
    /// Parses a match type from its stored string form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "auto" => Some(Self::Auto),
            "manual" => Some(Self::Manual),
            "suggested" => Some(Self::Suggested),
            _ => None,
        }
    }

    /// Returns the stored string form.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Manual => "manual",
            Self::Suggested => "suggested",
        }
    }
}

/// One unmatched bank statement line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransactionInfo {
    /// Unique identifier.
    pub id: BankTransactionId,
    /// Statement date.
    pub transaction_date: NaiveDate,
    /// Signed amount; deposits positive, withdrawals negative.
    pub amount: Decimal,
    /// Statement description.
    pub description: String,
}

/// One posted journal entry eligible for matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEntry {
    /// Unique identifier.
    pub id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Entry total (debit side).
    pub amount: Decimal,
    /// Entry description.
    pub description: String,
}

/// An advisory match candidate. Nothing is written until confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSuggestion {
    /// Bank transaction being matched.
    pub bank_transaction_id: BankTransactionId,
    /// Suggested journal entry.
    pub journal_entry_id: JournalEntryId,
    /// Suggested entry number, for display.
    pub entry_number: String,
    /// Confidence between [`MIN_CONFIDENCE`] and 1.00 inclusive.
    pub confidence_score: Decimal,
    /// Absolute amount difference.
    pub amount_difference: Decimal,
    /// Absolute date gap in days.
    pub date_difference_days: i64,
}

/// Scores one transaction/entry pair.
///
/// Exact amounts start at 1.00, amounts within 1% start at 0.80, and
/// every day of date gap deducts 0.05. Candidates outside the date
/// window, outside the amount tolerance, or below the confidence
/// floor return `None`.
#[must_use]
pub fn score_candidate(
    transaction: &BankTransactionInfo,
    entry: &CandidateEntry,
) -> Option<Decimal> {
    let gap = (transaction.transaction_date - entry.entry_date)
        .num_days()
        .abs();
    if gap > DATE_WINDOW_DAYS {
        return None;
    }

    let amount = transaction.amount.abs();
    let difference = (amount - entry.amount).abs();
    let base = if difference.is_zero() {
        EXACT_BASE
    } else if difference <= entry.amount * AMOUNT_TOLERANCE_RATIO {
        NEAR_BASE
    } else {
        return None;
    };

    let score = base - GAP_PENALTY * Decimal::from(gap);
    (score >= MIN_CONFIDENCE).then_some(score)
}

/// Suggests at most one candidate per unmatched transaction.
///
/// Transactions are processed in date order and each takes its best
/// remaining entry (highest score, then smallest gap, then entry
/// number), so no entry is suggested twice and the output is
/// deterministic for a given input set.
#[must_use]
pub fn suggest_matches(
    transactions: &[BankTransactionInfo],
    entries: &[CandidateEntry],
) -> Vec<MatchSuggestion> {
    let mut ordered: Vec<&BankTransactionInfo> = transactions.iter().collect();
    ordered.sort_by_key(|t| (t.transaction_date, t.id.into_inner()));

    let mut used: HashSet<JournalEntryId> = HashSet::new();
    let mut suggestions = Vec::new();

    for transaction in ordered {
        let mut best: Option<(Decimal, i64, &CandidateEntry)> = None;
        for entry in entries {
            if used.contains(&entry.id) {
                continue;
            }
            let Some(score) = score_candidate(transaction, entry) else {
                continue;
            };
            let gap = (transaction.transaction_date - entry.entry_date)
                .num_days()
                .abs();
            let better = match &best {
                None => true,
                Some((best_score, best_gap, best_entry)) => {
                    (score, std::cmp::Reverse(gap), std::cmp::Reverse(&entry.entry_number))
                        > (
                            *best_score,
                            std::cmp::Reverse(*best_gap),
                            std::cmp::Reverse(&best_entry.entry_number),
                        )
                }
            };
            if better {
                best = Some((score, gap, entry));
            }
        }

        if let Some((score, gap, entry)) = best {
            used.insert(entry.id);
            suggestions.push(MatchSuggestion {
                bank_transaction_id: transaction.id,
                journal_entry_id: entry.id,
                entry_number: entry.entry_number.clone(),
                confidence_score: score,
                amount_difference: (transaction.amount.abs() - entry.amount).abs(),
                date_difference_days: gap,
            });
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn transaction(day: u32, amount: Decimal) -> BankTransactionInfo {
        BankTransactionInfo {
            id: BankTransactionId::new(),
            transaction_date: date(day),
            amount,
            description: "Bank line".to_string(),
        }
    }

    fn entry(number: u32, day: u32, amount: Decimal) -> CandidateEntry {
        CandidateEntry {
            id: JournalEntryId::new(),
            entry_number: format!("JE-2026-{number:05}"),
            entry_date: date(day),
            amount,
            description: "Posted entry".to_string(),
        }
    }

    #[test]
    fn test_exact_same_day_scores_full() {
        let score = score_candidate(&transaction(10, dec!(2000)), &entry(1, 10, dec!(2000)));
        assert_eq!(score, Some(dec!(1.00)));
    }

    #[test]
    fn test_exact_match_decays_with_gap() {
        let txn = transaction(10, dec!(2000));
        assert_eq!(score_candidate(&txn, &entry(1, 9, dec!(2000))), Some(dec!(0.95)));
        assert_eq!(score_candidate(&txn, &entry(1, 13, dec!(2000))), Some(dec!(0.85)));
        assert_eq!(score_candidate(&txn, &entry(1, 3, dec!(2000))), Some(dec!(0.65)));
    }

    #[test]
    fn test_outside_date_window_ignored() {
        let txn = transaction(20, dec!(2000));
        assert_eq!(score_candidate(&txn, &entry(1, 12, dec!(2000))), None);
    }

    #[test]
    fn test_near_amount_scores_lower() {
        let txn = transaction(10, dec!(2010));
        assert_eq!(score_candidate(&txn, &entry(1, 10, dec!(2000))), Some(dec!(0.80)));
    }

    #[test]
    fn test_amount_outside_tolerance_ignored() {
        let txn = transaction(10, dec!(2100));
        assert_eq!(score_candidate(&txn, &entry(1, 10, dec!(2000))), None);
    }

    #[test]
    fn test_below_confidence_floor_dropped() {
        // Near amount with a 7-day gap would score 0.45.
        let txn = transaction(17, dec!(2010));
        assert_eq!(score_candidate(&txn, &entry(1, 10, dec!(2000))), None);
    }

    #[test]
    fn test_withdrawals_match_by_absolute_amount() {
        let txn = transaction(10, dec!(-500));
        assert_eq!(score_candidate(&txn, &entry(1, 10, dec!(500))), Some(dec!(1.00)));
    }

    #[test]
    fn test_suggest_picks_best_candidate() {
        let txn = transaction(10, dec!(2000));
        let same_day = entry(2, 10, dec!(2000));
        let candidates = vec![entry(1, 8, dec!(2000)), same_day.clone()];

        let suggestions = suggest_matches(&[txn], &candidates);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].journal_entry_id, same_day.id);
        assert_eq!(suggestions[0].confidence_score, dec!(1.00));
        assert_eq!(suggestions[0].date_difference_days, 0);
    }

    #[test]
    fn test_entry_never_suggested_twice() {
        let first = transaction(10, dec!(2000));
        let second = transaction(11, dec!(2000));
        let only = entry(1, 10, dec!(2000));

        let suggestions = suggest_matches(&[second, first], &[only.clone()]);

        assert_eq!(suggestions.len(), 1);
        // Earlier transaction wins the shared candidate.
        assert_eq!(suggestions[0].journal_entry_id, only.id);
        assert_eq!(suggestions[0].date_difference_days, 0);
    }

    #[test]
    fn test_unmatchable_transaction_produces_nothing() {
        let txn = transaction(10, dec!(99999));
        let suggestions = suggest_matches(&[txn], &[entry(1, 10, dec!(2000))]);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_tie_breaks_by_entry_number() {
        let txn = transaction(10, dec!(2000));
        let a = entry(7, 10, dec!(2000));
        let b = entry(3, 10, dec!(2000));

        let suggestions = suggest_matches(&[txn], &[a, b.clone()]);
        assert_eq!(suggestions[0].journal_entry_id, b.id);
    }
}
