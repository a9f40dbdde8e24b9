//! Bank reconciliation matching.
//!
//! Scores unmatched bank statement lines against posted journal
//! entries and produces advisory suggestions. Match persistence and
//! the matched-flag lifecycle live in the database layer.

pub mod error;
pub mod matching;

#[cfg(test)]
mod matching_props;

pub use error::{validate_confidence, ReconciliationError};
pub use matching::{
    score_candidate, suggest_matches, BankTransactionInfo, CandidateEntry, MatchSuggestion,
    MatchType, DATE_WINDOW_DAYS, MIN_CONFIDENCE,
};
