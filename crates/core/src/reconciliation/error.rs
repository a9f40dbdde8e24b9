//! Reconciliation error types.

use rust_decimal::Decimal;
use thiserror::Error;

use mizan_shared::types::{BankTransactionId, JournalEntryId, ReconciliationMatchId};

/// Errors that can occur during bank reconciliation.
#[derive(Debug, Error)]
pub enum ReconciliationError {
    /// Bank transaction not found.
    #[error("Bank transaction not found: {0}")]
    TransactionNotFound(BankTransactionId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Journal entry is not posted.
    #[error("Journal entry {0} is not posted and cannot be matched")]
    EntryNotPosted(JournalEntryId),

    /// Transaction already has an active match.
    #[error("Bank transaction {0} is already matched")]
    AlreadyMatched(BankTransactionId),

    /// Match record not found.
    #[error("Reconciliation match not found: {0}")]
    MatchNotFound(ReconciliationMatchId),

    /// Confidence score outside [0, 1].
    #[error("Confidence score {0} is outside the range 0 to 1")]
    InvalidConfidence(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl ReconciliationError {
    /// Returns a stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotFound(_) => "BANK_TRANSACTION_NOT_FOUND",
            Self::EntryNotFound(_) => "JOURNAL_ENTRY_NOT_FOUND",
            Self::EntryNotPosted(_) => "ENTRY_NOT_POSTED",
            Self::AlreadyMatched(_) => "ALREADY_MATCHED",
            Self::MatchNotFound(_) => "MATCH_NOT_FOUND",
            Self::InvalidConfidence(_) => "INVALID_CONFIDENCE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::TransactionNotFound(_) | Self::EntryNotFound(_) | Self::MatchNotFound(_) => 404,
            Self::EntryNotPosted(_) => 422,
            Self::AlreadyMatched(_) => 409,
            Self::InvalidConfidence(_) => 400,
            Self::Database(_) => 500,
        }
    }
}

/// Validates a caller-supplied confidence score.
///
/// # Errors
///
/// Returns `ReconciliationError::InvalidConfidence` outside [0, 1].
pub fn validate_confidence(score: Decimal) -> Result<(), ReconciliationError> {
    if score < Decimal::ZERO || score > Decimal::ONE {
        return Err(ReconciliationError::InvalidConfidence(score));
    }
    Ok(())
}
