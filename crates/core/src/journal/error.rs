//! Journal error types for validation and state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use mizan_shared::types::{AccountId, JournalEntryId};

use super::types::EntryStatus;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least one line.
    #[error("Journal entry must have at least one line")]
    EmptyLines,

    /// Entry is not balanced (debits != credits beyond tolerance).
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// A line carries a negative amount.
    #[error("Line {line} has a negative amount")]
    NegativeAmount {
        /// The offending 1-based line number.
        line: u32,
    },

    /// A line carries zero on both sides.
    #[error("Line {line} has no amount on either side")]
    ZeroAmountLine {
        /// The offending 1-based line number.
        line: u32,
    },

    /// A line carries non-zero amounts on both sides.
    #[error("Line {line} has amounts on both debit and credit sides")]
    BothSidesNonZero {
        /// The offending 1-based line number.
        line: u32,
    },

    // ========== Account Errors ==========
    /// Referenced account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Header accounts cannot be posting targets.
    #[error("Account {0} is a header account and cannot receive postings")]
    HeaderAccount(AccountId),

    /// Inactive accounts cannot receive postings.
    #[error("Account {0} is inactive")]
    AccountInactive(AccountId),

    // ========== State Errors ==========
    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Only draft entries can be posted.
    #[error("Cannot post entry with status '{status}'; only draft entries can be posted")]
    CannotPost {
        /// The entry's current status.
        status: EntryStatus,
    },

    /// Only draft entries can be cancelled.
    #[error("Cannot cancel entry with status '{status}'; only draft entries can be cancelled")]
    CannotCancel {
        /// The entry's current status.
        status: EntryStatus,
    },

    // ========== Fiscal Year Errors ==========
    /// No open fiscal year covers the entry date.
    #[error("No open fiscal year covers date {0}")]
    NoOpenFiscalYear(NaiveDate),

    // ========== Concurrency Errors ==========
    /// Entry number generation kept colliding with concurrent writers.
    #[error("Entry number conflict persisted after retries")]
    NumberConflict,

    // ========== Database Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyLines => "EMPTY_LINES",
            Self::Unbalanced { .. } => "UNBALANCED_ENTRY",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::ZeroAmountLine { .. } => "ZERO_AMOUNT_LINE",
            Self::BothSidesNonZero { .. } => "BOTH_SIDES_NON_ZERO",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::HeaderAccount(_) => "HEADER_ACCOUNT",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::CannotPost { .. } => "CANNOT_POST",
            Self::CannotCancel { .. } => "CANNOT_CANCEL",
            Self::NoOpenFiscalYear(_) => "NO_OPEN_FISCAL_YEAR",
            Self::NumberConflict => "ENTRY_NUMBER_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::EmptyLines
            | Self::Unbalanced { .. }
            | Self::NegativeAmount { .. }
            | Self::ZeroAmountLine { .. }
            | Self::BothSidesNonZero { .. }
            | Self::HeaderAccount(_)
            | Self::AccountInactive(_) => 400,

            // 404 Not Found
            Self::AccountNotFound(_) | Self::EntryNotFound(_) => 404,

            // 409 Conflict - state and concurrency conflicts
            Self::CannotPost { .. } | Self::CannotCancel { .. } | Self::NumberConflict => 409,

            // 422 Unprocessable - business rule
            Self::NoOpenFiscalYear(_) => 422,

            // 500 Internal Server Error
            Self::Database(_) => 500,
        }
    }
}
