//! Journal entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mizan_shared::types::{AccountId, UserId, is_balanced};

/// Journal entry status.
///
/// Entries start in `draft`; posting and cancelling are both terminal.
/// No transition is defined out of `posted` or `cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted; the only state that permits transitions.
    Draft,
    /// Entry has been posted; balances were propagated (terminal).
    Posted,
    /// Entry was cancelled before posting; no balance effect (terminal).
    Cancelled,
}

impl EntryStatus {
    /// Parse a status from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "posted" => Some(Self::Posted),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Posted => "posted",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if the entry can be posted from this status.
    #[must_use]
    pub fn can_post(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry can be cancelled from this status.
    #[must_use]
    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Posted | Self::Cancelled)
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Link to the business event that originated an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryReference {
    /// Kind of the originating record (e.g. "payment", "rental_contract").
    pub reference_type: String,
    /// Identifier of the originating record.
    pub reference_id: Uuid,
}

/// Input for a single journal entry line.
///
/// A line carries a non-zero amount on exactly one side; both-sides
/// lines are rejected at validation time.
#[derive(Debug, Clone)]
pub struct JournalLineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Debit amount (>= 0).
    pub debit_amount: Decimal,
    /// Credit amount (>= 0).
    pub credit_amount: Decimal,
    /// Optional memo for this line.
    pub description: Option<String>,
}

impl JournalLineInput {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit_amount: amount,
            credit_amount: Decimal::ZERO,
            description: None,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit_amount: Decimal::ZERO,
            credit_amount: amount,
            description: None,
        }
    }
}

/// Input for creating a new journal entry.
///
/// Line numbers are assigned from array order; the entry is persisted
/// atomically with its lines and returned in `draft`.
#[derive(Debug, Clone)]
pub struct CreateEntryInput {
    /// The date of the transaction.
    pub entry_date: NaiveDate,
    /// A description of the entry.
    pub description: String,
    /// Optional originating business event.
    pub reference: Option<EntryReference>,
    /// The entry lines (must be non-empty and balanced).
    pub lines: Vec<JournalLineInput>,
    /// The user creating the entry.
    pub created_by: UserId,
}

/// Decision for the approve operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    /// Post the entry.
    Approved,
    /// Cancel the entry.
    Rejected,
}

/// Debit and credit totals over a set of lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineTotals {
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Whether debits and credits agree within tolerance.
    pub is_balanced: bool,
}

impl LineTotals {
    /// Creates totals from debit and credit sums.
    #[must_use]
    pub fn new(debit_total: Decimal, credit_total: Decimal) -> Self {
        Self {
            debit_total,
            credit_total,
            is_balanced: is_balanced(debit_total, credit_total),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit_total - self.credit_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parse_round_trip() {
        for status in [EntryStatus::Draft, EntryStatus::Posted, EntryStatus::Cancelled] {
            assert_eq!(EntryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EntryStatus::parse("unknown"), None);
    }

    #[test]
    fn test_status_transitions() {
        assert!(EntryStatus::Draft.can_post());
        assert!(EntryStatus::Draft.can_cancel());
        assert!(!EntryStatus::Draft.is_terminal());

        assert!(!EntryStatus::Posted.can_post());
        assert!(!EntryStatus::Posted.can_cancel());
        assert!(EntryStatus::Posted.is_terminal());

        assert!(!EntryStatus::Cancelled.can_post());
        assert!(!EntryStatus::Cancelled.can_cancel());
        assert!(EntryStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_line_constructors() {
        let account = AccountId::new();

        let debit = JournalLineInput::debit(account, dec!(100));
        assert_eq!(debit.debit_amount, dec!(100));
        assert_eq!(debit.credit_amount, dec!(0));

        let credit = JournalLineInput::credit(account, dec!(100));
        assert_eq!(credit.debit_amount, dec!(0));
        assert_eq!(credit.credit_amount, dec!(100));
    }

    #[test]
    fn test_line_totals_balanced() {
        let totals = LineTotals::new(dec!(100.00), dec!(100.00));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(0));
    }

    #[test]
    fn test_line_totals_within_tolerance() {
        let totals = LineTotals::new(dec!(100.00), dec!(99.99));
        assert!(totals.is_balanced);
        assert_eq!(totals.difference(), dec!(0.01));
    }

    #[test]
    fn test_line_totals_unbalanced() {
        let totals = LineTotals::new(dec!(100.00), dec!(50.00));
        assert!(!totals.is_balanced);
        assert_eq!(totals.difference(), dec!(50.00));
    }
}
