//! Account classification types and the balance delta rule.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::AccountId;

/// Account type in the standard five-way classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned by the endowment.
    Asset,
    /// Obligations owed to others.
    Liability,
    /// Capital and reserves.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Parse an account type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }

    /// Returns the conventional nature for this account type.
    ///
    /// Assets and expenses grow on the debit side; liabilities, equity,
    /// and revenue grow on the credit side.
    #[must_use]
    pub const fn default_nature(&self) -> AccountNature {
        match self {
            Self::Asset | Self::Expense => AccountNature::Debit,
            Self::Liability | Self::Equity | Self::Revenue => AccountNature::Credit,
        }
    }

    /// All account types, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];
}

/// Which side increases an account's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    /// Debit-nature: balance grows with debits.
    Debit,
    /// Credit-nature: balance grows with credits.
    Credit,
}

impl AccountNature {
    /// Parse an account nature from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            _ => None,
        }
    }

    /// Returns the string representation of the nature.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }

    /// The signed balance delta a journal line applies to an account.
    ///
    /// Debit-nature accounts: delta = debit - credit.
    /// Credit-nature accounts: delta = credit - debit.
    ///
    /// This rule is the single source of truth; posting, the general
    /// ledger replay, and the trial balance all reconcile through it.
    #[must_use]
    pub fn signed_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Account facts needed for validation and posting.
///
/// A projection of the stored account used by pure validation code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    /// The account ID.
    pub id: AccountId,
    /// The hierarchical account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Five-way classification.
    pub account_type: AccountType,
    /// Which side increases the balance.
    pub account_nature: AccountNature,
    /// Aggregation-only account; never a posting target.
    pub is_header: bool,
    /// Inactive accounts cannot receive new postings.
    pub is_active: bool,
}

impl AccountInfo {
    /// Returns true if journal lines may reference this account.
    #[must_use]
    pub fn is_postable(&self) -> bool {
        !self.is_header && self.is_active
    }
}
