//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{AccountId, JournalEntryId};

use crate::accounts::{AccountNature, AccountType};

/// Per-account activity row feeding the report builders.
///
/// The database layer aggregates posted lines (or reads the cached
/// balance) into this shape; the report services never query anything
/// themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Account nature.
    pub account_nature: AccountNature,
    /// Total debit amount across posted lines.
    pub debit_total: Decimal,
    /// Total credit amount across posted lines.
    pub credit_total: Decimal,
    /// Net balance, signed by account nature.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Builds a row from posted-line activity, deriving the net
    /// balance from the account nature.
    #[must_use]
    pub fn from_activity(
        account_id: AccountId,
        code: String,
        name: String,
        account_type: AccountType,
        account_nature: AccountNature,
        debit_total: Decimal,
        credit_total: Decimal,
    ) -> Self {
        let balance = account_nature.signed_delta(debit_total, credit_total);
        Self {
            account_id,
            code,
            name,
            account_type,
            account_nature,
            debit_total,
            credit_total,
            balance,
        }
    }
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Fiscal year filter, if any.
    pub fiscal_year: Option<i32>,
    /// As of date.
    pub as_of: NaiveDate,
    /// Account rows.
    pub accounts: Vec<AccountBalance>,
    /// Grand totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance grand totals.
///
/// A non-zero difference means the ledger itself is inconsistent and
/// is reported as-is rather than hidden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit across all accounts.
    pub debit_total: Decimal,
    /// Total credit across all accounts.
    pub credit_total: Decimal,
    /// Debit total minus credit total.
    pub difference: Decimal,
    /// Whether debits equal credits within tolerance.
    pub is_balanced: bool,
}

/// One posted line affecting an account, as loaded from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntryRow {
    /// Owning journal entry.
    pub entry_id: JournalEntryId,
    /// Entry number (e.g., "JE-2026-00042").
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Line or entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
}

/// One general ledger line with its running balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedgerLine {
    /// Owning journal entry.
    pub entry_id: JournalEntryId,
    /// Entry number.
    pub entry_number: String,
    /// Entry date.
    pub entry_date: NaiveDate,
    /// Line or entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Balance after applying this line.
    pub running_balance: Decimal,
}

/// General ledger report for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralLedgerReport {
    /// Report type identifier.
    pub report_type: String,
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account nature used for the running balance.
    pub account_nature: AccountNature,
    /// Period start, if the report was range-filtered.
    pub period_start: Option<NaiveDate>,
    /// Period end, if the report was range-filtered.
    pub period_end: Option<NaiveDate>,
    /// Balance carried in before the first line.
    pub opening_balance: Decimal,
    /// Chronological lines with running balances.
    pub lines: Vec<GeneralLedgerLine>,
    /// Total debit within the period.
    pub debit_total: Decimal,
    /// Total credit within the period.
    pub credit_total: Decimal,
    /// Balance after the last line.
    pub closing_balance: Decimal,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Subsections in presentation order.
    pub subsections: Vec<ReportSubsection>,
}

/// A named group of accounts within a report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubsection {
    /// Subsection key (e.g., "current_assets" or a code prefix).
    pub key: String,
    /// Subsection total.
    pub total: Decimal,
    /// Accounts in this subsection.
    pub accounts: Vec<AccountBalance>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// As of date.
    pub as_of: NaiveDate,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section.
    pub equity: BalanceSheetSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity (excluding the net income residual).
    pub total_equity: Decimal,
    /// Net income residual: assets - liabilities - equity.
    pub net_income: Decimal,
    /// Liabilities plus equity plus net income.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
}

/// Income statement section (revenue or expenses).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Subsections keyed by code classification prefix.
    pub subsections: Vec<ReportSubsection>,
}

/// Income statement report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatementReport {
    /// Report type identifier.
    pub report_type: String,
    /// Period start date.
    pub period_start: NaiveDate,
    /// Period end date.
    pub period_end: NaiveDate,
    /// Revenue section.
    pub revenue: IncomeStatementSection,
    /// Expenses section.
    pub expenses: IncomeStatementSection,
    /// Net income: revenue - expenses.
    pub net_income: Decimal,
}
