//! Report assembly service.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use mizan_shared::types::is_balanced;

use super::error::ReportError;
use super::types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, GeneralLedgerLine,
    GeneralLedgerReport, IncomeStatementReport, IncomeStatementSection, LedgerEntryRow,
    ReportSubsection, TrialBalanceReport, TrialBalanceTotals,
};
use crate::accounts::{AccountInfo, AccountType};

/// Asset subsections keyed off the second code segment, in
/// presentation order.
const ASSET_BUCKETS: [&str; 3] = ["current_assets", "fixed_assets", "other_assets"];
/// Liability subsections in presentation order.
const LIABILITY_BUCKETS: [&str; 3] = [
    "current_liabilities",
    "long_term_liabilities",
    "other_liabilities",
];
/// Equity subsections in presentation order.
const EQUITY_BUCKETS: [&str; 3] = ["capital", "reserves", "other_equity"];

/// Service for assembling financial reports from aggregated rows.
///
/// All methods are pure: the database layer loads and aggregates the
/// rows, this service only classifies and sums them.
pub struct ReportService;

impl ReportService {
    /// Validates a report date range.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDateRange` when start is after end.
    pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ReportError> {
        if start > end {
            return Err(ReportError::InvalidDateRange { start, end });
        }
        Ok(())
    }

    /// Assembles a trial balance from per-account activity rows.
    ///
    /// The grand totals must match for a self-consistent ledger; a
    /// discrepancy is surfaced through `totals.difference` rather
    /// than hidden.
    #[must_use]
    pub fn trial_balance(
        fiscal_year: Option<i32>,
        as_of: NaiveDate,
        accounts: Vec<AccountBalance>,
    ) -> TrialBalanceReport {
        let debit_total: Decimal = accounts.iter().map(|a| a.debit_total).sum();
        let credit_total: Decimal = accounts.iter().map(|a| a.credit_total).sum();

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            fiscal_year,
            as_of,
            accounts,
            totals: TrialBalanceTotals {
                debit_total,
                credit_total,
                difference: debit_total - credit_total,
                is_balanced: is_balanced(debit_total, credit_total),
            },
        }
    }

    /// Assembles a general ledger for one account.
    ///
    /// Lines are replayed in chronological order against the opening
    /// balance using the same signed-delta rule that posting applies,
    /// so the closing balance reconciles with the cached account
    /// balance.
    #[must_use]
    pub fn general_ledger(
        account: &AccountInfo,
        period: Option<(NaiveDate, NaiveDate)>,
        opening_balance: Decimal,
        mut rows: Vec<LedgerEntryRow>,
    ) -> GeneralLedgerReport {
        rows.sort_by(|a, b| {
            (a.entry_date, a.entry_number.as_str()).cmp(&(b.entry_date, b.entry_number.as_str()))
        });

        let mut running = opening_balance;
        let mut debit_total = Decimal::ZERO;
        let mut credit_total = Decimal::ZERO;
        let mut lines = Vec::with_capacity(rows.len());

        for row in rows {
            running += account.account_nature.signed_delta(row.debit, row.credit);
            debit_total += row.debit;
            credit_total += row.credit;
            lines.push(GeneralLedgerLine {
                entry_id: row.entry_id,
                entry_number: row.entry_number,
                entry_date: row.entry_date,
                description: row.description,
                debit: row.debit,
                credit: row.credit,
                running_balance: running,
            });
        }

        GeneralLedgerReport {
            report_type: "general_ledger".to_string(),
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_nature: account.account_nature,
            period_start: period.map(|(start, _)| start),
            period_end: period.map(|(_, end)| end),
            opening_balance,
            lines,
            debit_total,
            credit_total,
            closing_balance: running,
        }
    }

    /// Assembles a balance sheet from current account balances.
    ///
    /// Net income is the residual assets - liabilities - equity and
    /// is carried on the equity side.
    #[must_use]
    pub fn balance_sheet(as_of: NaiveDate, accounts: Vec<AccountBalance>) -> BalanceSheetReport {
        let mut asset_rows = Vec::new();
        let mut liability_rows = Vec::new();
        let mut equity_rows = Vec::new();

        for account in accounts {
            match account.account_type {
                AccountType::Asset => asset_rows.push(account),
                AccountType::Liability => liability_rows.push(account),
                AccountType::Equity => equity_rows.push(account),
                AccountType::Revenue | AccountType::Expense => {}
            }
        }

        let assets = Self::build_balance_sheet_section(asset_rows, &ASSET_BUCKETS);
        let liabilities = Self::build_balance_sheet_section(liability_rows, &LIABILITY_BUCKETS);
        let equity = Self::build_balance_sheet_section(equity_rows, &EQUITY_BUCKETS);

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let net_income = total_assets - total_liabilities - total_equity;
        let liabilities_and_equity = total_liabilities + total_equity + net_income;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            net_income,
            liabilities_and_equity,
            is_balanced: is_balanced(total_assets, liabilities_and_equity),
        }
    }

    /// Assembles an income statement from period activity rows.
    #[must_use]
    pub fn income_statement(
        period_start: NaiveDate,
        period_end: NaiveDate,
        accounts: Vec<AccountBalance>,
    ) -> IncomeStatementReport {
        let mut revenue_rows = Vec::new();
        let mut expense_rows = Vec::new();

        for account in accounts {
            match account.account_type {
                AccountType::Revenue => revenue_rows.push(account),
                AccountType::Expense => expense_rows.push(account),
                AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
            }
        }

        let revenue = Self::build_income_section(revenue_rows);
        let expenses = Self::build_income_section(expense_rows);
        let net_income = revenue.total - expenses.total;

        IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start,
            period_end,
            revenue,
            expenses,
            net_income,
        }
    }

    /// Maps an account to its balance sheet subsection by the second
    /// code segment: `x.1.*` is current, `x.2.*` is fixed/long-term,
    /// anything else falls into the residual bucket.
    fn subsection_key(account_type: AccountType, code: &str) -> &'static str {
        let second = code.split('.').nth(1);
        match account_type {
            AccountType::Asset => match second {
                Some("1") => "current_assets",
                Some("2") => "fixed_assets",
                _ => "other_assets",
            },
            AccountType::Liability => match second {
                Some("1") => "current_liabilities",
                Some("2") => "long_term_liabilities",
                _ => "other_liabilities",
            },
            AccountType::Equity => match second {
                Some("1") => "capital",
                Some("2") => "reserves",
                _ => "other_equity",
            },
            AccountType::Revenue | AccountType::Expense => "other",
        }
    }

    /// Returns the first two dot segments of a code (e.g. "4.1" for
    /// "4.1.3"), used to group income statement subsections.
    fn classification_key(code: &str) -> String {
        let mut segments = code.splitn(3, '.');
        match (segments.next(), segments.next()) {
            (Some(first), Some(second)) => format!("{first}.{second}"),
            (Some(first), None) => first.to_string(),
            _ => String::new(),
        }
    }

    fn build_balance_sheet_section(
        rows: Vec<AccountBalance>,
        bucket_order: &[&'static str],
    ) -> BalanceSheetSection {
        let mut section = BalanceSheetSection::default();
        for &key in bucket_order {
            let accounts: Vec<AccountBalance> = rows
                .iter()
                .filter(|a| Self::subsection_key(a.account_type, &a.code) == key)
                .cloned()
                .collect();
            if accounts.is_empty() {
                continue;
            }
            let total: Decimal = accounts.iter().map(|a| a.balance).sum();
            section.total += total;
            section.subsections.push(ReportSubsection {
                key: key.to_string(),
                total,
                accounts,
            });
        }
        section
    }

    fn build_income_section(rows: Vec<AccountBalance>) -> IncomeStatementSection {
        let mut groups: BTreeMap<String, Vec<AccountBalance>> = BTreeMap::new();
        for row in rows {
            groups
                .entry(Self::classification_key(&row.code))
                .or_default()
                .push(row);
        }

        let mut section = IncomeStatementSection::default();
        for (key, accounts) in groups {
            let total: Decimal = accounts.iter().map(|a| a.balance).sum();
            section.total += total;
            section
                .subsections
                .push(ReportSubsection { key, total, accounts });
        }
        section
    }
}
