//! Report repository: loads and aggregates rows for the report
//! services.
//!
//! All classification and summing is pure and lives in
//! `mizan_core::reports`; this module only issues the aggregate
//! queries and shapes their results.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use mizan_core::reports::{
    AccountBalance, BalanceSheetReport, GeneralLedgerReport, IncomeStatementReport, LedgerEntryRow,
    ReportError, ReportService, TrialBalanceReport,
};
use mizan_shared::types::{AccountId, JournalEntryId};

use super::account::to_account_info;
use crate::entities::{
    accounts, fiscal_years, journal_entries, journal_entry_lines, opening_balances,
    sea_orm_active_enums,
};

/// Per-account aggregate of posted lines.
#[derive(Debug, FromQueryResult)]
struct ActivityRow {
    account_id: Uuid,
    debit_total: Decimal,
    credit_total: Decimal,
}

/// Single-row aggregate; sums are `NULL` over an empty set.
#[derive(Debug, FromQueryResult)]
struct TotalsRow {
    debit_total: Option<Decimal>,
    credit_total: Option<Decimal>,
}

/// One posted line joined with its entry header.
#[derive(Debug, FromQueryResult)]
struct LedgerLineRow {
    entry_id: Uuid,
    entry_number: String,
    entry_date: NaiveDate,
    entry_description: String,
    line_description: Option<String>,
    debit_amount: Decimal,
    credit_amount: Decimal,
}

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds a trial balance over posted entries, optionally scoped
    /// to one fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the fiscal year is unknown or a query
    /// fails.
    pub async fn trial_balance(
        &self,
        fiscal_year: Option<i32>,
    ) -> Result<TrialBalanceReport, ReportError> {
        let fiscal_year_id = match fiscal_year {
            Some(year) => Some(self.require_fiscal_year(year).await?.id),
            None => None,
        };

        let accounts = self.reportable_accounts().await?;
        let activity = self.posted_activity(fiscal_year_id, None).await?;
        let rows = build_balance_rows(&accounts, &activity);

        Ok(ReportService::trial_balance(
            fiscal_year,
            Utc::now().date_naive(),
            rows,
        ))
    }

    /// Builds a general ledger for one account over an optional
    /// period.
    ///
    /// The opening balance layers the fiscal-year opening adjustments
    /// with all posted activity before the period start, so the
    /// closing balance reconciles with the materialized account
    /// balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown or the period is
    /// inverted.
    pub async fn general_ledger(
        &self,
        account_id: AccountId,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<GeneralLedgerReport, ReportError> {
        let account = accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ReportError::AccountNotFound(account_id))?;
        let info = to_account_info(&account);

        if let Some((from, to)) = period {
            ReportService::validate_date_range(from, to)?;
        }

        let opening = self
            .opening_balance(&info, period.map(|(from, _)| from))
            .await?;
        let rows = self.ledger_rows(account.id, period).await?;

        Ok(ReportService::general_ledger(&info, period, opening, rows))
    }

    /// Builds a balance sheet from the materialized balances.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn balance_sheet(&self) -> Result<BalanceSheetReport, ReportError> {
        let accounts = self.reportable_accounts().await?;

        let rows = accounts
            .iter()
            .map(|account| AccountBalance {
                account_id: AccountId::from_uuid(account.id),
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type.clone().into(),
                account_nature: account.account_nature.clone().into(),
                debit_total: Decimal::ZERO,
                credit_total: Decimal::ZERO,
                balance: account.current_balance,
            })
            .collect();

        Ok(ReportService::balance_sheet(Utc::now().date_naive(), rows))
    }

    /// Builds an income statement over a date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the range is inverted or a query fails.
    pub async fn income_statement(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        ReportService::validate_date_range(from, to)?;

        let accounts = self.reportable_accounts().await?;
        let activity = self.posted_activity(None, Some((from, to))).await?;
        let rows = build_balance_rows(&accounts, &activity);

        Ok(ReportService::income_statement(from, to, rows))
    }

    /// Finds a fiscal year by calendar year.
    async fn require_fiscal_year(&self, year: i32) -> Result<fiscal_years::Model, ReportError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::Year.eq(year))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(ReportError::FiscalYearNotFound(year))
    }

    /// Loads active posting accounts in code order.
    async fn reportable_accounts(&self) -> Result<Vec<accounts::Model>, ReportError> {
        accounts::Entity::find()
            .filter(accounts::Column::IsHeader.eq(false))
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Aggregates posted line totals per account, optionally scoped
    /// by fiscal year and entry date range.
    async fn posted_activity(
        &self,
        fiscal_year_id: Option<Uuid>,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<HashMap<Uuid, (Decimal, Decimal)>, ReportError> {
        let mut query = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entry_lines::Column::AccountId)
            .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit_total")
            .column_as(
                journal_entry_lines::Column::CreditAmount.sum(),
                "credit_total",
            )
            .inner_join(journal_entries::Entity)
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted))
            .group_by(journal_entry_lines::Column::AccountId);

        if let Some(fiscal_year_id) = fiscal_year_id {
            query = query.filter(journal_entries::Column::FiscalYearId.eq(fiscal_year_id));
        }
        if let Some((from, to)) = period {
            query = query
                .filter(journal_entries::Column::EntryDate.gte(from))
                .filter(journal_entries::Column::EntryDate.lte(to));
        }

        let rows = query
            .into_model::<ActivityRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.account_id, (row.debit_total, row.credit_total)))
            .collect())
    }

    /// Computes the balance carried into a ledger period: the signed
    /// opening adjustments plus, when a period start is given, all
    /// posted activity strictly before it.
    async fn opening_balance(
        &self,
        account: &mizan_core::accounts::AccountInfo,
        before: Option<NaiveDate>,
    ) -> Result<Decimal, ReportError> {
        let rows = opening_balances::Entity::find()
            .filter(opening_balances::Column::AccountId.eq(account.id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut opening = rows.iter().fold(Decimal::ZERO, |acc, row| {
            acc + account
                .account_nature
                .signed_delta(row.debit_amount, row.credit_amount)
        });

        if let Some(before) = before {
            let prior = journal_entry_lines::Entity::find()
                .select_only()
                .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit_total")
                .column_as(
                    journal_entry_lines::Column::CreditAmount.sum(),
                    "credit_total",
                )
                .inner_join(journal_entries::Entity)
                .filter(journal_entry_lines::Column::AccountId.eq(account.id.into_inner()))
                .filter(
                    journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted),
                )
                .filter(journal_entries::Column::EntryDate.lt(before))
                .into_model::<TotalsRow>()
                .one(&self.db)
                .await
                .map_err(db_err)?;

            if let Some(prior) = prior {
                opening += account.account_nature.signed_delta(
                    prior.debit_total.unwrap_or(Decimal::ZERO),
                    prior.credit_total.unwrap_or(Decimal::ZERO),
                );
            }
        }

        Ok(opening)
    }

    /// Loads the posted lines hitting one account within a period.
    async fn ledger_rows(
        &self,
        account_id: Uuid,
        period: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<LedgerEntryRow>, ReportError> {
        let mut query = journal_entry_lines::Entity::find()
            .select_only()
            .column_as(journal_entries::Column::Id, "entry_id")
            .column_as(journal_entries::Column::EntryNumber, "entry_number")
            .column_as(journal_entries::Column::EntryDate, "entry_date")
            .column_as(journal_entries::Column::Description, "entry_description")
            .column_as(journal_entry_lines::Column::Description, "line_description")
            .column(journal_entry_lines::Column::DebitAmount)
            .column(journal_entry_lines::Column::CreditAmount)
            .inner_join(journal_entries::Entity)
            .filter(journal_entry_lines::Column::AccountId.eq(account_id))
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted));

        if let Some((from, to)) = period {
            query = query
                .filter(journal_entries::Column::EntryDate.gte(from))
                .filter(journal_entries::Column::EntryDate.lte(to));
        }

        let rows = query
            .order_by_asc(journal_entries::Column::EntryDate)
            .order_by_asc(journal_entries::Column::EntryNumber)
            .into_model::<LedgerLineRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| LedgerEntryRow {
                entry_id: JournalEntryId::from_uuid(row.entry_id),
                entry_number: row.entry_number,
                entry_date: row.entry_date,
                description: row.line_description.unwrap_or(row.entry_description),
                debit: row.debit_amount,
                credit: row.credit_amount,
            })
            .collect())
    }
}

// ============================================================================
// Row assembly helpers
// ============================================================================

/// Pairs every account with its aggregated activity, defaulting to
/// zero for accounts without posted lines.
fn build_balance_rows(
    accounts: &[accounts::Model],
    activity: &HashMap<Uuid, (Decimal, Decimal)>,
) -> Vec<AccountBalance> {
    accounts
        .iter()
        .map(|account| {
            let (debit_total, credit_total) = activity
                .get(&account.id)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            AccountBalance::from_activity(
                AccountId::from_uuid(account.id),
                account.code.clone(),
                account.name.clone(),
                account.account_type.clone().into(),
                account.account_nature.clone().into(),
                debit_total,
                credit_total,
            )
        })
        .collect()
}

fn db_err(err: DbErr) -> ReportError {
    ReportError::Database(err.to_string())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
