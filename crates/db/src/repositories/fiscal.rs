//! Fiscal year repository.
//!
//! Fiscal years follow the calendar year and scope journal entry
//! numbering. Opening balances hang off a fiscal year as an
//! adjustment layer consumed by the general ledger.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use mizan_core::fiscal::{FiscalYear, FiscalYearStatus};
use mizan_shared::types::{AccountId, FiscalYearId};

use crate::entities::{accounts, fiscal_years, opening_balances, sea_orm_active_enums};

/// Error types for fiscal year operations.
#[derive(Debug, thiserror::Error)]
pub enum FiscalError {
    /// A fiscal year for this calendar year already exists.
    #[error("Fiscal year {0} already exists")]
    DuplicateYear(i32),

    /// The calendar year cannot be represented.
    #[error("Invalid fiscal year: {0}")]
    InvalidYear(i32),

    /// Fiscal year not found.
    #[error("Fiscal year not found")]
    YearNotFound,

    /// Fiscal year is closed.
    #[error("Fiscal year {0} is closed")]
    YearClosed(i32),

    /// Opening balance target account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Opening balances cannot target header accounts.
    #[error("Account {0} is a header account and cannot carry an opening balance")]
    HeaderAccount(AccountId),

    /// Opening balance amounts must be non-negative.
    #[error("Opening balance amounts must be non-negative")]
    NegativeAmount,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl FiscalError {
    /// Returns a stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateYear(_) => "DUPLICATE_FISCAL_YEAR",
            Self::InvalidYear(_) => "INVALID_FISCAL_YEAR",
            Self::YearNotFound => "FISCAL_YEAR_NOT_FOUND",
            Self::YearClosed(_) => "FISCAL_YEAR_CLOSED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::HeaderAccount(_) => "HEADER_ACCOUNT",
            Self::NegativeAmount => "NEGATIVE_OPENING_AMOUNT",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidYear(_) | Self::NegativeAmount => 400,
            Self::YearNotFound | Self::AccountNotFound(_) => 404,
            Self::DuplicateYear(_) | Self::YearClosed(_) => 409,
            Self::HeaderAccount(_) => 422,
            Self::Database(_) => 500,
        }
    }
}

/// Input for setting an account's opening balance within a year.
#[derive(Debug, Clone)]
pub struct OpeningBalanceInput {
    /// Owning fiscal year.
    pub fiscal_year_id: FiscalYearId,
    /// Target posting account.
    pub account_id: AccountId,
    /// Opening debit amount (>= 0).
    pub debit_amount: Decimal,
    /// Opening credit amount (>= 0).
    pub credit_amount: Decimal,
}

/// Fiscal year repository.
#[derive(Debug, Clone)]
pub struct FiscalRepository {
    db: DatabaseConnection,
}

impl FiscalRepository {
    /// Creates a new fiscal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an open calendar fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is invalid or already exists.
    pub async fn create_fiscal_year(&self, year: i32) -> Result<fiscal_years::Model, FiscalError> {
        let fiscal_year = FiscalYear::calendar(year).ok_or(FiscalError::InvalidYear(year))?;

        let existing = fiscal_years::Entity::find()
            .filter(fiscal_years::Column::Year.eq(year))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(FiscalError::DuplicateYear(year));
        }

        let now = Utc::now().into();
        let model = fiscal_years::ActiveModel {
            id: Set(fiscal_year.id.into_inner()),
            year: Set(fiscal_year.year),
            name: Set(fiscal_year.name),
            start_date: Set(fiscal_year.start_date),
            end_date: Set(fiscal_year.end_date),
            status: Set(sea_orm_active_enums::FiscalYearStatus::Open),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Lists fiscal years, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_fiscal_years(&self) -> Result<Vec<fiscal_years::Model>, FiscalError> {
        Ok(fiscal_years::Entity::find()
            .order_by_desc(fiscal_years::Column::Year)
            .all(&self.db)
            .await?)
    }

    /// Finds the fiscal year covering a calendar year.
    ///
    /// # Errors
    ///
    /// Returns `FiscalError::YearNotFound` if none exists.
    pub async fn find_by_year(&self, year: i32) -> Result<fiscal_years::Model, FiscalError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::Year.eq(year))
            .one(&self.db)
            .await?
            .ok_or(FiscalError::YearNotFound)
    }

    /// Finds the fiscal year whose date range covers a date.
    ///
    /// # Errors
    ///
    /// Returns `FiscalError::YearNotFound` if none covers it.
    pub async fn find_for_date(&self, date: NaiveDate) -> Result<fiscal_years::Model, FiscalError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::StartDate.lte(date))
            .filter(fiscal_years::Column::EndDate.gte(date))
            .one(&self.db)
            .await?
            .ok_or(FiscalError::YearNotFound)
    }

    /// Closes a fiscal year; posting into it is rejected afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is missing or already closed.
    pub async fn close_fiscal_year(&self, year: i32) -> Result<fiscal_years::Model, FiscalError> {
        let fiscal_year = self.find_by_year(year).await?;
        if fiscal_year.status == sea_orm_active_enums::FiscalYearStatus::Closed {
            return Err(FiscalError::YearClosed(year));
        }

        let mut active: fiscal_years::ActiveModel = fiscal_year.into();
        active.status = Set(sea_orm_active_enums::FiscalYearStatus::Closed);
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Creates or replaces one account's opening balance for a year.
    ///
    /// The (fiscal year, account) pair is unique; a second upsert for
    /// the same pair overwrites the amounts instead of stacking rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is missing or closed, the account
    /// is missing or a header, or an amount is negative.
    pub async fn upsert_opening_balance(
        &self,
        input: OpeningBalanceInput,
    ) -> Result<opening_balances::Model, FiscalError> {
        if input.debit_amount < Decimal::ZERO || input.credit_amount < Decimal::ZERO {
            return Err(FiscalError::NegativeAmount);
        }

        let fiscal_year = fiscal_years::Entity::find_by_id(input.fiscal_year_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(FiscalError::YearNotFound)?;
        if fiscal_year.status == sea_orm_active_enums::FiscalYearStatus::Closed {
            return Err(FiscalError::YearClosed(fiscal_year.year));
        }

        let account = accounts::Entity::find_by_id(input.account_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(FiscalError::AccountNotFound(input.account_id))?;
        if account.is_header {
            return Err(FiscalError::HeaderAccount(input.account_id));
        }

        let now = Utc::now().into();
        let existing = opening_balances::Entity::find()
            .filter(opening_balances::Column::FiscalYearId.eq(fiscal_year.id))
            .filter(opening_balances::Column::AccountId.eq(account.id))
            .one(&self.db)
            .await?;

        let model = match existing {
            Some(row) => {
                let mut active: opening_balances::ActiveModel = row.into();
                active.debit_amount = Set(input.debit_amount);
                active.credit_amount = Set(input.credit_amount);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                let row = opening_balances::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    fiscal_year_id: Set(fiscal_year.id),
                    account_id: Set(account.id),
                    debit_amount: Set(input.debit_amount),
                    credit_amount: Set(input.credit_amount),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                row.insert(&self.db).await?
            }
        };

        Ok(model)
    }

    /// Lists the opening balances recorded for a fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error if the year is missing or the query fails.
    pub async fn list_opening_balances(
        &self,
        fiscal_year_id: FiscalYearId,
    ) -> Result<Vec<opening_balances::Model>, FiscalError> {
        fiscal_years::Entity::find_by_id(fiscal_year_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(FiscalError::YearNotFound)?;

        Ok(opening_balances::Entity::find()
            .filter(opening_balances::Column::FiscalYearId.eq(fiscal_year_id.into_inner()))
            .all(&self.db)
            .await?)
    }
}

// ============================================================================
// Projection helpers
// ============================================================================

/// Projects a stored fiscal year into the domain view.
#[must_use]
pub fn to_fiscal_year(model: &fiscal_years::Model) -> FiscalYear {
    FiscalYear {
        id: FiscalYearId::from_uuid(model.id),
        year: model.year,
        name: model.name.clone(),
        start_date: model.start_date,
        end_date: model.end_date,
        status: model.status.clone().into(),
    }
}
