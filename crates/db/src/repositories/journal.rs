//! Journal entry repository: draft creation, posting, cancellation.
//!
//! Entry numbers are generated per fiscal year and protected by a
//! unique constraint; a writer that loses a concurrent race retries
//! with a fresh number. Posting applies the signed-delta rule to the
//! materialized account balances inside the same transaction that
//! flips the status.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use mizan_core::accounts::AccountInfo;
use mizan_core::journal::{
    next_entry_number, validate_lines, ApprovalDecision, CreateEntryInput, EntryStatus,
    JournalError, JournalLineInput, JournalService,
};
use mizan_shared::types::{AccountId, JournalEntryId, UserId};

use super::account::{to_account_info, AccountRepository, BalanceDelta};
use crate::entities::{
    accounts, fiscal_years, journal_entries, journal_entry_lines, sea_orm_active_enums,
};

/// Attempts before giving up on entry number generation.
const NUMBER_RETRY_ATTEMPTS: u32 = 3;

/// Filter options for listing journal entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by calendar year.
    pub fiscal_year: Option<i32>,
    /// Filter by date range start.
    pub date_from: Option<NaiveDate>,
    /// Filter by date range end.
    pub date_to: Option<NaiveDate>,
}

/// A journal entry header with its lines in line-number order.
#[derive(Debug, Clone)]
pub struct EntryWithLines {
    /// Entry header.
    pub entry: journal_entries::Model,
    /// Entry lines.
    pub lines: Vec<journal_entry_lines::Model>,
}

/// Which terminal state a draft is moving to.
#[derive(Debug, Clone, Copy)]
enum Transition {
    Post,
    Cancel,
}

/// Journal entry repository.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft entry with its lines.
    ///
    /// The header and all lines are persisted atomically. The entry
    /// number is assigned here; on a unique-constraint collision with
    /// a concurrent writer the whole transaction is retried with a
    /// freshly read number.
    ///
    /// # Errors
    ///
    /// Returns an error if no open fiscal year covers the entry date,
    /// the lines fail validation, or number generation keeps
    /// colliding.
    pub async fn create_entry(
        &self,
        input: CreateEntryInput,
    ) -> Result<EntryWithLines, JournalError> {
        let fiscal_year = self.find_open_fiscal_year(input.entry_date).await?;

        let ids = input.lines.iter().map(|l| l.account_id.into_inner()).collect();
        let account_index = load_account_index(&self.db, ids).await.map_err(db_err)?;
        JournalService::validate_entry(&input, |id| account_index.get(&id).cloned())?;

        let mut attempt = 0;
        loop {
            attempt += 1;

            let txn = self.db.begin().await.map_err(db_err)?;
            let latest = latest_entry_number(&txn, fiscal_year.id).await?;
            let entry_number = next_entry_number(fiscal_year.year, latest.as_deref());

            match insert_entry(&txn, &input, fiscal_year.id, &entry_number).await {
                Ok((entry, lines)) => {
                    txn.commit().await.map_err(db_err)?;
                    return Ok(EntryWithLines { entry, lines });
                }
                Err(err) => {
                    txn.rollback().await.map_err(db_err)?;
                    match err.sql_err() {
                        Some(SqlErr::UniqueConstraintViolation(_))
                            if attempt < NUMBER_RETRY_ATTEMPTS => {}
                        Some(SqlErr::UniqueConstraintViolation(_)) => {
                            return Err(JournalError::NumberConflict);
                        }
                        _ => return Err(db_err(err)),
                    }
                }
            }
        }
    }

    /// Posts a draft entry.
    ///
    /// Re-validates the balance invariant against the stored lines,
    /// applies the signed balance deltas, and stamps the posting
    /// metadata, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, not in draft, or the
    /// stored lines no longer validate.
    pub async fn post_entry(
        &self,
        entry_id: JournalEntryId,
        posted_by: UserId,
    ) -> Result<EntryWithLines, JournalError> {
        self.transition(entry_id, posted_by, Transition::Post, None).await
    }

    /// Cancels a draft entry. No balances are touched.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing or not in draft.
    pub async fn cancel_entry(
        &self,
        entry_id: JournalEntryId,
        cancelled_by: UserId,
        notes: Option<String>,
    ) -> Result<EntryWithLines, JournalError> {
        self.transition(entry_id, cancelled_by, Transition::Cancel, notes).await
    }

    /// Resolves a review decision into a post or a cancellation,
    /// recording the reviewer's notes either way.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Self::post_entry`] and
    /// [`Self::cancel_entry`].
    pub async fn approve_entry(
        &self,
        entry_id: JournalEntryId,
        decision: ApprovalDecision,
        reviewed_by: UserId,
        notes: Option<String>,
    ) -> Result<EntryWithLines, JournalError> {
        let transition = match decision {
            ApprovalDecision::Approved => Transition::Post,
            ApprovalDecision::Rejected => Transition::Cancel,
        };
        self.transition(entry_id, reviewed_by, transition, notes).await
    }

    /// Gets an entry with its lines.
    ///
    /// # Errors
    ///
    /// Returns `JournalError::EntryNotFound` if no entry exists.
    pub async fn get_entry(&self, entry_id: JournalEntryId) -> Result<EntryWithLines, JournalError> {
        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(JournalError::EntryNotFound(entry_id))?;

        let lines = self.load_lines(&self.db, entry.id).await?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Lists entry headers with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_entries(
        &self,
        filter: EntryFilter,
    ) -> Result<Vec<journal_entries::Model>, JournalError> {
        let mut query = journal_entries::Entity::find();

        if let Some(status) = filter.status {
            let status: sea_orm_active_enums::EntryStatus = status.into();
            query = query.filter(journal_entries::Column::Status.eq(status));
        }
        if let Some(year) = filter.fiscal_year {
            let Some(fiscal_year) = fiscal_years::Entity::find()
                .filter(fiscal_years::Column::Year.eq(year))
                .one(&self.db)
                .await
                .map_err(db_err)?
            else {
                return Ok(Vec::new());
            };
            query = query.filter(journal_entries::Column::FiscalYearId.eq(fiscal_year.id));
        }
        if let Some(date_from) = filter.date_from {
            query = query.filter(journal_entries::Column::EntryDate.gte(date_from));
        }
        if let Some(date_to) = filter.date_to {
            query = query.filter(journal_entries::Column::EntryDate.lte(date_to));
        }

        query
            .order_by_desc(journal_entries::Column::EntryDate)
            .order_by_desc(journal_entries::Column::EntryNumber)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Moves a draft to a terminal state under a row lock.
    async fn transition(
        &self,
        entry_id: JournalEntryId,
        actor: UserId,
        transition: Transition,
        notes: Option<String>,
    ) -> Result<EntryWithLines, JournalError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let entry = journal_entries::Entity::find_by_id(entry_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(JournalError::EntryNotFound(entry_id))?;

        let status: EntryStatus = entry.status.clone().into();
        match transition {
            Transition::Post => JournalService::validate_can_post(status)?,
            Transition::Cancel => JournalService::validate_can_cancel(status)?,
        }

        let lines = self.load_lines(&txn, entry.id).await?;

        if matches!(transition, Transition::Post) {
            let inputs = to_line_inputs(&lines);
            validate_lines(&inputs)?;

            let ids = lines.iter().map(|l| l.account_id).collect();
            let account_index = load_account_index(&txn, ids).await.map_err(db_err)?;
            for line in &lines {
                let account_id = AccountId::from_uuid(line.account_id);
                let account = account_index
                    .get(&account_id)
                    .ok_or(JournalError::AccountNotFound(account_id))?;
                if account.is_header {
                    return Err(JournalError::HeaderAccount(account_id));
                }
                if !account.is_active {
                    return Err(JournalError::AccountInactive(account_id));
                }
            }

            let deltas = balance_deltas(&account_index, &lines)?;
            AccountRepository::apply_balance_deltas(&txn, &deltas)
                .await
                .map_err(db_err)?;
        }

        let now = Utc::now().into();
        let mut active: journal_entries::ActiveModel = entry.into();
        match transition {
            Transition::Post => {
                active.status = Set(sea_orm_active_enums::EntryStatus::Posted);
                active.posted_by = Set(Some(actor.into_inner()));
                active.posted_at = Set(Some(now));
            }
            Transition::Cancel => {
                active.status = Set(sea_orm_active_enums::EntryStatus::Cancelled);
                active.cancelled_by = Set(Some(actor.into_inner()));
                active.cancelled_at = Set(Some(now));
            }
        }
        if let Some(notes) = notes {
            active.review_notes = Set(Some(notes));
        }
        active.updated_at = Set(now);
        let entry = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(EntryWithLines { entry, lines })
    }

    /// Finds the open fiscal year covering a date.
    async fn find_open_fiscal_year(
        &self,
        date: NaiveDate,
    ) -> Result<fiscal_years::Model, JournalError> {
        fiscal_years::Entity::find()
            .filter(fiscal_years::Column::StartDate.lte(date))
            .filter(fiscal_years::Column::EndDate.gte(date))
            .filter(
                fiscal_years::Column::Status.eq(sea_orm_active_enums::FiscalYearStatus::Open),
            )
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(JournalError::NoOpenFiscalYear(date))
    }

    /// Loads an entry's lines in line-number order.
    async fn load_lines<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry_id: Uuid,
    ) -> Result<Vec<journal_entry_lines::Model>, JournalError> {
        journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::EntryId.eq(entry_id))
            .order_by_asc(journal_entry_lines::Column::LineNumber)
            .all(conn)
            .await
            .map_err(db_err)
    }
}

/// Inserts the header and lines; a `DbErr` is returned raw so the
/// caller can detect unique-constraint collisions.
async fn insert_entry(
    txn: &DatabaseTransaction,
    input: &CreateEntryInput,
    fiscal_year_id: Uuid,
    entry_number: &str,
) -> Result<(journal_entries::Model, Vec<journal_entry_lines::Model>), DbErr> {
    let now = Utc::now().into();
    let entry_id = Uuid::new_v4();

    let entry = journal_entries::ActiveModel {
        id: Set(entry_id),
        entry_number: Set(entry_number.to_string()),
        entry_date: Set(input.entry_date),
        description: Set(input.description.clone()),
        fiscal_year_id: Set(fiscal_year_id),
        status: Set(sea_orm_active_enums::EntryStatus::Draft),
        reference_type: Set(input.reference.as_ref().map(|r| r.reference_type.clone())),
        reference_id: Set(input.reference.as_ref().map(|r| r.reference_id)),
        created_by: Set(input.created_by.into_inner()),
        posted_by: Set(None),
        posted_at: Set(None),
        cancelled_by: Set(None),
        cancelled_at: Set(None),
        review_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let entry = entry.insert(txn).await?;

    let mut lines = Vec::with_capacity(input.lines.len());
    let mut line_number = 0_i32;
    for line in &input.lines {
        line_number += 1;
        let row = journal_entry_lines::ActiveModel {
            id: Set(Uuid::new_v4()),
            entry_id: Set(entry_id),
            line_number: Set(line_number),
            account_id: Set(line.account_id.into_inner()),
            debit_amount: Set(line.debit_amount),
            credit_amount: Set(line.credit_amount),
            description: Set(line.description.clone()),
            created_at: Set(now),
        };
        lines.push(row.insert(txn).await?);
    }

    Ok((entry, lines))
}

/// Reads the highest entry number in a fiscal year, inside the
/// writer's transaction.
///
/// Numbers are zero-padded to a fixed width, so the lexicographic
/// maximum is the numeric maximum.
async fn latest_entry_number(
    txn: &DatabaseTransaction,
    fiscal_year_id: Uuid,
) -> Result<Option<String>, JournalError> {
    journal_entries::Entity::find()
        .select_only()
        .column(journal_entries::Column::EntryNumber)
        .filter(journal_entries::Column::FiscalYearId.eq(fiscal_year_id))
        .order_by_desc(journal_entries::Column::EntryNumber)
        .limit(1)
        .into_tuple::<String>()
        .one(txn)
        .await
        .map_err(db_err)
}

/// Loads the referenced accounts keyed by ID.
async fn load_account_index<C: ConnectionTrait>(
    conn: &C,
    ids: Vec<Uuid>,
) -> Result<HashMap<AccountId, AccountInfo>, DbErr> {
    let models = accounts::Entity::find()
        .filter(accounts::Column::Id.is_in(ids))
        .all(conn)
        .await?;
    Ok(models
        .iter()
        .map(|m| (AccountId::from_uuid(m.id), to_account_info(m)))
        .collect())
}

// ============================================================================
// Posting helpers
// ============================================================================

/// Converts stored lines back into validation inputs.
fn to_line_inputs(lines: &[journal_entry_lines::Model]) -> Vec<JournalLineInput> {
    lines
        .iter()
        .map(|line| JournalLineInput {
            account_id: AccountId::from_uuid(line.account_id),
            debit_amount: line.debit_amount,
            credit_amount: line.credit_amount,
            description: line.description.clone(),
        })
        .collect()
}

/// Folds an entry's lines into one signed delta per account.
///
/// Deltas are sorted by account ID so concurrent postings touching the
/// same accounts acquire their row locks in the same order.
fn balance_deltas(
    accounts: &HashMap<AccountId, AccountInfo>,
    lines: &[journal_entry_lines::Model],
) -> Result<Vec<BalanceDelta>, JournalError> {
    let mut merged: HashMap<Uuid, Decimal> = HashMap::new();
    for line in lines {
        let account_id = AccountId::from_uuid(line.account_id);
        let account = accounts
            .get(&account_id)
            .ok_or(JournalError::AccountNotFound(account_id))?;
        let delta = account
            .account_nature
            .signed_delta(line.debit_amount, line.credit_amount);
        *merged.entry(line.account_id).or_insert(Decimal::ZERO) += delta;
    }

    let mut deltas: Vec<BalanceDelta> = merged
        .into_iter()
        .map(|(account_id, delta)| BalanceDelta { account_id, delta })
        .collect();
    deltas.sort_by_key(|d| d.account_id);
    Ok(deltas)
}

fn db_err(err: DbErr) -> JournalError {
    JournalError::Database(err.to_string())
}
