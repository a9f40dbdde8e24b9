//! Bank reconciliation repository.
//!
//! Stores imported statement lines, produces advisory match
//! suggestions against posted entries, and owns the matched-flag
//! lifecycle: the match record and the transaction's `is_matched`
//! flag change together inside one transaction, both ways.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use mizan_core::reconciliation::{
    suggest_matches, validate_confidence, BankTransactionInfo, CandidateEntry, MatchSuggestion,
    MatchType, ReconciliationError, DATE_WINDOW_DAYS,
};
use mizan_shared::types::{BankTransactionId, JournalEntryId, ReconciliationMatchId, UserId};

use crate::entities::{
    bank_reconciliation_matches, bank_transactions, journal_entries, journal_entry_lines,
    sea_orm_active_enums,
};

/// Input for recording one imported statement line.
#[derive(Debug, Clone)]
pub struct RecordTransactionInput {
    /// Statement date.
    pub transaction_date: NaiveDate,
    /// Signed amount; deposits positive, withdrawals negative.
    pub amount: Decimal,
    /// Statement description.
    pub description: String,
    /// Bank-side reference, when the statement carries one.
    pub statement_reference: Option<String>,
}

/// Input for confirming a match.
#[derive(Debug, Clone)]
pub struct CreateMatchInput {
    /// Bank transaction to mark as matched.
    pub bank_transaction_id: BankTransactionId,
    /// Posted journal entry to link.
    pub journal_entry_id: JournalEntryId,
    /// How the match came to exist.
    pub match_type: MatchType,
    /// Confidence in [0, 1]; manual matches typically pass 1.00.
    pub confidence_score: Decimal,
    /// Confirming user, when known.
    pub matched_by: Option<UserId>,
}

/// A confirmed match together with the updated transaction.
#[derive(Debug, Clone)]
pub struct CreatedMatch {
    /// The persisted match record.
    pub record: bank_reconciliation_matches::Model,
    /// The transaction with its matched flag set.
    pub transaction: bank_transactions::Model,
}

/// Per-entry debit totals used as the matchable entry amount.
#[derive(Debug, FromQueryResult)]
struct EntryTotalRow {
    entry_id: Uuid,
    debit_total: Decimal,
}

/// Bank reconciliation repository.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a batch of imported statement lines atomically.
    ///
    /// All lines start unmatched.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails; no line is kept.
    pub async fn record_transactions(
        &self,
        inputs: Vec<RecordTransactionInput>,
    ) -> Result<Vec<bank_transactions::Model>, ReconciliationError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now().into();

        let mut recorded = Vec::with_capacity(inputs.len());
        for input in inputs {
            let transaction = bank_transactions::ActiveModel {
                id: Set(Uuid::new_v4()),
                transaction_date: Set(input.transaction_date),
                amount: Set(input.amount),
                description: Set(input.description),
                statement_reference: Set(input.statement_reference),
                is_matched: Set(false),
                journal_entry_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            recorded.push(transaction.insert(&txn).await.map_err(db_err)?);
        }

        txn.commit().await.map_err(db_err)?;
        Ok(recorded)
    }

    /// Lists statement lines in statement order, optionally filtered
    /// by matched state.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transactions(
        &self,
        matched: Option<bool>,
    ) -> Result<Vec<bank_transactions::Model>, ReconciliationError> {
        let mut query = bank_transactions::Entity::find();
        if let Some(matched) = matched {
            query = query.filter(bank_transactions::Column::IsMatched.eq(matched));
        }

        query
            .order_by_asc(bank_transactions::Column::TransactionDate)
            .order_by_asc(bank_transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists confirmed match records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_matches(
        &self,
    ) -> Result<Vec<bank_reconciliation_matches::Model>, ReconciliationError> {
        bank_reconciliation_matches::Entity::find()
            .order_by_desc(bank_reconciliation_matches::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Computes advisory match suggestions for all unmatched
    /// transactions. Nothing is persisted.
    ///
    /// Candidates are posted entries that have no match record and
    /// fall inside the transaction date range padded by the matching
    /// window on both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn suggest_matches(&self) -> Result<Vec<MatchSuggestion>, ReconciliationError> {
        let transactions = self.unmatched_transactions().await?;
        let infos: Vec<BankTransactionInfo> =
            transactions.iter().map(to_transaction_info).collect();
        let Some((window_start, window_end)) = candidate_window(&infos) else {
            return Ok(Vec::new());
        };

        let matched_ids: Vec<Uuid> = bank_reconciliation_matches::Entity::find()
            .select_only()
            .column(bank_reconciliation_matches::Column::JournalEntryId)
            .into_tuple::<Uuid>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let entries = journal_entries::Entity::find()
            .filter(journal_entries::Column::Status.eq(sea_orm_active_enums::EntryStatus::Posted))
            .filter(journal_entries::Column::EntryDate.gte(window_start))
            .filter(journal_entries::Column::EntryDate.lte(window_end))
            .filter(journal_entries::Column::Id.is_not_in(matched_ids))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let totals = self.entry_debit_totals(&entries).await?;
        let candidates: Vec<CandidateEntry> = entries
            .iter()
            .map(|entry| CandidateEntry {
                id: JournalEntryId::from_uuid(entry.id),
                entry_number: entry.entry_number.clone(),
                entry_date: entry.entry_date,
                amount: totals.get(&entry.id).copied().unwrap_or(Decimal::ZERO),
                description: entry.description.clone(),
            })
            .collect();

        Ok(suggest_matches(&infos, &candidates))
    }

    /// Confirms a match, linking a transaction to a posted entry.
    ///
    /// The transaction row is locked for the duration so concurrent
    /// confirmations of the same transaction serialize; the second
    /// one sees the matched flag and is rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction or entry is missing, the
    /// transaction is already matched, the entry is not posted, or
    /// the confidence score is out of range.
    pub async fn create_match(
        &self,
        input: CreateMatchInput,
    ) -> Result<CreatedMatch, ReconciliationError> {
        validate_confidence(input.confidence_score)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let transaction =
            bank_transactions::Entity::find_by_id(input.bank_transaction_id.into_inner())
                .lock_exclusive()
                .one(&txn)
                .await
                .map_err(db_err)?
                .ok_or(ReconciliationError::TransactionNotFound(
                    input.bank_transaction_id,
                ))?;
        if transaction.is_matched {
            return Err(ReconciliationError::AlreadyMatched(
                input.bank_transaction_id,
            ));
        }

        let entry = journal_entries::Entity::find_by_id(input.journal_entry_id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReconciliationError::EntryNotFound(input.journal_entry_id))?;
        if entry.status != sea_orm_active_enums::EntryStatus::Posted {
            return Err(ReconciliationError::EntryNotPosted(input.journal_entry_id));
        }

        let record = bank_reconciliation_matches::ActiveModel {
            id: Set(Uuid::new_v4()),
            bank_transaction_id: Set(transaction.id),
            journal_entry_id: Set(entry.id),
            match_type: Set(input.match_type.into()),
            confidence_score: Set(input.confidence_score),
            matched_by: Set(input.matched_by.map(UserId::into_inner)),
            created_at: Set(Utc::now().into()),
        };
        let record = record.insert(&txn).await.map_err(db_err)?;

        let mut active: bank_transactions::ActiveModel = transaction.into();
        active.is_matched = Set(true);
        active.journal_entry_id = Set(Some(entry.id));
        active.updated_at = Set(Utc::now().into());
        let transaction = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;

        Ok(CreatedMatch {
            record,
            transaction,
        })
    }

    /// Deletes a match and returns the transaction to the unmatched
    /// pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the match or its transaction is missing.
    pub async fn delete_match(
        &self,
        match_id: ReconciliationMatchId,
    ) -> Result<bank_transactions::Model, ReconciliationError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let record = bank_reconciliation_matches::Entity::find_by_id(match_id.into_inner())
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReconciliationError::MatchNotFound(match_id))?;

        let transaction = bank_transactions::Entity::find_by_id(record.bank_transaction_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(ReconciliationError::TransactionNotFound(
                BankTransactionId::from_uuid(record.bank_transaction_id),
            ))?;

        bank_reconciliation_matches::Entity::delete_by_id(record.id)
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let mut active: bank_transactions::ActiveModel = transaction.into();
        active.is_matched = Set(false);
        active.journal_entry_id = Set(None);
        active.updated_at = Set(Utc::now().into());
        let transaction = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok(transaction)
    }

    /// Loads unmatched transactions in date order.
    async fn unmatched_transactions(
        &self,
    ) -> Result<Vec<bank_transactions::Model>, ReconciliationError> {
        bank_transactions::Entity::find()
            .filter(bank_transactions::Column::IsMatched.eq(false))
            .order_by_asc(bank_transactions::Column::TransactionDate)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Sums the debit side of each entry's lines.
    async fn entry_debit_totals(
        &self,
        entries: &[journal_entries::Model],
    ) -> Result<HashMap<Uuid, Decimal>, ReconciliationError> {
        if entries.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<Uuid> = entries.iter().map(|entry| entry.id).collect();
        let rows = journal_entry_lines::Entity::find()
            .select_only()
            .column(journal_entry_lines::Column::EntryId)
            .column_as(journal_entry_lines::Column::DebitAmount.sum(), "debit_total")
            .filter(journal_entry_lines::Column::EntryId.is_in(ids))
            .group_by(journal_entry_lines::Column::EntryId)
            .into_model::<EntryTotalRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| (row.entry_id, row.debit_total))
            .collect())
    }
}

// ============================================================================
// Projection helpers
// ============================================================================

/// Projects a stored transaction into the matching view.
#[must_use]
pub fn to_transaction_info(transaction: &bank_transactions::Model) -> BankTransactionInfo {
    BankTransactionInfo {
        id: BankTransactionId::from_uuid(transaction.id),
        transaction_date: transaction.transaction_date,
        amount: transaction.amount,
        description: transaction.description.clone(),
    }
}

/// Date range covering every unmatched transaction, padded by the
/// matching window on both ends. `None` when there is nothing to
/// match.
fn candidate_window(transactions: &[BankTransactionInfo]) -> Option<(NaiveDate, NaiveDate)> {
    let min = transactions.iter().map(|t| t.transaction_date).min()?;
    let max = transactions.iter().map(|t| t.transaction_date).max()?;
    let pad = Duration::days(DATE_WINDOW_DAYS);
    Some((min - pad, max + pad))
}

fn db_err(err: DbErr) -> ReconciliationError {
    ReconciliationError::Database(err.to_string())
}
