//! Bank reconciliation routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use mizan_core::reconciliation::{MatchType, ReconciliationError};
use mizan_db::repositories::{CreateMatchInput, ReconciliationRepository, RecordTransactionInput};
use mizan_shared::types::{BankTransactionId, JournalEntryId, ReconciliationMatchId, UserId};

/// Creates the bank reconciliation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bank/transactions", get(list_transactions))
        .route("/bank/transactions", post(record_transactions))
        .route("/bank/suggestions", get(suggest_matches))
        .route("/bank/matches", get(list_matches))
        .route("/bank/matches", post(create_match))
        .route("/bank/matches/{match_id}", delete(delete_match))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing bank transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by matched flag.
    pub matched: Option<bool>,
}

/// Request body for importing statement lines.
#[derive(Debug, Deserialize)]
pub struct RecordTransactionsRequest {
    /// Statement lines to record.
    pub transactions: Vec<StatementLineRequest>,
}

/// One imported statement line.
#[derive(Debug, Deserialize)]
pub struct StatementLineRequest {
    /// Statement date (YYYY-MM-DD).
    pub transaction_date: NaiveDate,
    /// Signed amount; deposits positive, withdrawals negative.
    pub amount: Decimal,
    /// Statement description.
    pub description: String,
    /// Bank-side reference, when the statement carries one.
    pub statement_reference: Option<String>,
}

/// Request body for confirming a match.
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    /// Bank transaction to mark as matched.
    pub bank_transaction_id: Uuid,
    /// Posted journal entry to link.
    pub journal_entry_id: Uuid,
    /// How the match came to exist: "auto", "manual" or "suggested".
    pub match_type: MatchType,
    /// Confidence in [0, 1].
    pub confidence_score: Decimal,
    /// Confirming user, when known.
    pub matched_by: Option<Uuid>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/bank/transactions` - List imported statement lines.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());

    match repo.list_transactions(query.matched).await {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => reconciliation_error(&e),
    }
}

/// POST `/bank/transactions` - Record imported statement lines.
async fn record_transactions(
    State(state): State<AppState>,
    Json(payload): Json<RecordTransactionsRequest>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());
    let inputs: Vec<RecordTransactionInput> = payload
        .transactions
        .into_iter()
        .map(|line| RecordTransactionInput {
            transaction_date: line.transaction_date,
            amount: line.amount,
            description: line.description,
            statement_reference: line.statement_reference,
        })
        .collect();

    match repo.record_transactions(inputs).await {
        Ok(recorded) => {
            info!(count = recorded.len(), "Bank transactions recorded");
            (StatusCode::CREATED, Json(json!({ "transactions": recorded }))).into_response()
        }
        Err(e) => reconciliation_error(&e),
    }
}

/// GET `/bank/suggestions` - Score unmatched transactions against
/// posted entries and return suggestions at or above the confidence
/// floor.
async fn suggest_matches(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());

    match repo.suggest_matches().await {
        Ok(suggestions) => {
            (StatusCode::OK, Json(json!({ "suggestions": suggestions }))).into_response()
        }
        Err(e) => reconciliation_error(&e),
    }
}

/// GET `/bank/matches` - List confirmed matches, newest first.
async fn list_matches(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());

    match repo.list_matches().await {
        Ok(matches) => (StatusCode::OK, Json(json!({ "matches": matches }))).into_response(),
        Err(e) => reconciliation_error(&e),
    }
}

/// POST `/bank/matches` - Confirm a match between a bank transaction
/// and a posted entry.
async fn create_match(
    State(state): State<AppState>,
    Json(payload): Json<CreateMatchRequest>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());
    let input = CreateMatchInput {
        bank_transaction_id: BankTransactionId::from_uuid(payload.bank_transaction_id),
        journal_entry_id: JournalEntryId::from_uuid(payload.journal_entry_id),
        match_type: payload.match_type,
        confidence_score: payload.confidence_score,
        matched_by: payload.matched_by.map(UserId::from_uuid),
    };

    match repo.create_match(input).await {
        Ok(created) => {
            info!(
                match_id = %created.record.id,
                bank_transaction_id = %created.transaction.id,
                "Bank match confirmed"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "match": created.record,
                    "transaction": created.transaction
                })),
            )
                .into_response()
        }
        Err(e) => reconciliation_error(&e),
    }
}

/// DELETE `/bank/matches/{match_id}` - Unmatch, returning the
/// transaction to the unmatched pool.
async fn delete_match(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ReconciliationRepository::new(state.connection());

    match repo.delete_match(ReconciliationMatchId::from_uuid(match_id)).await {
        Ok(transaction) => {
            info!(%match_id, bank_transaction_id = %transaction.id, "Bank match removed");
            (StatusCode::OK, Json(json!({ "transaction": transaction }))).into_response()
        }
        Err(e) => reconciliation_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn reconciliation_error(err: &ReconciliationError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Reconciliation operation failed");
        return (
            status,
            Json(json!({
                "error": err.error_code(),
                "message": "An internal error occurred"
            })),
        )
            .into_response();
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}
