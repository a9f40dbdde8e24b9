//! Journal entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use mizan_core::journal::{
    ApprovalDecision, CreateEntryInput, EntryReference, EntryStatus, JournalError, JournalLineInput,
};
use mizan_db::repositories::{EntryFilter, EntryWithLines, JournalRepository};
use mizan_shared::types::{AccountId, JournalEntryId, UserId};

/// Creates the journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/journal-entries", get(list_entries))
        .route("/journal-entries", post(create_entry))
        .route("/journal-entries/{entry_id}", get(get_entry))
        .route("/journal-entries/{entry_id}/post", post(post_entry))
        .route("/journal-entries/{entry_id}/cancel", post(cancel_entry))
        .route("/journal-entries/{entry_id}/approve", post(approve_entry))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing journal entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by status.
    pub status: Option<EntryStatus>,
    /// Filter by calendar year.
    pub fiscal_year: Option<i32>,
    /// Filter by date range start (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Filter by date range end (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

/// Request body for creating a journal entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Transaction date (YYYY-MM-DD).
    pub entry_date: NaiveDate,
    /// Description of the entry.
    pub description: String,
    /// Optional originating business event.
    pub reference: Option<EntryReferenceRequest>,
    /// Entry lines (must be non-empty and balanced).
    pub lines: Vec<CreateLineRequest>,
    /// User creating the entry.
    pub created_by: Uuid,
}

/// Link from an entry to its originating business event.
#[derive(Debug, Deserialize)]
pub struct EntryReferenceRequest {
    /// Kind of the originating record (e.g. "payment").
    pub reference_type: String,
    /// Identifier of the originating record.
    pub reference_id: Uuid,
}

/// Request body for a single journal entry line.
#[derive(Debug, Deserialize)]
pub struct CreateLineRequest {
    /// Account ID.
    pub account_id: Uuid,
    /// Debit amount (>= 0).
    #[serde(default)]
    pub debit_amount: Decimal,
    /// Credit amount (>= 0).
    #[serde(default)]
    pub credit_amount: Decimal,
    /// Optional memo.
    pub description: Option<String>,
}

/// Request body for posting a draft entry.
#[derive(Debug, Deserialize)]
pub struct PostEntryRequest {
    /// User posting the entry.
    pub posted_by: Uuid,
}

/// Request body for cancelling a draft entry.
#[derive(Debug, Deserialize)]
pub struct CancelEntryRequest {
    /// User cancelling the entry.
    pub cancelled_by: Uuid,
    /// Optional reason for the cancellation.
    pub notes: Option<String>,
}

/// Request body for resolving a review decision.
#[derive(Debug, Deserialize)]
pub struct ApproveEntryRequest {
    /// Review outcome: "approved" or "rejected".
    pub decision: ApprovalDecision,
    /// Reviewing user.
    pub reviewed_by: Uuid,
    /// Optional review notes.
    pub notes: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/journal-entries` - List entry headers with filters.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<ListEntriesQuery>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());
    let filter = EntryFilter {
        status: query.status,
        fiscal_year: query.fiscal_year,
        date_from: query.from,
        date_to: query.to,
    };

    match repo.list_entries(filter).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "entries": entries }))).into_response(),
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries` - Create a draft entry with its lines.
async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());
    let lines = payload
        .lines
        .into_iter()
        .map(|line| JournalLineInput {
            account_id: AccountId::from_uuid(line.account_id),
            debit_amount: line.debit_amount,
            credit_amount: line.credit_amount,
            description: line.description,
        })
        .collect();
    let input = CreateEntryInput {
        entry_date: payload.entry_date,
        description: payload.description,
        reference: payload.reference.map(|r| EntryReference {
            reference_type: r.reference_type,
            reference_id: r.reference_id,
        }),
        lines,
        created_by: UserId::from_uuid(payload.created_by),
    };

    match repo.create_entry(input).await {
        Ok(created) => {
            info!(
                entry_id = %created.entry.id,
                entry_number = %created.entry.entry_number,
                "Journal entry created"
            );
            (StatusCode::CREATED, Json(entry_body(&created))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// GET `/journal-entries/{entry_id}` - Get an entry with its lines.
async fn get_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());

    match repo.get_entry(JournalEntryId::from_uuid(entry_id)).await {
        Ok(found) => (StatusCode::OK, Json(entry_body(&found))).into_response(),
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries/{entry_id}/post` - Post a draft entry.
async fn post_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<PostEntryRequest>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());

    match repo
        .post_entry(
            JournalEntryId::from_uuid(entry_id),
            UserId::from_uuid(payload.posted_by),
        )
        .await
    {
        Ok(posted) => {
            info!(%entry_id, entry_number = %posted.entry.entry_number, "Journal entry posted");
            (StatusCode::OK, Json(entry_body(&posted))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries/{entry_id}/cancel` - Cancel a draft entry.
async fn cancel_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<CancelEntryRequest>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());

    match repo
        .cancel_entry(
            JournalEntryId::from_uuid(entry_id),
            UserId::from_uuid(payload.cancelled_by),
            payload.notes,
        )
        .await
    {
        Ok(cancelled) => {
            info!(%entry_id, "Journal entry cancelled");
            (StatusCode::OK, Json(entry_body(&cancelled))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

/// POST `/journal-entries/{entry_id}/approve` - Resolve a review into a
/// post or a cancellation.
async fn approve_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<Uuid>,
    Json(payload): Json<ApproveEntryRequest>,
) -> impl IntoResponse {
    let repo = JournalRepository::new(state.connection());

    match repo
        .approve_entry(
            JournalEntryId::from_uuid(entry_id),
            payload.decision,
            UserId::from_uuid(payload.reviewed_by),
            payload.notes,
        )
        .await
    {
        Ok(resolved) => {
            let status = EntryStatus::from(resolved.entry.status.clone());
            info!(%entry_id, %status, "Journal entry review resolved");
            (StatusCode::OK, Json(entry_body(&resolved))).into_response()
        }
        Err(e) => journal_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn entry_body(entry: &EntryWithLines) -> serde_json::Value {
    json!({ "entry": entry.entry, "lines": entry.lines })
}

fn journal_error(err: &JournalError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Journal operation failed");
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
