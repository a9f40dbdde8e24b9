//! Financial report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::AppState;
use mizan_core::reports::ReportError;
use mizan_db::ReportRepository;
use mizan_shared::AppError;
use mizan_shared::types::AccountId;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/trial-balance", get(trial_balance))
        .route("/reports/general-ledger/{account_id}", get(general_ledger))
        .route("/reports/balance-sheet", get(balance_sheet))
        .route("/reports/income-statement", get(income_statement))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the trial balance.
#[derive(Debug, Deserialize)]
pub struct TrialBalanceQuery {
    /// Restrict the report to one calendar year.
    pub fiscal_year: Option<i32>,
}

/// Query parameters for the general ledger.
#[derive(Debug, Deserialize)]
pub struct GeneralLedgerQuery {
    /// Period start (YYYY-MM-DD); requires `to`.
    pub from: Option<NaiveDate>,
    /// Period end (YYYY-MM-DD); requires `from`.
    pub to: Option<NaiveDate>,
}

/// Query parameters for the income statement.
#[derive(Debug, Deserialize)]
pub struct IncomeStatementQuery {
    /// Period start (YYYY-MM-DD).
    pub from: NaiveDate,
    /// Period end (YYYY-MM-DD).
    pub to: NaiveDate,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/reports/trial-balance` - Trial balance over posted entries.
async fn trial_balance(
    State(state): State<AppState>,
    Query(query): Query<TrialBalanceQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new(state.connection());

    match repo.trial_balance(query.fiscal_year).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        Err(e) => report_error(&e),
    }
}

/// GET `/reports/general-ledger/{account_id}` - Per-account ledger with
/// running balance. `from` and `to` must be supplied together.
async fn general_ledger(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<GeneralLedgerQuery>,
) -> impl IntoResponse {
    let period = match (query.from, query.to) {
        (Some(from), Some(to)) => Some((from, to)),
        (None, None) => None,
        _ => {
            return app_error(&AppError::Validation(
                "from and to must be supplied together".to_string(),
            ));
        }
    };
    let repo = ReportRepository::new(state.connection());

    match repo.general_ledger(AccountId::from_uuid(account_id), period).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        Err(e) => report_error(&e),
    }
}

/// GET `/reports/balance-sheet` - Balance sheet as of now.
async fn balance_sheet(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ReportRepository::new(state.connection());

    match repo.balance_sheet().await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        Err(e) => report_error(&e),
    }
}

/// GET `/reports/income-statement` - Income statement for a period.
async fn income_statement(
    State(state): State<AppState>,
    Query(query): Query<IncomeStatementQuery>,
) -> impl IntoResponse {
    let repo = ReportRepository::new(state.connection());

    match repo.income_statement(query.from, query.to).await {
        Ok(report) => (StatusCode::OK, Json(json!({ "report": report }))).into_response(),
        Err(e) => report_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn app_error(err: &AppError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = if err.is_server_error() {
        "An internal error occurred".to_string()
    } else {
        err.to_string()
    };
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

fn report_error(err: &ReportError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Report generation failed");
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
