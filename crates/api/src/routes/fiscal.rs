//! Fiscal year and opening balance routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use mizan_db::repositories::{FiscalError, FiscalRepository, OpeningBalanceInput};
use mizan_shared::types::{AccountId, FiscalYearId};

/// Creates the fiscal year routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fiscal-years", get(list_fiscal_years))
        .route("/fiscal-years", post(create_fiscal_year))
        .route("/fiscal-years/{year}/close", post(close_fiscal_year))
        .route("/fiscal-years/{fiscal_year_id}/opening-balances", get(list_opening_balances))
        .route("/fiscal-years/{fiscal_year_id}/opening-balances", put(upsert_opening_balance))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for opening a fiscal year.
#[derive(Debug, Deserialize)]
pub struct CreateFiscalYearRequest {
    /// Calendar year to open (e.g., 2026).
    pub year: i32,
}

/// Request body for setting one account's opening balance.
#[derive(Debug, Deserialize)]
pub struct OpeningBalanceRequest {
    /// Target posting account.
    pub account_id: Uuid,
    /// Opening debit amount (>= 0).
    pub debit_amount: Decimal,
    /// Opening credit amount (>= 0).
    pub credit_amount: Decimal,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/fiscal-years` - List fiscal years, newest first.
async fn list_fiscal_years(State(state): State<AppState>) -> impl IntoResponse {
    let repo = FiscalRepository::new(state.connection());

    match repo.list_fiscal_years().await {
        Ok(years) => (StatusCode::OK, Json(json!({ "fiscal_years": years }))).into_response(),
        Err(e) => fiscal_error(&e),
    }
}

/// POST `/fiscal-years` - Open a fiscal year for a calendar year.
async fn create_fiscal_year(
    State(state): State<AppState>,
    Json(payload): Json<CreateFiscalYearRequest>,
) -> impl IntoResponse {
    let repo = FiscalRepository::new(state.connection());

    match repo.create_fiscal_year(payload.year).await {
        Ok(year) => {
            info!(year = year.year, "Fiscal year opened");
            (StatusCode::CREATED, Json(json!({ "fiscal_year": year }))).into_response()
        }
        Err(e) => fiscal_error(&e),
    }
}

/// POST `/fiscal-years/{year}/close` - Close a fiscal year.
async fn close_fiscal_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let repo = FiscalRepository::new(state.connection());

    match repo.close_fiscal_year(year).await {
        Ok(closed) => {
            info!(year = closed.year, "Fiscal year closed");
            (StatusCode::OK, Json(json!({ "fiscal_year": closed }))).into_response()
        }
        Err(e) => fiscal_error(&e),
    }
}

/// GET `/fiscal-years/{fiscal_year_id}/opening-balances` - List opening
/// balances for a year.
async fn list_opening_balances(
    State(state): State<AppState>,
    Path(fiscal_year_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FiscalRepository::new(state.connection());

    match repo.list_opening_balances(FiscalYearId::from_uuid(fiscal_year_id)).await {
        Ok(balances) => {
            (StatusCode::OK, Json(json!({ "opening_balances": balances }))).into_response()
        }
        Err(e) => fiscal_error(&e),
    }
}

/// PUT `/fiscal-years/{fiscal_year_id}/opening-balances` - Set one
/// account's opening balance, replacing any previous row.
async fn upsert_opening_balance(
    State(state): State<AppState>,
    Path(fiscal_year_id): Path<Uuid>,
    Json(payload): Json<OpeningBalanceRequest>,
) -> impl IntoResponse {
    let repo = FiscalRepository::new(state.connection());
    let input = OpeningBalanceInput {
        fiscal_year_id: FiscalYearId::from_uuid(fiscal_year_id),
        account_id: AccountId::from_uuid(payload.account_id),
        debit_amount: payload.debit_amount,
        credit_amount: payload.credit_amount,
    };

    match repo.upsert_opening_balance(input).await {
        Ok(balance) => {
            info!(
                %fiscal_year_id,
                account_id = %balance.account_id,
                "Opening balance recorded"
            );
            (StatusCode::OK, Json(json!({ "opening_balance": balance }))).into_response()
        }
        Err(e) => fiscal_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn fiscal_error(err: &FiscalError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Fiscal year operation failed");
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
