//! Chart-of-accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use mizan_core::accounts::{AccountError, AccountNature, AccountType};
use mizan_db::repositories::{
    AccountFilter, AccountRepository, CreateAccountInput, UpdateAccountInput,
};
use mizan_shared::types::AccountId;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/leaves", get(list_leaf_accounts))
        .route("/accounts/distribution", get(type_distribution))
        .route("/accounts/{account_id}", get(get_account))
        .route("/accounts/{account_id}", patch(update_account))
        .route("/accounts/{account_id}", delete(delete_account))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by header flag.
    pub is_header: Option<bool>,
    /// Filter by direct parent.
    pub parent_id: Option<Uuid>,
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Hierarchical account code (e.g., "1.1.2").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional Arabic display name.
    pub name_ar: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Account nature; defaults from the type when omitted.
    pub account_nature: Option<AccountNature>,
    /// Whether this is an aggregation-only header account.
    #[serde(default)]
    pub is_header: bool,
    /// Optional parent account; must be a header account.
    pub parent_id: Option<Uuid>,
}

/// Request body for updating an account. Omitted fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New display name.
    pub name: Option<String>,
    /// New Arabic display name.
    pub name_ar: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New account type; rejected once the account carries lines.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// New account nature.
    pub account_nature: Option<AccountNature>,
    /// Promote or demote header status.
    pub is_header: Option<bool>,
    /// Activate or deactivate the account.
    pub is_active: Option<bool>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/accounts` - List accounts with optional filters.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());
    let filter = AccountFilter {
        account_type: query.account_type,
        is_active: query.is_active,
        is_header: query.is_header,
        parent_id: query.parent_id.map(AccountId::from_uuid),
    };

    match repo.list_accounts(filter).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => account_error(&e),
    }
}

/// POST `/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());
    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        name_ar: payload.name_ar,
        description: payload.description,
        account_type: payload.account_type,
        account_nature: payload.account_nature,
        is_header: payload.is_header,
        parent_id: payload.parent_id.map(AccountId::from_uuid),
    };

    match repo.create_account(input).await {
        Ok(account) => {
            info!(account_id = %account.id, code = %account.code, "Account created");
            (StatusCode::CREATED, Json(json!({ "account": account }))).into_response()
        }
        Err(e) => account_error(&e),
    }
}

/// GET `/accounts/leaves` - List active posting accounts.
async fn list_leaf_accounts(State(state): State<AppState>) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());

    match repo.list_leaf_accounts().await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => account_error(&e),
    }
}

/// GET `/accounts/distribution` - Count active accounts per type.
async fn type_distribution(State(state): State<AppState>) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());

    match repo.type_distribution().await {
        Ok(distribution) => {
            (StatusCode::OK, Json(json!({ "distribution": distribution }))).into_response()
        }
        Err(e) => account_error(&e),
    }
}

/// GET `/accounts/{account_id}` - Get one account.
async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());

    match repo.find_by_id(AccountId::from_uuid(account_id)).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(e) => account_error(&e),
    }
}

/// PATCH `/accounts/{account_id}` - Update an account.
async fn update_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());
    let input = UpdateAccountInput {
        name: payload.name,
        name_ar: payload.name_ar,
        description: payload.description,
        account_type: payload.account_type,
        account_nature: payload.account_nature,
        is_header: payload.is_header,
        is_active: payload.is_active,
    };

    match repo.update_account(AccountId::from_uuid(account_id), input).await {
        Ok(account) => {
            info!(account_id = %account.id, "Account updated");
            (StatusCode::OK, Json(json!({ "account": account }))).into_response()
        }
        Err(e) => account_error(&e),
    }
}

/// DELETE `/accounts/{account_id}` - Delete an unreferenced account.
async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.connection());

    match repo.delete_account(AccountId::from_uuid(account_id)).await {
        Ok(()) => {
            info!(%account_id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => account_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn account_error(err: &AccountError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Account operation failed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AccountError::NotFound(AccountId::new()), StatusCode::NOT_FOUND)]
    #[case(AccountError::CodeNotFound("1.1.9".to_string()), StatusCode::NOT_FOUND)]
    #[case(AccountError::DuplicateCode("1.1.1".to_string()), StatusCode::CONFLICT)]
    #[case(AccountError::InvalidCode("abc".to_string()), StatusCode::BAD_REQUEST)]
    #[case(AccountError::HasLines(AccountId::new()), StatusCode::CONFLICT)]
    #[case(
        AccountError::Database("boom".to_string()),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_account_error_status(#[case] err: AccountError, #[case] expected: StatusCode) {
        assert_eq!(account_error(&err).status(), expected);
    }

    #[tokio::test]
    async fn test_database_errors_hide_details() {
        let response = account_error(&AccountError::Database("connection reset".to_string()));
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["error"], "DATABASE_ERROR");
        assert_eq!(json["message"], "An internal error occurred");
    }
}
