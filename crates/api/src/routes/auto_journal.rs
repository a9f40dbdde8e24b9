//! Auto-journal template and trigger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use mizan_core::autojournal::{AutoJournalError, TemplateLine};
use mizan_db::repositories::{
    ApplyInput, AutoJournalRepository, CreateTemplateInput, UpdateTemplateInput,
};
use mizan_shared::types::{PageRequest, TemplateId, UserId};

/// Creates the auto-journal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auto-journal/apply", post(apply_trigger))
        .route("/auto-journal/templates", get(list_templates))
        .route("/auto-journal/templates", post(create_template))
        .route("/auto-journal/templates/{template_id}", get(get_template))
        .route("/auto-journal/templates/{template_id}", patch(update_template))
        .route("/auto-journal/templates/{template_id}", delete(delete_template))
        .route("/auto-journal/log", get(list_log))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    /// Trigger event key (e.g., "rental_receipt").
    pub trigger_event: String,
    /// Display name.
    pub name: String,
    /// Debit side mappings.
    pub debit_lines: Vec<TemplateLine>,
    /// Credit side mappings.
    pub credit_lines: Vec<TemplateLine>,
    /// Selection priority; highest wins.
    #[serde(default)]
    pub priority: i16,
}

/// Request body for updating a template. Omitted fields are left
/// unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplateRequest {
    /// New display name.
    pub name: Option<String>,
    /// Replacement debit side mappings.
    pub debit_lines: Option<Vec<TemplateLine>>,
    /// Replacement credit side mappings.
    pub credit_lines: Option<Vec<TemplateLine>>,
    /// New selection priority.
    pub priority: Option<i16>,
    /// Activate or deactivate the template.
    pub is_active: Option<bool>,
}

/// Query parameters for listing templates.
#[derive(Debug, Deserialize)]
pub struct ListTemplatesQuery {
    /// Filter by trigger event key.
    pub trigger: Option<String>,
}

/// Request body for applying a trigger event.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    /// Trigger event key.
    pub trigger_event: String,
    /// Trigger amount the template percentages apply to.
    pub amount: Decimal,
    /// Kind of the originating record.
    pub reference_type: String,
    /// Identifier of the originating record.
    pub reference_id: Uuid,
    /// Optional entry description; defaults from the template name.
    pub description: Option<String>,
    /// Optional entry date; defaults to today.
    pub entry_date: Option<NaiveDate>,
    /// Acting user recorded as the entry creator.
    pub applied_by: Uuid,
}

/// Query parameters for the audit log.
#[derive(Debug, Deserialize)]
pub struct LogQuery {
    /// Filter by trigger event key.
    pub trigger: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/auto-journal/apply` - Apply a trigger event, generating a
/// draft entry from the winning template. Every attempt is recorded in
/// the audit log, including failures.
async fn apply_trigger(
    State(state): State<AppState>,
    Json(payload): Json<ApplyRequest>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());
    let trigger = payload.trigger_event.clone();
    let input = ApplyInput {
        trigger_event: payload.trigger_event,
        amount: payload.amount,
        reference_type: payload.reference_type,
        reference_id: payload.reference_id,
        description: payload.description,
        entry_date: payload.entry_date,
        applied_by: UserId::from_uuid(payload.applied_by),
    };

    match repo.apply(input).await {
        Ok(applied) => {
            info!(
                trigger_event = %trigger,
                entry_id = %applied.entry.entry.id,
                "Auto-journal trigger applied"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "entry": applied.entry.entry,
                    "lines": applied.entry.lines,
                    "log": applied.log,
                    "dropped": applied.dropped
                })),
            )
                .into_response()
        }
        Err(e) => auto_journal_error(&e),
    }
}

/// GET `/auto-journal/templates` - List templates.
async fn list_templates(
    State(state): State<AppState>,
    Query(query): Query<ListTemplatesQuery>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());

    match repo.list_templates(query.trigger.as_deref()).await {
        Ok(templates) => (StatusCode::OK, Json(json!({ "templates": templates }))).into_response(),
        Err(e) => auto_journal_error(&e),
    }
}

/// POST `/auto-journal/templates` - Create a template.
async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());
    let input = CreateTemplateInput {
        trigger_event: payload.trigger_event,
        name: payload.name,
        debit_lines: payload.debit_lines,
        credit_lines: payload.credit_lines,
        priority: payload.priority,
    };

    match repo.create_template(input).await {
        Ok(template) => {
            info!(
                template_id = %template.id,
                trigger_event = %template.trigger_event,
                "Auto-journal template created"
            );
            (StatusCode::CREATED, Json(json!({ "template": template }))).into_response()
        }
        Err(e) => auto_journal_error(&e),
    }
}

/// GET `/auto-journal/templates/{template_id}` - Get one template.
async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());

    match repo.find_template(TemplateId::from_uuid(template_id)).await {
        Ok(template) => (StatusCode::OK, Json(json!({ "template": template }))).into_response(),
        Err(e) => auto_journal_error(&e),
    }
}

/// PATCH `/auto-journal/templates/{template_id}` - Update a template.
async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());
    let input = UpdateTemplateInput {
        name: payload.name,
        debit_lines: payload.debit_lines,
        credit_lines: payload.credit_lines,
        priority: payload.priority,
        is_active: payload.is_active,
    };

    match repo.update_template(TemplateId::from_uuid(template_id), input).await {
        Ok(template) => {
            info!(%template_id, "Auto-journal template updated");
            (StatusCode::OK, Json(json!({ "template": template }))).into_response()
        }
        Err(e) => auto_journal_error(&e),
    }
}

/// DELETE `/auto-journal/templates/{template_id}` - Delete a template.
/// Audit rows written from it keep a null template reference.
async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());

    match repo.delete_template(TemplateId::from_uuid(template_id)).await {
        Ok(()) => {
            info!(%template_id, "Auto-journal template deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => auto_journal_error(&e),
    }
}

/// GET `/auto-journal/log` - Page through the audit log, newest first.
async fn list_log(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> impl IntoResponse {
    let repo = AutoJournalRepository::new(state.connection());
    let mut page = PageRequest::default();
    if let Some(number) = query.page {
        page.page = number;
    }
    if let Some(per_page) = query.per_page {
        page.per_page = per_page;
    }
    let page = page.clamped();

    match repo.list_log(query.trigger.as_deref(), page).await {
        Ok(log) => (StatusCode::OK, Json(log)).into_response(),
        Err(e) => auto_journal_error(&e),
    }
}

// ============================================================================
// Error mapping
// ============================================================================

fn auto_journal_error(err: &AutoJournalError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Auto-journal operation failed");
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
