//! Auto-journal repository: template storage and trigger application.
//!
//! Template sides are stored as JSONB mapping arrays. Applying a
//! trigger selects the highest-priority active template, expands it
//! into a balanced draft entry, and appends exactly one audit row
//! whether the application succeeded or failed.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use mizan_core::autojournal::{
    build_lines, AccountRef, AutoJournalError, AutoJournalTemplate, TemplateLine, TemplateRegistry,
};
use mizan_core::journal::{CreateEntryInput, EntryReference};
use mizan_shared::types::{PageRequest, PageResponse, TemplateId, UserId};

use super::account::to_account_info;
use super::journal::{EntryWithLines, JournalRepository};
use crate::entities::{accounts, auto_journal_log, auto_journal_templates};

/// Input for creating a template.
#[derive(Debug, Clone)]
pub struct CreateTemplateInput {
    /// Trigger event key (e.g., "rental_receipt").
    pub trigger_event: String,
    /// Display name.
    pub name: String,
    /// Debit side mappings.
    pub debit_lines: Vec<TemplateLine>,
    /// Credit side mappings.
    pub credit_lines: Vec<TemplateLine>,
    /// Selection priority; highest wins.
    pub priority: i16,
}

/// Input for updating a template. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateInput {
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

/// Input for applying a trigger event.
#[derive(Debug, Clone)]
pub struct ApplyInput {
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
    pub applied_by: UserId,
}

/// Result of a successful trigger application.
#[derive(Debug, Clone)]
pub struct AppliedEntry {
    /// The generated draft entry.
    pub entry: EntryWithLines,
    /// The audit row recording this application.
    pub log: auto_journal_log::Model,
    /// Template mappings skipped because they did not resolve.
    pub dropped: Vec<AccountRef>,
}

/// Auto-journal repository.
#[derive(Debug, Clone)]
pub struct AutoJournalRepository {
    db: DatabaseConnection,
}

impl AutoJournalRepository {
    /// Creates a new auto-journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active template.
    ///
    /// # Errors
    ///
    /// Returns an error if the mappings fail to encode or the insert
    /// fails.
    pub async fn create_template(
        &self,
        input: CreateTemplateInput,
    ) -> Result<auto_journal_templates::Model, AutoJournalError> {
        let now = Utc::now().into();
        let template = auto_journal_templates::ActiveModel {
            id: Set(Uuid::new_v4()),
            trigger_event: Set(input.trigger_event),
            name: Set(input.name),
            debit_accounts: Set(encode_lines(&input.debit_lines)?),
            credit_accounts: Set(encode_lines(&input.credit_lines)?),
            priority: Set(input.priority),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        template.insert(&self.db).await.map_err(db_err)
    }

    /// Updates a template's attributes and mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing.
    pub async fn update_template(
        &self,
        template_id: TemplateId,
        input: UpdateTemplateInput,
    ) -> Result<auto_journal_templates::Model, AutoJournalError> {
        let template = self.find_template(template_id).await?;

        let mut active: auto_journal_templates::ActiveModel = template.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(debit_lines) = input.debit_lines {
            active.debit_accounts = Set(encode_lines(&debit_lines)?);
        }
        if let Some(credit_lines) = input.credit_lines {
            active.credit_accounts = Set(encode_lines(&credit_lines)?);
        }
        if let Some(priority) = input.priority {
            active.priority = Set(priority);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(db_err)
    }

    /// Finds a template by ID.
    ///
    /// # Errors
    ///
    /// Returns `AutoJournalError::TemplateNotFound` if none exists.
    pub async fn find_template(
        &self,
        template_id: TemplateId,
    ) -> Result<auto_journal_templates::Model, AutoJournalError> {
        auto_journal_templates::Entity::find_by_id(template_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(AutoJournalError::TemplateNotFound(template_id))
    }

    /// Lists templates, optionally filtered by trigger event.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_templates(
        &self,
        trigger: Option<&str>,
    ) -> Result<Vec<auto_journal_templates::Model>, AutoJournalError> {
        let mut query = auto_journal_templates::Entity::find();
        if let Some(trigger) = trigger {
            query = query.filter(auto_journal_templates::Column::TriggerEvent.eq(trigger));
        }

        query
            .order_by_asc(auto_journal_templates::Column::TriggerEvent)
            .order_by_desc(auto_journal_templates::Column::Priority)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Deletes a template. Audit rows keep a null template reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is missing.
    pub async fn delete_template(&self, template_id: TemplateId) -> Result<(), AutoJournalError> {
        let template = self.find_template(template_id).await?;
        auto_journal_templates::Entity::delete_by_id(template.id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    /// Applies a trigger event, generating a draft journal entry.
    ///
    /// Exactly one audit row is written per call: on success it links
    /// the generated entry, on failure it records the error message.
    ///
    /// # Errors
    ///
    /// Returns an error if no active template matches the trigger,
    /// the template cannot produce a balanced entry, or the entry
    /// itself is rejected.
    pub async fn apply(&self, input: ApplyInput) -> Result<AppliedEntry, AutoJournalError> {
        let templates = self.active_templates(&input.trigger_event).await?;
        let registry = TemplateRegistry::new(templates);

        let Some(template) = registry.select(&input.trigger_event) else {
            let err = AutoJournalError::NoTemplate {
                trigger: input.trigger_event.clone(),
            };
            self.write_log(&input, None, None, Some(err.to_string())).await?;
            return Err(err);
        };

        let account_models = accounts::Entity::find()
            .filter(accounts::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        let by_code: HashMap<&str, &accounts::Model> = account_models
            .iter()
            .map(|model| (model.code.as_str(), model))
            .collect();
        let by_id: HashMap<Uuid, &accounts::Model> =
            account_models.iter().map(|model| (model.id, model)).collect();

        let resolve = |account_ref: &AccountRef| match account_ref {
            AccountRef::ByCode { code } => {
                by_code.get(code.as_str()).copied().map(to_account_info)
            }
            AccountRef::ById { id } => by_id.get(&id.into_inner()).copied().map(to_account_info),
        };

        let built = match build_lines(template, input.amount, resolve) {
            Ok(built) => built,
            Err(err) => {
                self.write_log(
                    &input,
                    Some(template.id.into_inner()),
                    None,
                    Some(err.to_string()),
                )
                .await?;
                return Err(err);
            }
        };

        let entry_input = CreateEntryInput {
            entry_date: input.entry_date.unwrap_or_else(|| Utc::now().date_naive()),
            description: input
                .description
                .clone()
                .unwrap_or_else(|| format!("{} ({})", template.name, input.reference_type)),
            reference: Some(EntryReference {
                reference_type: input.reference_type.clone(),
                reference_id: input.reference_id,
            }),
            lines: built.lines,
            created_by: input.applied_by,
        };

        let journal = JournalRepository::new(self.db.clone());
        let entry = match journal.create_entry(entry_input).await {
            Ok(entry) => entry,
            Err(err) => {
                let err = AutoJournalError::Entry(err);
                self.write_log(
                    &input,
                    Some(template.id.into_inner()),
                    None,
                    Some(err.to_string()),
                )
                .await?;
                return Err(err);
            }
        };

        let log = self
            .write_log(
                &input,
                Some(template.id.into_inner()),
                Some(entry.entry.id),
                None,
            )
            .await?;

        Ok(AppliedEntry {
            entry,
            log,
            dropped: built.dropped,
        })
    }

    /// Lists audit rows, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_log(
        &self,
        trigger: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<auto_journal_log::Model>, AutoJournalError> {
        let mut query = auto_journal_log::Entity::find();
        if let Some(trigger) = trigger {
            query = query.filter(auto_journal_log::Column::TriggerEvent.eq(trigger));
        }

        let paginator = query
            .order_by_desc(auto_journal_log::Column::CreatedAt)
            .paginate(&self.db, page.limit().max(1));
        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(u64::from(page.page.saturating_sub(1)))
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(models, page.page, page.per_page, total))
    }

    /// Loads and decodes the active templates for a trigger.
    async fn active_templates(
        &self,
        trigger: &str,
    ) -> Result<Vec<AutoJournalTemplate>, AutoJournalError> {
        let models = auto_journal_templates::Entity::find()
            .filter(auto_journal_templates::Column::TriggerEvent.eq(trigger))
            .filter(auto_journal_templates::Column::IsActive.eq(true))
            .order_by_desc(auto_journal_templates::Column::Priority)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.iter().map(to_template).collect()
    }

    /// Appends one audit row; `error_message` is `None` on success.
    async fn write_log(
        &self,
        input: &ApplyInput,
        template_id: Option<Uuid>,
        journal_entry_id: Option<Uuid>,
        error_message: Option<String>,
    ) -> Result<auto_journal_log::Model, AutoJournalError> {
        let log = auto_journal_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            trigger_event: Set(input.trigger_event.clone()),
            template_id: Set(template_id),
            amount: Set(input.amount),
            reference_type: Set(input.reference_type.clone()),
            reference_id: Set(input.reference_id),
            journal_entry_id: Set(journal_entry_id),
            success: Set(error_message.is_none()),
            error_message: Set(error_message),
            created_at: Set(Utc::now().into()),
        };

        log.insert(&self.db).await.map_err(db_err)
    }
}

// ============================================================================
// Template mapping codecs
// ============================================================================

/// Decodes a stored template into the domain shape.
///
/// # Errors
///
/// Returns an error if the stored JSONB mappings fail to decode.
pub fn to_template(
    model: &auto_journal_templates::Model,
) -> Result<AutoJournalTemplate, AutoJournalError> {
    Ok(AutoJournalTemplate {
        id: TemplateId::from_uuid(model.id),
        trigger_event: model.trigger_event.clone(),
        name: model.name.clone(),
        debit_lines: decode_lines(&model.debit_accounts)?,
        credit_lines: decode_lines(&model.credit_accounts)?,
        priority: model.priority,
        is_active: model.is_active,
    })
}

fn encode_lines(lines: &[TemplateLine]) -> Result<serde_json::Value, AutoJournalError> {
    serde_json::to_value(lines)
        .map_err(|err| AutoJournalError::Database(format!("template mappings: {err}")))
}

fn decode_lines(value: &serde_json::Value) -> Result<Vec<TemplateLine>, AutoJournalError> {
    serde_json::from_value(value.clone())
        .map_err(|err| AutoJournalError::Database(format!("template mappings: {err}")))
}

fn db_err(err: DbErr) -> AutoJournalError {
    AutoJournalError::Database(err.to_string())
}
