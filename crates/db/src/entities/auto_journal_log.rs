//! `SeaORM` Entity for the auto_journal_log table.
//!
//! Append-only audit trail: every trigger application writes exactly
//! one row, on success and on every failure mode.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auto_journal_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trigger_event: String,
    /// Template selected, when one matched the trigger.
    pub template_id: Option<Uuid>,
    pub amount: Decimal,
    pub reference_type: String,
    pub reference_id: Uuid,
    /// Entry created, on the success path.
    pub journal_entry_id: Option<Uuid>,
    pub success: bool,
    pub error_message: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::auto_journal_templates::Entity",
        from = "Column::TemplateId",
        to = "super::auto_journal_templates::Column::Id"
    )]
    AutoJournalTemplates,
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
}

impl Related<super::auto_journal_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutoJournalTemplates.def()
    }
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
