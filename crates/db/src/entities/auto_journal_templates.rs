//! `SeaORM` Entity for the auto_journal_templates table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "auto_journal_templates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trigger_event: String,
    pub name: String,
    /// JSONB list of `{account, amount}` tagged mappings.
    pub debit_accounts: Json,
    pub credit_accounts: Json,
    /// Highest priority wins among templates sharing a trigger.
    pub priority: i16,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::auto_journal_log::Entity")]
    AutoJournalLog,
}

impl Related<super::auto_journal_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AutoJournalLog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
