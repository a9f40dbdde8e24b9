//! `SeaORM` Entity for the bank_transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_date: Date,
    /// Signed amount; deposits positive, withdrawals negative.
    pub amount: Decimal,
    pub description: String,
    pub statement_reference: Option<String>,
    /// Kept consistent with the match record at all times.
    pub is_matched: bool,
    pub journal_entry_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
    #[sea_orm(has_many = "super::bank_reconciliation_matches::Entity")]
    BankReconciliationMatches,
}

impl Related<super::journal_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalEntries.def()
    }
}

impl Related<super::bank_reconciliation_matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankReconciliationMatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
