//! `SeaORM` entity definitions for the ledger schema.

pub mod accounts;
pub mod auto_journal_log;
pub mod auto_journal_templates;
pub mod bank_reconciliation_matches;
pub mod bank_transactions;
pub mod fiscal_years;
pub mod journal_entries;
pub mod journal_entry_lines;
pub mod opening_balances;
pub mod sea_orm_active_enums;
