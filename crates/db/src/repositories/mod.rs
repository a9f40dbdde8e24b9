//! Repository abstractions for data access.
//!
//! Repositories bind the pure domain services in `mizan-core` to the
//! stored schema, hiding the `SeaORM` implementation details from the
//! rest of the application. Validation stays in the core services;
//! transactions, locking, and projections live here.

pub mod account;
pub mod auto_journal;
pub mod fiscal;
pub mod journal;
pub mod reconciliation;
pub mod report;

pub use account::{
    AccountFilter, AccountRepository, BalanceDelta, CreateAccountInput, UpdateAccountInput,
};
pub use auto_journal::{
    AppliedEntry, ApplyInput, AutoJournalRepository, CreateTemplateInput, UpdateTemplateInput,
};
pub use fiscal::{FiscalError, FiscalRepository, OpeningBalanceInput};
pub use journal::{EntryFilter, EntryWithLines, JournalRepository};
pub use reconciliation::{
    CreateMatchInput, CreatedMatch, ReconciliationRepository, RecordTransactionInput,
};
pub use report::ReportRepository;
