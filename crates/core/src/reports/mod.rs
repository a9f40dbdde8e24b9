//! Financial report assembly.
//!
//! This module provides pure business logic for deriving reports from
//! posted ledger data:
//! - Trial Balance
//! - General Ledger
//! - Balance Sheet
//! - Income Statement

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportService;
pub use types::{
    AccountBalance, BalanceSheetReport, BalanceSheetSection, GeneralLedgerLine,
    GeneralLedgerReport, IncomeStatementReport, IncomeStatementSection, LedgerEntryRow,
    ReportSubsection, TrialBalanceReport, TrialBalanceTotals,
};
