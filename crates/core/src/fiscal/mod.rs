//! Fiscal year management.

pub mod year;

pub use year::{numbering_year, FiscalYear, FiscalYearStatus};
