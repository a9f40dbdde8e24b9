//! Journal entry engine domain logic.
//!
//! This module implements the double-entry journal core:
//! - Entry status state machine (draft, posted, cancelled)
//! - Line validation and the balance invariant
//! - Per-fiscal-year entry number generation
//! - Domain types for entry creation
//! - Error types for journal operations

pub mod error;
pub mod number;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod number_props;
#[cfg(test)]
mod validation_props;

pub use error::JournalError;
pub use number::{format_entry_number, next_entry_number, parse_entry_number};
pub use service::JournalService;
pub use types::{
    ApprovalDecision, CreateEntryInput, EntryReference, EntryStatus, JournalLineInput, LineTotals,
};
pub use validation::validate_lines;
