//! Chart of accounts domain logic.
//!
//! This module owns the account hierarchy rules:
//! - Account types and natures (which side increases the balance)
//! - The signed-delta rule used by posting and every derived report
//! - Hierarchical account codes
//! - Validation for account lifecycle operations
//! - Type distribution for reporting

pub mod code;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod delta_props;

pub use code::AccountCode;
pub use error::AccountError;
pub use service::{AccountService, TypeDistribution};
pub use types::{AccountInfo, AccountNature, AccountType};
