//! Account error types.

use thiserror::Error;

use mizan_shared::types::AccountId;

/// Errors that can occur during chart-of-accounts operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code is not a valid dot-segmented numeric code.
    #[error("Invalid account code: {0}")]
    InvalidCode(String),

    /// An account with the same code already exists.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    /// Account not found by code.
    #[error("Account not found by code: {0}")]
    CodeNotFound(String),

    /// Referenced parent account does not exist.
    #[error("Parent account not found: {0}")]
    ParentNotFound(AccountId),

    /// Parent account must be a header account.
    #[error("Parent account {0} is not a header account")]
    ParentNotHeader(AccountId),

    /// Account still referenced by journal lines.
    #[error("Account {0} has journal lines and cannot be deleted or demoted")]
    HasLines(AccountId),

    /// Account type can no longer change once lines reference it.
    #[error("Account {0} has journal lines; its type cannot change")]
    TypeLocked(AccountId),

    /// Account still has child accounts.
    #[error("Account {0} has child accounts and cannot be deleted")]
    HasChildren(AccountId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCode(_) => "INVALID_ACCOUNT_CODE",
            Self::DuplicateCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::NotFound(_) | Self::CodeNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::ParentNotFound(_) => "PARENT_NOT_FOUND",
            Self::ParentNotHeader(_) => "PARENT_NOT_HEADER",
            Self::HasLines(_) => "ACCOUNT_HAS_LINES",
            Self::TypeLocked(_) => "ACCOUNT_TYPE_LOCKED",
            Self::HasChildren(_) => "ACCOUNT_HAS_CHILDREN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidCode(_) | Self::ParentNotHeader(_) => 400,
            Self::NotFound(_) | Self::CodeNotFound(_) | Self::ParentNotFound(_) => 404,
            Self::DuplicateCode(_)
            | Self::HasLines(_)
            | Self::TypeLocked(_)
            | Self::HasChildren(_) => 409,
            Self::Database(_) => 500,
        }
    }
}
