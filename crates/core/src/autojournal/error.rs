//! Auto-journal error types.

use thiserror::Error;

use mizan_shared::types::TemplateId;

use crate::journal::JournalError;

/// Errors that can occur while applying an auto-journal trigger.
#[derive(Debug, Error)]
pub enum AutoJournalError {
    /// No active template matches the trigger.
    #[error("No active template for trigger: {trigger}")]
    NoTemplate {
        /// Trigger event key.
        trigger: String,
    },

    /// Template not found.
    #[error("Template not found: {0}")]
    TemplateNotFound(TemplateId),

    /// Every account mapping on one side failed to resolve.
    #[error("Template {template_id} resolved no postable lines")]
    NoResolvedLines {
        /// Template that was applied.
        template_id: TemplateId,
    },

    /// The generated entry failed journal validation or persistence.
    #[error("Generated entry rejected: {0}")]
    Entry(#[from] JournalError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AutoJournalError {
    /// Returns a stable error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoTemplate { .. } => "NO_TEMPLATE_FOR_TRIGGER",
            Self::TemplateNotFound(_) => "TEMPLATE_NOT_FOUND",
            Self::NoResolvedLines { .. } => "EMPTY_LINE_SET",
            Self::Entry(inner) => inner.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NoTemplate { .. } | Self::TemplateNotFound(_) => 404,
            Self::NoResolvedLines { .. } => 422,
            Self::Entry(inner) => inner.http_status_code(),
            Self::Database(_) => 500,
        }
    }
}
