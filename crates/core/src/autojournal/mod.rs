//! Auto-journal rule engine.
//!
//! Maps named business triggers (a payment, a rental receipt, a loan
//! disbursement) to generated balanced journal entries via
//! administrator-managed templates. Template selection and line
//! building are pure; persistence and the audit trail live in the
//! database layer.

pub mod builder;
pub mod error;
pub mod registry;
pub mod template;

#[cfg(test)]
mod builder_props;

pub use builder::{build_lines, BuiltLines};
pub use error::AutoJournalError;
pub use registry::TemplateRegistry;
pub use template::{AccountRef, AmountSpec, AutoJournalTemplate, TemplateLine};
