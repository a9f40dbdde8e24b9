//! Hierarchical account codes.
//!
//! Codes are dot-segmented numeric strings (e.g. `1.1.2`). The first
//! segment encodes the statement class, the second the reporting
//! subsection; deeper segments are free-form hierarchy.

use serde::{Deserialize, Serialize};

use super::error::AccountError;

/// A validated hierarchical account code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountCode(String);

impl AccountCode {
    /// Parses and validates an account code.
    ///
    /// A valid code is one or more non-empty numeric segments separated
    /// by dots, with no leading/trailing dot.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCode` if the format is violated.
    pub fn parse(code: &str) -> Result<Self, AccountError> {
        if code.is_empty() {
            return Err(AccountError::InvalidCode(code.to_string()));
        }

        let valid = code
            .split('.')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()));

        if !valid {
            return Err(AccountError::InvalidCode(code.to_string()));
        }

        Ok(Self(code.to_string()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the dot-separated segments of the code.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the number of segments (the depth in the hierarchy).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Returns the parent code, if this code is not a root.
    ///
    /// `1.1.2` → `1.1`; `1` → `None`.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('.').map(|idx| Self(self.0[..idx].to_string()))
    }

    /// Returns the first two segments joined, used as the coarse
    /// classification bucket for balance sheet and income statement.
    ///
    /// `1.1.2` → `1.1`; a single-segment code returns itself.
    #[must_use]
    pub fn classification_prefix(&self) -> String {
        self.segments().take(2).collect::<Vec<_>>().join(".")
    }

    /// Returns true if `other` is a direct child of this code.
    #[must_use]
    pub fn is_parent_of(&self, other: &Self) -> bool {
        other.parent().as_ref() == Some(self)
    }
}

impl std::fmt::Display for AccountCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AccountCode {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
