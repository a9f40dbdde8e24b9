//! Auto-journal template types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{round_amount, AccountId, TemplateId};

/// Reference to an account in a template mapping.
///
/// Templates authored by hand usually refer to accounts by code;
/// generated templates pin the account id directly. Resolution
/// happens once per application against the active account index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountRef {
    /// Resolve by account code at application time.
    ByCode {
        /// Account code (e.g., "1.1.1").
        code: String,
    },
    /// Resolve by account id.
    ById {
        /// Account id.
        id: AccountId,
    },
}

/// How a template line derives its amount from the trigger amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AmountSpec {
    /// Percentage of the trigger amount.
    Percentage {
        /// Percentage value (100 means the full amount).
        percentage: Decimal,
    },
    /// Fixed amount regardless of the trigger amount.
    Fixed {
        /// Fixed amount.
        amount: Decimal,
    },
}

impl AmountSpec {
    /// Computes the line amount for a given trigger amount, rounded
    /// to two decimal places.
    #[must_use]
    pub fn line_amount(&self, base: Decimal) -> Decimal {
        match self {
            Self::Percentage { percentage } => {
                round_amount(base * percentage / Decimal::ONE_HUNDRED)
            }
            Self::Fixed { amount } => round_amount(*amount),
        }
    }
}

/// One account mapping within a template side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateLine {
    /// Account to post to.
    pub account: AccountRef,
    /// Amount derivation.
    pub amount: AmountSpec,
}

/// A reusable recipe mapping a business trigger to a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoJournalTemplate {
    /// Unique identifier.
    pub id: TemplateId,
    /// Trigger event key (e.g., "rental_receipt").
    pub trigger_event: String,
    /// Display name.
    pub name: String,
    /// Debit side mappings, in line order.
    pub debit_lines: Vec<TemplateLine>,
    /// Credit side mappings, in line order.
    pub credit_lines: Vec<TemplateLine>,
    /// Selection priority; highest wins among templates sharing a
    /// trigger.
    pub priority: i16,
    /// Whether this template participates in selection.
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_amount() {
        let spec = AmountSpec::Percentage {
            percentage: dec!(100),
        };
        assert_eq!(spec.line_amount(dec!(2000)), dec!(2000.00));

        let spec = AmountSpec::Percentage {
            percentage: dec!(12.5),
        };
        assert_eq!(spec.line_amount(dec!(1000)), dec!(125.00));
    }

    #[test]
    fn test_percentage_rounds_to_cents() {
        let spec = AmountSpec::Percentage {
            percentage: dec!(33.33),
        };
        assert_eq!(spec.line_amount(dec!(100)), dec!(33.33));

        let spec = AmountSpec::Percentage { percentage: dec!(1) };
        assert_eq!(spec.line_amount(dec!(0.45)), dec!(0.00));
    }

    #[test]
    fn test_fixed_amount_ignores_base() {
        let spec = AmountSpec::Fixed { amount: dec!(50) };
        assert_eq!(spec.line_amount(dec!(2000)), dec!(50.00));
        assert_eq!(spec.line_amount(dec!(0)), dec!(50.00));
    }

    #[test]
    fn test_account_ref_serde_form() {
        let by_code = AccountRef::ByCode {
            code: "1.1.1".to_string(),
        };
        let json = serde_json::to_string(&by_code).unwrap();
        assert_eq!(json, r#"{"type":"by_code","code":"1.1.1"}"#);

        let back: AccountRef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, by_code);
    }

    #[test]
    fn test_amount_spec_serde_form() {
        let spec = AmountSpec::Percentage {
            percentage: dec!(100),
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"type":"percentage","percentage":"100"}"#);
    }
}
