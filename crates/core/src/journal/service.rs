//! Journal service for entry validation and state transitions.
//!
//! Pure business logic with no database dependencies; account
//! resolution is injected by the caller.

use mizan_shared::types::AccountId;

use super::error::JournalError;
use super::types::{CreateEntryInput, EntryStatus, LineTotals};
use super::validation::validate_lines;
use crate::accounts::AccountInfo;

/// Stateless journal entry rules.
pub struct JournalService;

impl JournalService {
    /// Validates a new entry before persistence.
    ///
    /// Every referenced account must exist and be a postable (non-header,
    /// active) account, and the lines must satisfy the balance invariant.
    ///
    /// # Errors
    ///
    /// Returns `JournalError` naming the offending account or line.
    pub fn validate_entry<A>(
        input: &CreateEntryInput,
        account_lookup: A,
    ) -> Result<LineTotals, JournalError>
    where
        A: Fn(AccountId) -> Option<AccountInfo>,
    {
        for line in &input.lines {
            let account = account_lookup(line.account_id)
                .ok_or(JournalError::AccountNotFound(line.account_id))?;
            if account.is_header {
                return Err(JournalError::HeaderAccount(account.id));
            }
            if !account.is_active {
                return Err(JournalError::AccountInactive(account.id));
            }
        }

        validate_lines(&input.lines)
    }

    /// Validates that an entry can transition draft -> posted.
    ///
    /// # Errors
    ///
    /// Returns a state-conflict error for any non-draft status.
    pub fn validate_can_post(status: EntryStatus) -> Result<(), JournalError> {
        if !status.can_post() {
            return Err(JournalError::CannotPost { status });
        }
        Ok(())
    }

    /// Validates that an entry can transition draft -> cancelled.
    ///
    /// # Errors
    ///
    /// Returns a state-conflict error for any non-draft status.
    pub fn validate_can_cancel(status: EntryStatus) -> Result<(), JournalError> {
        if !status.can_cancel() {
            return Err(JournalError::CannotCancel { status });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use mizan_shared::types::UserId;

    use crate::accounts::{AccountNature, AccountType};
    use crate::journal::types::JournalLineInput;

    fn make_account(id: AccountId, is_header: bool, is_active: bool) -> AccountInfo {
        AccountInfo {
            id,
            code: "1.1.1".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            account_nature: AccountNature::Debit,
            is_header,
            is_active,
        }
    }

    fn make_input(lines: Vec<JournalLineInput>) -> CreateEntryInput {
        CreateEntryInput {
            entry_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            description: "Test entry".to_string(),
            reference: None,
            lines,
            created_by: UserId::new(),
        }
    }

    #[test]
    fn test_balanced_entry_accepted() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(1000)),
            JournalLineInput::credit(revenue, dec!(1000)),
        ]);

        let totals =
            JournalService::validate_entry(&input, |id| Some(make_account(id, false, true)))
                .unwrap();
        assert!(totals.is_balanced);
        assert_eq!(totals.debit_total, dec!(1000));
    }

    #[test]
    fn test_unbalanced_entry_rejected() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let input = make_input(vec![
            JournalLineInput::debit(cash, dec!(500)),
            JournalLineInput::credit(revenue, dec!(400)),
        ]);

        let result =
            JournalService::validate_entry(&input, |id| Some(make_account(id, false, true)));
        assert!(matches!(result, Err(JournalError::Unbalanced { .. })));
    }

    #[test]
    fn test_unknown_account_rejected() {
        let input = make_input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(100)),
        ]);

        let result = JournalService::validate_entry(&input, |_| None);
        assert!(matches!(result, Err(JournalError::AccountNotFound(_))));
    }

    #[test]
    fn test_header_account_rejected() {
        let input = make_input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(100)),
        ]);

        let result =
            JournalService::validate_entry(&input, |id| Some(make_account(id, true, true)));
        assert!(matches!(result, Err(JournalError::HeaderAccount(_))));
    }

    #[test]
    fn test_inactive_account_rejected() {
        let input = make_input(vec![
            JournalLineInput::debit(AccountId::new(), dec!(100)),
            JournalLineInput::credit(AccountId::new(), dec!(100)),
        ]);

        let result =
            JournalService::validate_entry(&input, |id| Some(make_account(id, false, false)));
        assert!(matches!(result, Err(JournalError::AccountInactive(_))));
    }

    #[test]
    fn test_empty_lines_rejected() {
        let input = make_input(vec![]);
        let result =
            JournalService::validate_entry(&input, |id| Some(make_account(id, false, true)));
        assert!(matches!(result, Err(JournalError::EmptyLines)));
    }

    #[test]
    fn test_post_only_from_draft() {
        assert!(JournalService::validate_can_post(EntryStatus::Draft).is_ok());

        assert!(matches!(
            JournalService::validate_can_post(EntryStatus::Posted),
            Err(JournalError::CannotPost {
                status: EntryStatus::Posted
            })
        ));
        assert!(matches!(
            JournalService::validate_can_post(EntryStatus::Cancelled),
            Err(JournalError::CannotPost {
                status: EntryStatus::Cancelled
            })
        ));
    }

    #[test]
    fn test_cancel_only_from_draft() {
        assert!(JournalService::validate_can_cancel(EntryStatus::Draft).is_ok());

        assert!(matches!(
            JournalService::validate_can_cancel(EntryStatus::Posted),
            Err(JournalError::CannotCancel {
                status: EntryStatus::Posted
            })
        ));
        assert!(matches!(
            JournalService::validate_can_cancel(EntryStatus::Cancelled),
            Err(JournalError::CannotCancel {
                status: EntryStatus::Cancelled
            })
        ));
    }
}
