//! Stateless validation and aggregation for chart-of-accounts operations.

use serde::{Deserialize, Serialize};

use mizan_shared::types::AccountId;

use super::error::AccountError;
use super::types::{AccountInfo, AccountType};

/// Count of active accounts per account type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDistribution {
    /// Active asset accounts.
    pub asset: u64,
    /// Active liability accounts.
    pub liability: u64,
    /// Active equity accounts.
    pub equity: u64,
    /// Active revenue accounts.
    pub revenue: u64,
    /// Active expense accounts.
    pub expense: u64,
}

impl TypeDistribution {
    /// Returns the count for one account type.
    #[must_use]
    pub const fn count(&self, account_type: AccountType) -> u64 {
        match account_type {
            AccountType::Asset => self.asset,
            AccountType::Liability => self.liability,
            AccountType::Equity => self.equity,
            AccountType::Revenue => self.revenue,
            AccountType::Expense => self.expense,
        }
    }

    /// Total active accounts across all types.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.asset + self.liability + self.equity + self.revenue + self.expense
    }
}

/// Stateless service for chart-of-accounts rules.
pub struct AccountService;

impl AccountService {
    /// Validates a resolved parent for a new or moved account.
    ///
    /// Children may only hang off header accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent is not a header account.
    pub fn validate_parent(parent: &AccountInfo) -> Result<(), AccountError> {
        if !parent.is_header {
            return Err(AccountError::ParentNotHeader(parent.id));
        }
        Ok(())
    }

    /// Validates that an account can be deleted.
    ///
    /// Deletion is rejected, never cascaded, while the account is
    /// referenced by journal lines or still has children.
    ///
    /// # Errors
    ///
    /// Returns an error naming the blocking reference.
    pub fn validate_delete(
        account_id: AccountId,
        has_lines: bool,
        has_children: bool,
    ) -> Result<(), AccountError> {
        if has_lines {
            return Err(AccountError::HasLines(account_id));
        }
        if has_children {
            return Err(AccountError::HasChildren(account_id));
        }
        Ok(())
    }

    /// Validates turning a posting account into a header account.
    ///
    /// An account that already carries journal lines can never become
    /// an aggregation-only header.
    ///
    /// # Errors
    ///
    /// Returns an error if the account has journal lines.
    pub fn validate_promote_to_header(
        account_id: AccountId,
        has_lines: bool,
    ) -> Result<(), AccountError> {
        if has_lines {
            return Err(AccountError::HasLines(account_id));
        }
        Ok(())
    }

    /// Computes the count of active accounts per type.
    #[must_use]
    pub fn type_distribution(accounts: &[AccountInfo]) -> TypeDistribution {
        let mut distribution = TypeDistribution::default();
        for account in accounts.iter().filter(|a| a.is_active) {
            match account.account_type {
                AccountType::Asset => distribution.asset += 1,
                AccountType::Liability => distribution.liability += 1,
                AccountType::Equity => distribution.equity += 1,
                AccountType::Revenue => distribution.revenue += 1,
                AccountType::Expense => distribution.expense += 1,
            }
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::types::AccountNature;

    fn make_account(account_type: AccountType, is_header: bool, is_active: bool) -> AccountInfo {
        AccountInfo {
            id: AccountId::new(),
            code: "1.1.1".to_string(),
            name: "Test".to_string(),
            account_type,
            account_nature: account_type.default_nature(),
            is_header,
            is_active,
        }
    }

    #[test]
    fn test_validate_parent_must_be_header() {
        let header = make_account(AccountType::Asset, true, true);
        assert!(AccountService::validate_parent(&header).is_ok());

        let leaf = make_account(AccountType::Asset, false, true);
        assert!(matches!(
            AccountService::validate_parent(&leaf),
            Err(AccountError::ParentNotHeader(_))
        ));
    }

    #[test]
    fn test_validate_delete() {
        let id = AccountId::new();
        assert!(AccountService::validate_delete(id, false, false).is_ok());
        assert!(matches!(
            AccountService::validate_delete(id, true, false),
            Err(AccountError::HasLines(_))
        ));
        assert!(matches!(
            AccountService::validate_delete(id, false, true),
            Err(AccountError::HasChildren(_))
        ));
        // Lines take precedence when both block
        assert!(matches!(
            AccountService::validate_delete(id, true, true),
            Err(AccountError::HasLines(_))
        ));
    }

    #[test]
    fn test_validate_promote_to_header() {
        let id = AccountId::new();
        assert!(AccountService::validate_promote_to_header(id, false).is_ok());
        assert!(matches!(
            AccountService::validate_promote_to_header(id, true),
            Err(AccountError::HasLines(_))
        ));
    }

    #[test]
    fn test_type_distribution_counts_active_only() {
        let accounts = vec![
            make_account(AccountType::Asset, false, true),
            make_account(AccountType::Asset, true, true),
            make_account(AccountType::Asset, false, false),
            make_account(AccountType::Liability, false, true),
            make_account(AccountType::Revenue, false, true),
            make_account(AccountType::Revenue, false, true),
        ];

        let distribution = AccountService::type_distribution(&accounts);
        assert_eq!(distribution.asset, 2);
        assert_eq!(distribution.liability, 1);
        assert_eq!(distribution.equity, 0);
        assert_eq!(distribution.revenue, 2);
        assert_eq!(distribution.expense, 0);
        assert_eq!(distribution.total(), 5);
    }

    #[test]
    fn test_type_distribution_empty() {
        let distribution = AccountService::type_distribution(&[]);
        assert_eq!(distribution, TypeDistribution::default());
        assert_eq!(distribution.total(), 0);
    }
}
