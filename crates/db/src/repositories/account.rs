//! Chart-of-accounts repository.
//!
//! Structural rules (code format, parent/header constraints, delete
//! guards) live in `mizan_core::accounts`; this module binds them to
//! the stored rows and owns the materialized balance column.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use mizan_core::accounts::{
    AccountCode, AccountError, AccountInfo, AccountNature, AccountService, AccountType,
    TypeDistribution,
};
use mizan_shared::types::AccountId;

use crate::entities::{accounts, journal_entry_lines, sea_orm_active_enums};

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Hierarchical account code (e.g., "1.1.2").
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional Arabic display name.
    pub name_ar: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// Account type.
    pub account_type: AccountType,
    /// Account nature; defaults from the type when omitted.
    pub account_nature: Option<AccountNature>,
    /// Whether this is an aggregation-only header account.
    pub is_header: bool,
    /// Optional parent account; must be a header account.
    pub parent_id: Option<AccountId>,
}

/// Input for updating an account. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New display name.
    pub name: Option<String>,
    /// New Arabic display name.
    pub name_ar: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New account type; rejected once the account carries lines.
    pub account_type: Option<AccountType>,
    /// New account nature.
    pub account_nature: Option<AccountNature>,
    /// Promote or demote header status.
    pub is_header: Option<bool>,
    /// Activate or deactivate the account.
    pub is_active: Option<bool>,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Filter by header flag.
    pub is_header: Option<bool>,
    /// Filter by direct parent.
    pub parent_id: Option<AccountId>,
}

/// A signed balance adjustment for one account.
///
/// Produced by the posting flow from the signed-delta rule and applied
/// as a relative update so concurrent postings cannot lose increments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceDelta {
    /// Target account.
    pub account_id: Uuid,
    /// Signed amount to add to the current balance.
    pub delta: Decimal,
}

/// Chart-of-accounts repository.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a zero opening balance.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is invalid or already taken, or if
    /// the parent is missing or not a header account.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let code = AccountCode::parse(&input.code)?;

        let existing = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(code.to_string()));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = accounts::Entity::find_by_id(parent_id.into_inner())
                .one(&self.db)
                .await
                .map_err(db_err)?
                .ok_or(AccountError::ParentNotFound(parent_id))?;
            AccountService::validate_parent(&to_account_info(&parent))?;
        }

        let nature = input
            .account_nature
            .unwrap_or_else(|| input.account_type.default_nature());
        let now = Utc::now().into();

        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.as_str().to_owned()),
            name: Set(input.name),
            name_ar: Set(input.name_ar),
            description: Set(input.description),
            account_type: Set(input.account_type.into()),
            account_nature: Set(nature.into()),
            is_header: Set(input.is_header),
            is_active: Set(true),
            parent_id: Set(input.parent_id.map(AccountId::into_inner)),
            current_balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        account.insert(&self.db).await.map_err(db_err)
    }

    /// Updates an account's mutable attributes.
    ///
    /// Once an account carries journal lines its type is locked and it
    /// can no longer become a header account.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or a guard rejects
    /// the change.
    pub async fn update_account(
        &self,
        account_id: AccountId,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self.find_by_id(account_id).await?;

        if input.is_header == Some(true) && !account.is_header {
            let has_lines = self.has_lines(account_id).await?;
            AccountService::validate_promote_to_header(account_id, has_lines)?;
        }

        if let Some(new_type) = input.account_type {
            let current: AccountType = account.account_type.clone().into();
            if new_type != current && self.has_lines(account_id).await? {
                return Err(AccountError::TypeLocked(account_id));
            }
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(name_ar) = input.name_ar {
            active.name_ar = Set(Some(name_ar));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type.into());
            // A type change re-derives the nature unless one was given.
            let nature = input
                .account_nature
                .unwrap_or_else(|| account_type.default_nature());
            active.account_nature = Set(nature.into());
        } else if let Some(nature) = input.account_nature {
            active.account_nature = Set(nature.into());
        }
        if let Some(is_header) = input.is_header {
            active.is_header = Set(is_header);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(db_err)
    }

    /// Deletes an account.
    ///
    /// Deletion is rejected, never cascaded, while journal lines or
    /// child accounts reference the account.
    ///
    /// # Errors
    ///
    /// Returns an error naming the blocking reference.
    pub async fn delete_account(&self, account_id: AccountId) -> Result<(), AccountError> {
        let account = self.find_by_id(account_id).await?;

        let has_lines = self.has_lines(account_id).await?;
        let has_children = self.has_children(account_id).await?;
        AccountService::validate_delete(account_id, has_lines, has_children)?;

        accounts::Entity::delete_by_id(account.id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if no account exists.
    pub async fn find_by_id(&self, account_id: AccountId) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::CodeNotFound` if no account exists.
    pub async fn find_by_code(&self, code: &str) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| AccountError::CodeNotFound(code.to_string()))
    }

    /// Lists accounts with optional filters, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
    ) -> Result<Vec<accounts::Model>, AccountError> {
        let mut query = accounts::Entity::find();

        if let Some(account_type) = filter.account_type {
            let account_type: sea_orm_active_enums::AccountType = account_type.into();
            query = query.filter(accounts::Column::AccountType.eq(account_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }
        if let Some(is_header) = filter.is_header {
            query = query.filter(accounts::Column::IsHeader.eq(is_header));
        }
        if let Some(parent_id) = filter.parent_id {
            query = query.filter(accounts::Column::ParentId.eq(parent_id.into_inner()));
        }

        query
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Lists active posting (non-header) accounts, ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_leaf_accounts(&self) -> Result<Vec<accounts::Model>, AccountError> {
        accounts::Entity::find()
            .filter(accounts::Column::IsHeader.eq(false))
            .filter(accounts::Column::IsActive.eq(true))
            .order_by_asc(accounts::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)
    }

    /// Computes the count of active accounts per type.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn type_distribution(&self) -> Result<TypeDistribution, AccountError> {
        let models = accounts::Entity::find().all(&self.db).await.map_err(db_err)?;
        let infos: Vec<AccountInfo> = models.iter().map(to_account_info).collect();
        Ok(AccountService::type_distribution(&infos))
    }

    /// Applies signed balance deltas inside an open transaction.
    ///
    /// Each delta is a relative `current_balance = current_balance + x`
    /// update, never a read-modify-write, so concurrent postings to the
    /// same account serialize on the row instead of clobbering it.
    ///
    /// # Errors
    ///
    /// Returns the underlying database error; the caller owns the
    /// transaction and maps the error into its own domain.
    pub async fn apply_balance_deltas(
        txn: &DatabaseTransaction,
        deltas: &[BalanceDelta],
    ) -> Result<(), DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        for delta in deltas {
            if delta.delta.is_zero() {
                continue;
            }
            accounts::Entity::update_many()
                .col_expr(
                    accounts::Column::CurrentBalance,
                    Expr::col(accounts::Column::CurrentBalance).add(delta.delta),
                )
                .col_expr(accounts::Column::UpdatedAt, Expr::value(now))
                .filter(accounts::Column::Id.eq(delta.account_id))
                .exec(txn)
                .await?;
        }
        Ok(())
    }

    /// Returns true if any journal line references the account.
    async fn has_lines(&self, account_id: AccountId) -> Result<bool, AccountError> {
        let count = journal_entry_lines::Entity::find()
            .filter(journal_entry_lines::Column::AccountId.eq(account_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    /// Returns true if any account has this account as parent.
    async fn has_children(&self, account_id: AccountId) -> Result<bool, AccountError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::ParentId.eq(account_id.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }
}

// ============================================================================
// Projection helpers
// ============================================================================

/// Projects a stored account into the validation view used by the
/// pure services.
#[must_use]
pub fn to_account_info(account: &accounts::Model) -> AccountInfo {
    AccountInfo {
        id: AccountId::from_uuid(account.id),
        code: account.code.clone(),
        name: account.name.clone(),
        account_type: account.account_type.clone().into(),
        account_nature: account.account_nature.clone().into(),
        is_header: account.is_header,
        is_active: account.is_active,
    }
}

fn db_err(err: DbErr) -> AccountError {
    AccountError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_account(is_header: bool, is_active: bool) -> accounts::Model {
        accounts::Model {
            id: Uuid::new_v4(),
            code: "1.1.2".to_string(),
            name: "Rent Receivable".to_string(),
            name_ar: None,
            description: None,
            account_type: sea_orm_active_enums::AccountType::Asset,
            account_nature: sea_orm_active_enums::AccountNature::Debit,
            is_header,
            is_active,
            parent_id: None,
            current_balance: dec!(150.00),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_account_info_projection() {
        let model = sample_account(false, true);
        let info = to_account_info(&model);

        assert_eq!(info.id.into_inner(), model.id);
        assert_eq!(info.code, "1.1.2");
        assert_eq!(info.account_type, AccountType::Asset);
        assert_eq!(info.account_nature, AccountNature::Debit);
        assert!(info.is_postable());
    }

    #[test]
    fn test_header_account_is_not_postable() {
        let info = to_account_info(&sample_account(true, true));
        assert!(!info.is_postable());

        let info = to_account_info(&sample_account(false, false));
        assert!(!info.is_postable());
    }
}
