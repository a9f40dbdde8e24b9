//! `SeaORM` active enums mapping the Postgres enum types.
//!
//! Each enum mirrors a domain enum in `mizan-core`; the `From`
//! conversions keep the repositories free of string matching.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_nature")]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    #[sea_orm(string_value = "debit")]
    Debit,
    #[sea_orm(string_value = "credit")]
    Credit,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_status")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fiscal_year_status")]
#[serde(rename_all = "lowercase")]
pub enum FiscalYearStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "match_type")]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    #[sea_orm(string_value = "auto")]
    Auto,
    #[sea_orm(string_value = "manual")]
    Manual,
    #[sea_orm(string_value = "suggested")]
    Suggested,
}

impl From<mizan_core::accounts::AccountType> for AccountType {
    fn from(value: mizan_core::accounts::AccountType) -> Self {
        match value {
            mizan_core::accounts::AccountType::Asset => Self::Asset,
            mizan_core::accounts::AccountType::Liability => Self::Liability,
            mizan_core::accounts::AccountType::Equity => Self::Equity,
            mizan_core::accounts::AccountType::Revenue => Self::Revenue,
            mizan_core::accounts::AccountType::Expense => Self::Expense,
        }
    }
}

impl From<AccountType> for mizan_core::accounts::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<mizan_core::accounts::AccountNature> for AccountNature {
    fn from(value: mizan_core::accounts::AccountNature) -> Self {
        match value {
            mizan_core::accounts::AccountNature::Debit => Self::Debit,
            mizan_core::accounts::AccountNature::Credit => Self::Credit,
        }
    }
}

impl From<AccountNature> for mizan_core::accounts::AccountNature {
    fn from(value: AccountNature) -> Self {
        match value {
            AccountNature::Debit => Self::Debit,
            AccountNature::Credit => Self::Credit,
        }
    }
}

impl From<mizan_core::journal::EntryStatus> for EntryStatus {
    fn from(value: mizan_core::journal::EntryStatus) -> Self {
        match value {
            mizan_core::journal::EntryStatus::Draft => Self::Draft,
            mizan_core::journal::EntryStatus::Posted => Self::Posted,
            mizan_core::journal::EntryStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<EntryStatus> for mizan_core::journal::EntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<mizan_core::fiscal::FiscalYearStatus> for FiscalYearStatus {
    fn from(value: mizan_core::fiscal::FiscalYearStatus) -> Self {
        match value {
            mizan_core::fiscal::FiscalYearStatus::Open => Self::Open,
            mizan_core::fiscal::FiscalYearStatus::Closed => Self::Closed,
        }
    }
}

impl From<FiscalYearStatus> for mizan_core::fiscal::FiscalYearStatus {
    fn from(value: FiscalYearStatus) -> Self {
        match value {
            FiscalYearStatus::Open => Self::Open,
            FiscalYearStatus::Closed => Self::Closed,
        }
    }
}

impl From<mizan_core::reconciliation::MatchType> for MatchType {
    fn from(value: mizan_core::reconciliation::MatchType) -> Self {
        match value {
            mizan_core::reconciliation::MatchType::Auto => Self::Auto,
            mizan_core::reconciliation::MatchType::Manual => Self::Manual,
            mizan_core::reconciliation::MatchType::Suggested => Self::Suggested,
        }
    }
}

impl From<MatchType> for mizan_core::reconciliation::MatchType {
    fn from(value: MatchType) -> Self {
        match value {
            MatchType::Auto => Self::Auto,
            MatchType::Manual => Self::Manual,
            MatchType::Suggested => Self::Suggested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_round_trip() {
        for ty in mizan_core::accounts::AccountType::ALL {
            let db: AccountType = ty.into();
            let back: mizan_core::accounts::AccountType = db.into();
            assert_eq!(back, ty);
        }
    }

    #[test]
    fn test_entry_status_round_trip() {
        for status in [
            mizan_core::journal::EntryStatus::Draft,
            mizan_core::journal::EntryStatus::Posted,
            mizan_core::journal::EntryStatus::Cancelled,
        ] {
            let db: EntryStatus = status.into();
            let back: mizan_core::journal::EntryStatus = db.into();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn test_nature_round_trip() {
        for nature in [
            mizan_core::accounts::AccountNature::Debit,
            mizan_core::accounts::AccountNature::Credit,
        ] {
            let db: AccountNature = nature.into();
            let back: mizan_core::accounts::AccountNature = db.into();
            assert_eq!(back, nature);
        }
    }
}
