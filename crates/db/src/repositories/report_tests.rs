//! Tests for report row assembly.
//!
//! The report math itself is covered in `mizan_core::reports`; these
//! tests pin the pairing of stored accounts with aggregated activity.

use std::collections::HashMap;

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::build_balance_rows;
use crate::entities::accounts;
use crate::entities::sea_orm_active_enums::{AccountNature, AccountType};

fn account(code: &str, nature: AccountNature) -> accounts::Model {
    accounts::Model {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: format!("Account {code}"),
        name_ar: None,
        description: None,
        account_type: match nature {
            AccountNature::Debit => AccountType::Asset,
            AccountNature::Credit => AccountType::Revenue,
        },
        account_nature: nature,
        is_header: false,
        is_active: true,
        parent_id: None,
        current_balance: Decimal::ZERO,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[test]
fn test_rows_default_to_zero_without_activity() {
    let accounts = vec![account("1.1.1", AccountNature::Debit)];
    let rows = build_balance_rows(&accounts, &HashMap::new());

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].debit_total, Decimal::ZERO);
    assert_eq!(rows[0].credit_total, Decimal::ZERO);
    assert_eq!(rows[0].balance, Decimal::ZERO);
}

#[test]
fn test_rows_sign_balance_by_nature() {
    let cash = account("1.1.1", AccountNature::Debit);
    let rent = account("4.1.1", AccountNature::Credit);
    let mut activity = HashMap::new();
    activity.insert(cash.id, (dec!(900.00), dec!(200.00)));
    activity.insert(rent.id, (dec!(100.00), dec!(800.00)));

    let rows = build_balance_rows(&[cash, rent], &activity);

    assert_eq!(rows[0].balance, dec!(700.00));
    assert_eq!(rows[1].balance, dec!(700.00));
}

#[test]
fn test_rows_keep_account_order() {
    let accounts = vec![
        account("1.1", AccountNature::Debit),
        account("1.2", AccountNature::Debit),
        account("2.1", AccountNature::Credit),
    ];
    let rows = build_balance_rows(&accounts, &HashMap::new());

    let codes: Vec<&str> = rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["1.1", "1.2", "2.1"]);
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The assembled balance always equals the signed difference of
    /// the totals, whichever nature the account has.
    #[test]
    fn prop_balance_matches_signed_totals(
        debit in amount_strategy(),
        credit in amount_strategy(),
        debit_nature in proptest::bool::ANY,
    ) {
        let nature = if debit_nature {
            AccountNature::Debit
        } else {
            AccountNature::Credit
        };
        let model = account("1.1.1", nature);
        let mut activity = HashMap::new();
        activity.insert(model.id, (debit, credit));

        let rows = build_balance_rows(std::slice::from_ref(&model), &activity);
        let expected = if debit_nature {
            debit - credit
        } else {
            credit - debit
        };
        prop_assert_eq!(rows[0].balance, expected);
    }
}
