//! Property-based tests for template line building.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::types::{AccountId, TemplateId};

use super::builder::build_lines;
use super::error::AutoJournalError;
use super::template::{AccountRef, AmountSpec, AutoJournalTemplate, TemplateLine};
use crate::accounts::{AccountInfo, AccountNature, AccountType};
use crate::journal::validate_lines;

/// Turns sorted cut points in (0, 100) into integer percentage parts
/// that sum to exactly 100.
fn percent_split(mut cuts: Vec<u32>) -> Vec<Decimal> {
    cuts.push(100);
    cuts.sort_unstable();
    cuts.dedup();

    let mut parts = Vec::new();
    let mut prev = 0u32;
    for cut in cuts {
        if cut > prev {
            parts.push(Decimal::from(cut - prev));
            prev = cut;
        }
    }
    parts
}

fn cuts_strategy() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(1u32..100, 0..4)
}

struct Fixture {
    template: AutoJournalTemplate,
    index: HashMap<String, AccountInfo>,
}

impl Fixture {
    fn new(debit_pcts: &[Decimal], credit_pcts: &[Decimal]) -> Self {
        let mut index = HashMap::new();
        let mut debit_lines = Vec::new();
        let mut credit_lines = Vec::new();

        for (i, &percentage) in debit_pcts.iter().enumerate() {
            let code = format!("1.1.{i}");
            index.insert(code.clone(), postable_account(&code));
            debit_lines.push(TemplateLine {
                account: AccountRef::ByCode { code },
                amount: AmountSpec::Percentage { percentage },
            });
        }
        for (i, &percentage) in credit_pcts.iter().enumerate() {
            let code = format!("4.1.{i}");
            index.insert(code.clone(), postable_account(&code));
            credit_lines.push(TemplateLine {
                account: AccountRef::ByCode { code },
                amount: AmountSpec::Percentage { percentage },
            });
        }

        Self {
            template: AutoJournalTemplate {
                id: TemplateId::new(),
                trigger_event: "payment_received".to_string(),
                name: "Payment received".to_string(),
                debit_lines,
                credit_lines,
                priority: 0,
                is_active: true,
            },
            index,
        }
    }

    fn resolve(&self, account_ref: &AccountRef) -> Option<AccountInfo> {
        match account_ref {
            AccountRef::ByCode { code } => self.index.get(code).cloned(),
            AccountRef::ById { .. } => None,
        }
    }
}

fn postable_account(code: &str) -> AccountInfo {
    AccountInfo {
        id: AccountId::new(),
        code: code.to_string(),
        name: format!("Account {code}"),
        account_type: AccountType::Asset,
        account_nature: AccountNature::Debit,
        is_header: false,
        is_active: true,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* whole trigger amount and integer percentage splits
    /// summing to 100 on each side, the built lines pass journal
    /// validation with equal totals.
    #[test]
    fn prop_full_splits_build_balanced_entries(
        amount in 1u32..100_000_000,
        debit_cuts in cuts_strategy(),
        credit_cuts in cuts_strategy(),
    ) {
        let fixture = Fixture::new(&percent_split(debit_cuts), &percent_split(credit_cuts));
        let amount = Decimal::from(amount);

        let built = build_lines(&fixture.template, amount, |r| fixture.resolve(r)).unwrap();
        let totals = validate_lines(&built.lines).unwrap();

        prop_assert!(totals.is_balanced);
        prop_assert_eq!(totals.debit_total, amount);
        prop_assert_eq!(totals.credit_total, amount);
    }

    /// *For any* built line set, every debit line precedes every
    /// credit line and each line carries exactly one side.
    #[test]
    fn prop_debits_precede_credits(
        amount in 1u32..100_000_000,
        debit_cuts in cuts_strategy(),
        credit_cuts in cuts_strategy(),
    ) {
        let fixture = Fixture::new(&percent_split(debit_cuts), &percent_split(credit_cuts));

        let built =
            build_lines(&fixture.template, Decimal::from(amount), |r| fixture.resolve(r))
                .unwrap();

        let first_credit = built
            .lines
            .iter()
            .position(|l| l.credit_amount > Decimal::ZERO)
            .unwrap();
        for (i, line) in built.lines.iter().enumerate() {
            let one_sided = (line.debit_amount > Decimal::ZERO)
                ^ (line.credit_amount > Decimal::ZERO);
            prop_assert!(one_sided);
            if i < first_credit {
                prop_assert!(line.debit_amount > Decimal::ZERO);
            } else {
                prop_assert!(line.credit_amount > Decimal::ZERO);
            }
        }
    }

    /// *For any* number of unresolvable credit mappings, each one is
    /// reported as dropped while resolvable mappings survive.
    #[test]
    fn prop_unresolved_mappings_counted(
        amount in 1u32..1_000_000,
        good in 1usize..4,
        bad in 1usize..4,
    ) {
        let pct = Decimal::from(10);
        let mut fixture = Fixture::new(&[Decimal::from(100)], &vec![pct; good]);
        for i in 0..bad {
            fixture.template.credit_lines.push(TemplateLine {
                account: AccountRef::ByCode {
                    code: format!("9.9.{i}"),
                },
                amount: AmountSpec::Percentage { percentage: pct },
            });
        }

        let built =
            build_lines(&fixture.template, Decimal::from(amount), |r| fixture.resolve(r))
                .unwrap();

        prop_assert_eq!(built.dropped.len(), bad);
        prop_assert_eq!(built.lines.len(), 1 + good);
    }

    /// *For any* template whose mappings all fail to resolve, the
    /// build fails instead of producing an empty entry.
    #[test]
    fn prop_fully_unresolved_template_fails(
        amount in 1u32..1_000_000,
        debit_cuts in cuts_strategy(),
        credit_cuts in cuts_strategy(),
    ) {
        let fixture = Fixture::new(&percent_split(debit_cuts), &percent_split(credit_cuts));

        let result = build_lines(&fixture.template, Decimal::from(amount), |_| None);
        prop_assert!(
            matches!(result, Err(AutoJournalError::NoResolvedLines { .. })),
            "assertion failed: matches!(result, Err(AutoJournalError::NoResolvedLines {{ .. }}))"
        );
    }
}
