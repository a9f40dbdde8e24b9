//! Builds journal lines from a template and a trigger amount.

use rust_decimal::Decimal;

use super::error::AutoJournalError;
use super::template::{AccountRef, AutoJournalTemplate};
use crate::accounts::AccountInfo;
use crate::journal::JournalLineInput;

/// Result of expanding a template into journal lines.
#[derive(Debug)]
pub struct BuiltLines {
    /// Generated lines, debit side first, in template order.
    pub lines: Vec<JournalLineInput>,
    /// Account refs that did not resolve to a postable account.
    pub dropped: Vec<AccountRef>,
}

/// Expands a template into journal lines for a trigger amount.
///
/// Mappings that fail to resolve to a postable account are dropped
/// and reported rather than failing the whole build; zero-amount
/// lines are skipped. If either side ends up with no lines the
/// template cannot produce a balanced entry and the build fails.
///
/// # Errors
///
/// Returns `AutoJournalError::NoResolvedLines` when the debit or
/// credit side resolves to nothing.
pub fn build_lines<R>(
    template: &AutoJournalTemplate,
    amount: Decimal,
    resolve: R,
) -> Result<BuiltLines, AutoJournalError>
where
    R: Fn(&AccountRef) -> Option<AccountInfo>,
{
    let mut lines = Vec::new();
    let mut dropped = Vec::new();

    for mapping in &template.debit_lines {
        match resolve(&mapping.account) {
            Some(account) if account.is_postable() => {
                let value = mapping.amount.line_amount(amount);
                if value > Decimal::ZERO {
                    lines.push(JournalLineInput::debit(account.id, value));
                }
            }
            _ => dropped.push(mapping.account.clone()),
        }
    }
    let debit_count = lines.len();

    for mapping in &template.credit_lines {
        match resolve(&mapping.account) {
            Some(account) if account.is_postable() => {
                let value = mapping.amount.line_amount(amount);
                if value > Decimal::ZERO {
                    lines.push(JournalLineInput::credit(account.id, value));
                }
            }
            _ => dropped.push(mapping.account.clone()),
        }
    }
    let credit_count = lines.len() - debit_count;

    if debit_count == 0 || credit_count == 0 {
        return Err(AutoJournalError::NoResolvedLines {
            template_id: template.id,
        });
    }

    Ok(BuiltLines { lines, dropped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    use mizan_shared::types::{AccountId, TemplateId};

    use crate::accounts::{AccountNature, AccountType};
    use crate::autojournal::template::{AmountSpec, TemplateLine};

    struct Index {
        by_code: HashMap<String, AccountInfo>,
    }

    impl Index {
        fn new() -> Self {
            Self {
                by_code: HashMap::new(),
            }
        }

        fn add(&mut self, code: &str, is_header: bool) -> AccountId {
            let account = AccountInfo {
                id: AccountId::new(),
                code: code.to_string(),
                name: format!("Account {code}"),
                account_type: AccountType::Asset,
                account_nature: AccountNature::Debit,
                is_header,
                is_active: true,
            };
            let id = account.id;
            self.by_code.insert(code.to_string(), account);
            id
        }

        fn resolve(&self, account_ref: &AccountRef) -> Option<AccountInfo> {
            match account_ref {
                AccountRef::ByCode { code } => self.by_code.get(code).cloned(),
                AccountRef::ById { id } => {
                    self.by_code.values().find(|a| a.id == *id).cloned()
                }
            }
        }
    }

    fn by_code(code: &str) -> AccountRef {
        AccountRef::ByCode {
            code: code.to_string(),
        }
    }

    fn percentage_line(code: &str, percentage: Decimal) -> TemplateLine {
        TemplateLine {
            account: by_code(code),
            amount: AmountSpec::Percentage { percentage },
        }
    }

    fn make_template(debit_lines: Vec<TemplateLine>, credit_lines: Vec<TemplateLine>) -> AutoJournalTemplate {
        AutoJournalTemplate {
            id: TemplateId::new(),
            trigger_event: "rental_receipt".to_string(),
            name: "Rental receipt".to_string(),
            debit_lines,
            credit_lines,
            priority: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_full_percentage_template() {
        let mut index = Index::new();
        let cash = index.add("1.1.1", false);
        let revenue = index.add("4.1.1", false);

        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![percentage_line("4.1.1", dec!(100))],
        );

        let built = build_lines(&template, dec!(2000), |r| index.resolve(r)).unwrap();

        assert_eq!(built.lines.len(), 2);
        assert!(built.dropped.is_empty());
        assert_eq!(built.lines[0].account_id, cash);
        assert_eq!(built.lines[0].debit_amount, dec!(2000.00));
        assert_eq!(built.lines[1].account_id, revenue);
        assert_eq!(built.lines[1].credit_amount, dec!(2000.00));
    }

    #[test]
    fn test_split_percentages() {
        let mut index = Index::new();
        index.add("1.1.1", false);
        index.add("4.1.1", false);
        index.add("4.1.2", false);

        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![
                percentage_line("4.1.1", dec!(80)),
                percentage_line("4.1.2", dec!(20)),
            ],
        );

        let built = build_lines(&template, dec!(1000), |r| index.resolve(r)).unwrap();

        assert_eq!(built.lines.len(), 3);
        assert_eq!(built.lines[1].credit_amount, dec!(800.00));
        assert_eq!(built.lines[2].credit_amount, dec!(200.00));
    }

    #[test]
    fn test_fixed_amount_line() {
        let mut index = Index::new();
        index.add("1.1.1", false);
        index.add("4.1.1", false);

        let template = make_template(
            vec![TemplateLine {
                account: by_code("1.1.1"),
                amount: AmountSpec::Fixed { amount: dec!(75) },
            }],
            vec![TemplateLine {
                account: by_code("4.1.1"),
                amount: AmountSpec::Fixed { amount: dec!(75) },
            }],
        );

        let built = build_lines(&template, dec!(9999), |r| index.resolve(r)).unwrap();
        assert_eq!(built.lines[0].debit_amount, dec!(75.00));
        assert_eq!(built.lines[1].credit_amount, dec!(75.00));
    }

    #[test]
    fn test_unresolved_refs_dropped() {
        let mut index = Index::new();
        index.add("1.1.1", false);
        index.add("4.1.1", false);

        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![
                percentage_line("4.1.1", dec!(100)),
                percentage_line("9.9.9", dec!(10)),
            ],
        );

        let built = build_lines(&template, dec!(500), |r| index.resolve(r)).unwrap();

        assert_eq!(built.lines.len(), 2);
        assert_eq!(built.dropped, vec![by_code("9.9.9")]);
    }

    #[test]
    fn test_header_account_dropped() {
        let mut index = Index::new();
        index.add("1.1.1", false);
        index.add("4.1", true);
        index.add("4.1.1", false);

        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![
                percentage_line("4.1", dec!(50)),
                percentage_line("4.1.1", dec!(50)),
            ],
        );

        let built = build_lines(&template, dec!(1000), |r| index.resolve(r)).unwrap();

        assert_eq!(built.lines.len(), 2);
        assert_eq!(built.dropped, vec![by_code("4.1")]);
    }

    #[test]
    fn test_all_unresolved_fails() {
        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![percentage_line("4.1.1", dec!(100))],
        );

        let result = build_lines(&template, dec!(1000), |_| None);
        assert!(matches!(
            result,
            Err(AutoJournalError::NoResolvedLines { .. })
        ));
    }

    #[test]
    fn test_one_empty_side_fails() {
        let mut index = Index::new();
        index.add("1.1.1", false);

        let template = make_template(
            vec![percentage_line("1.1.1", dec!(100))],
            vec![percentage_line("4.1.1", dec!(100))],
        );

        let result = build_lines(&template, dec!(1000), |r| index.resolve(r));
        assert!(matches!(
            result,
            Err(AutoJournalError::NoResolvedLines { .. })
        ));
    }

    #[test]
    fn test_zero_amount_lines_skipped() {
        let mut index = Index::new();
        index.add("1.1.1", false);
        index.add("1.1.2", false);
        index.add("4.1.1", false);

        let template = make_template(
            vec![
                percentage_line("1.1.1", dec!(100)),
                TemplateLine {
                    account: by_code("1.1.2"),
                    amount: AmountSpec::Fixed { amount: dec!(0) },
                },
            ],
            vec![percentage_line("4.1.1", dec!(100))],
        );

        let built = build_lines(&template, dec!(1000), |r| index.resolve(r)).unwrap();

        assert_eq!(built.lines.len(), 2);
        assert!(built.dropped.is_empty());
    }

    #[test]
    fn test_resolve_by_id() {
        let mut index = Index::new();
        let cash = index.add("1.1.1", false);
        index.add("4.1.1", false);

        let template = make_template(
            vec![TemplateLine {
                account: AccountRef::ById { id: cash },
                amount: AmountSpec::Percentage {
                    percentage: dec!(100),
                },
            }],
            vec![percentage_line("4.1.1", dec!(100))],
        );

        let built = build_lines(&template, dec!(300), |r| index.resolve(r)).unwrap();
        assert_eq!(built.lines[0].account_id, cash);
    }
}
