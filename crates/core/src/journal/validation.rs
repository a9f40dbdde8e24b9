//! Line validation for journal entries.

use rust_decimal::Decimal;

use super::error::JournalError;
use super::types::{JournalLineInput, LineTotals};

/// Validates a set of journal lines against the balance invariant.
///
/// Checks, in order: the line set is non-empty; every line carries
/// non-negative amounts with a non-zero amount on exactly one side;
/// total debits equal total credits within tolerance.
///
/// Line numbers in errors are 1-based, matching the stored
/// `line_number` assigned from array order.
///
/// # Errors
///
/// Returns the first violated rule as a `JournalError`.
pub fn validate_lines(lines: &[JournalLineInput]) -> Result<LineTotals, JournalError> {
    if lines.is_empty() {
        return Err(JournalError::EmptyLines);
    }

    let mut debit_total = Decimal::ZERO;
    let mut credit_total = Decimal::ZERO;

    for (index, line) in lines.iter().enumerate() {
        let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);

        if line.debit_amount < Decimal::ZERO || line.credit_amount < Decimal::ZERO {
            return Err(JournalError::NegativeAmount { line: line_number });
        }
        if line.debit_amount > Decimal::ZERO && line.credit_amount > Decimal::ZERO {
            return Err(JournalError::BothSidesNonZero { line: line_number });
        }
        if line.debit_amount == Decimal::ZERO && line.credit_amount == Decimal::ZERO {
            return Err(JournalError::ZeroAmountLine { line: line_number });
        }

        debit_total += line.debit_amount;
        credit_total += line.credit_amount;
    }

    let totals = LineTotals::new(debit_total, credit_total);
    if !totals.is_balanced {
        return Err(JournalError::Unbalanced {
            debit: totals.debit_total,
            credit: totals.credit_total,
        });
    }

    Ok(totals)
}
