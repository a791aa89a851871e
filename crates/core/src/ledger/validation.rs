//! Structural validation of ledger lines.

use rust_decimal::Decimal;

use super::entry::{EntryTotals, LedgerLine};
use crate::error::InvariantViolation;

/// Validates a set of lines and returns their totals.
///
/// Rules:
/// - At least one line
/// - No negative amount on either side
/// - Exactly one of debit and credit is non-zero on each line
/// - Debits equal credits within [`crate::money::EPSILON`]
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_lines(lines: &[LedgerLine]) -> Result<EntryTotals, InvariantViolation> {
    if lines.is_empty() {
        return Err(InvariantViolation::EmptyEntry);
    }

    for line in lines {
        if line.debit < Decimal::ZERO || line.credit < Decimal::ZERO {
            return Err(InvariantViolation::NegativeLine(line.account_number.clone()));
        }
        if line.debit.is_zero() == line.credit.is_zero() {
            return Err(InvariantViolation::LineBothSides(line.account_number.clone()));
        }
    }

    let totals = EntryTotals::from_lines(lines);
    if !totals.equilibre {
        return Err(InvariantViolation::UnbalancedEntry {
            debit: totals.total_debit,
            credit: totals.total_credit,
        });
    }

    Ok(totals)
}
