//! Counter-entries for cancelling posted entries.

use chrono::NaiveDate;
use tracing::{debug, error};

use gescom_shared::types::LedgerEntryId;

use super::entry::{LedgerEntry, LedgerLine};
use super::validation::validate_lines;
use crate::error::{EngineError, EngineResult};

/// Builds the counter-entry of a posted entry.
///
/// Each line's debit and credit are swapped; accounts and origin are kept.
/// Labels are prefixed with "Extourne". The counter-entry's idempotency key
/// is `reversal:<original key>`, so a given entry can be reversed once.
///
/// # Errors
///
/// Returns `InvariantViolation` if the original entry is not itself a valid
/// balanced entry.
pub fn reverse_entry(
    entry: &LedgerEntry,
    number: &str,
    date: NaiveDate,
) -> EngineResult<LedgerEntry> {
    if let Err(err) = validate_lines(&entry.lines) {
        error!(
            entry_number = %entry.number,
            error = %err,
            "Cannot reverse an invalid ledger entry"
        );
        return Err(EngineError::from(err));
    }

    let lines: Vec<LedgerLine> = entry
        .lines
        .iter()
        .map(|line| LedgerLine {
            account_number: line.account_number.clone(),
            account_label: line.account_label.clone(),
            label: format!("Extourne: {}", line.label),
            debit: line.credit,
            credit: line.debit,
        })
        .collect();

    let idempotency_key = format!("reversal:{}", entry.idempotency_key);
    let reversed = LedgerEntry {
        id: LedgerEntryId::from_name(&idempotency_key),
        number: number.to_string(),
        date,
        journal_code: entry.journal_code,
        label: format!("Extourne: {}", entry.label),
        lines,
        origin_document_ref: entry.origin_document_ref.clone(),
        idempotency_key,
    };

    debug!(
        original = %entry.number,
        entry_number = %reversed.number,
        line_count = reversed.lines.len(),
        "Built reversal entry"
    );

    Ok(reversed)
}
