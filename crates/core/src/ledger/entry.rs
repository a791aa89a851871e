//! Ledger entry domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gescom_shared::types::{DocumentId, LedgerEntryId};

use super::mapping::AccountRef;
use crate::money::amounts_match;

/// Journal an entry is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JournalCode {
    /// Sales journal.
    #[serde(rename = "VT")]
    Ventes,
    /// Purchases journal.
    #[serde(rename = "AC")]
    Achats,
    /// Bank journal.
    #[serde(rename = "BQ")]
    Banque,
    /// Cash journal.
    #[serde(rename = "CA")]
    Caisse,
    /// Payroll journal.
    #[serde(rename = "PA")]
    Paie,
}

impl JournalCode {
    /// Two-letter journal code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ventes => "VT",
            Self::Achats => "AC",
            Self::Banque => "BQ",
            Self::Caisse => "CA",
            Self::Paie => "PA",
        }
    }
}

impl std::fmt::Display for JournalCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// The business document an entry originates from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OriginRef {
    /// Document identifier.
    pub document_id: DocumentId,
    /// Pre-assigned document number (e.g. "FA-2024-0012").
    pub document_number: String,
}

/// One debit or credit posting.
///
/// Exactly one of `debit` and `credit` is non-zero, and neither is negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Account number.
    pub account_number: String,
    /// Account label.
    pub account_label: String,
    /// Line label.
    pub label: String,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
}

impl LedgerLine {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account: &AccountRef, label: &str, amount: Decimal) -> Self {
        Self {
            account_number: account.number.clone(),
            account_label: account.label.clone(),
            label: label.to_string(),
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account: &AccountRef, label: &str, amount: Decimal) -> Self {
        Self {
            account_number: account.number.clone(),
            account_label: account.label.clone(),
            label: label.to_string(),
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Debit and credit sums of an entry, always computed from its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryTotals {
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub equilibre: bool,
}

impl EntryTotals {
    /// Sums the given lines.
    #[must_use]
    pub fn from_lines(lines: &[LedgerLine]) -> Self {
        let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
        let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();

        Self {
            total_debit,
            total_credit,
            equilibre: amounts_match(total_debit, total_credit),
        }
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }
}

/// A journal entry recording one business event.
///
/// There is deliberately no stored balance flag: use [`LedgerEntry::totals`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Identifier derived from `idempotency_key`; rebuilding the same event
    /// yields the same id.
    pub id: LedgerEntryId,
    /// Pre-assigned entry number.
    pub number: String,
    /// Accounting date.
    pub date: NaiveDate,
    /// Journal.
    pub journal_code: JournalCode,
    /// Entry label.
    pub label: String,
    /// Postings.
    pub lines: Vec<LedgerLine>,
    /// Originating document.
    pub origin_document_ref: OriginRef,
    /// `<event-kind>:<document-id>`; unique per posted event.
    pub idempotency_key: String,
}

impl LedgerEntry {
    /// Computes debit and credit totals from the lines.
    #[must_use]
    pub fn totals(&self) -> EntryTotals {
        EntryTotals::from_lines(&self.lines)
    }

    /// Returns true if debits equal credits.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.totals().equilibre
    }
}
