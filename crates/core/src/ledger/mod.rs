//! Double-entry posting of business events.
//!
//! This module implements the ledger side of the engine:
//! - Ledger entries and lines, with totals always computed from the lines
//! - The tenant chart-of-accounts mapping
//! - Business events and one entry template per event kind
//! - Structural validation, reversals and per-account balances

pub mod balance;
pub mod builder;
pub mod entry;
pub mod events;
pub mod mapping;
pub mod reversal;
pub mod validation;

#[cfg(test)]
mod builder_props;
#[cfg(test)]
mod validation_props;

pub use balance::{AccountBalance, TrialBalance};
pub use builder::{LedgerEntryBuilder, ensure_not_posted};
pub use entry::{EntryTotals, JournalCode, LedgerEntry, LedgerLine, OriginRef};
pub use events::{
    BusinessEvent, DocumentAmounts, EventHeader, EventKind, PaymentMethod, PayrollPosting,
};
pub use mapping::{AccountRef, ChartOfAccountsMapping};
pub use reversal::reverse_entry;
pub use validation::validate_lines;
